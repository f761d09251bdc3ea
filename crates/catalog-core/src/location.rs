//! ============================================================================
//! Location Codec - Query-string scheme for page state
//! ============================================================================
//!   /                      home (also /index.html)
//!   /?product=<id>         product detail
//!   /?filter=<json>        filtered list, JSON percent-encoded
//!
//! A `#fragment` is ignored. `filter` takes precedence over `product`.
//! ============================================================================

use std::fmt;

use thiserror::Error;
use url::form_urlencoded;

use crate::selection::{DecodeError, FilterSelection};

/// Location of the home page
pub const HOME_PATH: &str = "/";

/// Page entry point; equivalent to `/`
pub const ENTRY_POINT: &str = "/index.html";

const FILTER_PARAM: &str = "filter";
const PRODUCT_PARAM: &str = "product";

/// Why a location could not be turned into a page
#[derive(Debug, Error)]
pub enum RouteError {
    /// The filter payload was present but not a valid selection
    #[error("Invalid filter payload: {0}")]
    Decode(#[from] DecodeError),

    #[error("Unrecognized location: {0}")]
    Unrecognized(String),
}

/// Parsed location
#[derive(Debug, Clone, PartialEq)]
pub enum Location {
    Home,
    Product(i64),
    Filter(FilterSelection),
}

impl Location {
    /// Parse a raw location such as `/?filter=%7B%7D` or `?product=3`
    pub fn parse(raw: &str) -> Result<Self, RouteError> {
        let without_fragment = raw.split('#').next().unwrap_or_default();
        let (path, query) = match without_fragment.split_once('?') {
            Some((path, query)) => (path, query),
            None => (without_fragment, ""),
        };

        if !matches!(path, "" | HOME_PATH | ENTRY_POINT) {
            return Err(RouteError::Unrecognized(raw.to_string()));
        }

        if query.is_empty() {
            return Ok(Location::Home);
        }

        let mut filter = None;
        let mut product = None;
        for (key, value) in form_urlencoded::parse(query.as_bytes()) {
            match &*key {
                FILTER_PARAM if filter.is_none() => filter = Some(value.into_owned()),
                PRODUCT_PARAM if product.is_none() => product = Some(value.into_owned()),
                FILTER_PARAM | PRODUCT_PARAM => {}
                _ => return Err(RouteError::Unrecognized(raw.to_string())),
            }
        }

        // An empty filter counts as absent so a product can still be shown
        let had_filter = filter.is_some();
        if let Some(payload) = filter.filter(|p| !p.is_empty()) {
            let selection = FilterSelection::decode(&payload)?;
            return Ok(Location::for_selection(selection));
        }

        match product {
            Some(id) => id
                .trim()
                .parse::<i64>()
                .map(Location::Product)
                .map_err(|_| RouteError::Unrecognized(raw.to_string())),
            None if had_filter => Ok(Location::Home),
            None => Err(RouteError::Unrecognized(raw.to_string())),
        }
    }

    /// Location showing `selection`; an empty selection is the home page
    pub fn for_selection(selection: FilterSelection) -> Self {
        if selection.is_empty() {
            Location::Home
        } else {
            Location::Filter(selection)
        }
    }

    /// Encode back into a location string
    pub fn to_url(&self) -> String {
        match self {
            Location::Home => HOME_PATH.to_string(),
            Location::Product(id) => format!("{}?{}={}", HOME_PATH, PRODUCT_PARAM, id),
            Location::Filter(selection) if selection.is_empty() => HOME_PATH.to_string(),
            Location::Filter(selection) => format!(
                "{}?{}={}",
                HOME_PATH,
                FILTER_PARAM,
                urlencoding::encode(&selection.encode())
            ),
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_url())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_home() {
        for raw in ["", "/", "/index.html", "/?", "/#top", "/index.html?filter="] {
            assert_eq!(Location::parse(raw).unwrap(), Location::Home, "{raw}");
        }
    }

    #[test]
    fn test_product() {
        assert_eq!(Location::parse("/?product=7").unwrap(), Location::Product(7));
        assert_eq!(Location::parse("?product=12").unwrap(), Location::Product(12));
        assert_eq!(Location::Product(7).to_url(), "/?product=7");
    }

    #[test]
    fn test_filter_round_trip() {
        let selection = FilterSelection::new()
            .select("color", "red")
            .select("manufacturer", "Smith & Co+")
            .select("style", "high heel");

        let url = Location::Filter(selection.clone()).to_url();
        assert!(url.starts_with("/?filter=%7B"));

        match Location::parse(&url).unwrap() {
            Location::Filter(decoded) => assert_eq!(decoded, selection),
            other => panic!("expected filter, got {:?}", other),
        }
    }

    #[test]
    fn test_plus_decodes_as_space() {
        let parsed = Location::parse(r#"/?filter={"style":["high+heel"]}"#).unwrap();
        let expected = FilterSelection::new().select("style", "high heel");
        assert_eq!(parsed, Location::Filter(expected));
    }

    #[test]
    fn test_filter_wins_over_product() {
        let url = format!("/?product=3&filter={}", urlencoding::encode(r#"{"color":["red"]}"#));
        assert!(matches!(Location::parse(&url).unwrap(), Location::Filter(_)));
    }

    #[test]
    fn test_empty_filter_falls_through_to_product() {
        assert_eq!(
            Location::parse("/?filter=&product=3").unwrap(),
            Location::Product(3)
        );
        assert_eq!(
            Location::parse("/?product=3&filter=").unwrap(),
            Location::Product(3)
        );
        assert_eq!(Location::parse("/?filter=").unwrap(), Location::Home);
    }

    #[test]
    fn test_product_id_must_be_whole_integer() {
        for raw in ["/?product=3abc", "/?product=1.0"] {
            assert!(
                matches!(Location::parse(raw), Err(RouteError::Unrecognized(_))),
                "{raw}"
            );
        }
    }

    #[test]
    fn test_empty_selection_encodes_home() {
        assert_eq!(Location::Filter(FilterSelection::new()).to_url(), "/");
        assert_eq!(Location::for_selection(FilterSelection::new()), Location::Home);
        assert_eq!(Location::parse("/?filter=%7B%7D").unwrap(), Location::Home);
    }

    #[test]
    fn test_invalid_payload_is_decode_error() {
        let err = Location::parse("/?filter={not json").unwrap_err();
        assert!(matches!(err, RouteError::Decode(_)));
    }

    #[test]
    fn test_unrecognized() {
        for raw in [
            "/about",
            "/?page=2",
            "/?product=abc",
            "/?product=",
            "/products/3",
        ] {
            assert!(
                matches!(Location::parse(raw), Err(RouteError::Unrecognized(_))),
                "{raw}"
            );
        }
    }
}
