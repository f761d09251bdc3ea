use std::{env, fmt::Display, net::IpAddr, path::PathBuf, str::FromStr};

use anyhow::{anyhow, Result};
use tracing::{info, warn};

/// Server settings, read from the environment (and `.env`)
#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: IpAddr,
    pub port: u16,
    pub public_dir: PathBuf,
    pub catalog_path: PathBuf,
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup; missing keys fall back to defaults
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let public_dir: PathBuf = try_load(&lookup, "PUBLIC_DIR", "public")?;
        let catalog_path = match lookup("CATALOG_PATH") {
            Some(path) => PathBuf::from(path),
            None => public_dir.join("product.json"),
        };

        Ok(Self {
            bind_addr: try_load(&lookup, "BIND_ADDR", "0.0.0.0")?,
            port: try_load(&lookup, "PORT", "8080")?,
            public_dir,
            catalog_path,
        })
    }
}

fn try_load<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: &str,
) -> Result<T>
where
    T::Err: Display,
{
    let raw = lookup(key).unwrap_or_else(|| {
        info!("{key} not set, using default: {default}");
        default.to_string()
    });

    raw.trim().parse().map_err(|e| {
        warn!("Invalid {key} value '{raw}': {e}");
        anyhow!("Environment misconfigured: invalid {key} '{raw}': {e}")
    })
}
