// ============================================================================
// catalog — CLI for inspecting a product catalog and driving the router
// ============================================================================
// Usage:
//   catalog specs <CATALOG>                              List spec names
//   catalog filter <CATALOG> --select color=red          Apply filters
//   catalog route <CATALOG> / '/?product=3' ...          Replay locations
//
// <CATALOG> is a path to product.json or an http(s) URL.
// ============================================================================

use std::sync::Arc;

use anyhow::{Context, Result};
use catalog_core::{
    apply, spec_names, Catalog, FilterSelection, Location, NavigationState, Product,
    RecordedView, Router,
};
use clap::{Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Catalog browser inspection tool
#[derive(Parser)]
#[command(name = "catalog", version, about = "Inspect a product catalog and its filters")]
struct Cli {
    /// Log routing and filtering decisions to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Print machine-readable JSON instead of tables
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the distinct spec names, in first-seen order
    Specs {
        /// product.json path or URL
        catalog: String,
    },

    /// Filter the catalog and print the matching products
    Filter {
        /// product.json path or URL
        catalog: String,

        /// Selected value as name=value (repeatable)
        #[arg(short, long = "select", value_name = "NAME=VALUE")]
        selections: Vec<String>,

        /// Comma-separated criteria order (default: spec index order)
        #[arg(long, value_delimiter = ',')]
        criteria: Vec<String>,
    },

    /// Replay a sequence of locations through the router
    Route {
        /// product.json path or URL
        catalog: String,

        /// Locations to visit in order, e.g. / or '/?product=3'
        #[arg(required = true)]
        locations: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Specs { catalog } => cmd_specs(&load(&catalog).await?, cli.json),
        Commands::Filter {
            catalog,
            selections,
            criteria,
        } => cmd_filter(&load(&catalog).await?, &selections, criteria, cli.json),
        Commands::Route { catalog, locations } => {
            cmd_route(load(&catalog).await?, &locations, cli.json)
        }
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "catalog_core=debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn load(source: &str) -> Result<Catalog> {
    Catalog::load(source)
        .await
        .with_context(|| format!("Could not load catalog from {}", source))
}

fn parse_selection(raw: &[String]) -> Result<FilterSelection> {
    raw.iter().try_fold(FilterSelection::new(), |selection, item| {
        let (name, value) = item
            .split_once('=')
            .with_context(|| format!("Invalid selection '{}', expected NAME=VALUE", item))?;
        if name.is_empty() || value.is_empty() {
            anyhow::bail!("Invalid selection '{}', name and value must be non-empty", item);
        }
        Ok(selection.select(name, value))
    })
}

fn cmd_specs(catalog: &Catalog, json: bool) -> Result<()> {
    let names = spec_names(catalog);

    if json {
        println!("{}", serde_json::to_string_pretty(&names)?);
    } else if names.is_empty() {
        println!("No specs found.");
    } else {
        for name in &names {
            println!("{}", name);
        }
    }

    Ok(())
}

fn cmd_filter(
    catalog: &Catalog,
    selections: &[String],
    criteria: Vec<String>,
    json: bool,
) -> Result<()> {
    let selection = parse_selection(selections)?;
    let criteria = if criteria.is_empty() {
        spec_names(catalog)
    } else {
        criteria
    };
    debug!("Criteria order: {:?}", criteria);

    let results = apply(&selection, &criteria, catalog);
    let location = Location::for_selection(selection).to_url();

    if json {
        let export = serde_json::json!({
            "location": location,
            "criteria": criteria,
            "products": results,
        });
        println!("{}", serde_json::to_string_pretty(&export)?);
        return Ok(());
    }

    println!("Location: {}", location);
    print_products(&results);
    Ok(())
}

fn cmd_route(catalog: Catalog, locations: &[String], json: bool) -> Result<()> {
    let mut router = Router::new(RecordedView::new());
    router.catalog_loaded(Arc::new(catalog));

    let mut visits = Vec::with_capacity(locations.len());
    for location in locations {
        let state = router.navigate(location);

        if json {
            visits.push(serde_json::json!({
                "requested": location,
                "location": router.location(),
                "state": state.label(),
                "selection": router.selection(),
                "view": router.view(),
            }));
            continue;
        }

        println!("=== {} ===", location);
        println!("State:    {}", describe(&state));
        if router.location() != location {
            println!("Location: {} (rewritten)", router.location());
        }
        print_view(&router);
        println!();
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&visits)?);
    }
    Ok(())
}

fn describe(state: &NavigationState) -> String {
    match state {
        NavigationState::Loading => "loading".to_string(),
        NavigationState::Home => "home".to_string(),
        NavigationState::ProductDetail(id) => format!("product {}", id),
        NavigationState::Filtered(selection) => format!("filtered {}", selection.encode()),
        NavigationState::Error => "error".to_string(),
    }
}

fn print_view(router: &Router<RecordedView>) {
    let view = router.view();

    if let Some(page) = view.page() {
        println!("Page:     {:?}", page);
    }

    let checked: Vec<String> = view
        .checked_boxes()
        .map(|(name, value)| format!("{}={}", name, value))
        .collect();
    if !checked.is_empty() {
        println!("Checked:  {}", checked.join(", "));
    }

    match router.state() {
        NavigationState::ProductDetail(_) => {
            if let Some(detail) = view.detail() {
                println!("Title:    {}", or_dash(&detail.title));
                println!("Image:    {}", or_dash(&detail.image));
                println!("About:    {}", or_dash(&detail.description));
            }
        }
        NavigationState::Home | NavigationState::Filtered(_) => {
            let Some(catalog) = router.catalog() else {
                return;
            };
            let visible: Vec<&Product> = catalog
                .iter()
                .filter(|p| view.visible_ids().contains(&p.id))
                .collect();
            print_products(&visible);
        }
        NavigationState::Loading | NavigationState::Error => {}
    }
}

fn or_dash(s: &str) -> &str {
    if s.is_empty() {
        "-"
    } else {
        s
    }
}

fn print_products(products: &[&Product]) {
    if products.is_empty() {
        println!("No products match.");
        return;
    }

    println!("{:<6}  {:<30}  {}", "ID", "NAME", "SPECS");
    println!("{}", "-".repeat(80));

    for product in products {
        let specs = product
            .specs
            .iter()
            .map(|(name, value)| format!("{}={}", name, value))
            .collect::<Vec<_>>()
            .join(", ");
        let name = product.name.chars().take(30).collect::<String>();
        println!("{:<6}  {:<30}  {}", product.id, name, specs);
    }

    println!("\nTotal: {} products", products.len());
}
