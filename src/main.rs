//! realfarm - Command Line Interface
//!
//! This is the main entry point for the requirement calculator.
//! Run with `--help` to see all available options.

use clap::Parser;
use std::error::Error;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use realfarm::{
    calculator::calculate_multiple_requirements,
    catalog::CatalogStore,
    data::BuiltinData,
    display::{display_results, format_number, format_result},
    models::Target,
    storage::FileStore,
};

/// Command-line arguments for realfarm.
#[derive(Parser, Debug)]
#[command(name = "realfarm")]
#[command(author, version, about = "Calculate the crops, items and products needed to make processed goods in RealFarm", long_about = None)]
struct Args {
    /// Target product name
    #[arg(short, long)]
    product: Option<String>,

    /// Quantity of the target product
    #[arg(short, long, default_value = "1", requires = "product")]
    quantity: f64,

    /// Additional target in NAME=QUANTITY form (repeatable)
    #[arg(short, long = "target", value_parser = parse_target)]
    targets: Vec<Target>,

    /// Directory holding crops.csv and products.json (defaults to the built-in data)
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Directory holding the user's custom products and crops
    #[arg(long, default_value = ".realfarm")]
    store_dir: PathBuf,

    /// Import custom products from a JSON file before calculating
    #[arg(long)]
    import: Option<PathBuf>,

    /// Export custom products to a JSON file
    #[arg(long)]
    export: Option<PathBuf>,

    /// List every product in the catalog
    #[arg(long, default_value = "false")]
    list: bool,

    /// Print the formatted result as JSON
    #[arg(long, default_value = "false")]
    json: bool,
}

/// Parses `NAME=QUANTITY`.
fn parse_target(s: &str) -> Result<Target, String> {
    let (name, quantity) = s
        .rsplit_once('=')
        .ok_or_else(|| format!("expected NAME=QUANTITY, got '{}'", s))?;
    let quantity: f64 = quantity
        .trim()
        .parse()
        .map_err(|e| format!("invalid quantity '{}': {}", quantity, e))?;
    Ok(Target::new(name.trim(), quantity))
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env().add_directive("realfarm=info".parse()?))
        .init();

    let args = Args::parse();

    let builtin = match &args.data_dir {
        Some(dir) => BuiltinData::load_from_dir(dir)?,
        None => BuiltinData::embedded()?,
    };
    let mut store = CatalogStore::new(builtin, FileStore::new(&args.store_dir));

    if let Some(path) = &args.import {
        let json = std::fs::read_to_string(path)?;
        let summary = store.import_products(&json)?;
        info!(
            imported = summary.imported,
            total = summary.total,
            "imported custom products from {}",
            path.display()
        );
    }

    if let Some(path) = &args.export {
        std::fs::write(path, store.export_products()?)?;
        info!("exported custom products to {}", path.display());
    }

    let catalog = store.snapshot();
    info!(
        "Loaded {} products and {} crops.",
        catalog.all_products().len(),
        catalog.all_crops().len()
    );

    if args.list {
        println!("{:<20} {:<12} {}", "Product", "Building", "Ingredients");
        println!("----------------------------------------------------------------");
        for product in catalog.all_products() {
            let ingredients: Vec<String> = product
                .ingredients
                .iter()
                .map(|i| format!("{} x{}", i.name, format_number(i.count)))
                .collect();
            let marker = if product.is_custom { " *" } else { "" };
            println!(
                "{:<20} {:<12} {}{}",
                product.name,
                product.building,
                ingredients.join(", "),
                marker
            );
        }
        return Ok(());
    }

    let mut targets = Vec::new();
    if let Some(name) = &args.product {
        targets.push(Target::new(name.clone(), args.quantity));
    }
    targets.extend(args.targets.iter().cloned());

    if targets.is_empty() {
        if args.import.is_none() && args.export.is_none() {
            eprintln!("Error: no target given. Use --product or --target NAME=QUANTITY.");
            std::process::exit(2);
        }
        return Ok(());
    }

    match calculate_multiple_requirements(&catalog, &targets) {
        Ok(result) => {
            let formatted = format_result(&catalog, &result);
            if args.json {
                println!("{}", serde_json::to_string_pretty(&formatted)?);
            } else {
                display_results(&formatted);
            }
        }
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    }

    Ok(())
}
