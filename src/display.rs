//! Display and formatting utilities for realfarm.
//!
//! [`format_result`] turns a raw calculation into rounded, sorted records
//! for the front-ends; [`display_results`] prints them as text tables for
//! the command-line tool.

use crate::catalog::Catalog;
use crate::models::{
    BuildingSummary, FormattedResult, LeafRequirement, ProductRequirement, RequirementResult,
};

/// Sort key for products that are not part of the dependency chain.
const UNCHAINED: usize = usize::MAX;

/// Rounds a raw requirement up to a whole unit count.
///
/// # Example
///
/// ```
/// use realfarm::display::ceil_count;
///
/// assert_eq!(ceil_count(6.0), 6);
/// assert_eq!(ceil_count(0.25), 1);
/// assert_eq!(ceil_count(0.0), 0);
/// ```
pub fn ceil_count(raw: f64) -> u64 {
    raw.ceil() as u64
}

/// Formats a number without a trailing `.0` and with at most two decimals.
///
/// # Example
///
/// ```
/// use realfarm::display::format_number;
///
/// assert_eq!(format_number(6.0), "6");
/// assert_eq!(format_number(1.5), "1.5");
/// assert_eq!(format_number(2.126), "2.13");
/// assert_eq!(format_number(10.0), "10");
/// ```
pub fn format_number(value: f64) -> String {
    let s = format!("{:.2}", value);
    s.trim_end_matches('0').trim_end_matches('.').to_string()
}

/// Converts a calculation into display-ready records.
///
/// Counts are rounded up. Products are ordered by their position in the
/// dependency chain, with products outside the chain last in their
/// original order.
///
/// Difficulties come from `result.product_difficulties`, which only scores
/// the chain and the targets. A product reached only through an untyped
/// ingredient is outside the chain and is reported with difficulty 0.
pub fn format_result(catalog: &Catalog, result: &RequirementResult) -> FormattedResult {
    let formatted_crops = result
        .crops
        .iter()
        .map(|(name, count)| LeafRequirement {
            name: name.to_string(),
            count: ceil_count(count),
            difficulty: catalog.crop_difficulty(name),
        })
        .collect();

    let formatted_items = result
        .items
        .iter()
        .map(|(name, count)| LeafRequirement {
            name: name.to_string(),
            count: ceil_count(count),
            difficulty: 0.0,
        })
        .collect();

    let chain_position = |name: &str| {
        result
            .dependency_chain
            .iter()
            .position(|p| p.name == name)
            .unwrap_or(UNCHAINED)
    };

    let mut formatted_products: Vec<ProductRequirement> = result
        .intermediate_products
        .iter()
        .map(|(name, count)| {
            let product = catalog.product(name);
            ProductRequirement {
                name: name.to_string(),
                count: ceil_count(count),
                difficulty: result.product_difficulties.get(name).unwrap_or(0.0),
                purchasable: product.map_or(false, |p| p.purchasable),
                price: product.and_then(|p| p.price),
            }
        })
        .collect();
    formatted_products.sort_by_key(|p| chain_position(&p.name));

    let formatted_buildings = result
        .building_groups
        .iter()
        .map(|group| BuildingSummary {
            building: group.building.clone(),
            products: group.products.iter().map(|p| p.name.clone()).collect(),
        })
        .collect();

    FormattedResult {
        result: result.clone(),
        formatted_crops,
        formatted_items,
        formatted_products,
        formatted_buildings,
    }
}

/// Prints a formatted calculation to stdout.
pub fn display_results(formatted: &FormattedResult) {
    let targets: Vec<String> = formatted
        .result
        .target_products
        .iter()
        .map(|t| format!("{} x{}", t.name, format_number(t.quantity)))
        .collect();

    println!();
    println!("+================================================================+");
    println!("|                 REALFARM REQUIREMENT RESULTS                   |");
    println!("+================================================================+");
    println!();
    println!("  Targets: {}", targets.join(", "));

    println!();
    println!("[CROPS]");
    println!("----------------------------------------------------------------");
    if formatted.formatted_crops.is_empty() {
        println!("  (none)");
    }
    for crop in &formatted.formatted_crops {
        println!(
            "  {:<20} {:>8}   difficulty {}",
            crop.name,
            crop.count,
            format_number(crop.difficulty)
        );
    }

    if !formatted.formatted_items.is_empty() {
        println!();
        println!("[ITEMS]");
        println!("----------------------------------------------------------------");
        for item in &formatted.formatted_items {
            println!("  {:<20} {:>8}", item.name, item.count);
        }
    }

    println!();
    println!("[PRODUCTS] (in production order)");
    println!("----------------------------------------------------------------");
    for product in &formatted.formatted_products {
        let price = match (product.purchasable, product.price) {
            (true, Some(price)) => format!("   buy @ {}", format_number(price)),
            (true, None) => "   purchasable".to_string(),
            _ => String::new(),
        };
        println!(
            "  {:<20} {:>8}   difficulty {}{}",
            product.name,
            product.count,
            format_number(product.difficulty),
            price
        );
    }

    println!();
    println!("[BUILDINGS]");
    println!("----------------------------------------------------------------");
    for building in &formatted.formatted_buildings {
        println!("  {}: {}", building.building, building.products.join(" → "));
    }
    println!();
}
