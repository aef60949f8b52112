//! Requirement calculation for the realfarm calculator.
//!
//! Given one or more target products and quantities, this module walks
//! their recipe trees and totals the crops, items and intermediate
//! products needed, along with each product's difficulty score.

use std::collections::HashSet;

use tracing::debug;

use crate::catalog::Catalog;
use crate::error::CalculationError;
use crate::models::{Ingredient, IngredientKind, Product, RequirementResult, Tally, Target};
use crate::resolver::{find_product, group_by_building, resolve_dependencies, union_chains};

/// Classifies an ingredient.
///
/// An explicit kind wins. Otherwise a name in the item set is an item, a
/// name in the product catalog is a product, and anything else is a crop.
pub fn classify(catalog: &Catalog, ingredient: &Ingredient) -> IngredientKind {
    if let Some(kind) = ingredient.kind {
        return kind;
    }
    if catalog.is_item(&ingredient.name) {
        IngredientKind::Item
    } else if catalog.product(&ingredient.name).is_some() {
        IngredientKind::Product
    } else {
        IngredientKind::Crop
    }
}

/// Running totals for one calculation.
#[derive(Debug, Default)]
struct Accumulator {
    crops: Tally,
    items: Tally,
    intermediate_products: Tally,
}

/// Adds the requirements of `needed` units of `product` into `acc`.
///
/// `path` holds the products above this one; a sub-product already on the
/// path is not expanded again.
fn accumulate_ingredients(
    catalog: &Catalog,
    product: &Product,
    needed: f64,
    path: &HashSet<String>,
    acc: &mut Accumulator,
) {
    let mut path = path.clone();
    path.insert(product.name.clone());

    for ingredient in &product.ingredients {
        let amount = ingredient.count * needed;
        match classify(catalog, ingredient) {
            IngredientKind::Crop => acc.crops.add(&ingredient.name, amount),
            IngredientKind::Item => acc.items.add(&ingredient.name, amount),
            IngredientKind::Product => {
                let Some(sub_product) = find_product(catalog, &ingredient.name) else {
                    continue;
                };
                acc.intermediate_products.add(&ingredient.name, amount);
                if !path.contains(&sub_product.name) {
                    accumulate_ingredients(catalog, sub_product, amount, &path, acc);
                }
            }
        }
    }
}

/// Difficulty of one unit of the product named `name`.
///
/// Crop ingredients contribute `count * crop difficulty`, product
/// ingredients `count * their own difficulty`, items nothing. A product
/// that is already being scored further up the recursion contributes 0.
/// Unknown products score 0.
///
/// # Example
///
/// ```
/// use realfarm::catalog::Catalog;
/// use realfarm::calculator::product_difficulty;
/// use realfarm::models::{Crop, Ingredient, Product};
///
/// let catalog = Catalog::new(
///     vec![Product::new("b", "bread", "oven").with_ingredient(Ingredient::crop("wheat", 3.0))],
///     vec![Crop::new("wheat", 2.0)],
/// );
///
/// assert_eq!(product_difficulty(&catalog, "bread"), 6.0);
/// ```
pub fn product_difficulty(catalog: &Catalog, name: &str) -> f64 {
    difficulty_with_path(catalog, name, &HashSet::new())
}

fn difficulty_with_path(catalog: &Catalog, name: &str, path: &HashSet<String>) -> f64 {
    if path.contains(name) {
        return 0.0;
    }
    let Some(product) = find_product(catalog, name) else {
        return 0.0;
    };

    let mut path = path.clone();
    path.insert(name.to_string());

    product
        .ingredients
        .iter()
        .map(|ingredient| match classify(catalog, ingredient) {
            IngredientKind::Crop => ingredient.count * catalog.crop_difficulty(&ingredient.name),
            IngredientKind::Item => 0.0,
            IngredientKind::Product => {
                ingredient.count * difficulty_with_path(catalog, &ingredient.name, &path)
            }
        })
        .sum()
}

fn validate_quantity(target: &Target) -> Result<(), CalculationError> {
    if target.quantity.is_finite() && target.quantity >= 0.0 {
        Ok(())
    } else {
        Err(CalculationError::InvalidQuantity {
            name: target.name.clone(),
            quantity: target.quantity,
        })
    }
}

/// Calculates everything needed to make all `targets`.
///
/// Fails without computing anything if a quantity is invalid or if any
/// target is missing from the catalog; the not-found error lists every
/// missing name.
///
/// # Example
///
/// ```
/// use realfarm::catalog::Catalog;
/// use realfarm::calculator::calculate_multiple_requirements;
/// use realfarm::models::{Crop, Ingredient, Product, Target};
///
/// let catalog = Catalog::new(
///     vec![Product::new("b", "bread", "oven").with_ingredient(Ingredient::crop("wheat", 3.0))],
///     vec![Crop::new("wheat", 2.0)],
/// );
///
/// let result = calculate_multiple_requirements(&catalog, &[Target::new("bread", 2.0)]).unwrap();
/// assert_eq!(result.crops.get("wheat"), Some(6.0));
/// assert_eq!(result.intermediate_products.get("bread"), Some(2.0));
/// ```
pub fn calculate_multiple_requirements(
    catalog: &Catalog,
    targets: &[Target],
) -> Result<RequirementResult, CalculationError> {
    for target in targets {
        validate_quantity(target)?;
    }

    let missing: Vec<String> = targets
        .iter()
        .filter(|t| find_product(catalog, &t.name).is_none())
        .map(|t| t.name.clone())
        .collect();
    if !missing.is_empty() {
        debug!(?missing, "requested products not found");
        return Err(CalculationError::ProductsNotFound { names: missing });
    }

    let resolved: Vec<(&Target, &Product)> = targets
        .iter()
        .filter_map(|t| find_product(catalog, &t.name).map(|p| (t, p)))
        .collect();

    let dependency_chain = union_chains(
        resolved
            .iter()
            .map(|(target, _)| resolve_dependencies(catalog, &target.name, &HashSet::new())),
    );
    let building_groups = group_by_building(&dependency_chain);

    let mut acc = Accumulator::default();
    for (target, product) in &resolved {
        accumulate_ingredients(catalog, product, target.quantity, &HashSet::new(), &mut acc);
    }
    for (target, _) in &resolved {
        acc.intermediate_products.add(&target.name, target.quantity);
    }

    let mut product_difficulties = Tally::default();
    for product in &dependency_chain {
        product_difficulties.set(&product.name, product_difficulty(catalog, &product.name));
    }
    for (target, _) in &resolved {
        if !product_difficulties.contains(&target.name) {
            product_difficulties.set(&target.name, product_difficulty(catalog, &target.name));
        }
    }

    debug!(
        targets = targets.len(),
        chain = dependency_chain.len(),
        crops = acc.crops.len(),
        items = acc.items.len(),
        "calculated requirements"
    );

    Ok(RequirementResult {
        target_products: targets.to_vec(),
        crops: acc.crops,
        items: acc.items,
        intermediate_products: acc.intermediate_products,
        building_groups,
        dependency_chain,
        product_difficulties,
    })
}

/// Calculates everything needed to make `quantity` units of `name`.
pub fn calculate_requirements(
    catalog: &Catalog,
    name: &str,
    quantity: f64,
) -> Result<RequirementResult, CalculationError> {
    calculate_multiple_requirements(catalog, &[Target::new(name, quantity)])
}
