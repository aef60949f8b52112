//! Dependency resolution over the recipe graph.
//!
//! A product's dependency chain is the list of products that must be made
//! to make it, dependencies before dependents, each at most once.

use std::collections::HashSet;

use tracing::trace;

use crate::catalog::Catalog;
use crate::models::{BuildingGroups, IngredientKind, Product};

/// Finds a product by exact name. Not finding one is not an error.
pub fn find_product<'a>(catalog: &'a Catalog, name: &str) -> Option<&'a Product> {
    catalog.product(name)
}

/// Expands `name` into its dependency chain.
///
/// Only ingredients explicitly typed as products are followed. `path`
/// holds the names of the products above this one; a name already on the
/// path yields an empty chain, which stops cycles. Each branch gets its
/// own copy of the path, so a shared dependency that is also an ancestor
/// of the branch is truncated there.
///
/// # Example
///
/// ```
/// use std::collections::HashSet;
/// use realfarm::catalog::Catalog;
/// use realfarm::models::{Crop, Ingredient, Product};
/// use realfarm::resolver::resolve_dependencies;
///
/// let catalog = Catalog::new(
///     vec![
///         Product::new("a", "A", "mill").with_ingredient(Ingredient::product("B", 1.0)),
///         Product::new("b", "B", "mill").with_ingredient(Ingredient::crop("C", 1.0)),
///     ],
///     vec![Crop::new("C", 1.0)],
/// );
///
/// let chain = resolve_dependencies(&catalog, "A", &HashSet::new());
/// let names: Vec<_> = chain.iter().map(|p| p.name.as_str()).collect();
/// assert_eq!(names, vec!["B", "A"]);
/// ```
pub fn resolve_dependencies(catalog: &Catalog, name: &str, path: &HashSet<String>) -> Vec<Product> {
    let Some(product) = find_product(catalog, name) else {
        return Vec::new();
    };
    if path.contains(name) {
        trace!(product = name, "dependency already on path, truncating");
        return Vec::new();
    }

    let mut path = path.clone();
    path.insert(name.to_string());

    let mut chain: Vec<Product> = Vec::new();
    for ingredient in &product.ingredients {
        if ingredient.kind != Some(IngredientKind::Product) {
            continue;
        }

        for dependency in resolve_dependencies(catalog, &ingredient.name, &path) {
            push_unique(&mut chain, dependency);
        }
        if let Some(dependency) = find_product(catalog, &ingredient.name) {
            push_unique(&mut chain, dependency.clone());
        }
    }
    push_unique(&mut chain, product.clone());
    chain
}

/// Appends `product` unless a product with the same name is already present.
fn push_unique(chain: &mut Vec<Product>, product: Product) {
    if !chain.iter().any(|p| p.name == product.name) {
        chain.push(product);
    }
}

/// Merges several chains into one, keeping first-seen order.
pub fn union_chains<I>(chains: I) -> Vec<Product>
where
    I: IntoIterator<Item = Vec<Product>>,
{
    let mut union = Vec::new();
    for chain in chains {
        for product in chain {
            push_unique(&mut union, product);
        }
    }
    union
}

/// Groups a chain by building.
///
/// Buildings appear in the order they are first met; inside a group,
/// products keep chain order and appear once.
pub fn group_by_building(chain: &[Product]) -> BuildingGroups {
    let mut groups = BuildingGroups::default();
    for product in chain {
        groups.insert(product);
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Ingredient;

    #[test]
    fn test_cycle_is_truncated() {
        let catalog = Catalog::new(
            vec![
                Product::new("a", "A", "mill").with_ingredient(Ingredient::product("B", 1.0)),
                Product::new("b", "B", "mill").with_ingredient(Ingredient::product("A", 1.0)),
            ],
            vec![],
        );
        let chain = resolve_dependencies(&catalog, "A", &HashSet::new());
        let names: Vec<_> = chain.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["A", "B"]);
    }

    #[test]
    fn test_missing_ingredient_product_is_skipped() {
        let catalog = Catalog::new(
            vec![Product::new("a", "A", "mill").with_ingredient(Ingredient::product("Ghost", 1.0))],
            vec![],
        );
        let chain = resolve_dependencies(&catalog, "A", &HashSet::new());
        assert_eq!(chain.len(), 1);
        assert_eq!(chain[0].name, "A");
    }

    #[test]
    fn test_name_on_path_yields_empty_chain() {
        let catalog = Catalog::new(vec![Product::new("a", "A", "mill")], vec![]);
        let path: HashSet<String> = ["A".to_string()].into_iter().collect();
        assert!(resolve_dependencies(&catalog, "A", &path).is_empty());
    }
}
