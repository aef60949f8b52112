//! Tests for result formatting utilities.

use realfarm::calculator::{calculate_multiple_requirements, calculate_requirements};
use realfarm::catalog::Catalog;
use realfarm::display::{ceil_count, format_number, format_result};
use realfarm::error::CalculationError;
use realfarm::models::{Crop, Ingredient, Product, Target};

fn bakery() -> Catalog {
    Catalog::new(
        vec![
            Product::new("flour", "flour", "mill")
                .with_ingredient(Ingredient::crop("wheat", 0.5))
                .with_price(10.0),
            Product::new("bread", "bread", "oven")
                .with_ingredient(Ingredient::product("flour", 3.0))
                .with_ingredient(Ingredient::item("이스트", 0.25)),
            Product::new("cake", "cake", "oven")
                .with_ingredient(Ingredient::product("flour", 1.0))
                .with_ingredient(Ingredient::crop("strawberry", 1.5)),
        ],
        vec![Crop::new("wheat", 2.0), Crop::new("strawberry", 4.0)],
    )
}

#[test]
fn test_format_number() {
    assert_eq!(format_number(0.0), "0");
    assert_eq!(format_number(3.0), "3");
    assert_eq!(format_number(0.25), "0.25");
}

#[test]
fn test_ceil_count() {
    assert_eq!(ceil_count(1.0), 1);
    assert_eq!(ceil_count(1.01), 2);
    assert_eq!(ceil_count(0.5), 1);
}

#[test]
fn test_bread_scenario_formats_wheat() {
    let catalog = Catalog::new(
        vec![Product::new("bread", "bread", "oven").with_ingredient(Ingredient::crop("wheat", 3.0))],
        vec![Crop::new("wheat", 2.0)],
    );
    let result = calculate_requirements(&catalog, "bread", 2.0).unwrap();
    let formatted = format_result(&catalog, &result);

    assert_eq!(formatted.formatted_crops.len(), 1);
    assert_eq!(formatted.formatted_crops[0].name, "wheat");
    assert_eq!(formatted.formatted_crops[0].count, 6);
    assert_eq!(formatted.formatted_crops[0].difficulty, 2.0);
}

#[test]
fn test_counts_are_rounded_up() {
    let catalog = bakery();
    let result = calculate_requirements(&catalog, "bread", 1.0).unwrap();
    let formatted = format_result(&catalog, &result);

    // 1 bread -> 3 flour -> 1.5 wheat
    assert_eq!(result.crops.get("wheat"), Some(1.5));
    assert_eq!(formatted.formatted_crops[0].count, 2);
    assert_eq!(formatted.formatted_items[0].name, "이스트");
    assert_eq!(formatted.formatted_items[0].count, 1);
    assert_eq!(formatted.formatted_items[0].difficulty, 0.0);
}

#[test]
fn test_products_sorted_by_chain_position() {
    let catalog = bakery();
    let targets = [Target::new("cake", 1.0), Target::new("bread", 1.0)];
    let result = calculate_multiple_requirements(&catalog, &targets).unwrap();
    let formatted = format_result(&catalog, &result);

    let chain: Vec<_> = result.dependency_chain.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(chain, vec!["flour", "cake", "bread"]);

    let names: Vec<_> = formatted.formatted_products.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["flour", "cake", "bread"]);

    let flour = &formatted.formatted_products[0];
    assert_eq!(flour.count, 4);
    assert!(flour.purchasable);
    assert_eq!(flour.price, Some(10.0));
    assert_eq!(flour.difficulty, 1.0);
}

#[test]
fn test_buildings_keep_grouping_order() {
    let catalog = bakery();
    let targets = [Target::new("cake", 1.0), Target::new("bread", 1.0)];
    let result = calculate_multiple_requirements(&catalog, &targets).unwrap();
    let formatted = format_result(&catalog, &result);

    assert_eq!(formatted.formatted_buildings.len(), 2);
    assert_eq!(formatted.formatted_buildings[0].building, "mill");
    assert_eq!(formatted.formatted_buildings[0].products, vec!["flour"]);
    assert_eq!(formatted.formatted_buildings[1].building, "oven");
    assert_eq!(formatted.formatted_buildings[1].products, vec!["cake", "bread"]);
}

#[test]
fn test_error_passes_through_formatting() {
    let catalog = bakery();
    let outcome = calculate_requirements(&catalog, "불명가공품", 1.0)
        .map(|result| format_result(&catalog, &result));

    assert_eq!(
        outcome,
        Err(CalculationError::ProductsNotFound {
            names: vec!["불명가공품".to_string()]
        })
    );
}

#[test]
fn test_formatted_result_json_shape() {
    let catalog = bakery();
    let result = calculate_requirements(&catalog, "bread", 2.0).unwrap();
    let json = serde_json::to_value(format_result(&catalog, &result)).unwrap();

    assert_eq!(json["intermediateProducts"]["bread"], 2.0);
    assert_eq!(json["formattedCrops"][0]["count"], 3);
    assert!(json["dependencyChain"].is_array());
    assert!(json["productDifficulties"].is_object());
}

#[test]
fn test_unchained_products_sort_last_in_insertion_order() {
    let mut products = bakery().all_products().to_vec();
    products.push(
        Product::new("jam", "jam", "kitchen").with_ingredient(Ingredient::crop("strawberry", 2.0)),
    );
    products.push(Product::new("tart", "tart", "oven").with_ingredient(Ingredient::crop("wheat", 1.0)));
    products.push(
        Product::new("basket", "basket", "market")
            .with_ingredient(Ingredient::product("bread", 1.0))
            .with_ingredient(Ingredient::untyped("jam", 1.0))
            .with_ingredient(Ingredient::untyped("tart", 1.0)),
    );
    let crops = vec![Crop::new("wheat", 2.0), Crop::new("strawberry", 4.0)];
    let catalog = Catalog::new(products, crops);

    let result = calculate_requirements(&catalog, "basket", 1.0).unwrap();
    let formatted = format_result(&catalog, &result);

    let chain: Vec<_> = result.dependency_chain.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(chain, vec!["flour", "bread", "basket"]);

    let names: Vec<_> = formatted.formatted_products.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["flour", "bread", "basket", "jam", "tart"]);

    // Products outside the chain have no difficulty entry
    assert_eq!(formatted.formatted_products[3].difficulty, 0.0);
    assert_eq!(formatted.formatted_products[4].difficulty, 0.0);
}
