//! Tests for the JSON entry points used by the web front-end.

use realfarm::wasm::{calculate, get_version, import_products, list_crops, list_products};
use serde_json::Value;

fn parse(json: &str) -> Value {
    serde_json::from_str(json).expect("Entry points should return JSON")
}

#[test]
fn test_calculate_builtin_product() {
    let out = parse(&calculate(r#"{ "targets": [{ "name": "두부", "quantity": 3 }] }"#));

    assert!(out.get("error").is_none());
    assert_eq!(out["crops"]["콩"], 6.0);
    assert_eq!(out["items"]["응고제"], 3.0);
    assert_eq!(out["formattedCrops"][0]["difficulty"], 1.0);
    assert_eq!(out["formattedBuildings"][0]["building"], "두부공방");
    assert!(out["buildingGroups"].is_object());
    assert_eq!(out["buildingGroups"]["두부공방"][0]["name"], "두부");
}

#[test]
fn test_calculate_with_custom_data() {
    let input = r#"{
        "targets": [{ "name": "콩국수", "quantity": 1 }],
        "customProducts": [{
            "id": 1717000000000,
            "name": "콩국수",
            "building": "식당",
            "ingredients": [{ "name": "두부", "count": 1, "type": "product" }, { "name": "밀", "count": 2 }]
        }],
        "customCrops": [{ "name": "콩", "difficulty": 10 }]
    }"#;
    let out = parse(&calculate(input));

    assert_eq!(out["crops"]["콩"], 2.0);
    assert_eq!(out["crops"]["밀"], 2.0);
    // 두부 = 2 * 10, 콩국수 = 20 + 2 * 1
    assert_eq!(out["productDifficulties"]["콩국수"], 22.0);
    assert_eq!(out["dependencyChain"][1]["isCustom"], true);
}

#[test]
fn test_calculate_skips_malformed_custom_entries() {
    let input = r#"{
        "targets": [{ "name": "두부", "quantity": 1 }],
        "customProducts": [
            { "id": "bad-price", "name": "양념", "building": "식당", "ingredients": [], "price": "" },
            { "id": -5, "name": "순두부", "building": "두부공방", "ingredients": [{ "name": "콩", "count": 1 }] },
            { "name": "이름만", "building": "식당", "ingredients": [] }
        ],
        "customCrops": [{ "difficulty": 3 }, { "name": "콩", "difficulty": 7 }]
    }"#;
    let out = parse(&calculate(input));

    assert!(out.get("error").is_none());
    assert_eq!(out["crops"]["콩"], 2.0);
    assert_eq!(out["formattedCrops"][0]["difficulty"], 7.0);
}

#[test]
fn test_list_products_keeps_valid_custom_entries() {
    let products = parse(&list_products(
        r#"[
            { "id": -5, "name": "순두부", "building": "두부공방", "ingredients": [] },
            { "id": 1.5, "name": "콩물", "building": "두부공방", "ingredients": [] },
            { "id": "broken", "name": "양념", "building": "식당", "ingredients": [], "price": "" },
            { "id": "ok", "name": "잡채", "building": "식당", "ingredients": [] }
        ]"#,
    ));
    let names: Vec<&str> = products
        .as_array()
        .map(|p| p.iter().filter_map(|e| e["name"].as_str()).collect())
        .unwrap_or_default();

    assert!(names.contains(&"순두부"));
    assert!(names.contains(&"콩물"));
    assert!(names.contains(&"잡채"));
    assert!(!names.contains(&"양념"));
}

#[test]
fn test_calculate_unknown_product_returns_error_record() {
    let out = parse(&calculate(r#"{ "targets": [{ "name": "불명가공품", "quantity": 1 }] }"#));

    assert_eq!(out["error"], "가공품 \"불명가공품\"을(를) 찾을 수 없습니다.");
    assert_eq!(out["crops"], serde_json::json!({}));
    assert_eq!(out["intermediateProducts"], serde_json::json!({}));
    assert_eq!(out["buildingGroups"], serde_json::json!({}));
    assert_eq!(out["targetProducts"], serde_json::json!([]));
}

#[test]
fn test_calculate_invalid_input() {
    let out = parse(&calculate("not json"));
    assert!(out["error"].as_str().is_some_and(|e| e.starts_with("Invalid input")));
}

#[test]
fn test_list_products_and_crops() {
    let products = parse(&list_products(""));
    let crops = parse(&list_crops("[{ \"name\": \"블루베리\", \"difficulty\": 6 }]"));

    assert!(products.as_array().is_some_and(|p| !p.is_empty()));
    let last = crops.as_array().and_then(|c| c.last()).cloned().unwrap_or(Value::Null);
    assert_eq!(last["name"], "블루베리");
    assert_eq!(last["isCustom"], true);
}

#[test]
fn test_import_products_entry_point() {
    let out = parse(&import_products(
        "[]",
        r#"[{ "id": "c1", "name": "잡채", "building": "식당", "ingredients": [] }]"#,
    ));
    assert_eq!(out["success"], true);
    assert_eq!(out["imported"], 1);
    assert_eq!(out["products"][0]["name"], "잡채");

    let failed = parse(&import_products("[]", "{}"));
    assert_eq!(failed["success"], false);
    assert_eq!(failed["error"], "잘못된 파일 형식입니다. 배열이어야 합니다.");
}

#[test]
fn test_get_version() {
    assert_eq!(get_version(), env!("CARGO_PKG_VERSION"));
}
