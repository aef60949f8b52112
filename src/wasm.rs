//! WebAssembly bindings for realfarm.
//!
//! Every function takes and returns JSON strings. The page keeps the
//! user's custom products and crops in `localStorage` and passes them in
//! with each call.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use wasm_bindgen::prelude::*;

use crate::calculator::calculate_multiple_requirements;
use crate::catalog::{
    export_file_name as file_name_for, is_valid_crop_entry, is_valid_product_entry,
    valid_entries, Catalog, CatalogStore,
};
use crate::data::BuiltinData;
use crate::display::format_result;
use crate::models::{Crop, Product, Target};
use crate::storage::{MemoryStore, PRODUCTS_SLOT};

/// JavaScript-friendly input for a calculation.
///
/// Custom entries are kept raw so that a malformed entry can be dropped
/// on its own instead of failing the whole call.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JsCalculateInput {
    pub targets: Vec<Target>,
    #[serde(default)]
    pub custom_products: Value,
    #[serde(default)]
    pub custom_crops: Value,
}

/// Error record returned in place of a result.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JsErrorRecord {
    pub error: String,
    pub crops: serde_json::Map<String, serde_json::Value>,
    pub intermediate_products: serde_json::Map<String, serde_json::Value>,
    pub building_groups: serde_json::Map<String, serde_json::Value>,
    pub target_products: Vec<Target>,
}

impl JsErrorRecord {
    fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            crops: serde_json::Map::new(),
            intermediate_products: serde_json::Map::new(),
            building_groups: serde_json::Map::new(),
            target_products: Vec::new(),
        }
    }
}

/// JavaScript-friendly import result.
#[derive(Debug, Clone, Serialize)]
pub struct JsImportResult {
    pub success: bool,
    pub error: Option<String>,
    pub imported: usize,
    pub total: usize,
    /// The merged custom product slot, to be written back to storage
    pub products: Vec<Product>,
}

fn log_warning(message: &str) {
    #[cfg(target_arch = "wasm32")]
    web_sys::console::warn_1(&JsValue::from_str(message));
    #[cfg(not(target_arch = "wasm32"))]
    tracing::warn!("{}", message);
}

/// Built-in data compiled into the module.
fn builtin_data() -> BuiltinData {
    match BuiltinData::embedded() {
        Ok(data) => data,
        Err(e) => {
            log_warning(&format!("failed to parse built-in data: {}", e));
            BuiltinData::default()
        }
    }
}

fn custom_entries<T: DeserializeOwned>(
    raw: Value,
    what: &str,
    is_valid: fn(&Value) -> bool,
) -> Vec<T> {
    let (entries, skipped) = valid_entries(raw, is_valid);
    for reason in skipped {
        log_warning(&format!("{}: {}", what, reason));
    }
    entries
}

fn parse_or_empty<T: DeserializeOwned>(
    json: &str,
    what: &str,
    is_valid: fn(&Value) -> bool,
) -> Vec<T> {
    if json.trim().is_empty() {
        return Vec::new();
    }
    match serde_json::from_str(json) {
        Ok(raw) => custom_entries(raw, what, is_valid),
        Err(e) => {
            log_warning(&format!("ignoring invalid {}: {}", what, e));
            Vec::new()
        }
    }
}

fn snapshot(custom_products: Vec<Product>, custom_crops: Vec<Crop>) -> Catalog {
    let builtin = builtin_data();
    Catalog::merged(builtin.products, custom_products, builtin.crops, custom_crops)
}

/// Calculate requirements for one or more targets.
///
/// Takes a [`JsCalculateInput`] JSON string and returns either the
/// formatted result or a [`JsErrorRecord`].
#[wasm_bindgen]
pub fn calculate(input_json: &str) -> String {
    let input: JsCalculateInput = match serde_json::from_str(input_json) {
        Ok(i) => i,
        Err(e) => {
            log_warning(&format!("invalid calculate input: {}", e));
            return serde_json::to_string(&JsErrorRecord::new(format!("Invalid input: {}", e)))
                .unwrap_or_default();
        }
    };

    let custom_products =
        custom_entries(input.custom_products, "custom products", is_valid_product_entry);
    let custom_crops = custom_entries(input.custom_crops, "custom crops", is_valid_crop_entry);
    let catalog = snapshot(custom_products, custom_crops);
    match calculate_multiple_requirements(&catalog, &input.targets) {
        Ok(result) => serde_json::to_string(&format_result(&catalog, &result)).unwrap_or_default(),
        Err(e) => serde_json::to_string(&JsErrorRecord::new(e.to_string())).unwrap_or_default(),
    }
}

/// Merged product list (built-ins plus the given custom products).
#[wasm_bindgen]
pub fn list_products(custom_products_json: &str) -> String {
    let custom = parse_or_empty(custom_products_json, "custom products", is_valid_product_entry);
    let catalog = snapshot(custom, Vec::new());
    serde_json::to_string(catalog.all_products()).unwrap_or_default()
}

/// Merged crop list (built-ins plus the given custom crops).
#[wasm_bindgen]
pub fn list_crops(custom_crops_json: &str) -> String {
    let custom = parse_or_empty(custom_crops_json, "custom crops", is_valid_crop_entry);
    let catalog = snapshot(Vec::new(), custom);
    serde_json::to_string(catalog.all_crops()).unwrap_or_default()
}

/// Merge an imported product file into the stored custom products.
///
/// `existing_json` is the current custom product slot, `imported_json`
/// the text of the uploaded file.
#[wasm_bindgen]
pub fn import_products(existing_json: &str, imported_json: &str) -> String {
    let store = MemoryStore::new().with_slot(PRODUCTS_SLOT, existing_json);
    let mut catalog = CatalogStore::new(builtin_data(), store);

    let result = match catalog.import_products(imported_json) {
        Ok(summary) => JsImportResult {
            success: true,
            error: None,
            imported: summary.imported,
            total: summary.total,
            products: catalog.custom_products(),
        },
        Err(e) => JsImportResult {
            success: false,
            error: Some(e.to_string()),
            imported: 0,
            total: 0,
            products: catalog.custom_products(),
        },
    };
    serde_json::to_string(&result).unwrap_or_default()
}

/// File name for an export made today.
#[wasm_bindgen]
pub fn export_file_name() -> String {
    let iso = String::from(js_sys::Date::new_0().to_iso_string());
    file_name_for(iso.get(..10).unwrap_or(iso.as_str()))
}

/// Get the version of the calculator.
#[wasm_bindgen]
pub fn get_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
