//! The recipe catalog: built-in data merged with user overrides.
//!
//! [`Catalog`] is an immutable snapshot with name-indexed lookups; every
//! calculation reads one. [`CatalogStore`] owns the built-in data and a
//! [`CustomStore`] backend, builds fresh snapshots on demand, and
//! implements the catalog-management operations (add, update, delete,
//! import and export of user-defined entries).

use std::collections::HashMap;
use std::hash::Hash;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::data::BuiltinData;
use crate::error::{CatalogError, ImportError, StorageError};
use crate::models::{Crop, Product, ProductId};
use crate::storage::{CustomStore, CROPS_SLOT, PRODUCTS_SLOT};

/// Ingredients that are bought rather than grown. They never decompose and
/// always have zero difficulty.
pub const ITEMS: [&str; 7] = ["응고제", "소금", "발효액", "이스트", "달걀", "우유", "뽕잎"];

/// Returns `true` if `name` is one of the fixed [`ITEMS`].
pub fn is_item(name: &str) -> bool {
    ITEMS.contains(&name)
}

/// Merges `overrides` over `base` the way an insertion-ordered map would:
/// an entry whose key already exists replaces it in place, a new key is
/// appended.
fn merge_by_key<T, K, F>(base: Vec<T>, overrides: Vec<T>, key: F) -> Vec<T>
where
    K: Eq + Hash,
    F: Fn(&T) -> K,
{
    let mut merged: Vec<T> = Vec::with_capacity(base.len() + overrides.len());
    let mut index: HashMap<K, usize> = HashMap::new();

    for entry in base.into_iter().chain(overrides) {
        let k = key(&entry);
        match index.get(&k) {
            Some(&i) => merged[i] = entry,
            None => {
                index.insert(k, merged.len());
                merged.push(entry);
            }
        }
    }
    merged
}

/// An immutable catalog snapshot used for one calculation.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    products: Vec<Product>,
    product_index: HashMap<String, usize>,
    crops: Vec<Crop>,
    crop_index: HashMap<String, usize>,
}

impl Catalog {
    /// Builds a snapshot from already-merged lists.
    ///
    /// When two entries share a name, lookups return the first one.
    pub fn new(products: Vec<Product>, crops: Vec<Crop>) -> Self {
        let mut product_index = HashMap::new();
        for (i, product) in products.iter().enumerate() {
            product_index.entry(product.name.clone()).or_insert(i);
        }
        let mut crop_index = HashMap::new();
        for (i, crop) in crops.iter().enumerate() {
            crop_index.entry(crop.name.clone()).or_insert(i);
        }
        Self {
            products,
            product_index,
            crops,
            crop_index,
        }
    }

    /// Merges built-in and custom entries into a snapshot.
    ///
    /// Custom products replace built-ins with the same `id`; custom crops
    /// replace built-ins with the same `name`. Entries are flagged with
    /// `is_custom` according to where they came from.
    pub fn merged(
        builtin_products: Vec<Product>,
        custom_products: Vec<Product>,
        builtin_crops: Vec<Crop>,
        custom_crops: Vec<Crop>,
    ) -> Self {
        let flag_products = |products: Vec<Product>, custom: bool| {
            products.into_iter().map(move |mut p| {
                p.is_custom = custom;
                p
            })
        };
        let flag_crops = |crops: Vec<Crop>, custom: bool| {
            crops.into_iter().map(move |mut c| {
                c.is_custom = custom;
                c
            })
        };

        let products = merge_by_key(
            flag_products(builtin_products, false).collect(),
            flag_products(custom_products, true).collect(),
            |p: &Product| p.id.clone(),
        );
        let crops = merge_by_key(
            flag_crops(builtin_crops, false).collect(),
            flag_crops(custom_crops, true).collect(),
            |c: &Crop| c.name.clone(),
        );
        Self::new(products, crops)
    }

    pub fn all_products(&self) -> &[Product] {
        &self.products
    }

    pub fn all_crops(&self) -> &[Crop] {
        &self.crops
    }

    /// Looks a product up by exact name.
    pub fn product(&self, name: &str) -> Option<&Product> {
        self.product_index.get(name).map(|&i| &self.products[i])
    }

    pub fn product_by_id(&self, id: &ProductId) -> Option<&Product> {
        self.products.iter().find(|p| &p.id == id)
    }

    pub fn crop(&self, name: &str) -> Option<&Crop> {
        self.crop_index.get(name).map(|&i| &self.crops[i])
    }

    /// Difficulty of one unit of `name`, or 0 for unknown crops.
    pub fn crop_difficulty(&self, name: &str) -> f64 {
        self.crop(name).map_or(0.0, |c| c.difficulty)
    }

    pub fn is_crop(&self, name: &str) -> bool {
        self.crop_index.contains_key(name)
    }

    pub fn is_item(&self, name: &str) -> bool {
        is_item(name)
    }
}

/// Outcome of a successful product import.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ImportSummary {
    /// Valid entries found in the imported file
    pub imported: usize,
    /// Custom products stored after the merge
    pub total: usize,
}

/// Built-in data plus a backend holding the user's custom entries.
#[derive(Debug, Clone)]
pub struct CatalogStore<S> {
    builtin: BuiltinData,
    store: S,
}

impl<S: CustomStore> CatalogStore<S> {
    pub fn new(builtin: BuiltinData, store: S) -> Self {
        Self { builtin, store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    fn read_slot<T: DeserializeOwned>(&self, slot: &str, is_valid: fn(&Value) -> bool) -> Vec<T> {
        let contents = match self.store.read(slot) {
            Ok(Some(contents)) => contents,
            Ok(None) => return Vec::new(),
            Err(e) => {
                warn!(slot, error = %e, "failed to load custom data");
                return Vec::new();
            }
        };
        let raw: Value = match serde_json::from_str(&contents) {
            Ok(raw) => raw,
            Err(e) => {
                warn!(slot, error = %e, "failed to parse custom data");
                return Vec::new();
            }
        };
        let (entries, skipped) = valid_entries(raw, is_valid);
        for reason in skipped {
            warn!(slot, "{}", reason);
        }
        entries
    }

    fn write_slot<T: Serialize>(&mut self, slot: &str, entries: &[T]) -> Result<(), StorageError> {
        let json = serde_json::to_string(entries)?;
        self.store.write(slot, &json).map_err(|e| {
            warn!(slot, error = %e, "failed to save custom data");
            e
        })
    }

    /// The user's custom products. Missing or unreadable data reads as empty.
    pub fn custom_products(&self) -> Vec<Product> {
        self.read_slot(PRODUCTS_SLOT, is_valid_product_entry)
    }

    /// The user's custom crops. Missing or unreadable data reads as empty.
    pub fn custom_crops(&self) -> Vec<Crop> {
        self.read_slot(CROPS_SLOT, is_valid_crop_entry)
    }

    /// Builds a fresh merged snapshot.
    pub fn snapshot(&self) -> Catalog {
        Catalog::merged(
            self.builtin.products.clone(),
            self.custom_products(),
            self.builtin.crops.clone(),
            self.custom_crops(),
        )
    }

    pub fn all_products(&self) -> Vec<Product> {
        self.snapshot().products
    }

    pub fn all_crops(&self) -> Vec<Crop> {
        self.snapshot().crops
    }

    pub fn get_product(&self, id: &ProductId) -> Option<Product> {
        self.snapshot().product_by_id(id).cloned()
    }

    pub fn is_crop(&self, name: &str) -> bool {
        self.snapshot().is_crop(name)
    }

    fn check_name_free(&self, name: &str, id: &ProductId) -> Result<(), CatalogError> {
        let snapshot = self.snapshot();
        if snapshot
            .all_products()
            .iter()
            .any(|p| p.name == name && &p.id != id)
        {
            return Err(CatalogError::DuplicateName {
                name: name.to_string(),
            });
        }
        Ok(())
    }

    /// Adds a new custom product.
    ///
    /// A product may reuse the id of a built-in to override it, but not the
    /// id of another custom product, and its name must not be taken by any
    /// product with a different id.
    pub fn add_product(&mut self, product: Product) -> Result<(), CatalogError> {
        let mut custom = self.custom_products();
        if custom.iter().any(|p| p.id == product.id) {
            return Err(CatalogError::DuplicateId { id: product.id });
        }
        self.check_name_free(&product.name, &product.id)?;

        debug!(id = %product.id, name = %product.name, "adding custom product");
        custom.push(product);
        self.write_slot(PRODUCTS_SLOT, &custom)?;
        Ok(())
    }

    /// Replaces the custom product with id `id`. The stored entry keeps `id`.
    pub fn update_product(&mut self, id: &ProductId, mut product: Product) -> Result<(), CatalogError> {
        let mut custom = self.custom_products();
        let index = custom
            .iter()
            .position(|p| &p.id == id)
            .ok_or_else(|| CatalogError::ProductNotFound { id: id.clone() })?;
        self.check_name_free(&product.name, id)?;

        product.id = id.clone();
        custom[index] = product;
        self.write_slot(PRODUCTS_SLOT, &custom)?;
        Ok(())
    }

    /// Removes the custom product with id `id`.
    pub fn delete_product(&mut self, id: &ProductId) -> Result<(), CatalogError> {
        let custom = self.custom_products();
        let before = custom.len();
        let filtered: Vec<Product> = custom.into_iter().filter(|p| &p.id != id).collect();
        if filtered.len() == before {
            return Err(CatalogError::ProductNotFound { id: id.clone() });
        }
        self.write_slot(PRODUCTS_SLOT, &filtered)?;
        Ok(())
    }

    /// Adds a custom crop, or overrides an existing crop with the same name.
    pub fn save_crop(&mut self, crop: Crop) -> Result<(), CatalogError> {
        let custom = self.custom_crops();
        let merged = merge_by_key(custom, vec![crop], |c: &Crop| c.name.clone());
        self.write_slot(CROPS_SLOT, &merged)?;
        Ok(())
    }

    /// Removes a custom crop. Built-in crops cannot be removed.
    pub fn delete_crop(&mut self, name: &str) -> Result<(), CatalogError> {
        let custom = self.custom_crops();
        let before = custom.len();
        let filtered: Vec<Crop> = custom.into_iter().filter(|c| c.name != name).collect();
        if filtered.len() == before {
            return Err(CatalogError::CropNotFound {
                name: name.to_string(),
            });
        }
        self.write_slot(CROPS_SLOT, &filtered)?;
        Ok(())
    }

    /// Imports a JSON array of products into the custom slot.
    ///
    /// Entries without an `id`, `name`, `building` or an `ingredients`
    /// array are dropped. Imported entries replace stored entries with the
    /// same id.
    pub fn import_products(&mut self, json: &str) -> Result<ImportSummary, ImportError> {
        let parsed: Value = serde_json::from_str(json)?;
        if !parsed.is_array() {
            return Err(ImportError::NotAnArray);
        }

        let (valid, skipped): (Vec<Product>, _) = valid_entries(parsed, is_valid_product_entry);
        for reason in skipped {
            warn!("{}", reason);
        }

        if valid.is_empty() {
            return Err(ImportError::NoValidProducts);
        }

        let imported = valid.len();
        let merged = merge_by_key(self.custom_products(), valid, |p: &Product| p.id.clone());
        self.write_slot(PRODUCTS_SLOT, &merged)?;

        debug!(imported, total = merged.len(), "imported custom products");
        Ok(ImportSummary {
            imported,
            total: merged.len(),
        })
    }

    /// Serializes the custom product slot as a pretty-printed JSON array.
    pub fn export_products(&self) -> Result<String, StorageError> {
        Ok(serde_json::to_string_pretty(&self.custom_products())?)
    }
}

/// File name for an export made on `date` (`YYYY-MM-DD`).
///
/// ```
/// use realfarm::catalog::export_file_name;
///
/// assert_eq!(export_file_name("2024-05-01"), "realfarm-products-2024-05-01.json");
/// ```
pub fn export_file_name(date: &str) -> String {
    format!("realfarm-products-{}.json", date)
}

/// Whether a raw JSON entry carries the fields a product needs.
pub fn is_valid_product_entry(entry: &Value) -> bool {
    is_present(entry.get("id"))
        && is_present(entry.get("name"))
        && is_present(entry.get("building"))
        && entry.get("ingredients").map_or(false, Value::is_array)
}

/// Whether a raw JSON entry carries the fields a crop needs.
pub fn is_valid_crop_entry(entry: &Value) -> bool {
    is_present(entry.get("name"))
}

/// Deserializes every entry of a raw JSON array that passes `is_valid`.
///
/// Returns the parsed entries together with one message per skipped
/// entry. `null` reads as an empty list; any other non-array value is
/// skipped as a whole.
///
/// ```
/// use realfarm::catalog::{is_valid_crop_entry, valid_entries};
/// use realfarm::models::Crop;
///
/// let raw = serde_json::json!([{ "name": "콩", "difficulty": 1 }, { "difficulty": 2 }]);
/// let (crops, skipped): (Vec<Crop>, _) = valid_entries(raw, is_valid_crop_entry);
///
/// assert_eq!(crops.len(), 1);
/// assert_eq!(skipped.len(), 1);
/// ```
pub fn valid_entries<T: DeserializeOwned>(
    raw: Value,
    is_valid: fn(&Value) -> bool,
) -> (Vec<T>, Vec<String>) {
    let entries = match raw {
        Value::Array(entries) => entries,
        Value::Null => return (Vec::new(), Vec::new()),
        _ => return (Vec::new(), vec!["ignoring entries: expected an array".to_string()]),
    };

    let mut parsed = Vec::with_capacity(entries.len());
    let mut skipped = Vec::new();
    for (i, entry) in entries.into_iter().enumerate() {
        if !is_valid(&entry) {
            skipped.push(format!("skipping entry {}: missing required fields", i));
            continue;
        }
        match serde_json::from_value(entry) {
            Ok(value) => parsed.push(value),
            Err(e) => skipped.push(format!("skipping entry {}: {}", i, e)),
        }
    }
    (parsed, skipped)
}

fn is_present(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().map_or(true, |f| f != 0.0),
        Some(Value::String(s)) => !s.is_empty(),
        Some(_) => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_by_key_replaces_in_place() {
        let merged = merge_by_key(vec![(1, "a"), (2, "b")], vec![(1, "c"), (3, "d")], |e| e.0);
        assert_eq!(merged, vec![(1, "c"), (2, "b"), (3, "d")]);
    }

    #[test]
    fn is_present_follows_truthiness() {
        assert!(!is_present(None));
        assert!(!is_present(Some(&Value::Null)));
        assert!(!is_present(Some(&Value::String(String::new()))));
        assert!(!is_present(Some(&serde_json::json!(0))));
        assert!(is_present(Some(&serde_json::json!(17))));
        assert!(is_present(Some(&serde_json::json!("p1"))));
    }
}
