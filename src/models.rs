//! Data models and structures for realfarm.
//!
//! This module contains the catalog entities (crops, products and their
//! ingredients), the raw output of a requirement calculation, and the
//! display-ready records produced from it.

use std::collections::HashMap;
use std::fmt;

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

/// Identifier of a catalog product.
///
/// Product files written by older versions of the web app carry numeric
/// ids, newer ones carry strings, so both are accepted and preserved.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ProductId {
    /// Numeric identifier (e.g. a timestamp); any JSON number is kept as is
    Number(serde_json::Number),
    /// Textual identifier (e.g. "p001")
    Text(String),
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProductId::Number(n) => write!(f, "{}", n),
            ProductId::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for ProductId {
    fn from(s: &str) -> Self {
        ProductId::Text(s.to_string())
    }
}

impl From<u64> for ProductId {
    fn from(n: u64) -> Self {
        ProductId::Number(n.into())
    }
}

/// A raw crop. Crops are leaves of every recipe tree.
///
/// # Example
///
/// ```
/// use realfarm::models::Crop;
///
/// let wheat = Crop::new("wheat", 2.0);
/// assert_eq!(wheat.difficulty, 2.0);
/// assert!(!wheat.is_custom);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Crop {
    /// Unique crop name
    pub name: String,
    /// Raw-material difficulty of one unit
    #[serde(default)]
    pub difficulty: f64,
    /// Whether this entry comes from the user's custom crop slot
    #[serde(default)]
    pub is_custom: bool,
}

impl Crop {
    pub fn new(name: impl Into<String>, difficulty: f64) -> Self {
        Self {
            name: name.into(),
            difficulty,
            is_custom: false,
        }
    }
}

/// What kind of entity an ingredient refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IngredientKind {
    Crop,
    Item,
    Product,
}

/// One line of a recipe: `count` units of `name` per unit of output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ingredient {
    /// Name of the crop, item or product consumed
    pub name: String,
    /// Units consumed per unit of output
    pub count: f64,
    /// Explicit kind. When absent the calculator infers it from the catalog.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<IngredientKind>,
}

impl Ingredient {
    pub fn crop(name: impl Into<String>, count: f64) -> Self {
        Self {
            name: name.into(),
            count,
            kind: Some(IngredientKind::Crop),
        }
    }

    pub fn item(name: impl Into<String>, count: f64) -> Self {
        Self {
            name: name.into(),
            count,
            kind: Some(IngredientKind::Item),
        }
    }

    pub fn product(name: impl Into<String>, count: f64) -> Self {
        Self {
            name: name.into(),
            count,
            kind: Some(IngredientKind::Product),
        }
    }

    /// An ingredient without an explicit kind.
    pub fn untyped(name: impl Into<String>, count: f64) -> Self {
        Self {
            name: name.into(),
            count,
            kind: None,
        }
    }
}

/// A processed product made at a building from a list of ingredients.
///
/// # Example
///
/// ```
/// use realfarm::models::{Ingredient, Product};
///
/// let bread = Product::new("bread-1", "bread", "oven")
///     .with_ingredient(Ingredient::crop("wheat", 3.0));
///
/// assert_eq!(bread.building, "oven");
/// assert_eq!(bread.ingredients.len(), 1);
/// assert!(!bread.purchasable);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Unique identifier, used to merge custom entries over built-ins
    pub id: ProductId,
    /// Unique display name, used for every recipe lookup
    pub name: String,
    /// Production facility (e.g. "발효실")
    pub building: String,
    /// Ordered recipe lines
    #[serde(default)]
    pub ingredients: Vec<Ingredient>,
    /// Whether the product can also be bought
    #[serde(default)]
    pub purchasable: bool,
    /// Purchase price, if known
    #[serde(default)]
    pub price: Option<f64>,
    /// Whether this entry comes from the user's custom product slot
    #[serde(default)]
    pub is_custom: bool,
}

impl Product {
    pub fn new(
        id: impl Into<ProductId>,
        name: impl Into<String>,
        building: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            building: building.into(),
            ingredients: Vec::new(),
            purchasable: false,
            price: None,
            is_custom: false,
        }
    }

    pub fn with_ingredient(mut self, ingredient: Ingredient) -> Self {
        self.ingredients.push(ingredient);
        self
    }

    pub fn with_price(mut self, price: f64) -> Self {
        self.purchasable = true;
        self.price = Some(price);
        self
    }
}

/// A requested product and how many units of it are wanted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Target {
    pub name: String,
    pub quantity: f64,
}

impl Target {
    pub fn new(name: impl Into<String>, quantity: f64) -> Self {
        Self {
            name: name.into(),
            quantity,
        }
    }
}

/// Insertion-ordered mapping from a name to a running `f64` total.
///
/// Serializes as a JSON object whose keys keep first-insertion order.
///
/// # Example
///
/// ```
/// use realfarm::models::Tally;
///
/// let mut tally = Tally::default();
/// tally.add("wheat", 2.0);
/// tally.add("rice", 1.0);
/// tally.add("wheat", 0.5);
///
/// assert_eq!(tally.get("wheat"), Some(2.5));
/// assert_eq!(tally.names().collect::<Vec<_>>(), vec!["wheat", "rice"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Tally {
    entries: Vec<(String, f64)>,
    index: HashMap<String, usize>,
}

impl Tally {
    /// Adds `amount` to the total for `name`, inserting it at the end if new.
    pub fn add(&mut self, name: &str, amount: f64) {
        match self.index.get(name) {
            Some(&i) => self.entries[i].1 += amount,
            None => {
                self.index.insert(name.to_string(), self.entries.len());
                self.entries.push((name.to_string(), amount));
            }
        }
    }

    /// Sets the total for `name`, keeping its original position if present.
    pub fn set(&mut self, name: &str, value: f64) {
        match self.index.get(name) {
            Some(&i) => self.entries[i].1 = value,
            None => {
                self.index.insert(name.to_string(), self.entries.len());
                self.entries.push((name.to_string(), value));
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.index.get(name).map(|&i| self.entries[i].1)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.entries.iter().map(|(name, value)| (name.as_str(), *value))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for Tally {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, value) in &self.entries {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

/// Products that are made in the same building, in first-seen order.
#[derive(Debug, Clone, PartialEq)]
pub struct BuildingGroup {
    pub building: String,
    pub products: Vec<Product>,
}

/// Insertion-ordered mapping from a building to the products made there.
///
/// Serializes as a JSON object `{building: [product, ...]}` whose keys keep
/// first-insertion order.
///
/// # Example
///
/// ```
/// use realfarm::models::{BuildingGroups, Product};
///
/// let mut groups = BuildingGroups::default();
/// groups.insert(&Product::new("1", "flour", "mill"));
/// groups.insert(&Product::new("2", "bread", "oven"));
/// groups.insert(&Product::new("1", "flour", "mill"));
///
/// assert_eq!(groups.buildings().collect::<Vec<_>>(), vec!["mill", "oven"]);
/// assert_eq!(groups.get("mill").map(|p| p.len()), Some(1));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BuildingGroups {
    groups: Vec<BuildingGroup>,
}

impl BuildingGroups {
    /// Adds `product` to its building's group unless a product of the same
    /// name is already there.
    pub fn insert(&mut self, product: &Product) {
        match self.groups.iter_mut().find(|g| g.building == product.building) {
            Some(group) => {
                if !group.products.iter().any(|p| p.name == product.name) {
                    group.products.push(product.clone());
                }
            }
            None => self.groups.push(BuildingGroup {
                building: product.building.clone(),
                products: vec![product.clone()],
            }),
        }
    }

    pub fn get(&self, building: &str) -> Option<&[Product]> {
        self.groups
            .iter()
            .find(|g| g.building == building)
            .map(|g| g.products.as_slice())
    }

    pub fn iter(&self) -> impl Iterator<Item = &BuildingGroup> {
        self.groups.iter()
    }

    pub fn buildings(&self) -> impl Iterator<Item = &str> {
        self.groups.iter().map(|g| g.building.as_str())
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

impl Serialize for BuildingGroups {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.groups.len()))?;
        for group in &self.groups {
            map.serialize_entry(&group.building, &group.products)?;
        }
        map.end()
    }
}

/// Raw output of a requirement calculation.
///
/// All quantities are unrounded per-unit totals accumulated over every
/// path of every target's recipe tree.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RequirementResult {
    /// The requested targets, in request order
    pub target_products: Vec<Target>,
    /// Crop name -> total units needed
    pub crops: Tally,
    /// Item name -> total units needed
    pub items: Tally,
    /// Product name -> total units needed (intermediates and targets)
    pub intermediate_products: Tally,
    /// Dependency chain grouped by production building
    pub building_groups: BuildingGroups,
    /// Union of every target's dependency chain, dependencies first
    pub dependency_chain: Vec<Product>,
    /// Product name -> difficulty of one unit
    pub product_difficulties: Tally,
}

/// A display-ready crop or item requirement.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LeafRequirement {
    pub name: String,
    /// Units to gather, rounded up
    pub count: u64,
    pub difficulty: f64,
}

/// A display-ready product requirement.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductRequirement {
    pub name: String,
    /// Units to produce, rounded up
    pub count: u64,
    pub difficulty: f64,
    pub purchasable: bool,
    pub price: Option<f64>,
}

/// Product names made in one building.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BuildingSummary {
    pub building: String,
    pub products: Vec<String>,
}

/// A calculation result together with its display-ready records.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormattedResult {
    #[serde(flatten)]
    pub result: RequirementResult,
    pub formatted_crops: Vec<LeafRequirement>,
    pub formatted_items: Vec<LeafRequirement>,
    pub formatted_products: Vec<ProductRequirement>,
    pub formatted_buildings: Vec<BuildingSummary>,
}

// ============================================================================
// CSV Row Structures
// ============================================================================

/// CSV row structure for the built-in crop table.
#[derive(Debug, Deserialize)]
pub struct CropRow {
    /// Crop name
    pub name: String,
    /// Raw-material difficulty
    pub difficulty: f64,
}
