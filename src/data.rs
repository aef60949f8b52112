//! Built-in catalog data for realfarm.
//!
//! The built-in crop table is a CSV file (`data/crops.csv`) and the
//! built-in product table is a JSON document (`data/products.json`).
//! Both are embedded into the binary for the WebAssembly build and can
//! also be loaded from a directory for the command-line tool.

use csv::ReaderBuilder;
use serde::Deserialize;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::error::DataError;
use crate::models::{Crop, CropRow, Product};

const EMBEDDED_CROPS: &str = include_str!("../data/crops.csv");
const EMBEDDED_PRODUCTS: &str = include_str!("../data/products.json");

/// Top-level shape of `products.json`.
#[derive(Debug, Deserialize)]
struct ProductFile {
    #[serde(default)]
    products: Vec<Product>,
}

/// The read-only catalog shipped with the application.
#[derive(Debug, Clone, Default)]
pub struct BuiltinData {
    pub products: Vec<Product>,
    pub crops: Vec<Crop>,
}

impl BuiltinData {
    /// Parses the data files compiled into the crate.
    pub fn embedded() -> Result<Self, DataError> {
        Ok(Self {
            products: parse_products(EMBEDDED_PRODUCTS)?,
            crops: parse_crops(EMBEDDED_CROPS.as_bytes())?,
        })
    }

    /// Loads `crops.csv` and `products.json` from `data_dir`.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use std::path::Path;
    /// use realfarm::data::BuiltinData;
    ///
    /// let data = BuiltinData::load_from_dir(Path::new("data")).unwrap();
    /// println!("Loaded {} products", data.products.len());
    /// ```
    pub fn load_from_dir(data_dir: &Path) -> Result<Self, DataError> {
        Ok(Self {
            products: load_products(&data_dir.join("products.json"))?,
            crops: load_crops(&data_dir.join("crops.csv"))?,
        })
    }
}

/// Parses a crop table.
///
/// # CSV Format
///
/// Expected columns: `name, difficulty`
pub fn parse_crops<R: Read>(reader: R) -> Result<Vec<Crop>, DataError> {
    let mut rdr = ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut crops = Vec::new();
    for result in rdr.deserialize() {
        let row: CropRow = result?;
        crops.push(Crop::new(row.name, row.difficulty));
    }
    Ok(crops)
}

/// Loads the crop table from a CSV file.
pub fn load_crops(path: &Path) -> Result<Vec<Crop>, DataError> {
    let file = File::open(path)?;
    parse_crops(file)
}

/// Parses a product table of the form `{ "products": [...] }`.
pub fn parse_products(json: &str) -> Result<Vec<Product>, DataError> {
    let file: ProductFile = serde_json::from_str(json)?;
    Ok(file.products)
}

/// Loads the product table from a JSON file.
pub fn load_products(path: &Path) -> Result<Vec<Product>, DataError> {
    let json = std::fs::read_to_string(path)?;
    parse_products(&json)
}
