//! # realfarm
//!
//! A command-line tool and library for planning processed-product
//! production in the RealFarm farming game.
//!
//! Given a target product and a quantity, the calculator expands the
//! product's recipe tree into:
//!
//! - Raw crops to grow
//! - Purchasable items to buy
//! - Intermediate products to make, in production order
//! - The buildings involved and each product's difficulty score
//!
//! ## Modules
//!
//! - [`models`] - Catalog entities and calculation results
//! - [`data`] - Built-in crop (CSV) and product (JSON) data
//! - [`storage`] - Backends for user-defined catalog entries
//! - [`catalog`] - Catalog snapshots and catalog management
//! - [`resolver`] - Dependency chain resolution
//! - [`calculator`] - Requirement aggregation and difficulty scoring
//! - [`display`] - Result formatting and display utilities
//! - [`error`] - Error types
//! - [`wasm`] - WebAssembly bindings for the web front-end
//!
//! ## Example Usage
//!
//! ```
//! use realfarm::{
//!     calculator::calculate_requirements,
//!     catalog::Catalog,
//!     display::format_result,
//!     models::{Crop, Ingredient, Product},
//! };
//!
//! let catalog = Catalog::new(
//!     vec![Product::new("b", "bread", "oven").with_ingredient(Ingredient::crop("wheat", 3.0))],
//!     vec![Crop::new("wheat", 2.0)],
//! );
//!
//! let result = calculate_requirements(&catalog, "bread", 2.0).unwrap();
//! let formatted = format_result(&catalog, &result);
//!
//! assert_eq!(formatted.formatted_crops[0].name, "wheat");
//! assert_eq!(formatted.formatted_crops[0].count, 6);
//! assert_eq!(result.product_difficulties.get("bread"), Some(6.0));
//! ```

pub mod calculator;
pub mod catalog;
pub mod data;
pub mod display;
pub mod error;
pub mod models;
pub mod resolver;
pub mod storage;
pub mod wasm;
