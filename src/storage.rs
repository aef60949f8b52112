//! Backends for user-defined catalog data.
//!
//! Custom products and custom crops live in two independent keyed slots,
//! each holding a JSON array. The browser keeps them in `localStorage`;
//! the command-line tool keeps one file per slot in a directory.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::StorageError;

/// Slot holding the user's custom products.
pub const PRODUCTS_SLOT: &str = "realfarm_custom_products";
/// Slot holding the user's custom or overridden crops.
pub const CROPS_SLOT: &str = "realfarm_custom_crops";

/// A keyed text store for custom catalog data.
pub trait CustomStore {
    /// Returns the slot contents, or `None` if the slot was never written.
    fn read(&self, slot: &str) -> Result<Option<String>, StorageError>;

    /// Replaces the slot contents.
    fn write(&mut self, slot: &str, contents: &str) -> Result<(), StorageError>;
}

/// In-memory store, used by the WebAssembly bindings and in tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    slots: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-fills a slot.
    pub fn with_slot(mut self, slot: &str, contents: impl Into<String>) -> Self {
        self.slots.insert(slot.to_string(), contents.into());
        self
    }

    pub fn slot(&self, slot: &str) -> Option<&str> {
        self.slots.get(slot).map(String::as_str)
    }
}

impl CustomStore for MemoryStore {
    fn read(&self, slot: &str) -> Result<Option<String>, StorageError> {
        Ok(self.slots.get(slot).cloned())
    }

    fn write(&mut self, slot: &str, contents: &str) -> Result<(), StorageError> {
        self.slots.insert(slot.to_string(), contents.to_string());
        Ok(())
    }
}

/// Directory-backed store: slot `name` lives in `<dir>/name.json`.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn slot_path(&self, slot: &str) -> PathBuf {
        self.dir.join(format!("{}.json", slot))
    }
}

impl CustomStore for FileStore {
    fn read(&self, slot: &str) -> Result<Option<String>, StorageError> {
        let path = self.slot_path(slot);
        if !path.exists() {
            return Ok(None);
        }
        Ok(Some(fs::read_to_string(path)?))
    }

    fn write(&mut self, slot: &str, contents: &str) -> Result<(), StorageError> {
        fs::create_dir_all(&self.dir)?;
        fs::write(self.slot_path(slot), contents)?;
        Ok(())
    }
}
