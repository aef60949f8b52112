//! Error types for realfarm.
//!
//! User-facing messages are in Korean to match the web front-end.

use crate::models::ProductId;

/// Message shown for a product name that has no catalog entry.
pub fn not_found_message(name: &str) -> String {
    format!("가공품 \"{}\"을(를) 찾을 수 없습니다.", name)
}

fn joined_not_found(names: &[String]) -> String {
    names
        .iter()
        .map(|name| not_found_message(name))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Errors returned by a requirement calculation.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CalculationError {
    /// One or more requested products are not in the catalog.
    #[error("{}", joined_not_found(.names))]
    ProductsNotFound { names: Vec<String> },

    /// A requested quantity is negative, NaN or infinite.
    #[error("수량이 올바르지 않습니다: \"{name}\" ({quantity})")]
    InvalidQuantity { name: String, quantity: f64 },
}

/// Errors raised by a custom data backend.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("invalid stored data: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors returned by catalog write operations.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("이미 존재하는 ID입니다. ({id})")]
    DuplicateId { id: ProductId },

    #[error("이미 존재하는 가공품 이름입니다. ({name})")]
    DuplicateName { name: String },

    #[error("가공품을 찾을 수 없습니다. ({id})")]
    ProductNotFound { id: ProductId },

    #[error("작물을 찾을 수 없습니다. ({name})")]
    CropNotFound { name: String },

    #[error("저장에 실패했습니다: {0}")]
    Storage(#[from] StorageError),
}

/// Errors returned when importing a product file.
#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("잘못된 파일 형식입니다. 배열이어야 합니다.")]
    NotAnArray,

    #[error("유효한 가공품 데이터가 없습니다.")]
    NoValidProducts,

    #[error("파일을 읽는 중 오류가 발생했습니다: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("저장에 실패했습니다: {0}")]
    Storage(#[from] StorageError),
}

/// Errors raised while loading built-in catalog data.
#[derive(Debug, thiserror::Error)]
pub enum DataError {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("crop table: {0}")]
    Csv(#[from] csv::Error),

    #[error("product table: {0}")]
    Json(#[from] serde_json::Error),
}
