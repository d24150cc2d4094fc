//! Catalog ingestion errors.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, CatalogError>;

/// The catalog could not be ingested at all.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read catalog: {0}")]
    Io(#[from] std::io::Error),

    #[error("catalog is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("catalog root must be an array of records, found {0}")]
    NotAnArray(&'static str),
}
