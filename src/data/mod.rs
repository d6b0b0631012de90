/// Data layer: core types, loading, filtering and reshaping.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → SalesDataset
///   └──────────┘
///        │
///        ▼
///   ┌──────────────┐
///   │ SalesDataset  │  Vec<OrderLine>, unique categories / cities / years
///   └──────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  category ∧ city ∧ year range → row indices
///   └──────────┘
///        │                         │
///        ▼                         ▼
///   ┌──────────┐             ┌──────────┐
///   │  pivot    │ date×cat    │ metrics   │ per-category totals
///   └──────────┘             └──────────┘
///        │
///        ▼
///   melt → chart series, export → csv / json
/// ```

pub mod export;
pub mod filter;
pub mod loader;
pub mod metrics;
pub mod model;
pub mod pivot;

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading, reshaping or exporting sales data.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("unsupported file extension: .{0}")]
    UnsupportedExtension(String),

    #[error("failed to access {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    #[error("malformed input: {0}")]
    Malformed(String),

    #[error("missing required column '{0}'")]
    MissingColumn(&'static str),

    #[error("row {row}: invalid {column} value '{value}'")]
    InvalidValue {
        row: usize,
        column: &'static str,
        value: String,
    },

    #[error("{what} index {index} out of range (len {len})")]
    OutOfRange {
        what: &'static str,
        index: usize,
        len: usize,
    },
}

pub type Result<T> = std::result::Result<T, DataError>;
