//! Error types for dataset loading.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while loading a dataset.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum IngestError {
    /// Input file not found.
    #[error("input file not found: {path}")]
    FileNotFound { path: PathBuf },

    /// File extension has no known delimiter and none was given.
    #[error("unsupported file extension '{extension}' for {path}")]
    UnsupportedExtension { path: PathBuf, extension: String },

    /// Failed to parse CSV with Polars.
    #[error("failed to parse CSV {path}: {message}")]
    CsvParse { path: PathBuf, message: String },

    /// Failed DataFrame operation.
    #[error("DataFrame error: {0}")]
    Polars(#[from] polars::error::PolarsError),
}

/// Result type for ingest operations.
pub type Result<T> = std::result::Result<T, IngestError>;
