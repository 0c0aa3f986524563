//! Error types for the variable and trace model.

use thiserror::Error;

/// Errors raised while building variables and traces from tabular data.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ModelError {
    /// A column's storage type has no representation type.
    #[error("unsupported type for column '{column}': {dtype}")]
    UnsupportedType { column: String, dtype: String },

    /// Two derived outputs claimed the same variable name.
    #[error("duplicate latent variable '{name}' derived from column '{column}'")]
    DuplicateLatentName { name: String, column: String },

    /// A variable name was inserted twice into the same set.
    #[error("duplicate variable '{name}'")]
    DuplicateVariable { name: String },

    /// Ragged columns, misaligned rows or cells that do not fit their column type.
    #[error("malformed input: {0}")]
    MalformedInput(String),

    /// Polars DataFrame operation error.
    #[error("DataFrame error: {0}")]
    Polars(#[from] polars::error::PolarsError),
}

/// Result type for model operations.
pub type Result<T> = std::result::Result<T, ModelError>;
