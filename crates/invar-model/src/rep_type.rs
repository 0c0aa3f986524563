use std::fmt;

use polars::prelude::{Column, DataType};
use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};

/// Representation type of a variable in the trace output.
///
/// Every column maps to exactly one of these. The names used in the
/// declarations file are Daikon's Java-flavoured ones (`int`, `double`,
/// `boolean`, `java.lang.String`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RepType {
    Integer,
    Float,
    Boolean,
    String,
}

impl RepType {
    /// Maps a Polars storage type to a representation type.
    ///
    /// Booleans are checked before integers so they are never read as 0/1
    /// numbers. Returns `None` for dates, lists, categoricals and `Null`.
    pub fn from_dtype(dtype: &DataType) -> Option<Self> {
        match dtype {
            DataType::Boolean => Some(RepType::Boolean),
            DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64 => Some(RepType::Integer),
            DataType::Float32 | DataType::Float64 => Some(RepType::Float),
            DataType::String => Some(RepType::String),
            _ => None,
        }
    }

    /// Representation type of a column, failing with `UnsupportedType`.
    pub fn of_column(column: &Column) -> Result<Self> {
        Self::from_dtype(column.dtype()).ok_or_else(|| ModelError::UnsupportedType {
            column: column.name().to_string(),
            dtype: column.dtype().to_string(),
        })
    }

    /// The `rep-type` name written to declarations.
    pub fn rep_name(self) -> &'static str {
        match self {
            RepType::Integer => "int",
            RepType::Float => "double",
            RepType::Boolean => "boolean",
            RepType::String => "java.lang.String",
        }
    }

    /// Default `dec-type` name; identical to the representation name.
    pub fn dec_name(self) -> &'static str {
        self.rep_name()
    }

    /// Short lowercase name used in logs and summaries.
    pub fn as_str(self) -> &'static str {
        match self {
            RepType::Integer => "integer",
            RepType::Float => "float",
            RepType::Boolean => "boolean",
            RepType::String => "string",
        }
    }

    pub fn is_numeric(self) -> bool {
        matches!(self, RepType::Integer | RepType::Float)
    }
}

impl fmt::Display for RepType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.rep_name())
    }
}
