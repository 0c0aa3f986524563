//! Typed cell values.
//!
//! Cells are coerced to their column's [`RepType`] once, when a trace table is
//! built, so nothing downstream re-inspects Polars values.

use std::fmt;

use invar_common::{any_to_bool, any_to_f64, any_to_i64, any_to_text, format_float};
use polars::prelude::AnyValue;
use serde::Serialize;

use crate::rep_type::RepType;

/// Marker Daikon uses for a value that is absent or meaningless.
pub const NONSENSICAL: &str = "nonsensical";

/// A single typed value: one trace cell or one constant.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Integer(i64),
    Float(f64),
    Boolean(bool),
    String(String),
    /// Null, NaN, or an undefined statistic.
    Missing,
}

impl Value {
    /// Coerces a Polars cell to the given representation type.
    ///
    /// Nulls and NaN floats become [`Value::Missing`]. Returns `None` when the
    /// cell cannot be represented as `rep_type`.
    pub fn coerce(rep_type: RepType, value: AnyValue<'_>) -> Option<Self> {
        if matches!(value, AnyValue::Null) {
            return Some(Value::Missing);
        }
        match rep_type {
            RepType::Integer => any_to_i64(value).map(Value::Integer),
            RepType::Float => any_to_f64(value).map(Value::from_f64),
            RepType::Boolean => any_to_bool(value).map(Value::Boolean),
            RepType::String => any_to_text(value).map(Value::String),
        }
    }

    /// Wraps a float, mapping NaN to `Missing`.
    pub fn from_f64(v: f64) -> Self {
        if v.is_nan() { Value::Missing } else { Value::Float(v) }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Value::Missing)
    }

    /// The representation type this value carries, if any.
    pub fn rep_type(&self) -> Option<RepType> {
        match self {
            Value::Integer(_) => Some(RepType::Integer),
            Value::Float(_) => Some(RepType::Float),
            Value::Boolean(_) => Some(RepType::Boolean),
            Value::String(_) => Some(RepType::String),
            Value::Missing => None,
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Integer(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::from_f64(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Boolean(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Missing, Into::into)
    }
}

/// Plain rendering for logs and the variable debug form; not the trace
/// literal syntax.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Integer(v) => write!(f, "{v}"),
            Value::Float(v) => f.write_str(&format_float(*v)),
            Value::Boolean(v) => write!(f, "{v}"),
            Value::String(v) => f.write_str(v),
            Value::Missing => f.write_str(NONSENSICAL),
        }
    }
}
