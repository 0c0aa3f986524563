//! Polars `AnyValue` utility functions.
//!
//! Conversions used when typed cells are pulled out of a `DataFrame`, plus the
//! float literal formatting shared by the trace writers.

use polars::prelude::AnyValue;

/// Converts an `AnyValue` to `i64`, returning `None` for null or non-integer values.
///
/// Floats are not truncated here: a float cell in an integer column is a data
/// error, not something to paper over.
///
/// # Examples
///
/// ```
/// use polars::prelude::AnyValue;
/// use invar_common::any_to_i64;
///
/// assert_eq!(any_to_i64(AnyValue::Int32(42)), Some(42));
/// assert_eq!(any_to_i64(AnyValue::Null), None);
/// assert_eq!(any_to_i64(AnyValue::Float64(1.5)), None);
/// ```
pub fn any_to_i64(value: AnyValue<'_>) -> Option<i64> {
    match value {
        AnyValue::Int8(v) => Some(i64::from(v)),
        AnyValue::Int16(v) => Some(i64::from(v)),
        AnyValue::Int32(v) => Some(i64::from(v)),
        AnyValue::Int64(v) => Some(v),
        AnyValue::UInt8(v) => Some(i64::from(v)),
        AnyValue::UInt16(v) => Some(i64::from(v)),
        AnyValue::UInt32(v) => Some(i64::from(v)),
        AnyValue::UInt64(v) => i64::try_from(v).ok(),
        _ => None,
    }
}

/// Converts an `AnyValue` to `f64`, returning `None` for null or non-numeric values.
///
/// Handles integer types and floating-point types.
pub fn any_to_f64(value: AnyValue<'_>) -> Option<f64> {
    match value {
        AnyValue::Int8(v) => Some(f64::from(v)),
        AnyValue::Int16(v) => Some(f64::from(v)),
        AnyValue::Int32(v) => Some(f64::from(v)),
        AnyValue::Int64(v) => Some(v as f64),
        AnyValue::UInt8(v) => Some(f64::from(v)),
        AnyValue::UInt16(v) => Some(f64::from(v)),
        AnyValue::UInt32(v) => Some(f64::from(v)),
        AnyValue::UInt64(v) => Some(v as f64),
        AnyValue::Float32(v) => Some(f64::from(v)),
        AnyValue::Float64(v) => Some(v),
        _ => None,
    }
}

/// Converts an `AnyValue` to `bool`, returning `None` for anything but a boolean.
pub fn any_to_bool(value: AnyValue<'_>) -> Option<bool> {
    match value {
        AnyValue::Boolean(b) => Some(b),
        _ => None,
    }
}

/// Converts an `AnyValue` holding text to an owned `String`.
///
/// Returns `None` for `Null` and for non-text values.
pub fn any_to_text(value: AnyValue<'_>) -> Option<String> {
    match value {
        AnyValue::String(s) => Some(s.to_string()),
        AnyValue::StringOwned(s) => Some(s.to_string()),
        _ => None,
    }
}

/// Formats a float as a literal that always reads back as a double.
///
/// Whole numbers keep a trailing `.0` and infinities use the Java spelling.
///
/// # Examples
///
/// ```
/// use invar_common::format_float;
///
/// assert_eq!(format_float(2.0), "2.0");
/// assert_eq!(format_float(0.25), "0.25");
/// assert_eq!(format_float(f64::NEG_INFINITY), "-Infinity");
/// ```
pub fn format_float(v: f64) -> String {
    if v.is_nan() {
        "NaN".to_string()
    } else if v == f64::INFINITY {
        "Infinity".to_string()
    } else if v == f64::NEG_INFINITY {
        "-Infinity".to_string()
    } else {
        format!("{v:?}")
    }
}
