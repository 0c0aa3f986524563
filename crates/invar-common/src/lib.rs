//! Shared utilities for the invar crates.
//!
//! This crate provides common helpers used across the workspace, mostly
//! conversions out of Polars `AnyValue` cells.

pub mod values;

// Re-export commonly used functions at crate root for convenience
pub use values::{any_to_bool, any_to_f64, any_to_i64, any_to_text, format_float};
