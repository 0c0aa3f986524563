//! Row-aligned value tables.

use indexmap::IndexMap;
use polars::prelude::{Column, DataFrame};

use crate::error::{ModelError, Result};
use crate::rep_type::RepType;
use crate::value::Value;

/// One named column of typed values.
#[derive(Debug, Clone, PartialEq)]
pub struct TraceColumn {
    pub name: String,
    pub rep_type: RepType,
    pub values: Vec<Value>,
}

impl TraceColumn {
    pub fn new(name: impl Into<String>, rep_type: RepType, values: Vec<Value>) -> Self {
        Self {
            name: name.into(),
            rep_type,
            values,
        }
    }

    /// Converts a Polars column, coercing every cell to the column's
    /// representation type.
    pub fn from_column(column: &Column) -> Result<Self> {
        let rep_type = RepType::of_column(column)?;
        let mut values = Vec::with_capacity(column.len());
        for idx in 0..column.len() {
            let cell = column.get(idx)?;
            let value = Value::coerce(rep_type, cell).ok_or_else(|| {
                ModelError::MalformedInput(format!(
                    "row {idx} of column '{}' does not fit type {}",
                    column.name(),
                    rep_type.as_str()
                ))
            })?;
            values.push(value);
        }
        Ok(Self::new(column.name().as_str(), rep_type, values))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Number of values that are not missing.
    pub fn present_count(&self) -> usize {
        self.values.iter().filter(|v| !v.is_missing()).count()
    }
}

/// Named columns of equal height, in insertion order.
///
/// The height is fixed at construction so that derived tables stay aligned
/// row for row with the table they were derived from.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TraceTable {
    height: usize,
    columns: IndexMap<String, TraceColumn>,
}

impl TraceTable {
    /// Creates an empty table whose columns must all have `height` rows.
    pub fn new(height: usize) -> Self {
        Self {
            height,
            columns: IndexMap::new(),
        }
    }

    /// Builds the observed table from a frame.
    pub fn from_frame(df: &DataFrame) -> Result<Self> {
        let mut table = Self::new(df.height());
        for column in df.get_columns() {
            table.push_column(TraceColumn::from_column(column)?)?;
        }
        Ok(table)
    }

    /// Adds a column, rejecting a height mismatch or a repeated name.
    pub fn push_column(&mut self, column: TraceColumn) -> Result<()> {
        if column.len() != self.height {
            return Err(ModelError::MalformedInput(format!(
                "column '{}' has {} rows, expected {}",
                column.name,
                column.len(),
                self.height
            )));
        }
        if self.columns.contains_key(&column.name) {
            return Err(ModelError::DuplicateVariable { name: column.name });
        }
        self.columns.insert(column.name.clone(), column);
        Ok(())
    }

    /// Appends every column of `other`, keeping rows aligned.
    pub fn append(&mut self, other: TraceTable) -> Result<()> {
        if other.width() > 0 && other.height != self.height {
            return Err(ModelError::MalformedInput(format!(
                "cannot align a table of {} rows with one of {} rows",
                other.height, self.height
            )));
        }
        for (_, column) in other.columns {
            self.push_column(column)?;
        }
        Ok(())
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn width(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn column(&self, name: &str) -> Option<&TraceColumn> {
        self.columns.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.columns.contains_key(name)
    }

    pub fn columns(&self) -> impl Iterator<Item = &TraceColumn> {
        self.columns.values()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(String::as_str)
    }
}
