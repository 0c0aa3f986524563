//! Variables and variable sets.

use std::fmt;

use indexmap::IndexMap;
use indexmap::map::Entry;
use polars::prelude::DataFrame;
use serde::Serialize;

use crate::error::{ModelError, Result};
use crate::rep_type::RepType;
use crate::value::Value;

/// A named variable: an observed column, a derived column, or a constant.
///
/// A variable with `constant` set is declared once and never appears in
/// per-record traces.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Variable {
    pub name: String,
    pub rep_type: RepType,
    /// Declared type; defaults to the representation type's name.
    pub dec_type: String,
    /// Value of a constant variable.
    pub constant: Option<Value>,
    /// Daikon comparability group. Unused unless explicitly set.
    pub comparability: Option<i32>,
}

impl Variable {
    pub fn new(name: impl Into<String>, rep_type: RepType) -> Self {
        Self {
            name: name.into(),
            rep_type,
            dec_type: rep_type.dec_name().to_string(),
            constant: None,
            comparability: None,
        }
    }

    /// Creates a constant variable.
    pub fn constant(name: impl Into<String>, rep_type: RepType, value: Value) -> Self {
        Self::new(name, rep_type).with_constant(value)
    }

    /// Overrides the declared type.
    #[must_use]
    pub fn with_dec_type(mut self, dec_type: impl Into<String>) -> Self {
        self.dec_type = dec_type.into();
        self
    }

    #[must_use]
    pub fn with_constant(mut self, value: Value) -> Self {
        self.constant = Some(value);
        self
    }

    #[must_use]
    pub fn with_comparability(mut self, comparability: i32) -> Self {
        self.comparability = Some(comparability);
        self
    }

    pub fn is_constant(&self) -> bool {
        self.constant.is_some()
    }
}

/// Canonical debug rendering: `var NAME : DEC/REP` or
/// `const NAME : DEC/REP = VALUE`.
impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.constant {
            Some(value) => write!(
                f,
                "const {} : {}/{} = {}",
                self.name, self.dec_type, self.rep_type, value
            ),
            None => write!(f, "var {} : {}/{}", self.name, self.dec_type, self.rep_type),
        }
    }
}

/// Variables keyed by name, in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct VariableSet {
    variables: IndexMap<String, Variable>,
}

impl VariableSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a variable, rejecting a name that is already present.
    pub fn insert(&mut self, variable: Variable) -> Result<()> {
        match self.variables.entry(variable.name.clone()) {
            Entry::Occupied(entry) => Err(ModelError::DuplicateVariable {
                name: entry.key().clone(),
            }),
            Entry::Vacant(entry) => {
                entry.insert(variable);
                Ok(())
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&Variable> {
        self.variables.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.variables.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.variables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Variable> {
        self.variables.values()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.variables.keys().map(String::as_str)
    }

    pub fn constants(&self) -> impl Iterator<Item = &Variable> {
        self.iter().filter(|v| v.is_constant())
    }

    pub fn non_constants(&self) -> impl Iterator<Item = &Variable> {
        self.iter().filter(|v| !v.is_constant())
    }
}

impl<'a> IntoIterator for &'a VariableSet {
    type Item = &'a Variable;
    type IntoIter = indexmap::map::Values<'a, String, Variable>;

    fn into_iter(self) -> Self::IntoIter {
        self.variables.values()
    }
}

/// Builds one plain variable per column, from the frame's schema alone.
pub fn variables_from_frame(df: &DataFrame) -> Result<VariableSet> {
    let mut set = VariableSet::new();
    for column in df.get_columns() {
        let rep_type = RepType::of_column(column)?;
        set.insert(Variable::new(column.name().as_str(), rep_type))?;
    }
    Ok(set)
}

/// Builds one constant per column, valued from the frame's first row.
///
/// Used for derived scalars, which arrive as a one-row frame. A frame with
/// columns but no rows has nothing to take values from and is rejected.
pub fn constants_from_frame(df: &DataFrame) -> Result<VariableSet> {
    let mut set = VariableSet::new();
    if df.width() == 0 {
        return Ok(set);
    }
    if df.height() == 0 {
        return Err(ModelError::MalformedInput(
            "constant frame has columns but no rows".to_string(),
        ));
    }
    for column in df.get_columns() {
        let rep_type = RepType::of_column(column)?;
        let cell = column.get(0)?;
        let value = Value::coerce(rep_type, cell).ok_or_else(|| {
            ModelError::MalformedInput(format!(
                "constant '{}' does not fit type {}",
                column.name(),
                rep_type.as_str()
            ))
        })?;
        set.insert(Variable::constant(column.name().as_str(), rep_type, value))?;
    }
    Ok(set)
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::{Column, IntoColumn, NamedFrom, Series};

    fn frame(columns: Vec<Column>) -> DataFrame {
        DataFrame::new(columns).unwrap()
    }

    #[test]
    fn display_variable_and_constant() {
        let var = Variable::new("x", RepType::Integer);
        assert_eq!(var.to_string(), "var x : int/int");

        let konst = Variable::constant("x_mean", RepType::Float, Value::Float(2.0));
        assert_eq!(konst.to_string(), "const x_mean : double/double = 2.0");

        let custom = Variable::new("label", RepType::String).with_dec_type("Label");
        assert_eq!(custom.to_string(), "var label : Label/java.lang.String");
    }

    #[test]
    fn missing_constant_is_still_constant() {
        let var = Variable::constant("x_std", RepType::Float, Value::Missing);
        assert!(var.is_constant());
        assert_eq!(var.to_string(), "const x_std : double/double = nonsensical");
    }

    #[test]
    fn set_rejects_duplicates() {
        let mut set = VariableSet::new();
        set.insert(Variable::new("a", RepType::Integer)).unwrap();
        let err = set.insert(Variable::new("a", RepType::String)).unwrap_err();
        assert!(matches!(err, ModelError::DuplicateVariable { name } if name == "a"));
        assert_eq!(set.len(), 1);
        assert_eq!(set.get("a").unwrap().rep_type, RepType::Integer);
    }

    #[test]
    fn set_preserves_insertion_order() {
        let mut set = VariableSet::new();
        for name in ["z", "a", "m"] {
            set.insert(Variable::new(name, RepType::Float)).unwrap();
        }
        assert_eq!(set.names().collect::<Vec<_>>(), vec!["z", "a", "m"]);
    }

    #[test]
    fn variables_follow_column_order() {
        let df = frame(vec![
            Series::new("x".into(), vec![1i64, 2, 3]).into_column(),
            Series::new("y".into(), vec!["a", "b", "c"]).into_column(),
        ]);
        let set = variables_from_frame(&df).unwrap();
        let rendered: Vec<String> = set.iter().map(ToString::to_string).collect();
        assert_eq!(
            rendered,
            vec!["var x : int/int", "var y : java.lang.String/java.lang.String"]
        );
        assert_eq!(set.constants().count(), 0);
    }

    #[test]
    fn constants_take_first_row() {
        let df = frame(vec![
            Series::new("x_count".into(), vec![3i64]).into_column(),
            Series::new("x_mean".into(), vec![Some(2.0f64)]).into_column(),
            Series::new("x_std".into(), vec![None::<f64>]).into_column(),
        ]);
        let set = constants_from_frame(&df).unwrap();
        assert_eq!(set.get("x_count").unwrap().constant, Some(Value::Integer(3)));
        assert_eq!(set.get("x_mean").unwrap().constant, Some(Value::Float(2.0)));
        assert_eq!(set.get("x_std").unwrap().constant, Some(Value::Missing));
        assert_eq!(set.non_constants().count(), 0);
    }

    #[test]
    fn constants_from_empty_frames() {
        assert!(constants_from_frame(&DataFrame::empty()).unwrap().is_empty());

        let no_rows = frame(vec![Series::new("x_min".into(), Vec::<i64>::new()).into_column()]);
        assert!(matches!(
            constants_from_frame(&no_rows),
            Err(ModelError::MalformedInput(_))
        ));
    }

    #[test]
    fn unsupported_column_aborts() {
        let df = frame(vec![
            Series::new("x".into(), vec![1i64]).into_column(),
            Series::new_null("nothing".into(), 1).into_column(),
        ]);
        assert!(matches!(
            variables_from_frame(&df),
            Err(ModelError::UnsupportedType { .. })
        ));
    }
}
