//! Read-only view of a finished dataset, as handed to the emitter.

use crate::error::{ModelError, Result};
use crate::trace::{TraceColumn, TraceTable};
use crate::variable::{Variable, VariableSet};

/// A program point: its name, variables and traces.
///
/// Declared variables and observed traces come first, latent ones after;
/// emitters rely on that grouping for reproducible output.
#[derive(Debug, Clone, Copy)]
pub struct ProgramPoint<'a> {
    pub name: &'a str,
    pub declared: &'a VariableSet,
    pub latent: &'a VariableSet,
    pub observed: &'a TraceTable,
    pub latent_traces: &'a TraceTable,
}

impl<'a> ProgramPoint<'a> {
    pub fn new(
        name: &'a str,
        declared: &'a VariableSet,
        latent: &'a VariableSet,
        observed: &'a TraceTable,
        latent_traces: &'a TraceTable,
    ) -> Self {
        Self {
            name,
            declared,
            latent,
            observed,
            latent_traces,
        }
    }

    /// All variables, declared then latent.
    pub fn variables(&self) -> impl Iterator<Item = &'a Variable> + 'a {
        self.declared.iter().chain(self.latent.iter())
    }

    /// All trace columns, observed then latent.
    pub fn trace_columns(&self) -> impl Iterator<Item = &'a TraceColumn> + 'a {
        self.observed.columns().chain(self.latent_traces.columns())
    }

    /// Number of records in the trace.
    pub fn record_count(&self) -> usize {
        self.observed.height()
    }

    /// Checks that every non-constant variable has exactly one trace column
    /// of its type and that constants have none and hold a value of their
    /// type.
    pub fn validate(&self) -> Result<()> {
        if !self.latent_traces.is_empty() && self.latent_traces.height() != self.observed.height()
        {
            return Err(ModelError::MalformedInput(format!(
                "latent traces have {} rows, observed traces have {}",
                self.latent_traces.height(),
                self.observed.height()
            )));
        }
        for variable in self.variables() {
            let column = self
                .observed
                .column(&variable.name)
                .or_else(|| self.latent_traces.column(&variable.name));
            match (variable.is_constant(), column) {
                (true, Some(_)) => {
                    return Err(ModelError::MalformedInput(format!(
                        "constant '{}' also has per-record values",
                        variable.name
                    )));
                }
                (false, None) => {
                    return Err(ModelError::MalformedInput(format!(
                        "variable '{}' has no trace column",
                        variable.name
                    )));
                }
                (true, None) => {
                    if let Some(found) = variable.constant.as_ref().and_then(|v| v.rep_type())
                        && found != variable.rep_type
                    {
                        return Err(ModelError::MalformedInput(format!(
                            "constant '{}' holds a {} value, variable is {}",
                            variable.name,
                            found.as_str(),
                            variable.rep_type.as_str()
                        )));
                    }
                }
                (false, Some(column)) if column.rep_type != variable.rep_type => {
                    return Err(ModelError::MalformedInput(format!(
                        "trace column '{}' is {}, variable is {}",
                        column.name,
                        column.rep_type.as_str(),
                        variable.rep_type.as_str()
                    )));
                }
                _ => {}
            }
        }
        let traced = self.trace_columns().count();
        let visible = self.variables().filter(|v| !v.is_constant()).count();
        if traced != visible {
            return Err(ModelError::MalformedInput(format!(
                "{traced} trace columns for {visible} non-constant variables"
            )));
        }
        Ok(())
    }
}
