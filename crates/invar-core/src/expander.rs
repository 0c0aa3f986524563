//! Latent-variable expanders and the tag-keyed expander registry.
//!
//! An [`Expander`] derives new variables from one tagged column: constants
//! (one-row frame of named scalars) and per-record latent columns (a frame
//! with the same height as the source column).

use std::collections::{BTreeMap, BTreeSet};

use anyhow::Result as AnyResult;
use invar_model::{
    ModelError, Tag, TraceColumn, TraceTable, Variable, VariableSet, constants_from_frame,
};
use polars::prelude::{Column, DataFrame};
use tracing::debug;

use crate::error::{PipelineError, Result};
use crate::statistics::StatisticsExpander;

/// Raw output of one expander run.
#[derive(Debug, Clone)]
pub struct Expansion {
    /// One-row frame; each column becomes a constant.
    pub constants: DataFrame,
    /// Frame aligned row for row with the source column.
    pub columns: DataFrame,
}

impl Expansion {
    pub fn empty() -> Self {
        Self {
            constants: DataFrame::empty(),
            columns: DataFrame::empty(),
        }
    }

    pub fn constants(constants: DataFrame) -> Self {
        Self {
            constants,
            columns: DataFrame::empty(),
        }
    }

    pub fn columns(columns: DataFrame) -> Self {
        Self {
            constants: DataFrame::empty(),
            columns,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.constants.width() == 0 && self.columns.width() == 0
    }
}

/// Derivation function for one tag.
pub trait Expander: Send + Sync {
    /// Tag whose columns this expander runs on.
    fn tag(&self) -> &str;

    /// Name identifying this expander within its tag.
    fn name(&self) -> &str;

    /// Returns a human-readable description of the expander.
    fn description(&self) -> &str {
        "Column expander"
    }

    /// Derives constants and latent columns from `column`.
    fn expand(&self, variable: &Variable, column: &Column) -> AnyResult<Expansion>;
}

/// Adapts a closure to the [`Expander`] trait.
pub struct FnExpander<F> {
    tag: String,
    name: String,
    derive: F,
}

impl<F> FnExpander<F>
where
    F: Fn(&Variable, &Column) -> AnyResult<Expansion> + Send + Sync,
{
    pub fn new(tag: impl Into<String>, name: impl Into<String>, derive: F) -> Self {
        Self {
            tag: tag.into(),
            name: name.into(),
            derive,
        }
    }
}

impl<F> Expander for FnExpander<F>
where
    F: Fn(&Variable, &Column) -> AnyResult<Expansion> + Send + Sync,
{
    fn tag(&self) -> &str {
        &self.tag
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        "Function-based expander"
    }

    fn expand(&self, variable: &Variable, column: &Column) -> AnyResult<Expansion> {
        (self.derive)(variable, column)
    }
}

/// Merged latent output for one source column.
#[derive(Debug, Clone)]
pub struct LatentOutput {
    pub variables: VariableSet,
    pub traces: TraceTable,
}

impl LatentOutput {
    fn new(height: usize) -> Self {
        Self {
            variables: VariableSet::new(),
            traces: TraceTable::new(height),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }

    fn claim(&self, name: &str, source: &str) -> Result<()> {
        if self.variables.contains(name) {
            return Err(ModelError::DuplicateLatentName {
                name: name.to_string(),
                column: source.to_string(),
            }
            .into());
        }
        Ok(())
    }

    fn merge(&mut self, source: &Column, expansion: &Expansion) -> Result<()> {
        let source_name = source.name().as_str();
        for constant in &constants_from_frame(&expansion.constants)? {
            self.claim(&constant.name, source_name)?;
            self.variables.insert(constant.clone())?;
        }
        for column in expansion.columns.get_columns() {
            let trace = TraceColumn::from_column(column)?;
            if trace.len() != source.len() {
                return Err(ModelError::MalformedInput(format!(
                    "latent column '{}' has {} rows, source column '{}' has {}",
                    trace.name,
                    trace.len(),
                    source_name,
                    source.len()
                ))
                .into());
            }
            self.claim(&trace.name, source_name)?;
            self.variables
                .insert(Variable::new(trace.name.clone(), trace.rep_type))?;
            self.traces.push_column(trace)?;
        }
        Ok(())
    }
}

/// Expanders grouped by tag.
///
/// Tags run in sorted order and expanders within a tag in registration
/// order, which fixes the order of latent variables.
#[derive(Default)]
pub struct ExpanderRegistry {
    expanders: BTreeMap<Tag, Vec<Box<dyn Expander>>>,
}

impl ExpanderRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding the descriptive statistics expander.
    pub fn standard() -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(StatisticsExpander));
        registry
    }

    /// Registers an expander under its tag, replacing one of the same name.
    pub fn register(&mut self, expander: Box<dyn Expander>) {
        let entries = self.expanders.entry(Tag::from(expander.tag())).or_default();
        match entries.iter_mut().find(|e| e.name() == expander.name()) {
            Some(slot) => *slot = expander,
            None => entries.push(expander),
        }
    }

    pub fn tags(&self) -> impl Iterator<Item = &Tag> {
        self.expanders.keys()
    }

    pub fn expanders_for(&self, tag: &str) -> &[Box<dyn Expander>] {
        self.expanders.get(tag).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Tag, &dyn Expander)> {
        self.expanders
            .iter()
            .flat_map(|(tag, entries)| entries.iter().map(move |e| (tag, &**e)))
    }

    pub fn len(&self) -> usize {
        self.expanders.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Runs every expander registered under `tags` on one column and merges
    /// their output.
    ///
    /// Two outputs with the same name fail with `DuplicateLatentName`; latent
    /// columns must match the source column's height.
    pub fn expand(
        &self,
        variable: &Variable,
        column: &Column,
        tags: &BTreeSet<Tag>,
    ) -> Result<LatentOutput> {
        let mut output = LatentOutput::new(column.len());
        for tag in tags {
            for expander in self.expanders_for(tag.as_str()) {
                let expansion =
                    expander
                        .expand(variable, column)
                        .map_err(|err| PipelineError::Expander {
                            tag: tag.clone(),
                            expander: expander.name().to_string(),
                            column: variable.name.clone(),
                            source: err.into(),
                        })?;
                output.merge(column, &expansion)?;
                debug!(
                    column = %variable.name,
                    tag = %tag,
                    expander = expander.name(),
                    constants = expansion.constants.width(),
                    columns = expansion.columns.width(),
                    "expanded column"
                );
            }
        }
        Ok(output)
    }
}
