//! Trace pipeline: builds variables from a dataset, tags its columns and
//! expands tagged columns into latent variables.
//!
//! # Phases
//!
//! A pipeline starts in [`Phase::Loaded`]. [`TracePipeline::match_columns`]
//! moves it to [`Phase::Matched`] and [`TracePipeline::expand`] to
//! [`Phase::Expanded`]. Each phase runs at most once and in that order;
//! expanding straight from `Loaded` is allowed and produces nothing. A phase
//! that fails is still consumed.
//!
//! Expansion is not transactional across columns: when a column fails, latent
//! variables already committed for earlier columns are kept, while nothing
//! from the failing column is.
//!
//! # Example
//!
//! ```ignore
//! let mut pipeline = TracePipeline::standard("data", df)?;
//! pipeline.run()?;
//! let point = pipeline.program_point();
//! ```

use std::collections::BTreeSet;
use std::fmt;
use std::time::Instant;

use invar_model::{
    ModelError, ProgramPoint, RepType, Tag, TraceTable, Variable, VariableSet,
    variables_from_frame,
};
use polars::prelude::DataFrame;
use serde::Serialize;
use tracing::{debug, info, info_span, warn};

use crate::error::{PipelineError, Result};
use crate::expander::{ExpanderRegistry, LatentOutput};
use crate::matcher::{MatchedTags, MatcherRegistry};

/// Pipeline progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Loaded,
    Matched,
    Expanded,
}

impl Phase {
    pub fn as_str(self) -> &'static str {
        match self {
            Phase::Loaded => "loaded",
            Phase::Matched => "matched",
            Phase::Expanded => "expanded",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Owns a dataset together with its declared and latent variables.
pub struct TracePipeline {
    name: String,
    frame: DataFrame,
    matchers: MatcherRegistry,
    expanders: ExpanderRegistry,
    declared: VariableSet,
    observed: TraceTable,
    latent: VariableSet,
    latent_traces: TraceTable,
    matched: MatchedTags,
    phase: Phase,
}

impl TracePipeline {
    /// Builds declared variables and observed traces from `frame`.
    ///
    /// Each column gets its own comparability group, numbered from 1 in
    /// column order; latent variables later join their source column's
    /// group. Fails before anything is exposed when a column has no
    /// representation type or a cell does not fit its column's type.
    pub fn new(
        name: impl Into<String>,
        frame: DataFrame,
        matchers: MatcherRegistry,
        expanders: ExpanderRegistry,
    ) -> Result<Self> {
        let declared = grouped(variables_from_frame(&frame)?)?;
        let observed = TraceTable::from_frame(&frame)?;
        let latent_traces = TraceTable::new(observed.height());
        Ok(Self {
            name: name.into(),
            frame,
            matchers,
            expanders,
            declared,
            observed,
            latent: VariableSet::new(),
            latent_traces,
            matched: MatchedTags::new(),
            phase: Phase::Loaded,
        })
    }

    /// Pipeline using the standard matchers and expanders.
    pub fn standard(name: impl Into<String>, frame: DataFrame) -> Result<Self> {
        Self::new(
            name,
            frame,
            MatcherRegistry::standard(),
            ExpanderRegistry::standard(),
        )
    }

    /// Runs both phases.
    pub fn run(&mut self) -> Result<()> {
        self.match_columns()?;
        self.expand()
    }

    /// Tags every column.
    pub fn match_columns(&mut self) -> Result<&MatchedTags> {
        if self.phase != Phase::Loaded {
            return Err(PipelineError::PhaseOrder {
                operation: "match columns",
                phase: self.phase,
            });
        }
        self.phase = Phase::Matched;

        let span = info_span!("match", program_point = %self.name);
        let _guard = span.enter();
        let start = Instant::now();

        let mut matched = MatchedTags::with_capacity(self.frame.width());
        for column in self.frame.get_columns() {
            let variable = declared_variable(&self.declared, column.name().as_str())?;
            let assigned = self.matchers.match_column(variable, column)?;
            matched.insert(variable.name.clone(), assigned);
        }
        self.matched = matched;

        info!(
            columns = self.matched.len(),
            tagged = self.matched.values().filter(|t| !t.is_empty()).count(),
            matchers = self.matchers.len(),
            duration_ms = start.elapsed().as_millis(),
            "match complete"
        );
        Ok(&self.matched)
    }

    /// Runs the expanders for every tagged column and commits their output.
    pub fn expand(&mut self) -> Result<()> {
        if self.phase == Phase::Expanded {
            return Err(PipelineError::PhaseOrder {
                operation: "expand",
                phase: self.phase,
            });
        }
        self.phase = Phase::Expanded;

        let span = info_span!("expand", program_point = %self.name);
        let _guard = span.enter();
        let start = Instant::now();

        for column in self.frame.get_columns() {
            let name = column.name().as_str();
            let Some(assigned) = self.matched.get(name).filter(|t| !t.is_empty()) else {
                continue;
            };
            if column.len() == 0 {
                warn!(column = name, "tagged column has no rows");
            }
            let variable = declared_variable(&self.declared, name)?;
            let output = self.expanders.expand(variable, column, assigned)?;
            commit(
                &self.declared,
                &mut self.latent,
                &mut self.latent_traces,
                name,
                output,
            )?;
        }

        info!(
            latent = self.latent.len(),
            constants = self.latent.constants().count(),
            latent_columns = self.latent_traces.width(),
            expanders = self.expanders.len(),
            duration_ms = start.elapsed().as_millis(),
            "expand complete"
        );
        Ok(())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn frame(&self) -> &DataFrame {
        &self.frame
    }

    /// All variables, declared then latent.
    pub fn variables(&self) -> impl Iterator<Item = &Variable> {
        self.declared.iter().chain(self.latent.iter())
    }

    pub fn variable(&self, name: &str) -> Option<&Variable> {
        self.declared.get(name).or_else(|| self.latent.get(name))
    }

    pub fn declared(&self) -> &VariableSet {
        &self.declared
    }

    pub fn latent(&self) -> &VariableSet {
        &self.latent
    }

    pub fn observed(&self) -> &TraceTable {
        &self.observed
    }

    pub fn latent_traces(&self) -> &TraceTable {
        &self.latent_traces
    }

    pub fn matched_tags(&self) -> &MatchedTags {
        &self.matched
    }

    pub fn tags_for(&self, column: &str) -> Option<&BTreeSet<Tag>> {
        self.matched.get(column)
    }

    pub fn matchers(&self) -> &MatcherRegistry {
        &self.matchers
    }

    pub fn expanders(&self) -> &ExpanderRegistry {
        &self.expanders
    }

    /// Read-only view handed to the emitters.
    pub fn program_point(&self) -> ProgramPoint<'_> {
        ProgramPoint::new(
            &self.name,
            &self.declared,
            &self.latent,
            &self.observed,
            &self.latent_traces,
        )
    }

    /// Counts and per-column details for reporting.
    pub fn summary(&self) -> PipelineSummary {
        let columns = self
            .observed
            .columns()
            .map(|column| ColumnSummary {
                column: column.name.clone(),
                rep_type: column.rep_type,
                tags: self
                    .tags_for(&column.name)
                    .map(|tags| tags.iter().cloned().collect())
                    .unwrap_or_default(),
                present: column.present_count(),
                missing: column.len() - column.present_count(),
            })
            .collect();
        PipelineSummary {
            name: self.name.clone(),
            phase: self.phase,
            records: self.observed.height(),
            declared: self.declared.len(),
            latent: self.latent.len(),
            constants: self.latent.constants().count(),
            latent_columns: self.latent_traces.width(),
            columns,
        }
    }
}

fn grouped(declared: VariableSet) -> Result<VariableSet> {
    let mut set = VariableSet::new();
    for (index, variable) in declared.iter().enumerate() {
        let group = i32::try_from(index + 1).unwrap_or(i32::MAX);
        set.insert(variable.clone().with_comparability(group))?;
    }
    Ok(set)
}

fn declared_variable<'a>(declared: &'a VariableSet, name: &str) -> Result<&'a Variable> {
    declared.get(name).ok_or_else(|| {
        ModelError::MalformedInput(format!("column '{name}' has no declared variable")).into()
    })
}

/// Adds one column's latent output, rejecting names already in use.
///
/// Names are checked before anything is inserted so a rejected column leaves
/// no trace.
fn commit(
    declared: &VariableSet,
    latent: &mut VariableSet,
    latent_traces: &mut TraceTable,
    source: &str,
    output: LatentOutput,
) -> Result<()> {
    for name in output.variables.names() {
        if declared.contains(name) || latent.contains(name) {
            return Err(ModelError::DuplicateLatentName {
                name: name.to_string(),
                column: source.to_string(),
            }
            .into());
        }
    }
    let group = declared.get(source).and_then(|v| v.comparability);
    for variable in &output.variables {
        let variable = match (variable.comparability, group) {
            (None, Some(group)) => variable.clone().with_comparability(group),
            _ => variable.clone(),
        };
        debug!(
            column = source,
            variable = %variable.name,
            constant = variable.is_constant(),
            "latent variable"
        );
        latent.insert(variable)?;
    }
    latent_traces.append(output.traces)?;
    Ok(())
}

/// Per-column line of a [`PipelineSummary`].
#[derive(Debug, Clone, Serialize)]
pub struct ColumnSummary {
    pub column: String,
    pub rep_type: RepType,
    pub tags: Vec<Tag>,
    pub present: usize,
    pub missing: usize,
}

/// Counts describing a pipeline run.
#[derive(Debug, Clone, Serialize)]
pub struct PipelineSummary {
    pub name: String,
    pub phase: Phase,
    pub records: usize,
    pub declared: usize,
    pub latent: usize,
    pub constants: usize,
    pub latent_columns: usize,
    pub columns: Vec<ColumnSummary>,
}
