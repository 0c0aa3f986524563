//! The `trace` command's work: read a dataset, build its variables and
//! write the Daikon files.

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use invar_core::{PipelineSummary, TracePipeline};
use invar_ingest::{CsvOptions, program_point_name, read_csv_frame};
use invar_model::{RepType, Variable};
use invar_output::{EmitOptions, write_outputs};
use serde::Serialize;
use tracing::{info, info_span};

/// Inputs of one trace run.
#[derive(Debug, Clone)]
pub struct TraceRequest {
    pub input: PathBuf,
    /// Program point name; the input's file stem when `None`.
    pub name: Option<String>,
    pub out_decls: Option<PathBuf>,
    pub out_dtrace: Option<PathBuf>,
    pub csv: CsvOptions,
    /// Run the expand phase after matching.
    pub expand: bool,
    pub emit: EmitOptions,
}

impl TraceRequest {
    pub fn new(input: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            name: None,
            out_decls: None,
            out_dtrace: None,
            csv: CsvOptions::default(),
            expand: true,
            emit: EmitOptions::default(),
        }
    }

    pub fn program_point(&self) -> String {
        self.name
            .clone()
            .unwrap_or_else(|| program_point_name(&self.input))
    }

    /// Declarations and trace paths; defaults sit next to the input.
    pub fn output_paths(&self, name: &str) -> (PathBuf, PathBuf) {
        let dir = self.input.parent().unwrap_or(Path::new(""));
        let decls = self
            .out_decls
            .clone()
            .unwrap_or_else(|| dir.join(format!("{name}.decls")));
        let dtrace = self
            .out_dtrace
            .clone()
            .unwrap_or_else(|| dir.join(format!("{name}.dtrace")));
        (decls, dtrace)
    }
}

/// Where a variable came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Origin {
    Declared,
    Latent,
}

impl Origin {
    pub fn as_str(self) -> &'static str {
        match self {
            Origin::Declared => "declared",
            Origin::Latent => "latent",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct VariableReport {
    pub name: String,
    pub origin: Origin,
    pub dec_type: String,
    pub rep_type: RepType,
    /// Rendered constant value, for constants.
    pub constant: Option<String>,
}

impl VariableReport {
    fn new(variable: &Variable, origin: Origin) -> Self {
        Self {
            name: variable.name.clone(),
            origin,
            dec_type: variable.dec_type.clone(),
            rep_type: variable.rep_type,
            constant: variable.constant.as_ref().map(ToString::to_string),
        }
    }
}

/// Outcome of a trace run.
#[derive(Debug, Clone, Serialize)]
pub struct TraceReport {
    pub summary: PipelineSummary,
    pub variables: Vec<VariableReport>,
    pub decls: PathBuf,
    pub dtrace: PathBuf,
}

impl TraceReport {
    fn new(pipeline: &TracePipeline, decls: PathBuf, dtrace: PathBuf) -> Self {
        let declared = pipeline
            .declared()
            .iter()
            .map(|v| VariableReport::new(v, Origin::Declared));
        let latent = pipeline
            .latent()
            .iter()
            .map(|v| VariableReport::new(v, Origin::Latent));
        Self {
            summary: pipeline.summary(),
            variables: declared.chain(latent).collect(),
            decls,
            dtrace,
        }
    }
}

/// Reads the dataset, runs the pipeline and writes both output files.
pub fn run_trace(request: &TraceRequest) -> Result<TraceReport> {
    let name = request.program_point();
    let span = info_span!("trace", program_point = %name, input = %request.input.display());
    let _guard = span.enter();
    let start = Instant::now();

    let frame = read_csv_frame(&request.input, &request.csv)
        .with_context(|| format!("read {}", request.input.display()))?;
    let mut pipeline =
        TracePipeline::standard(name.clone(), frame).context("build declared variables")?;
    pipeline.match_columns().context("match columns")?;
    if request.expand {
        pipeline.expand().context("expand tagged columns")?;
    }

    let (decls, dtrace) = request.output_paths(&name);
    write_outputs(&decls, &dtrace, &pipeline.program_point(), &request.emit)?;

    let report = TraceReport::new(&pipeline, decls, dtrace);
    info!(
        records = report.summary.records,
        variables = report.variables.len(),
        duration_ms = start.elapsed().as_millis(),
        "trace complete"
    );
    Ok(report)
}
