//! Trace (`.dtrace`) output.

use std::io::Write;

use anyhow::{Context, Result, anyhow};
use invar_model::{ProgramPoint, TraceColumn};

use crate::format::{escape_name, modbit, ppt_name, value_literal};
use crate::options::EmitOptions;

/// Writes one record per row of `point`.
///
/// Each record lists the non-constant variables in declaration order as
/// name, value and modbit lines, followed by a blank line.
pub fn write_dtrace<W: Write>(
    writer: &mut W,
    point: &ProgramPoint<'_>,
    options: &EmitOptions,
) -> Result<()> {
    point
        .validate()
        .with_context(|| format!("program point {}", point.name))?;

    let ppt = ppt_name(point.name);
    let mut columns: Vec<(String, &TraceColumn)> = Vec::new();
    for variable in point.variables().filter(|v| !v.is_constant()) {
        let column = point
            .observed
            .column(&variable.name)
            .or_else(|| point.latent_traces.column(&variable.name))
            .ok_or_else(|| anyhow!("missing trace column {}", variable.name))?;
        columns.push((escape_name(&variable.name), column));
    }

    if options.header_comment {
        writeln!(writer, "// program point {ppt}")?;
        writeln!(writer)?;
    }
    for row in 0..point.record_count() {
        writeln!(writer, "{ppt}")?;
        for (name, column) in &columns {
            let value = &column.values[row];
            writeln!(writer, "{name}")?;
            writeln!(writer, "{}", value_literal(value))?;
            writeln!(writer, "{}", modbit(value))?;
        }
        writeln!(writer)?;
    }
    Ok(())
}

/// Renders the trace to a string.
pub fn render_dtrace(point: &ProgramPoint<'_>, options: &EmitOptions) -> Result<String> {
    let mut buf = Vec::new();
    write_dtrace(&mut buf, point, options)?;
    Ok(String::from_utf8(buf)?)
}
