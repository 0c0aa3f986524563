//! Declarations (`.decls`) output.

use std::io::Write;

use anyhow::{Context, Result};
use invar_model::{ProgramPoint, Variable};

use crate::format::{escape_name, ppt_name, value_literal};
use crate::options::{Comparability, EmitOptions};

/// Writes the declarations for `point`: a header, then one block per
/// variable, declared before latent.
pub fn write_decls<W: Write>(
    writer: &mut W,
    point: &ProgramPoint<'_>,
    options: &EmitOptions,
) -> Result<()> {
    point
        .validate()
        .with_context(|| format!("program point {}", point.name))?;

    writeln!(writer, "decl-version {}", options.decl_version)?;
    writeln!(writer, "var-comparability {}", options.comparability)?;
    writeln!(writer)?;
    writeln!(writer, "ppt {}", ppt_name(point.name))?;
    writeln!(writer, "ppt-type point")?;
    for variable in point.variables() {
        write_variable(writer, variable, options)?;
    }
    writeln!(writer)?;
    Ok(())
}

fn write_variable<W: Write>(
    writer: &mut W,
    variable: &Variable,
    options: &EmitOptions,
) -> Result<()> {
    writeln!(writer, "variable {}", escape_name(&variable.name))?;
    writeln!(writer, "  var-kind variable")?;
    writeln!(writer, "  dec-type {}", variable.dec_type)?;
    writeln!(writer, "  rep-type {}", variable.rep_type.rep_name())?;
    if let Some(value) = &variable.constant {
        writeln!(writer, "  constant {}", value_literal(value))?;
    }
    if options.comparability == Comparability::Implicit
        && let Some(group) = variable.comparability
    {
        writeln!(writer, "  comparability {group}")?;
    }
    Ok(())
}

/// Renders the declarations to a string.
pub fn render_decls(point: &ProgramPoint<'_>, options: &EmitOptions) -> Result<String> {
    let mut buf = Vec::new();
    write_decls(&mut buf, point, options)?;
    Ok(String::from_utf8(buf)?)
}
