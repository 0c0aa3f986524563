//! Daikon output generation.
//!
//! Renders a [`ProgramPoint`] into the two files Daikon reads:
//!
//! - **Declarations** (`.decls`): one block per variable with its types and,
//!   for constants, its value
//! - **Traces** (`.dtrace`): one record per dataset row

mod decls;
mod dtrace;
mod format;
mod options;

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use invar_model::ProgramPoint;
use tracing::info;

pub use decls::{render_decls, write_decls};
pub use dtrace::{render_dtrace, write_dtrace};
pub use format::{
    MODBIT_MISSING, MODBIT_PRESENT, POINT_SUFFIX, escape_name, modbit, ppt_name, quote_string,
    value_literal,
};
pub use options::{Comparability, EmitOptions};

/// Writes the declarations and trace files, creating parent directories.
pub fn write_outputs(
    decls_path: &Path,
    dtrace_path: &Path,
    point: &ProgramPoint<'_>,
    options: &EmitOptions,
) -> Result<()> {
    write_file(decls_path, |writer| write_decls(writer, point, options))?;
    write_file(dtrace_path, |writer| write_dtrace(writer, point, options))?;
    info!(
        program_point = point.name,
        decls = %decls_path.display(),
        dtrace = %dtrace_path.display(),
        records = point.record_count(),
        "wrote outputs"
    );
    Ok(())
}

fn write_file(
    path: &Path,
    write: impl FnOnce(&mut BufWriter<File>) -> Result<()>,
) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).with_context(|| format!("create {}", parent.display()))?;
    }
    let file = File::create(path).with_context(|| format!("create {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    write(&mut writer).with_context(|| format!("write {}", path.display()))?;
    writer
        .flush()
        .with_context(|| format!("flush {}", path.display()))?;
    Ok(())
}
