//! Delimited text loading.

use std::path::{Path, PathBuf};
use std::time::Instant;

use polars::prelude::{CsvReadOptions, DataFrame, SerReader};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{IngestError, Result};

/// Options for reading a delimited file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CsvOptions {
    /// Field separator; inferred from the extension when `None`.
    pub delimiter: Option<u8>,
    /// Rows used for schema inference; `None` scans the whole file.
    pub infer_schema_length: Option<usize>,
}

impl Default for CsvOptions {
    fn default() -> Self {
        Self {
            delimiter: None,
            infer_schema_length: Some(1000),
        }
    }
}

impl CsvOptions {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = Some(delimiter);
        self
    }

    #[must_use]
    pub fn with_infer_schema_length(mut self, rows: Option<usize>) -> Self {
        self.infer_schema_length = rows;
        self
    }

    /// Separator to use for `path`.
    pub fn delimiter_for(&self, path: &Path) -> Result<u8> {
        if let Some(delimiter) = self.delimiter {
            return Ok(delimiter);
        }
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase)
            .unwrap_or_default();
        match extension.as_str() {
            "csv" | "txt" => Ok(b','),
            "tsv" | "tab" => Ok(b'\t'),
            _ => Err(IngestError::UnsupportedExtension {
                path: path.to_path_buf(),
                extension,
            }),
        }
    }
}

/// Reads a delimited file with a header row into a DataFrame.
///
/// Empty fields become nulls.
pub fn read_csv_frame(path: &Path, options: &CsvOptions) -> Result<DataFrame> {
    if !path.is_file() {
        return Err(IngestError::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    let separator = options.delimiter_for(path)?;
    let start = Instant::now();

    let to_parse_error = |err: polars::error::PolarsError| IngestError::CsvParse {
        path: path.to_path_buf(),
        message: err.to_string(),
    };
    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(options.infer_schema_length)
        .map_parse_options(|parse| parse.with_separator(separator))
        .try_into_reader_with_file_path(Some(PathBuf::from(path)))
        .map_err(to_parse_error)?
        .finish()
        .map_err(to_parse_error)?;

    debug!(
        path = %path.display(),
        rows = df.height(),
        columns = df.width(),
        duration_ms = start.elapsed().as_millis(),
        "read dataset"
    );
    Ok(df)
}

/// Program point name for a dataset file: its stem.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use invar_ingest::program_point_name;
///
/// assert_eq!(program_point_name(Path::new("data/sales.csv")), "sales");
/// ```
pub fn program_point_name(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .filter(|stem| !stem.is_empty())
        .unwrap_or_else(|| "dataset".to_string())
}
