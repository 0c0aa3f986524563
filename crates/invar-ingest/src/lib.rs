//! Dataset loading: delimited text files into Polars DataFrames.

pub mod csv;
pub mod error;

pub use csv::{CsvOptions, program_point_name, read_csv_frame};
pub use error::{IngestError, Result};
