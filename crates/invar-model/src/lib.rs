//! Data model for invariant-detection traces.
//!
//! Maps Polars column types to Daikon representation types, and holds the
//! variables and row-aligned value tables a dataset is turned into.

pub mod error;
pub mod program_point;
pub mod rep_type;
pub mod tag;
pub mod trace;
pub mod value;
pub mod variable;

pub use error::{ModelError, Result};
pub use program_point::ProgramPoint;
pub use rep_type::RepType;
pub use tag::{Tag, tags};
pub use trace::{TraceColumn, TraceTable};
pub use value::{NONSENSICAL, Value};
pub use variable::{Variable, VariableSet, constants_from_frame, variables_from_frame};
