//! Pipeline error types.

use invar_model::{ModelError, Tag};
use thiserror::Error;

use crate::pipeline::Phase;

/// Boxed error raised by a matcher or expander.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors raised while matching and expanding a dataset.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum PipelineError {
    /// Type mapping, duplicate names or misaligned data.
    #[error(transparent)]
    Model(#[from] ModelError),

    /// A matcher predicate failed; the original error is kept as the source.
    #[error("matcher '{matcher}' for tag '{tag}' failed on column '{column}'")]
    Matcher {
        tag: Tag,
        matcher: String,
        column: String,
        #[source]
        source: BoxError,
    },

    /// An expander derivation failed; the original error is kept as the source.
    #[error("expander '{expander}' for tag '{tag}' failed on column '{column}'")]
    Expander {
        tag: Tag,
        expander: String,
        column: String,
        #[source]
        source: BoxError,
    },

    /// A phase was run out of order or twice.
    #[error("cannot {operation} in phase {phase}")]
    PhaseOrder {
        operation: &'static str,
        phase: Phase,
    },
}

impl From<polars::error::PolarsError> for PipelineError {
    fn from(err: polars::error::PolarsError) -> Self {
        PipelineError::Model(ModelError::Polars(err))
    }
}

/// Result type for pipeline operations.
pub type Result<T> = std::result::Result<T, PipelineError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_collaborator_error_keeps_source() {
        let source: BoxError = anyhow::anyhow!("bad cell").into();
        let err = PipelineError::Expander {
            tag: Tag::from("type.numeric"),
            expander: "statistics".to_string(),
            column: "x".to_string(),
            source,
        };
        assert_eq!(
            err.to_string(),
            "expander 'statistics' for tag 'type.numeric' failed on column 'x'"
        );
        assert_eq!(err.source().unwrap().to_string(), "bad cell");
    }

    #[test]
    fn test_model_error_is_transparent() {
        let err: PipelineError = ModelError::MalformedInput("ragged".to_string()).into();
        assert_eq!(err.to_string(), "malformed input: ragged");
    }

    #[test]
    fn test_phase_order_display() {
        let err = PipelineError::PhaseOrder {
            operation: "match columns",
            phase: Phase::Expanded,
        };
        assert_eq!(err.to_string(), "cannot match columns in phase expanded");
    }
}
