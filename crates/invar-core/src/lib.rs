//! Column classification and latent-variable expansion.
//!
//! Matchers tag the columns of a dataset, expanders turn tagged columns into
//! latent variables, and [`TracePipeline`] runs both over one dataset.

pub mod error;
pub mod expander;
pub mod matcher;
pub mod pipeline;
pub mod statistics;

pub use error::{BoxError, PipelineError, Result};
pub use expander::{Expander, ExpanderRegistry, Expansion, FnExpander, LatentOutput};
pub use matcher::{FnMatcher, MatchedTags, Matcher, MatcherRegistry, TypeMatcher};
pub use pipeline::{ColumnSummary, Phase, PipelineSummary, TracePipeline};
pub use statistics::{ColumnStats, STATISTICS, StatisticsExpander, quantile};
