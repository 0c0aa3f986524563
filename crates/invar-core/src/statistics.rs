//! Descriptive statistics expander.
//!
//! For a numeric column `x` this derives the constants `x_count`, `x_mean`,
//! `x_std`, `x_min`, `x_p25`, `x_p50`, `x_p75` and `x_max`. Missing cells are
//! skipped; statistics that are undefined for the remaining values are null
//! and end up as missing constants.

use anyhow::{Result, bail};
use invar_common::{any_to_f64, any_to_i64};
use invar_model::{RepType, Variable, tags};
use polars::prelude::{Column, DataFrame, IntoColumn, NamedFrom, Series};

use crate::expander::{Expander, Expansion};

/// Statistic suffixes, in output order.
pub const STATISTICS: [&str; 8] = ["count", "mean", "std", "min", "p25", "p50", "p75", "max"];

/// Summary of the non-missing values of one column.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ColumnStats {
    pub count: usize,
    pub mean: Option<f64>,
    /// Sample standard deviation (n - 1 denominator).
    pub std: Option<f64>,
    pub p25: Option<f64>,
    pub p50: Option<f64>,
    pub p75: Option<f64>,
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl ColumnStats {
    /// Computes statistics over `values`, ignoring NaN.
    pub fn from_values(values: &[f64]) -> Self {
        let mut sorted: Vec<f64> = values.iter().copied().filter(|v| !v.is_nan()).collect();
        sorted.sort_by(f64::total_cmp);

        let count = sorted.len();
        if count == 0 {
            return Self::default();
        }

        // Welford's algorithm for stable mean and variance
        let mut mean = 0.0;
        let mut m2 = 0.0;
        for (idx, value) in sorted.iter().enumerate() {
            let delta = value - mean;
            mean += delta / (idx + 1) as f64;
            m2 += delta * (value - mean);
        }
        let std = (count > 1).then(|| (m2 / (count - 1) as f64).sqrt());

        Self {
            count,
            mean: Some(mean).filter(|m| !m.is_nan()),
            std: std.filter(|s| !s.is_nan()),
            p25: quantile(&sorted, 0.25),
            p50: quantile(&sorted, 0.5),
            p75: quantile(&sorted, 0.75),
            min: sorted.first().copied(),
            max: sorted.last().copied(),
        }
    }
}

/// Quantile of sorted values, interpolating linearly between closest ranks.
pub fn quantile(sorted: &[f64], q: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let pos = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lower = pos.floor() as usize;
    let upper = pos.ceil() as usize;
    let low = sorted[lower];
    let high = sorted[upper];
    if lower == upper || low == high {
        return Some(low);
    }
    let value = low + (high - low) * (pos - lower as f64);
    Some(value).filter(|v| !v.is_nan())
}

/// Expander deriving descriptive statistics for numeric columns.
pub struct StatisticsExpander;

impl StatisticsExpander {
    pub const NAME: &'static str = "statistics";
}

impl Expander for StatisticsExpander {
    fn tag(&self) -> &str {
        tags::NUMERIC
    }

    fn name(&self) -> &str {
        Self::NAME
    }

    fn description(&self) -> &str {
        "Count, mean, std, min, quartiles and max as constants"
    }

    fn expand(&self, variable: &Variable, column: &Column) -> Result<Expansion> {
        if !variable.rep_type.is_numeric() {
            bail!(
                "column '{}' is {}, not numeric",
                variable.name,
                variable.rep_type.as_str()
            );
        }

        let mut values = Vec::with_capacity(column.len());
        let mut integers = Vec::new();
        for idx in 0..column.len() {
            let cell = column.get(idx)?;
            if let Some(v) = any_to_f64(cell.clone()) {
                values.push(v);
            }
            if variable.rep_type == RepType::Integer
                && let Some(v) = any_to_i64(cell)
            {
                integers.push(v);
            }
        }
        let stats = ColumnStats::from_values(&values);

        let name = |stat: &str| format!("{}_{stat}", variable.name);
        let float = |stat: &str, value: Option<f64>| {
            Series::new(name(stat).into(), [value]).into_column()
        };
        let bound = |stat: &str, float_value: Option<f64>, int_value: Option<i64>| {
            if variable.rep_type == RepType::Integer {
                Series::new(name(stat).into(), [int_value]).into_column()
            } else {
                float(stat, float_value)
            }
        };

        let count = i64::try_from(stats.count)?;
        let constants = DataFrame::new(vec![
            Series::new(name("count").into(), [count]).into_column(),
            float("mean", stats.mean),
            float("std", stats.std),
            bound("min", stats.min, integers.iter().copied().min()),
            float("p25", stats.p25),
            float("p50", stats.p50),
            float("p75", stats.p75),
            bound("max", stats.max, integers.iter().copied().max()),
        ])?;
        Ok(Expansion::constants(constants))
    }
}
