//! Column matchers and the tag-keyed matcher registry.
//!
//! A [`Matcher`] is a predicate over one column. Matchers are grouped by the
//! tag they assign; a column receives a tag when any matcher registered
//! under it accepts the column.
//!
//! # Example
//!
//! ```ignore
//! use invar_core::{FnMatcher, MatcherRegistry};
//!
//! let mut registry = MatcherRegistry::standard();
//! registry.register(Box::new(FnMatcher::new("shape.ids", "id_suffix", |var, _col| {
//!     Ok(var.name.ends_with("_id"))
//! })));
//! let tags = registry.match_all(&df)?;
//! ```

use std::collections::{BTreeMap, BTreeSet};

use anyhow::Result as AnyResult;
use indexmap::IndexMap;
use invar_model::{RepType, Tag, Variable, tags};
use polars::prelude::{Column, DataFrame};
use tracing::debug;

use crate::error::{PipelineError, Result};

/// Tags assigned to each column, in column order.
pub type MatchedTags = IndexMap<String, BTreeSet<Tag>>;

/// Classification predicate for one tag.
///
/// Implementations must be deterministic; a matcher returning an error
/// aborts the match phase.
pub trait Matcher: Send + Sync {
    /// Tag assigned when the predicate holds.
    fn tag(&self) -> &str;

    /// Name identifying this matcher within its tag.
    fn name(&self) -> &str;

    /// Returns a human-readable description of the matcher.
    fn description(&self) -> &str {
        "Column matcher"
    }

    /// Whether `column`, declared as `variable`, satisfies this tag.
    fn matches(&self, variable: &Variable, column: &Column) -> AnyResult<bool>;
}

/// Matches columns whose representation type is one of a fixed set.
pub struct TypeMatcher {
    tag: &'static str,
    name: &'static str,
    accepts: &'static [RepType],
}

impl TypeMatcher {
    pub const fn new(tag: &'static str, name: &'static str, accepts: &'static [RepType]) -> Self {
        Self { tag, name, accepts }
    }

    pub fn numeric() -> Self {
        Self::new(tags::NUMERIC, "numeric", &[RepType::Integer, RepType::Float])
    }

    pub fn float() -> Self {
        Self::new(tags::NUMERIC_FLOAT, "float", &[RepType::Float])
    }

    pub fn integer() -> Self {
        Self::new(tags::NUMERIC_INTEGER, "integer", &[RepType::Integer])
    }

    pub fn string() -> Self {
        Self::new(tags::STRING, "string", &[RepType::String])
    }
}

impl Matcher for TypeMatcher {
    fn tag(&self) -> &str {
        self.tag
    }

    fn name(&self) -> &str {
        self.name
    }

    fn description(&self) -> &str {
        "Representation type check"
    }

    fn matches(&self, variable: &Variable, _column: &Column) -> AnyResult<bool> {
        Ok(self.accepts.contains(&variable.rep_type))
    }
}

/// Adapts a closure to the [`Matcher`] trait.
pub struct FnMatcher<F> {
    tag: String,
    name: String,
    predicate: F,
}

impl<F> FnMatcher<F>
where
    F: Fn(&Variable, &Column) -> AnyResult<bool> + Send + Sync,
{
    pub fn new(tag: impl Into<String>, name: impl Into<String>, predicate: F) -> Self {
        Self {
            tag: tag.into(),
            name: name.into(),
            predicate,
        }
    }
}

impl<F> Matcher for FnMatcher<F>
where
    F: Fn(&Variable, &Column) -> AnyResult<bool> + Send + Sync,
{
    fn tag(&self) -> &str {
        &self.tag
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        "Function-based matcher"
    }

    fn matches(&self, variable: &Variable, column: &Column) -> AnyResult<bool> {
        (self.predicate)(variable, column)
    }
}

/// Matchers grouped by tag.
///
/// Tags are evaluated in sorted order and matchers within a tag in
/// registration order.
#[derive(Default)]
pub struct MatcherRegistry {
    matchers: BTreeMap<Tag, Vec<Box<dyn Matcher>>>,
}

impl MatcherRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding the four type-based matchers.
    pub fn standard() -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(TypeMatcher::numeric()));
        registry.register(Box::new(TypeMatcher::float()));
        registry.register(Box::new(TypeMatcher::integer()));
        registry.register(Box::new(TypeMatcher::string()));
        registry
    }

    /// Registers a matcher under its tag.
    ///
    /// A matcher with the same name already under that tag is replaced, so
    /// registering twice has no further effect.
    pub fn register(&mut self, matcher: Box<dyn Matcher>) {
        let entries = self.matchers.entry(Tag::from(matcher.tag())).or_default();
        match entries.iter_mut().find(|m| m.name() == matcher.name()) {
            Some(slot) => *slot = matcher,
            None => entries.push(matcher),
        }
    }

    pub fn tags(&self) -> impl Iterator<Item = &Tag> {
        self.matchers.keys()
    }

    pub fn matchers_for(&self, tag: &str) -> &[Box<dyn Matcher>] {
        self.matchers.get(tag).map(Vec::as_slice).unwrap_or(&[])
    }

    /// All matchers, by tag.
    pub fn iter(&self) -> impl Iterator<Item = (&Tag, &dyn Matcher)> {
        self.matchers
            .iter()
            .flat_map(|(tag, entries)| entries.iter().map(move |m| (tag, &**m)))
    }

    /// Number of registered matchers across all tags.
    pub fn len(&self) -> usize {
        self.matchers.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Tags satisfied by one column.
    pub fn match_column(&self, variable: &Variable, column: &Column) -> Result<BTreeSet<Tag>> {
        let mut satisfied = BTreeSet::new();
        for (tag, entries) in &self.matchers {
            for matcher in entries {
                let hit = matcher.matches(variable, column).map_err(|err| {
                    PipelineError::Matcher {
                        tag: tag.clone(),
                        matcher: matcher.name().to_string(),
                        column: variable.name.clone(),
                        source: err.into(),
                    }
                })?;
                if hit {
                    debug!(column = %variable.name, tag = %tag, matcher = matcher.name(), "tagged column");
                    satisfied.insert(tag.clone());
                    break;
                }
            }
        }
        Ok(satisfied)
    }

    /// Tags satisfied by every column of `df`, in column order.
    pub fn match_all(&self, df: &DataFrame) -> Result<MatchedTags> {
        let mut matched = MatchedTags::with_capacity(df.width());
        for column in df.get_columns() {
            let variable = Variable::new(column.name().as_str(), RepType::of_column(column)?);
            let assigned = self.match_column(&variable, column)?;
            matched.insert(variable.name, assigned);
        }
        Ok(matched)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::{IntoColumn, NamedFrom, Series};

    fn test_df() -> DataFrame {
        DataFrame::new(vec![
            Series::new("x".into(), vec![1i64, 2, 3]).into_column(),
            Series::new("w".into(), vec![0.5f64, 1.0, 1.5]).into_column(),
            Series::new("y".into(), vec!["a", "b", "c"]).into_column(),
            Series::new("flag".into(), vec![true, false, true]).into_column(),
        ])
        .unwrap()
    }

    fn tag_names(matched: &MatchedTags, column: &str) -> Vec<String> {
        matched[column].iter().map(ToString::to_string).collect()
    }

    #[test]
    fn standard_matchers_tag_by_type() {
        let matched = MatcherRegistry::standard().match_all(&test_df()).unwrap();
        assert_eq!(
            matched.keys().map(String::as_str).collect::<Vec<_>>(),
            vec!["x", "w", "y", "flag"]
        );
        assert_eq!(
            tag_names(&matched, "x"),
            vec!["type.numeric", "type.numeric.integer"]
        );
        assert_eq!(
            tag_names(&matched, "w"),
            vec!["type.numeric", "type.numeric.float"]
        );
        assert_eq!(tag_names(&matched, "y"), vec!["type.string"]);
        assert!(matched["flag"].is_empty());
    }

    #[test]
    fn registering_twice_is_idempotent() {
        let mut registry = MatcherRegistry::standard();
        let before = registry.match_all(&test_df()).unwrap();
        registry.register(Box::new(TypeMatcher::numeric()));
        registry.register(Box::new(TypeMatcher::string()));
        assert_eq!(registry.len(), 4);
        assert_eq!(registry.match_all(&test_df()).unwrap(), before);
    }

    #[test]
    fn matchers_under_one_tag_are_or_combined() {
        let mut registry = MatcherRegistry::new();
        registry.register(Box::new(FnMatcher::new("shape.named", "starts_x", |v, _| {
            Ok(v.name.starts_with('x'))
        })));
        registry.register(Box::new(FnMatcher::new("shape.named", "starts_y", |v, _| {
            Ok(v.name.starts_with('y'))
        })));
        assert_eq!(registry.matchers_for("shape.named").len(), 2);

        let matched = registry.match_all(&test_df()).unwrap();
        assert_eq!(tag_names(&matched, "x"), vec!["shape.named"]);
        assert_eq!(tag_names(&matched, "y"), vec!["shape.named"]);
        assert!(matched["w"].is_empty());
    }

    #[test]
    fn matcher_errors_propagate() {
        let mut registry = MatcherRegistry::new();
        registry.register(Box::new(FnMatcher::new("broken", "always_fails", |_, _| {
            anyhow::bail!("cannot classify")
        })));
        let err = registry.match_all(&test_df()).unwrap_err();
        match err {
            PipelineError::Matcher {
                tag,
                matcher,
                column,
                ..
            } => {
                assert_eq!(tag.as_str(), "broken");
                assert_eq!(matcher, "always_fails");
                assert_eq!(column, "x");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn empty_registry_tags_nothing() {
        let registry = MatcherRegistry::new();
        assert!(registry.is_empty());
        let matched = registry.match_all(&test_df()).unwrap();
        assert!(matched.values().all(BTreeSet::is_empty));
    }
}
