use std::borrow::Borrow;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Classification label linking matchers to expanders.
///
/// Tags are dotted strings such as `type.numeric`; nothing interprets the
/// dots, they only group related tags when listed in sorted order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Tag(String);

impl Tag {
    pub fn new(tag: impl Into<String>) -> Self {
        Self(tag.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for Tag {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Tag {
    fn from(tag: &str) -> Self {
        Self(tag.to_string())
    }
}

impl From<String> for Tag {
    fn from(tag: String) -> Self {
        Self(tag)
    }
}

/// Tags assigned by the standard matchers.
pub mod tags {
    pub const NUMERIC: &str = "type.numeric";
    pub const NUMERIC_FLOAT: &str = "type.numeric.float";
    pub const NUMERIC_INTEGER: &str = "type.numeric.integer";
    pub const STRING: &str = "type.string";
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    #[test]
    fn sorted_and_borrowable() {
        let set: BTreeSet<Tag> = [tags::STRING, tags::NUMERIC_INTEGER, tags::NUMERIC]
            .into_iter()
            .map(Tag::from)
            .collect();
        let ordered: Vec<&str> = set.iter().map(Tag::as_str).collect();
        assert_eq!(
            ordered,
            vec!["type.numeric", "type.numeric.integer", "type.string"]
        );
        assert!(set.contains("type.string"));
    }
}
