use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// How variables are grouped for comparison by the consumer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Comparability {
    /// Every variable is comparable to every other.
    #[default]
    None,
    /// Variables compare only within their `comparability` group.
    Implicit,
}

impl Comparability {
    pub fn as_str(self) -> &'static str {
        match self {
            Comparability::None => "none",
            Comparability::Implicit => "implicit",
        }
    }
}

impl fmt::Display for Comparability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Comparability {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "none" => Ok(Comparability::None),
            "implicit" => Ok(Comparability::Implicit),
            other => Err(format!("Unknown comparability mode: {other}")),
        }
    }
}

/// Options for declaration and trace output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmitOptions {
    /// Value of the `decl-version` header.
    pub decl_version: String,
    pub comparability: Comparability,
    /// Write a `//` comment naming the program point at the top of the trace.
    pub header_comment: bool,
}

impl Default for EmitOptions {
    fn default() -> Self {
        Self {
            decl_version: "2.0".to_string(),
            comparability: Comparability::None,
            header_comment: true,
        }
    }
}

impl EmitOptions {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_decl_version(mut self, version: impl Into<String>) -> Self {
        self.decl_version = version.into();
        self
    }

    #[must_use]
    pub fn with_comparability(mut self, comparability: Comparability) -> Self {
        self.comparability = comparability;
        self
    }

    #[must_use]
    pub fn with_header_comment(mut self, enabled: bool) -> Self {
        self.header_comment = enabled;
        self
    }
}
