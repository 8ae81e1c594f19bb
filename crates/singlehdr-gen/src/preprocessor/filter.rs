//! Include Filter
//!
//! Selects angle-bracket includes that must not survive amalgamation,
//! typically the library's own public headers referenced by their
//! installed path.

use regex::Regex;
use singlehdr_core::{Error, Result};

/// Set of patterns matched against the start of an included path
#[derive(Debug, Clone, Default)]
pub struct IncludeFilter {
    patterns: Vec<Regex>,
}

impl IncludeFilter {
    /// Compile the given patterns
    ///
    /// Each pattern is a regex anchored at the start of the path, so a plain
    /// directory name such as `ImageApprovals/` acts as a prefix.
    pub fn new<S: AsRef<str>>(patterns: &[S]) -> Result<Self> {
        let patterns = patterns
            .iter()
            .map(|pattern| {
                let pattern = pattern.as_ref();
                Regex::new(&format!("^(?:{})", pattern)).map_err(|e| Error::InvalidPattern {
                    pattern: pattern.to_string(),
                    message: e.to_string(),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { patterns })
    }

    /// Filter that strips nothing
    pub fn none() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Whether an include of `path` should be removed
    pub fn matches(&self, path: &str) -> bool {
        self.patterns.iter().any(|re| re.is_match(path))
    }
}
