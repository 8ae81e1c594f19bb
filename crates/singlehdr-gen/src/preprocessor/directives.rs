//! Directive Scanner
//!
//! Line-oriented matching of the few preprocessor directives the amalgamator
//! cares about. Every pattern is anchored at the start of a single line; there
//! is no awareness of comments, continuation lines or conditional blocks.

use regex::Regex;
use tracing::warn;

/// Matches inclusion guards and include directives on single lines
pub struct DirectiveScanner {
    ifndef: Regex,
    local_include: Regex,
    system_include: Regex,
}

impl DirectiveScanner {
    /// Create a scanner with the default directive patterns
    pub fn new() -> Self {
        Self {
            ifndef: Regex::new(r"^#ifndef ([A-Za-z0-9_]*)").unwrap(),
            local_include: Regex::new(r#"^#include "([A-Za-z0-9_./]*)""#).unwrap(),
            system_include: Regex::new(r"^#include <([A-Za-z0-9_./]*)>").unwrap(),
        }
    }

    /// Macro named by an `#ifndef` line
    pub fn guard_name<'a>(&self, line: &'a str) -> Option<&'a str> {
        self.ifndef
            .captures(line)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str())
    }

    /// Path of a quoted `#include "..."` line
    pub fn local_include<'a>(&self, line: &'a str) -> Option<&'a str> {
        self.local_include
            .captures(line)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str())
    }

    /// Path of an angle-bracket `#include <...>` line
    pub fn system_include<'a>(&self, line: &'a str) -> Option<&'a str> {
        self.system_include
            .captures(line)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str())
    }

    /// Lines between a well-formed inclusion guard
    ///
    /// The guard is well-formed when the first line is `#ifndef NAME`, the
    /// second is exactly `#define NAME` and the last starts with `#endif`.
    /// Returns `None` when the lines are not wrapped in such a guard.
    pub fn strip_guard<'l, 'a>(&self, lines: &'l [&'a str]) -> Option<&'l [&'a str]> {
        if lines.len() < 3 {
            return None;
        }

        let name = self.guard_name(lines[0])?;
        let define = lines[1].trim();
        let last = lines[lines.len() - 1].trim();

        if define == format!("#define {}", name) && last.starts_with("#endif") {
            Some(&lines[2..lines.len() - 1])
        } else {
            warn!("Leaving unmatched guard '{}' in place", name);
            None
        }
    }
}

impl Default for DirectiveScanner {
    fn default() -> Self {
        Self::new()
    }
}
