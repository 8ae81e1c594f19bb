//! Directive Preprocessor
//!
//! Turns one source file into a fragment ready for amalgamation: strips its
//! inclusion guard, extracts quoted includes as dependencies, drops ignored
//! angle-bracket includes and prefixes the result with an origin comment.

pub mod directives;
pub mod filter;

pub use directives::DirectiveScanner;
pub use filter::IncludeFilter;

/// Output of preprocessing a single file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Preprocessed {
    /// Normalized text, empty for files too short to carry content
    pub text: String,
    /// Quoted includes in source order, unqualified
    pub includes: Vec<String>,
}

/// Per-file preprocessor
///
/// Holds no state besides its compiled patterns, so one instance can be
/// shared across threads.
pub struct Preprocessor {
    scanner: DirectiveScanner,
    filter: IncludeFilter,
}

impl Preprocessor {
    pub fn new(filter: IncludeFilter) -> Self {
        Self {
            scanner: DirectiveScanner::new(),
            filter,
        }
    }

    /// Preprocess the contents of `file_name`
    pub fn preprocess(&self, file_name: &str, src: &str) -> Preprocessed {
        let lines: Vec<&str> = src.trim().lines().collect();

        if lines.len() < 3 {
            return Preprocessed::default();
        }

        let body = self.scanner.strip_guard(&lines).unwrap_or(&lines);

        let mut includes = Vec::new();
        let kept: Vec<&str> = body
            .iter()
            .copied()
            .filter(|line| {
                if let Some(path) = self.scanner.local_include(line) {
                    includes.push(path.to_string());
                    return false;
                }
                if !self.filter.is_empty() {
                    if let Some(path) = self.scanner.system_include(line) {
                        return !self.filter.matches(path);
                    }
                }
                true
            })
            .collect();

        let joined = kept.join("\n");
        let body = joined.trim();
        let origin = file_name.replace('\\', "/");

        let text = if body.is_empty() {
            format!("// {}\n", origin)
        } else {
            format!("// {}\n\n{}\n", origin, body)
        };

        Preprocessed { text, includes }
    }
}

impl Default for Preprocessor {
    fn default() -> Self {
        Self::new(IncludeFilter::none())
    }
}
