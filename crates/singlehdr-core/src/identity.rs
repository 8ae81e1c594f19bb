//! Source file identity

use serde::{Deserialize, Serialize};

/// Identity of a source file: its path relative to the library root.
///
/// Always rendered with `/` separators. Construction normalizes the path
/// lexically, so `lib/./a.hpp`, `lib//a.hpp` and `lib/x/../a.hpp` all name
/// the same file.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FileId(String);

impl FileId {
    /// Create an identity from a relative path
    pub fn new(path: impl AsRef<str>) -> Self {
        let raw = path.as_ref().replace('\\', "/");
        let mut parts: Vec<&str> = Vec::new();

        for segment in raw.split('/') {
            match segment {
                "" | "." => {}
                ".." => {
                    if parts.last().map_or(false, |last| *last != "..") {
                        parts.pop();
                    } else {
                        parts.push("..");
                    }
                }
                other => parts.push(other),
            }
        }

        Self(parts.join("/"))
    }

    /// Qualify `rel` with the directory `dir`
    ///
    /// An empty `dir` refers to the library root.
    pub fn join(dir: &str, rel: &str) -> Self {
        if dir.is_empty() {
            Self::new(rel)
        } else {
            Self::new(format!("{}/{}", dir, rel))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for FileId {
    fn from(path: &str) -> Self {
        Self::new(path)
    }
}

impl From<String> for FileId {
    fn from(path: String) -> Self {
        Self::new(path)
    }
}

impl AsRef<str> for FileId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for FileId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
