//! Core type definitions

use serde::{Deserialize, Serialize};
use crate::identity::FileId;

/// Which region of the amalgamated header a source file belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    /// Part of the public API, emitted inside the outer guard
    Public,
    /// Part of the implementation, emitted inside the implementation guard
    Private,
}

impl std::fmt::Display for Visibility {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Visibility::Public => write!(f, "public"),
            Visibility::Private => write!(f, "private"),
        }
    }
}

/// A file listed by a source provider
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourceEntry {
    /// Directory relative to the library root, `/`-separated, empty for the root
    pub dir: String,
    /// File name inside `dir`
    pub file_name: String,
    /// Region the file is emitted into
    pub visibility: Visibility,
}

impl SourceEntry {
    pub fn new(
        dir: impl Into<String>,
        file_name: impl Into<String>,
        visibility: Visibility,
    ) -> Self {
        Self {
            dir: dir.into(),
            file_name: file_name.into(),
            visibility,
        }
    }

    /// Identity of the listed file
    pub fn id(&self) -> FileId {
        FileId::join(&self.dir, &self.file_name)
    }
}

/// Preprocessed text of one source file together with its local dependencies
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFragment {
    id: FileId,
    text: String,
    dependencies: Vec<FileId>,
}

impl SourceFragment {
    pub fn new(id: FileId, text: impl Into<String>, dependencies: Vec<FileId>) -> Self {
        Self {
            id,
            text: text.into(),
            dependencies,
        }
    }

    pub fn id(&self) -> &FileId {
        &self.id
    }

    /// Normalized text, starting with the origin comment
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Qualified local includes in source order (duplicates preserved)
    pub fn dependencies(&self) -> &[FileId] {
        &self.dependencies
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_id() {
        let entry = SourceEntry::new("include/lib", "Image.hpp", Visibility::Public);
        assert_eq!(entry.id().as_str(), "include/lib/Image.hpp");

        let root = SourceEntry::new("", "Root.hpp", Visibility::Public);
        assert_eq!(root.id().as_str(), "Root.hpp");
    }

    #[test]
    fn test_visibility_display() {
        assert_eq!(Visibility::Public.to_string(), "public");
        assert_eq!(Visibility::Private.to_string(), "private");
    }

    #[test]
    fn test_visibility_serde() {
        let json = serde_json::to_string(&Visibility::Private).unwrap();
        assert_eq!(json, "\"private\"");
    }
}
