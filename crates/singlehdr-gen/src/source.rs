//! Source providers
//!
//! A provider lists the files of a library with their visibility and hands
//! out their text. The generator only talks to the [`SourceProvider`] trait,
//! so the same pipeline runs over a directory tree or an in-memory map.

use globset::{Glob, GlobSet, GlobSetBuilder};
use singlehdr_core::{Error, FileId, LayoutConfig, Result, SourceEntry, Visibility};
use std::path::{Component, Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// Provider trait for library sources
pub trait SourceProvider: Send + Sync {
    /// List candidate files with their visibility
    fn list_files(&self) -> Result<Vec<SourceEntry>>;

    /// Raw text of a listed file
    fn read_file(&self, dir: &str, file_name: &str) -> Result<String>;
}

/// Reads a library laid out as an interface tree and an implementation tree
pub struct FsSourceProvider {
    root: PathBuf,
    layout: LayoutConfig,
    exclude: GlobSet,
}

impl FsSourceProvider {
    /// Create a provider with the default `include/` + `src/` layout
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            layout: LayoutConfig::default(),
            exclude: GlobSet::empty(),
        }
    }

    /// Create a provider for a custom layout
    pub fn with_layout(root: impl Into<PathBuf>, layout: LayoutConfig) -> Result<Self> {
        let mut builder = GlobSetBuilder::new();
        for pattern in &layout.exclude {
            let glob = Glob::new(pattern).map_err(|e| Error::InvalidPattern {
                pattern: pattern.clone(),
                message: e.to_string(),
            })?;
            builder.add(glob);
        }
        let exclude = builder.build().map_err(|e| Error::Config(e.to_string()))?;

        Ok(Self {
            root: root.into(),
            layout,
            exclude,
        })
    }

    fn has_source_extension(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| self.layout.extensions.iter().any(|e| e == ext))
            .unwrap_or(false)
    }

    fn list_dir(&self, subdir: &Path, visibility: Visibility) -> Result<Vec<SourceEntry>> {
        let base = self.root.join(subdir);
        if !base.is_dir() {
            warn!("No {} sources: {} is not a directory", visibility, base.display());
            return Ok(Vec::new());
        }

        let mut entries = Vec::new();

        for entry in WalkDir::new(&base) {
            let entry = entry.map_err(|e| Error::Io(e.into()))?;
            if !entry.file_type().is_file() || !self.has_source_extension(entry.path()) {
                continue;
            }

            let dir = entry
                .path()
                .parent()
                .and_then(|parent| parent.strip_prefix(&self.root).ok())
                .map(relative_dir)
                .unwrap_or_default();
            let file_name = entry.file_name().to_string_lossy().into_owned();
            let id = FileId::join(&dir, &file_name);

            if self.exclude.is_match(id.as_str()) {
                debug!("Excluding {}", id);
                continue;
            }

            entries.push(SourceEntry::new(dir, file_name, visibility));
        }

        entries.sort_by_key(|entry| entry.id());

        info!("Found {} {} source file(s) under {}", entries.len(), visibility, base.display());
        Ok(entries)
    }
}

impl SourceProvider for FsSourceProvider {
    fn list_files(&self) -> Result<Vec<SourceEntry>> {
        let mut entries = self.list_dir(&self.layout.public_dir, Visibility::Public)?;
        entries.extend(self.list_dir(&self.layout.private_dir, Visibility::Private)?);
        Ok(entries)
    }

    fn read_file(&self, dir: &str, file_name: &str) -> Result<String> {
        let path = self.root.join(dir).join(file_name);
        std::fs::read_to_string(&path).map_err(|source| Error::UnreadableSource {
            path: FileId::join(dir, file_name).to_string(),
            source,
        })
    }
}

/// Render a root-relative directory with `/` separators
fn relative_dir(path: &Path) -> String {
    path.components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// In-memory provider, mostly useful for tests and embedding
#[derive(Debug, Clone, Default)]
pub struct MemorySourceProvider {
    files: Vec<(SourceEntry, String)>,
}

impl MemorySourceProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file, builder style
    pub fn with_file(
        mut self,
        dir: &str,
        file_name: &str,
        visibility: Visibility,
        text: impl Into<String>,
    ) -> Self {
        self.insert(dir, file_name, visibility, text);
        self
    }

    /// Add a file, replacing any file with the same location
    pub fn insert(
        &mut self,
        dir: &str,
        file_name: &str,
        visibility: Visibility,
        text: impl Into<String>,
    ) {
        self.files
            .retain(|(entry, _)| !(entry.dir == dir && entry.file_name == file_name));
        self.files
            .push((SourceEntry::new(dir, file_name, visibility), text.into()));
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

impl SourceProvider for MemorySourceProvider {
    fn list_files(&self) -> Result<Vec<SourceEntry>> {
        Ok(self.files.iter().map(|(entry, _)| entry.clone()).collect())
    }

    fn read_file(&self, dir: &str, file_name: &str) -> Result<String> {
        self.files
            .iter()
            .find(|(entry, _)| entry.dir == dir && entry.file_name == file_name)
            .map(|(_, text)| text.clone())
            .ok_or_else(|| Error::UnreadableSource {
                path: FileId::join(dir, file_name).to_string(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such source"),
            })
    }
}
