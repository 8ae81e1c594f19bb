//! Configuration types

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// singlehdr configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Macro of the outer inclusion guard
    pub include_guard: String,

    /// Macro that enables the implementation region
    pub impl_define: String,

    /// Patterns selecting angle-bracket includes to strip.
    /// Each is a regex matched at the start of the included path.
    pub ignored_includes: Vec<String>,

    /// Text injected verbatim after the outer guard
    pub additional_header: Option<String>,

    /// File whose contents are injected after the outer guard.
    /// Ignored when `additional_header` is set.
    pub additional_header_file: Option<PathBuf>,

    /// Source tree layout
    pub layout: LayoutConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            include_guard: "SINGLE_HEADER_HPP_INCLUDED".into(),
            impl_define: "SINGLE_HEADER_IMPLEMENT".into(),
            ignored_includes: vec![],
            additional_header: None,
            additional_header_file: None,
            layout: LayoutConfig::default(),
        }
    }
}

/// Layout of the library being amalgamated
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Interface subtree; every matching file is public
    pub public_dir: PathBuf,

    /// Implementation subtree; every matching file is private
    pub private_dir: PathBuf,

    /// File extensions to pick up (without the dot)
    pub extensions: Vec<String>,

    /// Glob patterns, relative to the library root, of files to skip
    pub exclude: Vec<String>,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            public_dir: PathBuf::from("include"),
            private_dir: PathBuf::from("src"),
            extensions: vec!["hpp".into(), "cpp".into()],
            exclude: vec![],
        }
    }
}

impl Config {
    /// Load configuration from a YAML or JSON file, picked by extension
    ///
    /// A relative `additional_header_file` is resolved against the
    /// directory of the configuration file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;

        let mut config: Config = match path.extension().and_then(|ext| ext.to_str()) {
            Some("yaml") | Some("yml") => serde_yaml::from_str(&content)
                .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?,
            Some("json") => serde_json::from_str(&content)
                .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?,
            _ => {
                return Err(Error::Config(format!(
                    "{}: unsupported configuration format (expected .yaml, .yml or .json)",
                    path.display()
                )))
            }
        };

        if let Some(header_file) = &config.additional_header_file {
            if header_file.is_relative() {
                if let Some(base) = path.parent() {
                    config.additional_header_file = Some(base.join(header_file));
                }
            }
        }

        config.validate()?;
        Ok(config)
    }

    /// Check the values that would otherwise produce a broken header
    pub fn validate(&self) -> Result<()> {
        for (field, name) in [
            ("include_guard", &self.include_guard),
            ("impl_define", &self.impl_define),
        ] {
            if !is_identifier(name) {
                return Err(Error::Config(format!(
                    "{} '{}' is not a valid macro name",
                    field, name
                )));
            }
        }

        if self.include_guard == self.impl_define {
            return Err(Error::Config(format!(
                "include_guard and impl_define must differ (both are '{}')",
                self.include_guard
            )));
        }

        if self.layout.extensions.is_empty() {
            return Err(Error::Config("layout.extensions must not be empty".into()));
        }

        Ok(())
    }

    /// Text of the additional header block, if any
    pub fn additional_header_text(&self) -> Result<Option<String>> {
        if let Some(text) = &self.additional_header {
            return Ok(Some(text.clone()));
        }

        match &self.additional_header_file {
            Some(path) => std::fs::read_to_string(path)
                .map(Some)
                .map_err(|source| Error::UnreadableSource {
                    path: path.display().to_string(),
                    source,
                }),
            None => Ok(None),
        }
    }
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.layout.extensions, vec!["hpp", "cpp"]);
    }

    #[test]
    fn test_rejects_bad_guard() {
        let config = Config {
            include_guard: "1_BAD".into(),
            ..Config::default()
        };
        assert!(matches!(config.validate(), Err(Error::Config(_))));

        let config = Config {
            impl_define: "HAS SPACE".into(),
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_identical_guards() {
        let config = Config {
            include_guard: "SAME".into(),
            impl_define: "SAME".into(),
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_yaml() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("singlehdr.yaml");
        std::fs::write(
            &path,
            "include_guard: IMAGEAPPROVALS_HPP_INCLUDED\n\
             impl_define: ImageApprovals_IMPLEMENT\n\
             ignored_includes:\n  - \"ImageApprovals/\"\n\
             additional_header_file: LICENSE.txt\n\
             layout:\n  exclude:\n    - \"src/Qt5*\"\n",
        )
        .unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.include_guard, "IMAGEAPPROVALS_HPP_INCLUDED");
        assert_eq!(config.impl_define, "ImageApprovals_IMPLEMENT");
        assert_eq!(config.ignored_includes, vec!["ImageApprovals/"]);
        assert_eq!(config.layout.public_dir, PathBuf::from("include"));
        assert_eq!(config.layout.exclude, vec!["src/Qt5*"]);
        assert_eq!(
            config.additional_header_file,
            Some(dir.path().join("LICENSE.txt"))
        );
    }

    #[test]
    fn test_load_json() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("singlehdr.json");
        std::fs::write(
            &path,
            r#"{"include_guard": "LIB_HPP", "impl_define": "LIB_IMPL"}"#,
        )
        .unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.include_guard, "LIB_HPP");
        assert_eq!(config.layout, LayoutConfig::default());
    }

    #[test]
    fn test_load_unknown_format() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("singlehdr.toml");
        std::fs::write(&path, "include_guard = 'X'").unwrap();

        assert!(matches!(Config::load(&path), Err(Error::Config(_))));
    }

    #[test]
    fn test_additional_header_text() {
        let dir = TempDir::new().unwrap();
        let header = dir.path().join("LICENSE.txt");
        std::fs::write(&header, "// MIT License\n").unwrap();

        let mut config = Config {
            additional_header_file: Some(header),
            ..Config::default()
        };
        assert_eq!(
            config.additional_header_text().unwrap().as_deref(),
            Some("// MIT License\n")
        );

        config.additional_header = Some("/* inline */".into());
        assert_eq!(
            config.additional_header_text().unwrap().as_deref(),
            Some("/* inline */")
        );
    }

    #[test]
    fn test_missing_header_file() {
        let config = Config {
            additional_header_file: Some(PathBuf::from("/nonexistent/LICENSE")),
            ..Config::default()
        };
        assert!(matches!(
            config.additional_header_text(),
            Err(Error::UnreadableSource { .. })
        ));
    }
}
