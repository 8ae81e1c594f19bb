//! Error types for singlehdr

use thiserror::Error;

use crate::types::Visibility;

/// singlehdr error type
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Cannot read source file {path}: {source}")]
    UnreadableSource {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Dependency cycle between {visibility} sources: {}", .files.join(" -> "))]
    DependencyCycle {
        visibility: Visibility,
        files: Vec<String>,
    },

    #[error("Invalid include pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type alias for singlehdr
pub type Result<T> = std::result::Result<T, Error>;
