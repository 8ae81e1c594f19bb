//! singlehdr Generator
//!
//! Amalgamates a multi-file C/C++ library into a single header.
//!
//! ## Modules
//!
//! - `preprocessor` - Per-file guard and include stripping
//! - `source` - Source providers (filesystem tree, in-memory)
//! - `graph` - Fragment pools and dependency ordering
//! - `assemble` - Layout of the final document
//! - `generator` - Driver tying the pieces together

pub mod assemble;
pub mod generator;
pub mod graph;
pub mod preprocessor;
pub mod source;

pub use assemble::DocumentAssembler;
pub use generator::{Plan, SingleHeaderGenerator};
pub use graph::{DependencyGraph, FragmentPool};
pub use preprocessor::{IncludeFilter, Preprocessed, Preprocessor};
pub use source::{FsSourceProvider, MemorySourceProvider, SourceProvider};

use singlehdr_core::{Config, Result};
use std::path::Path;

/// Build a generator loaded with every source of the library at `root`
pub fn load_library(root: &Path, config: &Config) -> Result<SingleHeaderGenerator> {
    let provider = FsSourceProvider::with_layout(root, config.layout.clone())?;
    let preprocessor = Preprocessor::new(IncludeFilter::new(&config.ignored_includes)?);

    let mut generator = SingleHeaderGenerator::from_config(config)?;
    generator.add_source_files(&provider, &preprocessor)?;
    Ok(generator)
}

/// Amalgamate the library at `root` into a single header
pub fn amalgamate(root: &Path, config: &Config) -> Result<String> {
    load_library(root, config)?.generate()
}
