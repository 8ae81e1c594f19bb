//! singlehdr Core
//!
//! Core types, errors and configuration shared by the amalgamation engine
//! and the command-line tool.

pub mod config;
pub mod error;
pub mod identity;
pub mod types;

pub use config::{Config, LayoutConfig};
pub use error::{Error, Result};
pub use identity::FileId;
pub use types::*;
