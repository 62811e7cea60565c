//! muster: static content pipeline for warband/unit game data.
//!
//! Content is authored as one YAML record per file. This library loads the
//! record directories, validates them against JSON Schemas plus identity and
//! cross-reference rules, and (on success) builds the JSON API tree consumed
//! by the static site.

pub mod cli;
pub mod config;
pub mod error;
pub mod export;
pub mod record;
pub mod schema;
pub mod validation;

// Re-export commonly used error types
pub use error::{ExportError, LoadError, SchemaError, ValidationError};
