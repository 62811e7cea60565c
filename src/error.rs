//! Error types for muster operations.
//!
//! Defines error types for all major subsystems:
//! - Record loading and parsing
//! - JSON Schema loading and compilation
//! - The validation pipeline (schema, identity, reference checks)
//! - Site export

use thiserror::Error;

use crate::record::RecordKind;
use crate::schema::SchemaFailure;
use crate::validation::references::ReferenceFailure;

/// Errors that can occur while loading record files.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{path}: invalid YAML: {message}")]
    Parse { path: String, message: String },

    #[error("{path}: YAML root must be a mapping/object")]
    NonMappingRoot { path: String },
}

/// Errors that can occur while loading or compiling a JSON Schema.
#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("cannot read schema '{path}': {reason}")]
    Load { path: String, reason: String },

    #[error("invalid schema '{path}': {reason}")]
    Compile { path: String, reason: String },
}

/// Errors produced by the validation pipeline.
///
/// Stage failures surface as distinct variants: `SchemaViolations` and
/// `DanglingReferences` batch every offending record of their stage, the
/// identity variants report the first violation found.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error("{0}")]
    SchemaViolations(SchemaFailure),

    #[error("{file}: missing required 'id'")]
    MissingId { file: String },

    #[error("{file}: invalid id '{id}' (allowed: a-z 0-9 '-')")]
    InvalidId { file: String, id: String },

    #[error("{file}: filename must match id '{id}' (expected {expected})")]
    FilenameMismatch {
        file: String,
        id: String,
        expected: String,
    },

    #[error("duplicate {kind} id '{id}': first defined in {original}, also in {duplicate}")]
    DuplicateId {
        kind: RecordKind,
        id: String,
        original: String,
        duplicate: String,
    },

    #[error("{0}")]
    DanglingReferences(ReferenceFailure),
}

/// Errors that can occur during site export.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("site directory not found: {0}")]
    MissingSiteDir(String),

    #[error("record in {0} has no 'id'; validate before exporting")]
    MissingRecordId(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}
