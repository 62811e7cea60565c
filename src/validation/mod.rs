//! Validation stages for content records.
//!
//! Three stages run over the loaded record sets, in order: schema
//! conformance (see [`crate::schema`]), identity rules, and cross-kind
//! reference resolution. [`pipeline::Validator`] orchestrates them.

pub mod identity;
pub mod pipeline;
pub mod references;

pub use identity::{check_identity, is_valid_id};
pub use pipeline::{Dataset, Validator};
pub use references::{check_references, DanglingRef, ReferenceFailure};
