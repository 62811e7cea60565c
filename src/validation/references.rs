//! Cross-kind reference checks.
//!
//! Every `unit_ids` entry on a warband must resolve to a known unit id, and
//! every `warband_ids` entry on a unit must resolve to a known warband id.
//! Dangling references are batched for the whole run, in load order, so the
//! report stays grouped by source file.
//!
//! The inverse symmetry (a referenced unit listing the warband back in its
//! own `warband_ids`) is intentionally not checked. One-sided links are
//! valid content today, though they are an easy authoring mistake.
//!
//! Assumes identity checks already passed: ids are present and unique
//! within their kind.

use std::collections::HashSet;
use std::fmt;

use serde_json::Value;

use crate::error::ValidationError;
use crate::record::{Record, RecordKind};

/// One unresolved cross-kind reference.
#[derive(Debug, Clone)]
pub struct DanglingRef {
    /// Source file of the record holding the reference.
    pub file: String,
    /// The reference list field (`unit_ids` or `warband_ids`).
    pub field: &'static str,
    /// The identifier that did not resolve.
    pub id: String,
    /// The kind the identifier was expected to name.
    pub target: RecordKind,
}

impl fmt::Display for DanglingRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "  {}: {} references unknown {} id '{}'",
            self.file, self.field, self.target, self.id
        )
    }
}

/// Batched dangling references, grouped by source file in load order.
#[derive(Debug, Clone)]
pub struct ReferenceFailure(pub Vec<DanglingRef>);

impl fmt::Display for ReferenceFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} unresolved reference(s):", self.0.len())?;
        for dangling in &self.0 {
            write!(f, "\n{dangling}")?;
        }
        Ok(())
    }
}

/// Checks both reference directions over the full dataset.
pub fn check_references(warbands: &[Record], units: &[Record]) -> Result<(), ValidationError> {
    let warband_ids: HashSet<&str> = warbands.iter().filter_map(Record::id).collect();
    let unit_ids: HashSet<&str> = units.iter().filter_map(Record::id).collect();

    let mut dangling = Vec::new();
    collect_dangling(warbands, RecordKind::Warband, &unit_ids, &mut dangling);
    collect_dangling(units, RecordKind::Unit, &warband_ids, &mut dangling);

    if dangling.is_empty() {
        Ok(())
    } else {
        Err(ValidationError::DanglingReferences(ReferenceFailure(
            dangling,
        )))
    }
}

fn collect_dangling(
    records: &[Record],
    kind: RecordKind,
    known: &HashSet<&str>,
    out: &mut Vec<DanglingRef>,
) {
    let field = kind.ref_field();
    let target = kind.ref_target();
    for record in records {
        for entry in record.list(field) {
            // A non-string entry can never name a record, so it is
            // unresolved by definition.
            let resolved = entry.as_str().is_some_and(|id| known.contains(id));
            if !resolved {
                out.push(DanglingRef {
                    file: record.file(),
                    field,
                    id: render_entry(entry),
                    target,
                });
            }
        }
    }
}

/// Renders a reference entry for the report: strings bare, anything else
/// as JSON.
fn render_entry(entry: &Value) -> String {
    match entry.as_str() {
        Some(id) => id.to_string(),
        None => entry.to_string(),
    }
}
