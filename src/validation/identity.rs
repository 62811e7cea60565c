//! Identity checks: id presence, pattern, filename correspondence, and
//! per-kind uniqueness.
//!
//! The four sub-checks run in that order, each scanning the whole record
//! set before the next begins, and the stage stops at the first violation.
//! Warband and unit ids live in separate namespaces; the caller runs this
//! once per kind.

use std::collections::HashMap;

use crate::error::ValidationError;
use crate::record::{Record, RecordKind};

/// Returns true for a non-empty id made of lowercase ASCII letters,
/// digits, and hyphens.
pub fn is_valid_id(id: &str) -> bool {
    !id.is_empty()
        && id
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
}

/// Runs the identity sub-checks over one kind's records.
pub fn check_identity(records: &[Record], kind: RecordKind) -> Result<(), ValidationError> {
    // Presence: `id` exists, is a string, and is non-empty after trimming.
    // Reported before the pattern check so a missing id produces one error,
    // not two.
    for record in records {
        match record.id() {
            Some(id) if !id.trim().is_empty() => {}
            _ => {
                return Err(ValidationError::MissingId {
                    file: record.file(),
                })
            }
        }
    }

    for record in records {
        let id = record.id().unwrap_or_default();
        if !is_valid_id(id) {
            return Err(ValidationError::InvalidId {
                file: record.file(),
                id: id.to_string(),
            });
        }
    }

    // Filename correspondence: the file stem must equal the id.
    for record in records {
        let id = record.id().unwrap_or_default();
        if record.stem() != id {
            let ext = record
                .source
                .extension()
                .and_then(|e| e.to_str())
                .unwrap_or("yml");
            return Err(ValidationError::FilenameMismatch {
                file: record.file(),
                id: id.to_string(),
                expected: format!("{id}.{ext}"),
            });
        }
    }

    // Uniqueness: in load order, the first file that re-introduces an id is
    // reported along with the file that defined it.
    let mut seen: HashMap<&str, &Record> = HashMap::new();
    for record in records {
        let id = record.id().unwrap_or_default();
        if let Some(original) = seen.get(id) {
            return Err(ValidationError::DuplicateId {
                kind,
                id: id.to_string(),
                original: original.file(),
                duplicate: record.file(),
            });
        }
        seen.insert(id, record);
    }

    Ok(())
}
