//! JSON Schema validation stage.
//!
//! Both kind schemas (Draft 2020-12) are loaded and compiled once when the
//! pipeline is constructed. Checking a record is purely local: no other
//! record is consulted. Violations are batched per record, sorted by
//! instance path for reproducible reports, and capped at a configurable
//! limit to bound output size.

use std::fmt;
use std::fs;
use std::path::Path;

use jsonschema::Validator;
use serde_json::Value;

use crate::config::PipelineConfig;
use crate::error::SchemaError;
use crate::record::{Record, RecordKind};

/// A single schema violation on one record.
#[derive(Debug, Clone)]
pub struct Violation {
    /// JSON Pointer path to the violating field in the record.
    pub instance_path: String,
    /// Human-readable description of the violation.
    pub message: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.instance_path.is_empty() {
            write!(f, "  - (root): {}", self.message)
        } else {
            write!(f, "  - {}: {}", self.instance_path, self.message)
        }
    }
}

/// All schema violations found on one record.
#[derive(Debug, Clone)]
pub struct RecordViolations {
    /// Source file of the offending record.
    pub file: String,
    /// Kind the record was checked as.
    pub kind: RecordKind,
    /// Violations sorted by instance path, truncated to the reporting cap.
    pub violations: Vec<Violation>,
    /// Number of violations dropped by the reporting cap.
    pub dropped: usize,
}

impl fmt::Display for RecordViolations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} schema errors in {}:", self.kind, self.file)?;
        for v in &self.violations {
            write!(f, "\n{v}")?;
        }
        if self.dropped > 0 {
            write!(f, "\n  ... and {} more", self.dropped)?;
        }
        Ok(())
    }
}

/// Batched schema failures across every record of the stage.
#[derive(Debug, Clone)]
pub struct SchemaFailure(pub Vec<RecordViolations>);

impl fmt::Display for SchemaFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, record) in self.0.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{record}")?;
        }
        Ok(())
    }
}

/// Compiled schema validators for both record kinds.
pub struct SchemaSet {
    warband: Validator,
    unit: Validator,
    max_violations: usize,
}

impl SchemaSet {
    /// Loads and compiles both kind schemas from the configured directory.
    pub fn load(config: &PipelineConfig) -> Result<Self, SchemaError> {
        Ok(Self {
            warband: compile(&config.schema_path(RecordKind::Warband))?,
            unit: compile(&config.schema_path(RecordKind::Unit))?,
            max_violations: config.max_violations,
        })
    }

    fn validator_for(&self, kind: RecordKind) -> &Validator {
        match kind {
            RecordKind::Warband => &self.warband,
            RecordKind::Unit => &self.unit,
        }
    }

    /// Checks one record against its kind's schema.
    pub fn check_record(&self, record: &Record, kind: RecordKind) -> RecordViolations {
        let instance = Value::Object(record.body.clone());
        let mut violations: Vec<Violation> = self
            .validator_for(kind)
            .iter_errors(&instance)
            .map(|e| Violation {
                instance_path: e.instance_path.to_string(),
                message: e.to_string(),
            })
            .collect();

        violations.sort_by(|a, b| compare_pointers(&a.instance_path, &b.instance_path));
        let dropped = violations.len().saturating_sub(self.max_violations);
        violations.truncate(self.max_violations);

        RecordViolations {
            file: record.file(),
            kind,
            violations,
            dropped,
        }
    }

    /// Checks every record of one kind, keeping only the failing ones.
    pub fn check_records(&self, records: &[Record], kind: RecordKind) -> Vec<RecordViolations> {
        records
            .iter()
            .map(|record| self.check_record(record, kind))
            .filter(|result| !result.violations.is_empty())
            .collect()
    }
}

/// Orders JSON Pointers segment-wise, comparing array indices numerically
/// so `/unit_ids/2` reports before `/unit_ids/10`.
fn compare_pointers(a: &str, b: &str) -> std::cmp::Ordering {
    use std::cmp::Ordering;

    let mut left = a.split('/').skip(1);
    let mut right = b.split('/').skip(1);
    loop {
        match (left.next(), right.next()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(l), Some(r)) => {
                let ord = match (l.parse::<usize>(), r.parse::<usize>()) {
                    (Ok(li), Ok(ri)) => li.cmp(&ri),
                    _ => l.cmp(r),
                };
                if ord != Ordering::Equal {
                    return ord;
                }
            }
        }
    }
}

/// Reads, parses, and compiles a single schema file.
fn compile(path: &Path) -> Result<Validator, SchemaError> {
    let content = fs::read_to_string(path).map_err(|e| SchemaError::Load {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;
    let schema: Value = serde_json::from_str(&content).map_err(|e| SchemaError::Load {
        path: path.display().to_string(),
        reason: format!("invalid JSON: {e}"),
    })?;

    let mut options = jsonschema::options();
    options.with_draft(jsonschema::Draft::Draft202012);
    options.build(&schema).map_err(|e| SchemaError::Compile {
        path: path.display().to_string(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::path::PathBuf;
    use tempfile::{tempdir, TempDir};

    fn write_schemas(warband: &Value, unit: &Value) -> TempDir {
        let dir = tempdir().expect("failed to create temp dir");
        fs::write(
            dir.path().join("warband.schema.json"),
            serde_json::to_string(warband).expect("serialize"),
        )
        .expect("write warband schema");
        fs::write(
            dir.path().join("unit.schema.json"),
            serde_json::to_string(unit).expect("serialize"),
        )
        .expect("write unit schema");
        dir
    }

    fn warband_schema() -> Value {
        json!({
            "type": "object",
            "required": ["id", "name"],
            "properties": {
                "id": {"type": "string"},
                "name": {"type": "string"},
                "alignment": {"enum": ["lawful", "neutral", "chaotic"]},
                "unit_ids": {"type": "array", "items": {"type": "string"}}
            }
        })
    }

    fn unit_schema() -> Value {
        json!({
            "type": "object",
            "required": ["id"],
            "properties": {
                "id": {"type": "string"},
                "warband_ids": {"type": "array", "items": {"type": "string"}}
            }
        })
    }

    fn record(file: &str, body: Value) -> Record {
        Record {
            source: PathBuf::from(file),
            body: body.as_object().cloned().expect("body must be an object"),
        }
    }

    fn schema_set(max_violations: usize) -> (SchemaSet, TempDir) {
        let dir = write_schemas(&warband_schema(), &unit_schema());
        let mut config = PipelineConfig::new("data", dir.path());
        config.max_violations = max_violations;
        let set = SchemaSet::load(&config).expect("failed to load schemas");
        (set, dir)
    }

    #[test]
    fn test_valid_record_has_no_violations() {
        let (set, _dir) = schema_set(20);
        let r = record(
            "data/warbands/raiders.yml",
            json!({"id": "raiders", "name": "Raiders", "unit_ids": ["scout"]}),
        );
        let result = set.check_record(&r, RecordKind::Warband);
        assert!(result.violations.is_empty());
    }

    #[test]
    fn test_missing_required_field_reported() {
        let (set, _dir) = schema_set(20);
        let r = record("data/warbands/raiders.yml", json!({"id": "raiders"}));
        let result = set.check_record(&r, RecordKind::Warband);
        assert_eq!(result.violations.len(), 1);
        assert!(result.violations[0].message.contains("name"));
    }

    #[test]
    fn test_violations_sorted_by_instance_path() {
        let (set, _dir) = schema_set(20);
        let r = record(
            "data/warbands/raiders.yml",
            json!({
                "id": 7,
                "name": "Raiders",
                "unit_ids": ["scout", 3, false]
            }),
        );
        let result = set.check_record(&r, RecordKind::Warband);
        let paths: Vec<_> = result
            .violations
            .iter()
            .map(|v| v.instance_path.as_str())
            .collect();
        let mut sorted = paths.clone();
        sorted.sort();
        assert_eq!(paths, sorted);
        assert!(paths.contains(&"/id"));
        assert!(paths.contains(&"/unit_ids/1"));
    }

    #[test]
    fn test_array_indices_sort_numerically() {
        let (set, _dir) = schema_set(20);
        // String entries at 0..=1 and 3..=9 are fine; 2 and 10 are numbers.
        let mut unit_ids: Vec<Value> = (0..11).map(|i| json!(format!("u-{i}"))).collect();
        unit_ids[2] = json!(2);
        unit_ids[10] = json!(10);
        let r = record(
            "data/warbands/raiders.yml",
            json!({"id": "raiders", "name": "Raiders", "unit_ids": unit_ids}),
        );
        let result = set.check_record(&r, RecordKind::Warband);
        let paths: Vec<_> = result
            .violations
            .iter()
            .map(|v| v.instance_path.as_str())
            .collect();
        assert_eq!(paths, vec!["/unit_ids/2", "/unit_ids/10"]);
    }

    #[test]
    fn test_compare_pointers() {
        use std::cmp::Ordering;

        assert_eq!(compare_pointers("/a", "/b"), Ordering::Less);
        assert_eq!(compare_pointers("/a/2", "/a/10"), Ordering::Less);
        assert_eq!(compare_pointers("/a/10", "/a/2"), Ordering::Greater);
        assert_eq!(compare_pointers("/a", "/a/0"), Ordering::Less);
        assert_eq!(compare_pointers("", "/a"), Ordering::Less);
        assert_eq!(compare_pointers("/a/1", "/a/1"), Ordering::Equal);
    }

    #[test]
    fn test_violation_cap_applies() {
        let (set, _dir) = schema_set(1);
        let r = record(
            "data/warbands/raiders.yml",
            json!({"id": 7, "name": 8, "alignment": "evil"}),
        );
        let result = set.check_record(&r, RecordKind::Warband);
        assert_eq!(result.violations.len(), 1);
        assert_eq!(result.dropped, 2);
        assert!(result.to_string().contains("... and 2 more"));
    }

    #[test]
    fn test_check_records_batches_across_records() {
        let (set, _dir) = schema_set(20);
        let records = vec![
            record("data/units/scout.yml", json!({"id": "scout"})),
            record("data/units/bad-a.yml", json!({})),
            record("data/units/bad-b.yml", json!({"id": 3})),
        ];
        let failures = set.check_records(&records, RecordKind::Unit);
        assert_eq!(failures.len(), 2);
        assert_eq!(failures[0].file, "data/units/bad-a.yml");
        assert_eq!(failures[1].file, "data/units/bad-b.yml");

        let rendered = SchemaFailure(failures).to_string();
        assert!(rendered.contains("unit schema errors in data/units/bad-a.yml"));
        assert!(rendered.contains("unit schema errors in data/units/bad-b.yml"));
    }

    #[test]
    fn test_missing_schema_file_is_load_error() {
        let dir = tempdir().expect("failed to create temp dir");
        let config = PipelineConfig::new("data", dir.path());
        let result = SchemaSet::load(&config);
        assert!(matches!(result, Err(SchemaError::Load { .. })));
    }

    #[test]
    fn test_malformed_schema_is_compile_error() {
        let dir = write_schemas(&json!({"type": "not-a-type"}), &unit_schema());
        let config = PipelineConfig::new("data", dir.path());
        let result = SchemaSet::load(&config);
        assert!(matches!(result, Err(SchemaError::Compile { .. })));
    }
}
