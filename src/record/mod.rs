//! Content records and the directory loader.
//!
//! A record is one YAML file under `data/warbands/` or `data/units/`. The
//! loader parses each file into a JSON object and attaches its source path
//! so every later stage can cite the offending file in diagnostics. The
//! source path lives outside the record body: it is never schema-checked
//! and never serialized into the exported payload.
//!
//! # Example
//!
//! ```ignore
//! use muster::record::{self, RecordKind};
//!
//! let warbands = record::load_dir("data/warbands".as_ref())?;
//! for w in &warbands {
//!     println!("{}: {:?}", w.source.display(), w.id());
//! }
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};

use crate::error::LoadError;

/// File extension that marks a content record.
const RECORD_EXT: &str = "yml";

/// The two content kinds. Each kind has its own directory, schema, and id
/// namespace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordKind {
    Warband,
    Unit,
}

impl RecordKind {
    /// Singular name used in diagnostics.
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordKind::Warband => "warband",
            RecordKind::Unit => "unit",
        }
    }

    /// Directory name holding this kind's records under the data root,
    /// which doubles as the listing filename in the exported API tree.
    pub fn dir_name(&self) -> &'static str {
        match self {
            RecordKind::Warband => "warbands",
            RecordKind::Unit => "units",
        }
    }

    /// Filename of this kind's JSON Schema.
    pub fn schema_file(&self) -> &'static str {
        match self {
            RecordKind::Warband => "warband.schema.json",
            RecordKind::Unit => "unit.schema.json",
        }
    }

    /// Field on records of this kind that lists ids of the other kind.
    pub fn ref_field(&self) -> &'static str {
        match self {
            RecordKind::Warband => "unit_ids",
            RecordKind::Unit => "warband_ids",
        }
    }

    /// Kind that entries of [`ref_field`](Self::ref_field) must resolve to.
    pub fn ref_target(&self) -> RecordKind {
        match self {
            RecordKind::Warband => RecordKind::Unit,
            RecordKind::Unit => RecordKind::Warband,
        }
    }
}

impl std::fmt::Display for RecordKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One loaded content record.
#[derive(Debug, Clone)]
pub struct Record {
    /// Originating file path, attached at load time for diagnostics only.
    pub source: PathBuf,
    /// Parsed record body.
    pub body: Map<String, Value>,
}

impl Record {
    /// The record's `id`, if present and a string.
    pub fn id(&self) -> Option<&str> {
        self.body.get("id").and_then(Value::as_str)
    }

    /// File stem of the source path (filename without extension).
    pub fn stem(&self) -> &str {
        self.source
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("")
    }

    /// Source path rendered for diagnostics.
    pub fn file(&self) -> String {
        self.source.display().to_string()
    }

    /// Entries of a list-valued field. An absent or non-array field yields
    /// an empty slice. Entries are returned raw; callers decide what a
    /// non-string entry means.
    pub fn list(&self, field: &str) -> &[Value] {
        match self.body.get(field) {
            Some(Value::Array(items)) => items,
            _ => &[],
        }
    }
}

/// Loads every `.yml` record in a directory, sorted by filename so load
/// order (and therefore error reporting) is deterministic.
///
/// An empty directory yields an empty list. Subdirectories and files with
/// other extensions are skipped.
pub fn load_dir(dir: &Path) -> Result<Vec<Record>, LoadError> {
    let read_err = |e: std::io::Error| LoadError::Io {
        path: dir.display().to_string(),
        source: e,
    };

    let mut paths: Vec<PathBuf> = Vec::new();
    for entry in fs::read_dir(dir).map_err(read_err)? {
        let path = entry.map_err(read_err)?.path();
        if path.is_dir() {
            continue;
        }
        let is_record = path
            .extension()
            .map(|ext| ext == RECORD_EXT)
            .unwrap_or(false);
        if is_record {
            paths.push(path);
        }
    }
    paths.sort();

    paths.iter().map(|p| load_file(p)).collect()
}

/// Loads a single record file.
///
/// An empty or `null` body loads as an empty mapping; the schema stage
/// then reports the missing required fields. Any other non-mapping root
/// is rejected here.
pub fn load_file(path: &Path) -> Result<Record, LoadError> {
    let content = fs::read_to_string(path).map_err(|e| LoadError::Io {
        path: path.display().to_string(),
        source: e,
    })?;

    let yaml: serde_yaml::Value = if content.trim().is_empty() {
        serde_yaml::Value::Null
    } else {
        serde_yaml::from_str(&content).map_err(|e| LoadError::Parse {
            path: path.display().to_string(),
            message: e.to_string(),
        })?
    };

    let yaml = match yaml {
        serde_yaml::Value::Null => serde_yaml::Value::Mapping(serde_yaml::Mapping::new()),
        other => other,
    };

    let json = yaml_to_json(&yaml).map_err(|message| LoadError::Parse {
        path: path.display().to_string(),
        message,
    })?;

    match json {
        Value::Object(body) => Ok(Record {
            source: path.to_path_buf(),
            body,
        }),
        _ => Err(LoadError::NonMappingRoot {
            path: path.display().to_string(),
        }),
    }
}

/// Converts a `serde_yaml::Value` into a `serde_json::Value`.
///
/// Records use only the JSON-compatible subset of YAML; map keys must be
/// representable as strings and floats must be finite.
fn yaml_to_json(yaml: &serde_yaml::Value) -> Result<Value, String> {
    match yaml {
        serde_yaml::Value::Null => Ok(Value::Null),
        serde_yaml::Value::Bool(b) => Ok(Value::Bool(*b)),
        serde_yaml::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(Value::Number(serde_json::Number::from(i)))
            } else if let Some(u) = n.as_u64() {
                Ok(Value::Number(serde_json::Number::from(u)))
            } else if let Some(f) = n.as_f64() {
                serde_json::Number::from_f64(f)
                    .map(Value::Number)
                    .ok_or_else(|| format!("cannot represent float {f} in JSON"))
            } else {
                Err(format!("unsupported YAML number: {n:?}"))
            }
        }
        serde_yaml::Value::String(s) => Ok(Value::String(s.clone())),
        serde_yaml::Value::Sequence(seq) => {
            let items: Result<Vec<Value>, String> = seq.iter().map(yaml_to_json).collect();
            Ok(Value::Array(items?))
        }
        serde_yaml::Value::Mapping(map) => {
            let mut object = Map::new();
            for (k, v) in map {
                let key = match k {
                    serde_yaml::Value::String(s) => s.clone(),
                    serde_yaml::Value::Number(n) => n.to_string(),
                    serde_yaml::Value::Bool(b) => b.to_string(),
                    other => return Err(format!("unsupported YAML map key: {other:?}")),
                };
                object.insert(key, yaml_to_json(v)?);
            }
            Ok(Value::Object(object))
        }
        serde_yaml::Value::Tagged(tagged) => yaml_to_json(&tagged.value),
    }
}
