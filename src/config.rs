//! Pipeline configuration.
//!
//! The configuration is passed explicitly into [`Validator`] at construction
//! rather than held in process-wide state, so independent validation runs
//! (e.g. in tests) never share schemas or paths.
//!
//! [`Validator`]: crate::validation::Validator

use std::path::PathBuf;

use crate::record::RecordKind;

/// Default cap on reported schema violations per record.
pub const DEFAULT_MAX_VIOLATIONS: usize = 20;

/// Locations and limits for one validation run.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Root directory holding `warbands/` and `units/`.
    pub data_dir: PathBuf,
    /// Directory holding `warband.schema.json` and `unit.schema.json`.
    pub schema_dir: PathBuf,
    /// Cap on schema violations reported per record.
    pub max_violations: usize,
}

impl PipelineConfig {
    /// Creates a config with the default violation cap.
    pub fn new(data_dir: impl Into<PathBuf>, schema_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            schema_dir: schema_dir.into(),
            max_violations: DEFAULT_MAX_VIOLATIONS,
        }
    }

    /// Directory holding one kind's record files.
    pub fn records_dir(&self, kind: RecordKind) -> PathBuf {
        self.data_dir.join(kind.dir_name())
    }

    /// Path of one kind's schema file.
    pub fn schema_path(&self, kind: RecordKind) -> PathBuf {
        self.schema_dir.join(kind.schema_file())
    }
}
