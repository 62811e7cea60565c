//! Validation orchestrator.
//!
//! Stage order is fixed: load, schema, identity, references. The first
//! failing stage aborts the run, so later stages may assume the earlier
//! invariants hold (the reference checker relies on ids existing and being
//! unique). Within the schema and reference stages, failures from multiple
//! records are batched into one error.

use tracing::{debug, info};

use crate::config::PipelineConfig;
use crate::error::{SchemaError, ValidationError};
use crate::record::{self, Record, RecordKind};
use crate::schema::{SchemaFailure, SchemaSet};

use super::identity::check_identity;
use super::references::check_references;

/// The loaded record sets of one validated run, in loader order.
#[derive(Debug)]
pub struct Dataset {
    pub warbands: Vec<Record>,
    pub units: Vec<Record>,
}

/// Runs the full validation pipeline over one dataset.
///
/// Constructed from an explicit [`PipelineConfig`]; schemas are loaded and
/// compiled up front so repeated runs (and parallel test runs) never touch
/// shared state.
pub struct Validator {
    config: PipelineConfig,
    schemas: SchemaSet,
}

impl Validator {
    /// Creates a validator, loading and compiling both kind schemas.
    pub fn new(config: PipelineConfig) -> Result<Self, SchemaError> {
        let schemas = SchemaSet::load(&config)?;
        Ok(Self { config, schemas })
    }

    /// Runs every stage. On success, returns the loaded dataset for the
    /// exporter; on failure, the error of the first failing stage.
    pub fn run(&self) -> Result<Dataset, ValidationError> {
        let warbands = record::load_dir(&self.config.records_dir(RecordKind::Warband))?;
        let units = record::load_dir(&self.config.records_dir(RecordKind::Unit))?;
        debug!(
            warbands = warbands.len(),
            units = units.len(),
            "records loaded"
        );

        let mut failures = self.schemas.check_records(&warbands, RecordKind::Warband);
        failures.extend(self.schemas.check_records(&units, RecordKind::Unit));
        if !failures.is_empty() {
            return Err(ValidationError::SchemaViolations(SchemaFailure(failures)));
        }

        check_identity(&warbands, RecordKind::Warband)?;
        check_identity(&units, RecordKind::Unit)?;

        check_references(&warbands, &units)?;

        info!(
            warbands = warbands.len(),
            units = units.len(),
            "validation passed"
        );
        Ok(Dataset { warbands, units })
    }
}
