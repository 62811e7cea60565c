//! Dist-tree builder.
//!
//! Rebuilds the output directory from scratch on every run: remove it,
//! copy the static site assets back in, then write the API tree:
//!
//! ```text
//! dist/
//!   <site assets>
//!   api/
//!     index.json           generated_at + per-kind counts
//!     warbands.json        full listing, loader order
//!     units.json           full listing, loader order
//!     warbands/<id>.json   one detail payload per record
//!     units/<id>.json
//! ```
//!
//! The caller must validate the dataset first; the exporter itself only
//! requires that every record has an `id`.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;
use serde::Serialize;
use serde_json::json;
use tracing::info;
use walkdir::WalkDir;

use crate::error::ExportError;
use crate::record::{Record, RecordKind};
use crate::validation::Dataset;

/// Configuration for one export run.
#[derive(Debug, Clone)]
pub struct ExportConfig {
    /// Output directory; removed and recreated on every build.
    pub dist_dir: PathBuf,
    /// Static site assets copied into the dist root before the API tree is
    /// written. Skipped when unset.
    pub site_dir: Option<PathBuf>,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            dist_dir: PathBuf::from("dist"),
            site_dir: Some(PathBuf::from("site")),
        }
    }
}

/// Summary of a completed export.
#[derive(Debug, Clone, Serialize)]
pub struct ExportSummary {
    pub warbands: usize,
    pub units: usize,
    pub dist_dir: PathBuf,
}

/// Writes the dist tree for a validated dataset.
pub struct SiteBuilder {
    config: ExportConfig,
}

impl SiteBuilder {
    pub fn new(config: ExportConfig) -> Self {
        Self { config }
    }

    /// Builds the dist tree, replacing any previous build output.
    pub fn build(&self, dataset: &Dataset) -> Result<ExportSummary, ExportError> {
        let dist = &self.config.dist_dir;
        if dist.exists() {
            fs::remove_dir_all(dist)?;
        }
        fs::create_dir_all(dist)?;

        if let Some(site_dir) = &self.config.site_dir {
            if !site_dir.is_dir() {
                return Err(ExportError::MissingSiteDir(site_dir.display().to_string()));
            }
            copy_tree(site_dir, dist)?;
        }

        let api = dist.join("api");
        write_kind(&api, RecordKind::Warband, &dataset.warbands)?;
        write_kind(&api, RecordKind::Unit, &dataset.units)?;

        let index = json!({
            "generated_at": Utc::now().to_rfc3339(),
            "counts": {
                "warbands": dataset.warbands.len(),
                "units": dataset.units.len(),
            },
        });
        write_json(&api.join("index.json"), &index)?;

        info!(dist = %dist.display(), "dist tree generated");
        Ok(ExportSummary {
            warbands: dataset.warbands.len(),
            units: dataset.units.len(),
            dist_dir: dist.clone(),
        })
    }
}

/// Writes the listing and the per-record detail payloads for one kind.
fn write_kind(api: &Path, kind: RecordKind, records: &[Record]) -> Result<(), ExportError> {
    let listing: Vec<_> = records.iter().map(|r| &r.body).collect();
    write_json(&api.join(format!("{}.json", kind.dir_name())), &listing)?;

    let detail_dir = api.join(kind.dir_name());
    for record in records {
        let id = record
            .id()
            .ok_or_else(|| ExportError::MissingRecordId(record.file()))?;
        write_json(&detail_dir.join(format!("{id}.json")), &record.body)?;
    }
    Ok(())
}

/// Serializes a payload as pretty-printed JSON, creating parent directories.
fn write_json<T: Serialize>(path: &Path, payload: &T) -> Result<(), ExportError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut content = serde_json::to_string_pretty(payload)?;
    content.push('\n');
    fs::write(path, content)?;
    Ok(())
}

/// Recursively copies `src` into `dst`, preserving the relative layout.
fn copy_tree(src: &Path, dst: &Path) -> Result<(), ExportError> {
    for entry in WalkDir::new(src) {
        let entry = entry.map_err(std::io::Error::from)?;
        let Ok(rel) = entry.path().strip_prefix(src) else {
            continue;
        };
        let target = dst.join(rel);
        if entry.file_type().is_dir() {
            fs::create_dir_all(&target)?;
        } else {
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::copy(entry.path(), &target)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;
    use tempfile::tempdir;

    fn record(file: &str, yaml: &str) -> Record {
        let dir = tempdir().expect("failed to create temp dir");
        let path = dir.path().join(file);
        fs::write(&path, yaml).expect("write record");
        crate::record::load_file(&path).expect("load record")
    }

    fn sample_dataset() -> Dataset {
        Dataset {
            warbands: vec![record(
                "raiders.yml",
                "id: raiders\nname: Raiders\nunit_ids: [scout]\n",
            )],
            units: vec![record(
                "scout.yml",
                "id: scout\nname: Scout\nwarband_ids: [raiders]\n",
            )],
        }
    }

    fn read_json(path: &Path) -> Value {
        let content = fs::read_to_string(path).expect("read json");
        serde_json::from_str(&content).expect("parse json")
    }

    #[test]
    fn test_build_writes_api_tree() {
        let out = tempdir().expect("failed to create temp dir");
        let dist = out.path().join("dist");
        let builder = SiteBuilder::new(ExportConfig {
            dist_dir: dist.clone(),
            site_dir: None,
        });

        let summary = builder.build(&sample_dataset()).expect("build failed");
        assert_eq!(summary.warbands, 1);
        assert_eq!(summary.units, 1);

        let warbands = read_json(&dist.join("api/warbands.json"));
        assert_eq!(warbands.as_array().map(Vec::len), Some(1));
        assert_eq!(warbands[0]["id"], "raiders");

        let scout = read_json(&dist.join("api/units/scout.json"));
        assert_eq!(scout["id"], "scout");
        assert_eq!(scout["warband_ids"][0], "raiders");
        // Diagnostic metadata never reaches the payload.
        assert!(scout.get("source").is_none());

        let index = read_json(&dist.join("api/index.json"));
        assert_eq!(index["counts"]["warbands"], 1);
        assert_eq!(index["counts"]["units"], 1);
        assert!(index["generated_at"].is_string());
    }

    #[test]
    fn test_build_replaces_previous_output() {
        let out = tempdir().expect("failed to create temp dir");
        let dist = out.path().join("dist");
        fs::create_dir_all(&dist).expect("mkdir");
        fs::write(dist.join("stale.json"), "{}").expect("write stale file");

        let builder = SiteBuilder::new(ExportConfig {
            dist_dir: dist.clone(),
            site_dir: None,
        });
        builder.build(&sample_dataset()).expect("build failed");

        assert!(!dist.join("stale.json").exists());
        assert!(dist.join("api/index.json").exists());
    }

    #[test]
    fn test_build_copies_site_assets() {
        let out = tempdir().expect("failed to create temp dir");
        let site = out.path().join("site");
        fs::create_dir_all(site.join("css")).expect("mkdir");
        fs::write(site.join("index.html"), "<html></html>").expect("write");
        fs::write(site.join("css/main.css"), "body {}").expect("write");

        let dist = out.path().join("dist");
        let builder = SiteBuilder::new(ExportConfig {
            dist_dir: dist.clone(),
            site_dir: Some(site),
        });
        builder.build(&sample_dataset()).expect("build failed");

        assert!(dist.join("index.html").exists());
        assert!(dist.join("css/main.css").exists());
        assert!(dist.join("api/warbands/raiders.json").exists());
    }

    #[test]
    fn test_missing_site_dir_is_an_error() {
        let out = tempdir().expect("failed to create temp dir");
        let builder = SiteBuilder::new(ExportConfig {
            dist_dir: out.path().join("dist"),
            site_dir: Some(out.path().join("no-such-site")),
        });
        let result = builder.build(&sample_dataset());
        assert!(matches!(result, Err(ExportError::MissingSiteDir(_))));
    }

    #[test]
    fn test_record_without_id_is_an_error() {
        let out = tempdir().expect("failed to create temp dir");
        let dataset = Dataset {
            warbands: vec![record("raiders.yml", "name: Raiders\n")],
            units: Vec::new(),
        };
        let builder = SiteBuilder::new(ExportConfig {
            dist_dir: out.path().join("dist"),
            site_dir: None,
        });
        let result = builder.build(&dataset);
        assert!(matches!(result, Err(ExportError::MissingRecordId(_))));
    }
}
