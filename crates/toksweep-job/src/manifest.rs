//! Run manifest persistence.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use toksweep_core::{ErrorInfo, JobConfig, RunProvenance, SweepError};

use crate::hash::stable_hash_string;
use crate::protocol::JobState;

/// Structured manifest describing a completed or failed sweep run.
///
/// Written next to the CSV artifact so a result file can always be traced
/// back to the exact configuration and environment that produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunManifest {
    /// Configuration the job was submitted with.
    pub config: JobConfig,
    /// Stable hash of `config`.
    pub config_hash: String,
    /// Master seed all row sub-seeds derive from.
    pub master_seed: u32,
    /// Host and run identification.
    pub provenance: RunProvenance,
    /// Terminal state of the run.
    pub state: JobState,
    /// Rows actually written.
    pub rows_written: usize,
    /// Rows the plan called for.
    pub total_rows: usize,
    /// Wall-clock duration of the run in milliseconds.
    pub duration_ms: f64,
    /// CSV artifact (relative to the manifest's directory).
    pub csv_file: Option<PathBuf>,
    /// Event log artifact (relative to the manifest's directory).
    pub events_file: Option<PathBuf>,
    /// Failure description when `state` is [`JobState::Error`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl RunManifest {
    /// Computes the stable hash for a job configuration.
    pub fn config_hash(config: &JobConfig) -> Result<String, SweepError> {
        stable_hash_string(config)
    }

    /// Writes the manifest to a JSON file, creating parent directories as
    /// needed.
    pub fn write(&self, path: &Path) -> Result<(), SweepError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|err| {
                SweepError::Io(
                    ErrorInfo::new("manifest-mkdir", err.to_string())
                        .with_context("path", parent.display().to_string()),
                )
            })?;
        }
        let json = serde_json::to_string_pretty(self).map_err(|err| {
            SweepError::Serde(
                ErrorInfo::new("manifest-serialize", err.to_string())
                    .with_context("path", path.display().to_string()),
            )
        })?;
        fs::write(path, json).map_err(|err| {
            SweepError::Io(
                ErrorInfo::new("manifest-write", err.to_string())
                    .with_context("path", path.display().to_string()),
            )
        })
    }

    /// Loads a manifest from disk.
    pub fn load(path: &Path) -> Result<Self, SweepError> {
        let contents = fs::read_to_string(path).map_err(|err| {
            SweepError::Io(
                ErrorInfo::new("manifest-read", err.to_string())
                    .with_context("path", path.display().to_string()),
            )
        })?;
        serde_json::from_str(&contents).map_err(|err| {
            SweepError::Serde(
                ErrorInfo::new("manifest-parse", err.to_string())
                    .with_context("path", path.display().to_string()),
            )
        })
    }
}
