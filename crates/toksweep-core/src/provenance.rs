//! Provenance descriptors embedded in every output row and manifest.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::config::{Preset, SweepAxis, SweepConfig};

/// Resolved run configuration echoed into the provenance payload so a row is
/// reproducible from its own metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunStamp {
    /// Preset the job resolved from.
    pub preset: Preset,
    /// Master seed used for all sub-seed derivation.
    pub seed: u32,
    /// Number of corpus lines sampled.
    pub sample_lines: usize,
    /// Timed repetitions per measurement.
    pub repeats: u32,
    /// Axes that were actually swept, in fixed order.
    pub enabled_axes: Vec<SweepAxis>,
    /// Fully resolved per-axis value lists.
    pub sweeps: SweepConfig,
}

/// Environment and version identification attached to every row.
///
/// The schema keeps the browser-era field names for downstream tooling; on a
/// native host `browser_ua` carries the host identification string and the
/// tokenizer runtime versions live in [`RunProvenance::tool_versions`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct RunProvenance {
    /// Host identification string (user-agent analogue).
    pub browser_ua: String,
    /// Operating system / architecture tag.
    pub os_platform: String,
    /// Application version producing the rows.
    pub app_version: String,
    /// Version map for tokenizer runtimes and tools involved in the run.
    pub tool_versions: BTreeMap<String, String>,
    /// Hash of the tokenizer artifact in use, empty when none was loaded.
    pub wasm_hash: String,
    /// Source revision of the application, `"unknown"` when unavailable.
    pub commit_sha: String,
    /// ISO-8601 UTC timestamp recording when the run started.
    pub timestamp_utc: String,
    /// Resolved run configuration.
    pub run: Option<RunStamp>,
}

impl RunProvenance {
    /// Captures host identification for the current process.
    pub fn for_host(app_version: &str, commit_sha: Option<&str>) -> Self {
        let os_platform = format!("{} {}", std::env::consts::OS, std::env::consts::ARCH);
        Self {
            browser_ua: format!("toksweep/{app_version} ({os_platform})"),
            os_platform,
            app_version: app_version.to_string(),
            tool_versions: BTreeMap::new(),
            wasm_hash: String::new(),
            commit_sha: commit_sha.unwrap_or("unknown").to_string(),
            timestamp_utc: chrono::Utc::now().to_rfc3339(),
            run: None,
        }
    }

    /// Records a tool/runtime version.
    pub fn with_tool(mut self, name: impl Into<String>, version: impl Into<String>) -> Self {
        self.tool_versions.insert(name.into(), version.into());
        self
    }

    /// Attaches the resolved run configuration.
    pub fn with_run(mut self, run: RunStamp) -> Self {
        self.run = Some(run);
        self
    }

    /// Version lookup used for the fixed CSV runtime columns.
    pub fn tool_version(&self, name: &str) -> &str {
        self.tool_versions.get(name).map(String::as_str).unwrap_or("")
    }
}
