//! Resolves a job configuration and preset into a concrete execution plan.

use serde::{Deserialize, Serialize};
use toksweep_core::{
    AxisValue, ErrorInfo, JobConfig, Preset, RunStamp, SweepAxis, SweepConfig, SweepError,
};

/// Defaults bundled with a named preset.
struct PresetBundle {
    sample_lines: usize,
    repeats: u32,
    sweeps: SweepConfig,
}

fn preset_bundle(preset: Preset) -> Option<PresetBundle> {
    match preset {
        Preset::Fast => Some(PresetBundle {
            sample_lines: 8,
            repeats: 5,
            sweeps: SweepConfig {
                ascii_ratio: vec![0.0, 0.5, 1.0],
                emoji_count: vec![2],
                url_on: vec![1],
                normalize: vec!["NFC".to_string(), "NFD".to_string()],
                zwj_on: vec![1],
                perturbations: vec![2],
            },
        }),
        Preset::Full => Some(PresetBundle {
            sample_lines: 32,
            repeats: 7,
            sweeps: SweepConfig {
                ascii_ratio: vec![0.0, 0.25, 0.5, 0.75, 1.0],
                emoji_count: vec![1, 4, 8],
                url_on: vec![1],
                normalize: vec![
                    "NFC".to_string(),
                    "NFD".to_string(),
                    "NFKC".to_string(),
                    "NFKD".to_string(),
                ],
                zwj_on: vec![1],
                perturbations: vec![1, 3, 6],
            },
        }),
        Preset::Custom => None,
    }
}

/// Fully resolved runtime plan; nothing optional flows past this point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedPlan {
    /// Job identifier the plan was resolved for.
    pub job_id: String,
    /// Preset the defaults came from.
    pub preset: Preset,
    /// Master seed for all sub-seed derivation.
    pub seed: u32,
    /// Number of corpus lines to sample.
    pub sample_lines: usize,
    /// Timed repetitions per measurement.
    pub repeats: u32,
    /// Row count per streamed progress chunk.
    pub chunk_size: usize,
    /// Fully resolved per-axis value lists.
    pub sweeps: SweepConfig,
    /// Axes swept in fixed order, paired with their resolved values.
    /// An axis with an empty value list never appears here, even when
    /// nominally enabled.
    pub axes: Vec<(SweepAxis, Vec<AxisValue>)>,
}

impl ResolvedPlan {
    /// Rows emitted per (tokenizer, line): one baseline plus every swept
    /// value.
    pub fn rows_per_line(&self) -> usize {
        1 + self.axes.iter().map(|(_, values)| values.len()).sum::<usize>()
    }

    /// Total planned row count, computable before any work starts.
    pub fn total_rows(&self, sampled_line_count: usize, tokenizer_count: usize) -> usize {
        sampled_line_count * tokenizer_count * self.rows_per_line()
    }

    /// Axes that ended up swept, in fixed order.
    pub fn enabled_axes(&self) -> Vec<SweepAxis> {
        self.axes.iter().map(|(axis, _)| *axis).collect()
    }

    /// Provenance stamp echoing the resolved configuration.
    pub fn stamp(&self) -> RunStamp {
        RunStamp {
            preset: self.preset,
            seed: self.seed,
            sample_lines: self.sample_lines,
            repeats: self.repeats,
            enabled_axes: self.enabled_axes(),
            sweeps: self.sweeps.clone(),
        }
    }
}

/// Resolves `config` into a [`ResolvedPlan`].
///
/// Configuration errors are rejected here, before any tokenizer work
/// begins.
pub fn resolve(config: &JobConfig) -> Result<ResolvedPlan, SweepError> {
    if config.lines.is_empty() {
        return Err(SweepError::Config(
            ErrorInfo::new("empty-lines", "job has no input lines")
                .with_context("job_id", config.job_id.clone()),
        ));
    }
    if config.tokenizers.is_empty() {
        return Err(SweepError::Config(
            ErrorInfo::new("empty-tokenizers", "job names no tokenizers")
                .with_context("job_id", config.job_id.clone()),
        ));
    }
    if config.sample_lines == Some(0) {
        return Err(SweepError::Config(
            ErrorInfo::new("zero-sample", "sample_lines must be at least 1")
                .with_context("job_id", config.job_id.clone())
                .with_hint("omit sample_lines to use the preset default"),
        ));
    }
    if config.repeats == Some(0) {
        return Err(SweepError::Config(
            ErrorInfo::new("zero-repeats", "repeats must be at least 1")
                .with_context("job_id", config.job_id.clone()),
        ));
    }

    let bundle = preset_bundle(config.preset);
    let sample_lines = match (config.sample_lines, &bundle) {
        (Some(requested), _) => requested,
        (None, Some(bundle)) => bundle.sample_lines,
        // custom without an explicit count samples the whole corpus
        (None, None) => config.lines.len(),
    };
    let repeats = match (config.repeats, &bundle) {
        (Some(requested), _) => requested,
        (None, Some(bundle)) => bundle.repeats,
        (None, None) => 5,
    };

    let defaults = bundle.map(|b| b.sweeps).unwrap_or_default();
    let overrides = &config.sweeps;
    let sweeps = SweepConfig {
        ascii_ratio: overrides
            .ascii_ratio
            .clone()
            .unwrap_or(defaults.ascii_ratio),
        emoji_count: overrides
            .emoji_count
            .clone()
            .unwrap_or(defaults.emoji_count),
        url_on: overrides.url_on.clone().unwrap_or(defaults.url_on),
        normalize: overrides.normalize.clone().unwrap_or(defaults.normalize),
        zwj_on: overrides.zwj_on.clone().unwrap_or(defaults.zwj_on),
        perturbations: overrides
            .perturbations
            .clone()
            .unwrap_or(defaults.perturbations),
    };

    // Fixed axis order regardless of how the caller listed enabled_axes.
    let axes: Vec<(SweepAxis, Vec<AxisValue>)> = SweepAxis::ALL
        .iter()
        .filter(|axis| config.enabled_axes.contains(axis))
        .map(|axis| (*axis, sweeps.values_for(*axis)))
        .filter(|(_, values)| !values.is_empty())
        .collect();

    Ok(ResolvedPlan {
        job_id: config.job_id.clone(),
        preset: config.preset,
        seed: config.master_seed(),
        sample_lines,
        repeats,
        chunk_size: config.effective_chunk_size(),
        sweeps,
        axes,
    })
}
