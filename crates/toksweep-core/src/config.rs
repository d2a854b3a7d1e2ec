//! Job configuration schema: axes, sweep values, presets and settings.

use serde::{Deserialize, Serialize};

use crate::rng::{hash_seed, SeedPart};

/// One independently sweepable mutation dimension.
///
/// Iteration order is fixed (exactly [`SweepAxis::ALL`]) regardless of the
/// order axes appear in a configuration object; the planned row order and
/// therefore the output stream depend on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SweepAxis {
    /// Target UTF-8 byte-level ASCII ratio of the mutated text.
    AsciiRatio,
    /// Number of emoji appended to the text.
    EmojiCount,
    /// Whether a canonical URL is injected.
    UrlOn,
    /// Unicode normalization form applied to the final text.
    Normalize,
    /// Whether a zero-width joiner is inserted into a conjunct cluster.
    ZwjOn,
    /// Number of random character edits applied.
    Perturbations,
}

impl SweepAxis {
    /// Fixed deterministic iteration order over all axes.
    pub const ALL: [SweepAxis; 6] = [
        SweepAxis::AsciiRatio,
        SweepAxis::EmojiCount,
        SweepAxis::UrlOn,
        SweepAxis::Normalize,
        SweepAxis::ZwjOn,
        SweepAxis::Perturbations,
    ];

    /// Stable wire name used in CSV rows and seed folding.
    pub fn as_str(&self) -> &'static str {
        match self {
            SweepAxis::AsciiRatio => "ascii_ratio",
            SweepAxis::EmojiCount => "emoji_count",
            SweepAxis::UrlOn => "url_on",
            SweepAxis::Normalize => "normalize",
            SweepAxis::ZwjOn => "zwj_on",
            SweepAxis::Perturbations => "perturbations",
        }
    }
}

/// One concrete value along a sweep axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AxisValue {
    /// Numeric axis value (ratios, counts, 0/1 flags).
    Number(f64),
    /// Textual axis value (normalization forms).
    Text(String),
}

impl AxisValue {
    /// Canonical string rendering used for the CSV `x_value` column.
    pub fn render(&self) -> String {
        match self {
            AxisValue::Number(v) if v.fract() == 0.0 && v.is_finite() => {
                format!("{}", *v as i64)
            }
            AxisValue::Number(v) => format!("{v}"),
            AxisValue::Text(s) => s.clone(),
        }
    }

    /// Seed-folding part for this value.
    pub fn seed_part(&self) -> SeedPart {
        match self {
            AxisValue::Number(v) => SeedPart::Float(*v),
            AxisValue::Text(s) => SeedPart::Str(s.clone()),
        }
    }
}

/// Fully resolved per-axis candidate value lists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct SweepConfig {
    /// Target ASCII byte ratios in `[0, 1]`.
    pub ascii_ratio: Vec<f64>,
    /// Appended emoji counts.
    pub emoji_count: Vec<u32>,
    /// URL injection flags (`0`/`1`).
    pub url_on: Vec<u8>,
    /// Normalization form tags (`"NFC"`, `"NFD"`, ...).
    pub normalize: Vec<String>,
    /// ZWJ insertion flags (`0`/`1`).
    pub zwj_on: Vec<u8>,
    /// Random edit counts.
    pub perturbations: Vec<u32>,
}

impl SweepConfig {
    /// Returns the configured values for one axis in sweep order.
    pub fn values_for(&self, axis: SweepAxis) -> Vec<AxisValue> {
        match axis {
            SweepAxis::AsciiRatio => self
                .ascii_ratio
                .iter()
                .map(|v| AxisValue::Number(*v))
                .collect(),
            SweepAxis::EmojiCount => self
                .emoji_count
                .iter()
                .map(|v| AxisValue::Number(*v as f64))
                .collect(),
            SweepAxis::UrlOn => self.url_on.iter().map(|v| AxisValue::Number(*v as f64)).collect(),
            SweepAxis::Normalize => self
                .normalize
                .iter()
                .map(|v| AxisValue::Text(v.clone()))
                .collect(),
            SweepAxis::ZwjOn => self.zwj_on.iter().map(|v| AxisValue::Number(*v as f64)).collect(),
            SweepAxis::Perturbations => self
                .perturbations
                .iter()
                .map(|v| AxisValue::Number(*v as f64))
                .collect(),
        }
    }
}

/// Caller-supplied partial sweep values; unset axes fall back to the preset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct SweepOverrides {
    /// Override for [`SweepAxis::AsciiRatio`].
    #[serde(default)]
    pub ascii_ratio: Option<Vec<f64>>,
    /// Override for [`SweepAxis::EmojiCount`].
    #[serde(default)]
    pub emoji_count: Option<Vec<u32>>,
    /// Override for [`SweepAxis::UrlOn`].
    #[serde(default)]
    pub url_on: Option<Vec<u8>>,
    /// Override for [`SweepAxis::Normalize`].
    #[serde(default)]
    pub normalize: Option<Vec<String>>,
    /// Override for [`SweepAxis::ZwjOn`].
    #[serde(default)]
    pub zwj_on: Option<Vec<u8>>,
    /// Override for [`SweepAxis::Perturbations`].
    #[serde(default)]
    pub perturbations: Option<Vec<u32>>,
}

/// Named defaults bundle selecting sample size, repeats and sweep values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Preset {
    /// Small sample, coarse axis grids.
    #[default]
    Fast,
    /// Larger sample, dense axis grids.
    Full,
    /// Caller supplies all values explicitly.
    Custom,
}

impl Preset {
    /// Stable name used in provenance and manifests.
    pub fn as_str(&self) -> &'static str {
        match self {
            Preset::Fast => "fast",
            Preset::Full => "full",
            Preset::Custom => "custom",
        }
    }
}

/// Target for the ASCII-ratio mutation stage.
///
/// The neutral baseline preserves the corpus text as-is; a swept value of
/// `0.0` is a real dilution target, so the two must stay distinct types
/// rather than sharing a sentinel number.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", content = "value", rename_all = "lowercase")]
pub enum AsciiTarget {
    /// Leave the ratio of the incoming text untouched.
    Preserve,
    /// Steer the UTF-8 byte-level ASCII ratio towards the given target.
    Target(f64),
}

/// Fully populated mutation settings vector, one field per axis.
///
/// Immutable per mutation call; sweeping derives a new value by overriding
/// exactly one axis from [`MutationSettings::baseline`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MutationSettings {
    /// ASCII byte ratio target.
    pub ascii_ratio: AsciiTarget,
    /// Number of emoji to append.
    pub emoji_count: u32,
    /// Inject a canonical URL when absent.
    pub url_on: bool,
    /// Normalization form tag; unknown tags leave the text as-is.
    pub normalize: String,
    /// Insert a ZWJ into the first eligible conjunct cluster.
    pub zwj_on: bool,
    /// Number of random character edits.
    pub perturbations: u32,
}

impl MutationSettings {
    /// All axes at their neutral value.
    pub fn baseline() -> Self {
        Self {
            ascii_ratio: AsciiTarget::Preserve,
            emoji_count: 0,
            url_on: false,
            normalize: "NFC".to_string(),
            zwj_on: false,
            perturbations: 0,
        }
    }

    /// Derives settings with exactly one axis overridden from the baseline.
    pub fn with_axis(axis: SweepAxis, value: &AxisValue) -> Self {
        let mut settings = Self::baseline();
        match (axis, value) {
            (SweepAxis::AsciiRatio, AxisValue::Number(v)) => {
                settings.ascii_ratio = AsciiTarget::Target(v.clamp(0.0, 1.0));
            }
            (SweepAxis::EmojiCount, AxisValue::Number(v)) => {
                settings.emoji_count = non_negative_count(*v);
            }
            (SweepAxis::UrlOn, AxisValue::Number(v)) => settings.url_on = *v != 0.0,
            (SweepAxis::Normalize, AxisValue::Text(form)) => {
                settings.normalize = form.clone();
            }
            (SweepAxis::ZwjOn, AxisValue::Number(v)) => settings.zwj_on = *v != 0.0,
            (SweepAxis::Perturbations, AxisValue::Number(v)) => {
                settings.perturbations = non_negative_count(*v);
            }
            // Mismatched value kinds leave the axis at its neutral value.
            _ => {}
        }
        settings
    }
}

fn non_negative_count(v: f64) -> u32 {
    if v.is_nan() || v <= 0.0 {
        0
    } else {
        v as u32
    }
}

fn default_chunk_size() -> usize {
    25
}

/// One benchmark job as submitted by the host.
///
/// Optional fields are resolved exactly once by the planner; nothing past
/// the planner carries unresolved defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobConfig {
    /// Caller-chosen job identifier, folded into the derived seed.
    pub job_id: String,
    /// Input corpus lines in original order. May be left empty in a config
    /// file when the corpus is supplied separately.
    #[serde(default)]
    pub lines: Vec<String>,
    /// Tokenizer identifiers in execution order.
    pub tokenizers: Vec<String>,
    /// Preset selector.
    #[serde(default)]
    pub preset: Preset,
    /// Per-axis sweep value overrides.
    #[serde(default)]
    pub sweeps: SweepOverrides,
    /// Axes nominally enabled for sweeping; empty value lists are skipped.
    #[serde(default = "default_enabled_axes")]
    pub enabled_axes: Vec<SweepAxis>,
    /// Number of corpus lines to sample.
    #[serde(default)]
    pub sample_lines: Option<usize>,
    /// Timed repetitions per measurement.
    #[serde(default)]
    pub repeats: Option<u32>,
    /// Row count per streamed progress chunk.
    #[serde(default)]
    pub chunk_size: Option<usize>,
    /// Explicit master seed; derived from job identity when absent.
    #[serde(default)]
    pub seed: Option<u32>,
}

fn default_enabled_axes() -> Vec<SweepAxis> {
    SweepAxis::ALL.to_vec()
}

impl JobConfig {
    /// Returns the master seed, deriving one deterministically from the job
    /// id, line count and tokenizer list when no explicit seed was given.
    pub fn master_seed(&self) -> u32 {
        match self.seed {
            Some(seed) => seed,
            None => hash_seed(&[
                SeedPart::Str(self.job_id.clone()),
                SeedPart::Int(self.lines.len() as u64),
                SeedPart::Str(self.tokenizers.join(",")),
            ]),
        }
    }

    /// Effective chunk size for progress events.
    pub fn effective_chunk_size(&self) -> usize {
        self.chunk_size.unwrap_or_else(default_chunk_size).max(1)
    }
}
