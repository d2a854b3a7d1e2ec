#![deny(missing_docs)]
//! Outlier-robust latency measurement for single-text tokenization.
//!
//! The protocol guards against timer-resolution noise: an untimed trial
//! encode estimates single-call latency, and calls faster than the batching
//! threshold are measured in timed blocks of [`BATCH_LOOP_COUNT`] encodes
//! divided by the loop count. Samples reduce to median/MAD.

use std::time::Instant;

use toksweep_core::SweepError;
use toksweep_core::Tokenizer;

pub mod stats;

pub use stats::{median, median_absolute_deviation, spread_is_significant};

/// Single-call latency below which batched timing takes over, in ms.
pub const BATCH_THRESHOLD_MS: f64 = 0.05;
/// Encodes per timed block in batched mode.
pub const BATCH_LOOP_COUNT: u32 = 100;
/// Lower bound on timed repetitions regardless of configuration.
pub const MIN_REPEATS: u32 = 5;

/// Timed-operation tag for per-call measurements.
pub const TIMED_OP_SINGLE: &str = "encode";
/// Timed-operation tag for batched measurements.
pub const TIMED_OP_BATCHED: &str = "encode_x100";

/// Reduced latency estimate for one (tokenizer, text) pair.
#[derive(Debug, Clone, PartialEq)]
pub struct Measurement {
    /// Median per-call latency in milliseconds.
    pub median_ms: f64,
    /// Median absolute deviation of the samples in milliseconds.
    pub mad_ms: f64,
    /// Number of timed repetitions taken.
    pub repeats: u32,
    /// Which operation was timed (`encode` or `encode_x100`).
    pub timed_op: &'static str,
    /// Raw per-repetition samples, retained only when the spread is
    /// significant per [`stats::spread_is_significant`].
    pub samples_ms: Option<Vec<f64>>,
}

/// Measures per-call tokenization latency for `text`.
///
/// `repeats` is clamped to [`MIN_REPEATS`]. Encode failures propagate and
/// any partial timing data is discarded.
pub fn measure(
    tokenizer: &dyn Tokenizer,
    text: &str,
    repeats: u32,
) -> Result<Measurement, SweepError> {
    // Untimed trial to pick the timing mode; its duration is never recorded
    // as a sample.
    let trial_start = Instant::now();
    tokenizer.encode(text)?;
    let trial_ms = trial_start.elapsed().as_secs_f64() * 1_000.0;
    let batched = trial_ms < BATCH_THRESHOLD_MS;

    let reps = repeats.max(MIN_REPEATS);
    let mut samples = Vec::with_capacity(reps as usize);
    for _ in 0..reps {
        let sample_ms = if batched {
            let start = Instant::now();
            for _ in 0..BATCH_LOOP_COUNT {
                tokenizer.encode(text)?;
            }
            start.elapsed().as_secs_f64() * 1_000.0 / BATCH_LOOP_COUNT as f64
        } else {
            let start = Instant::now();
            tokenizer.encode(text)?;
            start.elapsed().as_secs_f64() * 1_000.0
        };
        samples.push(sample_ms);
    }

    let median_ms = stats::median(&samples);
    let mad_ms = stats::median_absolute_deviation(&samples);
    let samples_ms = if stats::spread_is_significant(&samples) {
        Some(samples)
    } else {
        None
    };

    Ok(Measurement {
        median_ms,
        mad_ms,
        repeats: reps,
        timed_op: if batched { TIMED_OP_BATCHED } else { TIMED_OP_SINGLE },
        samples_ms,
    })
}
