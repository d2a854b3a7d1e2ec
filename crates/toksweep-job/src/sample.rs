//! Deterministic corpus line sampling.

use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use toksweep_core::{sub_seed, SeededRng};

/// One sampled corpus line with its original position retained for
/// provenance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SampledLine {
    /// Zero-based index of the line in the original corpus.
    pub index: usize,
    /// Original line text.
    pub text: String,
}

/// Selects up to `sample_count` non-blank lines.
///
/// When the non-blank corpus fits the request, all lines come back in
/// original order; otherwise a seeded Fisher–Yates shuffle of index
/// positions picks the sample. The shuffle uses the dedicated
/// `(seed, "sampling")` sub-seed so selection is stable across axis and
/// tokenizer iteration.
pub fn sample_lines(lines: &[String], sample_count: usize, master_seed: u32) -> Vec<SampledLine> {
    let filtered: Vec<SampledLine> = lines
        .iter()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(index, line)| SampledLine {
            index,
            text: line.clone(),
        })
        .collect();
    if filtered.len() <= sample_count {
        return filtered;
    }
    let mut positions: Vec<usize> = (0..filtered.len()).collect();
    let mut rng = SeededRng::new(sub_seed(master_seed, &["sampling".into()]));
    positions.shuffle(&mut rng);
    positions.truncate(sample_count);
    positions
        .into_iter()
        .map(|position| filtered[position].clone())
        .collect()
}
