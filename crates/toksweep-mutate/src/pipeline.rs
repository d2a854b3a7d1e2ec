//! The seven-stage mutation pipeline.
//!
//! Stage order is part of the determinism contract: ZWJ context guarantee,
//! ZWJ insertion, URL injection, emoji appending, random perturbations,
//! ASCII ratio targeting, Unicode normalization. All RNG draws come from the
//! caller's per-row generator in a fixed sequence, so a given
//! `(settings, seed)` pair reproduces the same text on every run. The
//! pipeline never fails: out-of-range inputs are clamped and unknown
//! normalization forms leave the text as-is.

use serde::{Deserialize, Serialize};
use toksweep_core::{AsciiTarget, MutationSettings, SeededRng};
use unicode_normalization::UnicodeNormalization;

use crate::banks::{
    conjunct_for, non_ascii_fillers, ASCII_FILLERS, CANONICAL_URL, EMOJI_BANK, PUNCTUATION,
};
use crate::slice::Slice;

/// Acceptable distance from the requested ASCII byte ratio.
pub const ASCII_TOLERANCE: f64 = 0.02;
/// Upper bound on filler appends; guarantees termination when the tolerance
/// is unreachable (e.g. target 0 with irreducible ASCII punctuation).
pub const MAX_FILL_ATTEMPTS: usize = 400;

/// Outcome of one mutation application.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MutationResult {
    /// Final mutated text.
    pub text: String,
    /// ASCII byte ratio of the final text, recomputed after normalization.
    pub ascii_ratio: f64,
    /// Normalization form that was requested.
    pub normalization: String,
    /// Emoji actually appended.
    pub emoji_count: u32,
    /// `1` when a URL was injected, `0` when one already existed or the
    /// axis was off.
    pub url_applied: u8,
    /// `1` when a ZWJ was inserted, `0` when no eligible cluster existed.
    pub zwj_applied: u8,
    /// Random edits applied.
    pub perturbations: u32,
}

/// UTF-8 byte-level ASCII ratio; `0.0` for empty text.
pub fn ascii_byte_ratio(text: &str) -> f64 {
    if text.is_empty() {
        return 0.0;
    }
    let ascii = text.bytes().filter(|b| b.is_ascii()).count();
    ascii as f64 / text.len() as f64
}

/// Applies the full mutation pipeline to one line of text.
pub fn mutate(
    base: &str,
    slice: Slice,
    settings: &MutationSettings,
    rng: &mut SeededRng,
) -> MutationResult {
    let mut text = base.to_string();

    ensure_conjunct_context(&mut text, slice);
    let zwj_applied = insert_zwj(&mut text, settings.zwj_on);
    let url_applied = inject_url(&mut text, settings.url_on);
    append_emoji(&mut text, settings.emoji_count);
    apply_perturbations(&mut text, settings.perturbations, rng);
    if let AsciiTarget::Target(raw) = settings.ascii_ratio {
        if raw.is_finite() {
            steer_ascii_ratio(&mut text, raw.clamp(0.0, 1.0), slice, rng);
        }
    }
    text = apply_normalization(&text, &settings.normalize);

    MutationResult {
        ascii_ratio: ascii_byte_ratio(&text),
        normalization: settings.normalize.clone(),
        emoji_count: settings.emoji_count,
        url_applied,
        zwj_applied,
        perturbations: settings.perturbations,
        text,
    }
}

fn is_devanagari_consonant(c: char) -> bool {
    matches!(c, '\u{0915}'..='\u{0939}' | '\u{0958}'..='\u{095F}')
}

fn is_kannada_consonant(c: char) -> bool {
    matches!(c, '\u{0C95}'..='\u{0CB9}')
}

/// Returns the char index of the virama of the first eligible
/// consonant-virama-consonant cluster.
fn find_conjunct(chars: &[char]) -> Option<usize> {
    if chars.len() < 3 {
        return None;
    }
    for i in 1..chars.len() - 1 {
        let eligible = match chars[i] {
            '\u{094D}' => {
                is_devanagari_consonant(chars[i - 1]) && is_devanagari_consonant(chars[i + 1])
            }
            '\u{0CCD}' => is_kannada_consonant(chars[i - 1]) && is_kannada_consonant(chars[i + 1]),
            _ => false,
        };
        if eligible {
            return Some(i);
        }
    }
    None
}

/// Stage 1: conjunct-script slices always get at least one eligible cluster
/// so the ZWJ axis is exercisable.
fn ensure_conjunct_context(text: &mut String, slice: Slice) {
    if !slice.has_conjunct_script() {
        return;
    }
    let chars: Vec<char> = text.chars().collect();
    if find_conjunct(&chars).is_none() {
        if !text.is_empty() {
            text.push(' ');
        }
        text.push_str(conjunct_for(slice));
    }
}

/// Stage 2: insert a ZWJ inside the first eligible cluster.
fn insert_zwj(text: &mut String, zwj_on: bool) -> u8 {
    if !zwj_on {
        return 0;
    }
    let mut chars: Vec<char> = text.chars().collect();
    match find_conjunct(&chars) {
        Some(virama) => {
            chars.insert(virama + 1, '\u{200D}');
            *text = chars.into_iter().collect();
            1
        }
        None => 0,
    }
}

/// Stage 3: append the canonical URL unless one is already present.
fn inject_url(text: &mut String, url_on: bool) -> u8 {
    if !url_on || text.contains("https://") {
        return 0;
    }
    let trimmed = text.trim_end().len();
    text.truncate(trimmed);
    if !text.is_empty() {
        text.push(' ');
    }
    text.push_str(CANONICAL_URL);
    1
}

/// Stage 4: append `count` emoji cycling through the bank.
fn append_emoji(text: &mut String, count: u32) {
    if count == 0 {
        return;
    }
    let trimmed = text.trim_end().len();
    text.truncate(trimmed);
    for i in 0..count as usize {
        if !text.is_empty() {
            text.push(' ');
        }
        text.push_str(EMOJI_BANK[i % EMOJI_BANK.len()]);
    }
}

/// Stage 5: `count` independent random edits, each drawing op then
/// position(s) from the per-row RNG in a fixed order.
fn apply_perturbations(text: &mut String, count: u32, rng: &mut SeededRng) {
    if count == 0 {
        return;
    }
    let mut chars: Vec<char> = text.chars().collect();
    for _ in 0..count {
        match rng.next_index(3) {
            0 => {
                let pos = rng.next_index(chars.len() + 1);
                let letter = (b'a' + rng.next_index(26) as u8) as char;
                chars.insert(pos, letter);
            }
            1 => {
                if chars.len() >= 2 {
                    let pos = rng.next_index(chars.len() - 1);
                    chars.swap(pos, pos + 1);
                }
            }
            _ => {
                if !chars.is_empty() {
                    let pos = rng.next_index(chars.len());
                    if let Some(mark) = rng.pick(&PUNCTUATION) {
                        chars[pos] = *mark;
                    }
                }
            }
        }
    }
    *text = chars.into_iter().collect();
}

/// Stage 6: append filler words until the ASCII byte ratio is within
/// tolerance of the target, bounded by [`MAX_FILL_ATTEMPTS`].
///
/// Low targets append without a word separator: a space per filler word
/// puts an ASCII floor of roughly `1/19` on the reachable ratio.
fn steer_ascii_ratio(text: &mut String, target: f64, slice: Slice, rng: &mut SeededRng) {
    let spaced_dilution = target >= 0.05;
    for _ in 0..MAX_FILL_ATTEMPTS {
        let ratio = ascii_byte_ratio(text);
        if (ratio - target).abs() <= ASCII_TOLERANCE {
            break;
        }
        if ratio < target {
            let word = ASCII_FILLERS[rng.next_index(ASCII_FILLERS.len())];
            text.push(' ');
            text.push_str(word);
        } else {
            if target <= 0.0 && text.bytes().all(|b| !b.is_ascii()) {
                break;
            }
            let bank = non_ascii_fillers(slice);
            let word = bank[rng.next_index(bank.len())];
            if spaced_dilution {
                text.push(' ');
            }
            text.push_str(word);
        }
    }
}

/// Stage 7: Unicode normalization; unknown form tags are a no-op.
fn apply_normalization(text: &str, form: &str) -> String {
    match form {
        "NFC" => text.nfc().collect(),
        "NFD" => text.nfd().collect(),
        "NFKC" => text.nfkc().collect(),
        "NFKD" => text.nfkd().collect(),
        _ => text.to_string(),
    }
}
