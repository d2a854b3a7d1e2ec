//! Coarse language/script slice classification.

use serde::{Deserialize, Serialize};

/// Romanized-Hindi marker words used to split Hinglish from English.
const HINGLISH_MARKERS: [&str; 12] = [
    "hai", "ka", "ki", "ke", "ko", "nahi", "kya", "bahut", "tha", "thi", "aur", "mein",
];

/// Coarse language/script classification inferred from character
/// composition. Pure and deterministic: the runner computes it once per
/// sampled line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Slice {
    /// Predominantly Devanagari text.
    Hindi,
    /// Latin-script text with romanized-Hindi markers.
    Hinglish,
    /// Predominantly Kannada text.
    Kannada,
    /// Latin-script text without Hindi markers.
    English,
    /// Indic and Latin scripts mixed in one line.
    Mixed,
}

impl Slice {
    /// Classifies one line of text.
    pub fn classify(text: &str) -> Slice {
        let mut devanagari = 0usize;
        let mut kannada = 0usize;
        let mut latin = 0usize;
        for ch in text.chars() {
            match ch {
                '\u{0900}'..='\u{097F}' => devanagari += 1,
                '\u{0C80}'..='\u{0CFF}' => kannada += 1,
                _ if ch.is_ascii_alphabetic() => latin += 1,
                _ => {}
            }
        }
        let total = devanagari + kannada + latin;
        if total == 0 {
            return Slice::English;
        }
        if kannada > 0 && kannada >= devanagari && kannada * 2 >= total {
            return Slice::Kannada;
        }
        if devanagari * 2 >= total {
            return Slice::Hindi;
        }
        if devanagari > 0 || kannada > 0 {
            return Slice::Mixed;
        }
        let lower = text.to_lowercase();
        let has_marker = lower
            .split(|c: char| !c.is_ascii_alphabetic())
            .any(|word| HINGLISH_MARKERS.contains(&word));
        if has_marker {
            Slice::Hinglish
        } else {
            Slice::English
        }
    }

    /// BCP-47-style language tag recorded in output rows.
    pub fn lang_tag(&self) -> &'static str {
        match self {
            Slice::Hindi => "hi",
            Slice::Hinglish => "hi-Latn",
            Slice::Kannada => "kn",
            Slice::English => "en",
            Slice::Mixed => "mul",
        }
    }

    /// CSV slice column value.
    pub fn as_str(&self) -> &'static str {
        match self {
            Slice::Hindi => "hindi",
            Slice::Hinglish => "hinglish",
            Slice::Kannada => "kannada",
            Slice::English => "english",
            Slice::Mixed => "mixed",
        }
    }

    /// Whether the slice carries a consonant-conjunct script, making the
    /// ZWJ axis exercisable.
    pub fn has_conjunct_script(&self) -> bool {
        matches!(self, Slice::Hindi | Slice::Kannada | Slice::Mixed)
    }
}
