//! Fixed text banks consumed by the mutation pipeline.
//!
//! The banks are part of the deterministic output contract: reordering or
//! editing an entry changes every row derived from a seed that draws on it.

use crate::slice::Slice;

/// Emoji appended by the emoji axis, cycled in order.
pub const EMOJI_BANK: [&str; 8] = ["😀", "🔥", "🚀", "🎉", "🌟", "🍛", "🙏", "💡"];

/// Canonical URL injected by the URL axis.
pub const CANONICAL_URL: &str = "https://example.com/bench?q=tokenizer";

/// Short ASCII filler words used to raise the ASCII byte ratio.
pub const ASCII_FILLERS: [&str; 8] = [
    "data", "test", "token", "bench", "quick", "input", "model", "text",
];

/// Punctuation replacements drawn by the perturbation stage.
pub const PUNCTUATION: [char; 7] = ['.', ',', '!', '?', ';', ':', '-'];

const DEVANAGARI_FILLERS: [&str; 4] = ["नमस्ते", "भाषा", "परीक्षण", "शब्द"];
const KANNADA_FILLERS: [&str; 4] = ["ನಮಸ್ಕಾರ", "ಭಾಷೆ", "ಪದ", "ಪರೀಕ್ಷೆ"];

/// Minimal Devanagari conjunct cluster (ka + virama + ssa).
pub const DEVANAGARI_CONJUNCT: &str = "\u{0915}\u{094D}\u{0937}";
/// Minimal Kannada conjunct cluster (ka + virama + ssa).
pub const KANNADA_CONJUNCT: &str = "\u{0C95}\u{0CCD}\u{0CB7}";

/// Non-ASCII filler bank used to dilute the ASCII byte ratio, selected by
/// slice. Latin-only slices fall back to the Devanagari bank.
pub fn non_ascii_fillers(slice: Slice) -> &'static [&'static str] {
    match slice {
        Slice::Kannada => &KANNADA_FILLERS,
        _ => &DEVANAGARI_FILLERS,
    }
}

/// Minimal eligible conjunct cluster for the slice's script.
pub fn conjunct_for(slice: Slice) -> &'static str {
    match slice {
        Slice::Kannada => KANNADA_CONJUNCT,
        _ => DEVANAGARI_CONJUNCT,
    }
}
