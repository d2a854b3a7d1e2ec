//! Tokenizer collaborator interface.
//!
//! The benchmark core never interprets tokenizer internals: it consumes an
//! opaque `encode` capability plus a metrics extraction step. Reference
//! implementations live here so tests and the CLI run without external
//! model assets.

use std::borrow::Cow;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::errors::{ErrorInfo, SweepError};

/// Registry metadata for one tokenizer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenizerInfo {
    /// Stable tokenizer identifier.
    pub id: String,
    /// Model family tag.
    pub family: String,
    /// Declared vocabulary size.
    pub vocab_size: u64,
    /// Whether special tokens are added around the input.
    pub add_special_tokens: bool,
}

/// Opaque tokenization outcome exposed to the core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Encoding {
    /// Number of tokens produced.
    pub token_count: usize,
    /// Number of unknown-token hits.
    pub unk_count: usize,
}

/// Derived per-row tokenization metrics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenMetrics {
    /// Token count of the cold encode.
    pub token_count: usize,
    /// Unicode scalar count of the input text.
    pub grapheme_count: usize,
    /// UTF-8 byte length of the input text.
    pub byte_count: usize,
    /// Unknown-token count.
    pub unk_count: usize,
    /// Unknown tokens as a percentage of all tokens.
    pub unk_percent: f64,
    /// Input bytes per produced token.
    pub bytes_per_token: f64,
    /// Tokens per hundred input characters.
    pub tokens_per_100_chars: f64,
    /// Average token length in characters.
    pub avg_token_len_graphemes: f64,
}

/// Computes derived metrics from an encoding and the text it covered.
pub fn extract_metrics(text: &str, encoding: &Encoding) -> TokenMetrics {
    let grapheme_count = text.chars().count();
    let byte_count = text.len();
    let token_count = encoding.token_count;
    let (unk_percent, bytes_per_token, tokens_per_100_chars, avg_token_len_graphemes) =
        if token_count == 0 {
            (0.0, 0.0, 0.0, 0.0)
        } else {
            (
                encoding.unk_count as f64 / token_count as f64 * 100.0,
                byte_count as f64 / token_count as f64,
                if grapheme_count == 0 {
                    0.0
                } else {
                    token_count as f64 / grapheme_count as f64 * 100.0
                },
                grapheme_count as f64 / token_count as f64,
            )
        };
    TokenMetrics {
        token_count,
        grapheme_count,
        byte_count,
        unk_count: encoding.unk_count,
        unk_percent,
        bytes_per_token,
        tokens_per_100_chars,
        avg_token_len_graphemes,
    }
}

/// Contract every benchmarked tokenizer fulfils.
///
/// Implementations are assumed single-invocation safe only: the runner
/// issues one encode at a time and never calls concurrently into the same
/// instance.
pub trait Tokenizer: Send + Sync {
    /// Registry metadata for this tokenizer.
    fn info(&self) -> &TokenizerInfo;

    /// Optional text rewrite applied before encoding.
    fn preprocess<'a>(&self, text: &'a str) -> Cow<'a, str> {
        Cow::Borrowed(text)
    }

    /// Encodes one piece of text.
    fn encode(&self, text: &str) -> Result<Encoding, SweepError>;
}

/// Lookup from tokenizer identifier to an instance.
pub trait TokenizerProvider: Send {
    /// Returns the tokenizer registered under `id`.
    fn get(&self, id: &str) -> Option<&dyn Tokenizer>;
}

/// Owned tokenizer registry keyed by identifier.
#[derive(Default)]
pub struct TokenizerSet {
    entries: BTreeMap<String, Box<dyn Tokenizer>>,
}

impl TokenizerSet {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a tokenizer under its own id, replacing any previous entry.
    pub fn register(&mut self, tokenizer: Box<dyn Tokenizer>) {
        self.entries.insert(tokenizer.info().id.clone(), tokenizer);
    }

    /// Registered identifiers in sorted order.
    pub fn ids(&self) -> Vec<String> {
        self.entries.keys().cloned().collect()
    }
}

impl TokenizerProvider for TokenizerSet {
    fn get(&self, id: &str) -> Option<&dyn Tokenizer> {
        self.entries.get(id).map(|boxed| boxed.as_ref())
    }
}

/// Whitespace-splitting reference tokenizer.
///
/// A token counts as unknown when it contains a codepoint outside the
/// declared ASCII vocabulary, which makes UNK statistics exercisable on
/// multi-script corpora without a real model.
pub struct WhitespaceTokenizer {
    info: TokenizerInfo,
    ascii_vocab: bool,
}

impl WhitespaceTokenizer {
    /// Creates the tokenizer; `ascii_vocab` limits coverage to ASCII tokens.
    pub fn new(id: impl Into<String>, ascii_vocab: bool) -> Self {
        Self {
            info: TokenizerInfo {
                id: id.into(),
                family: "whitespace".to_string(),
                vocab_size: 30_000,
                add_special_tokens: false,
            },
            ascii_vocab,
        }
    }
}

impl Tokenizer for WhitespaceTokenizer {
    fn info(&self) -> &TokenizerInfo {
        &self.info
    }

    fn encode(&self, text: &str) -> Result<Encoding, SweepError> {
        if text.is_empty() {
            return Err(SweepError::Tokenizer(
                ErrorInfo::new("empty-input", "cannot encode empty text")
                    .with_context("tokenizer", self.info.id.clone()),
            ));
        }
        let mut token_count = 0usize;
        let mut unk_count = 0usize;
        for token in text.split_whitespace() {
            token_count += 1;
            if self.ascii_vocab && !token.is_ascii() {
                unk_count += 1;
            }
        }
        Ok(Encoding {
            token_count,
            unk_count,
        })
    }
}

/// Byte-level reference tokenizer: one token per UTF-8 byte, no unknowns.
pub struct ByteTokenizer {
    info: TokenizerInfo,
}

impl ByteTokenizer {
    /// Creates the tokenizer under the given id.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            info: TokenizerInfo {
                id: id.into(),
                family: "byte".to_string(),
                vocab_size: 256,
                add_special_tokens: false,
            },
        }
    }
}

impl Tokenizer for ByteTokenizer {
    fn info(&self) -> &TokenizerInfo {
        &self.info
    }

    fn encode(&self, text: &str) -> Result<Encoding, SweepError> {
        if text.is_empty() {
            return Err(SweepError::Tokenizer(
                ErrorInfo::new("empty-input", "cannot encode empty text")
                    .with_context("tokenizer", self.info.id.clone()),
            ));
        }
        Ok(Encoding {
            token_count: text.len(),
            unk_count: 0,
        })
    }
}
