#![deny(missing_docs)]
//! Core types for the toksweep tokenizer benchmark: the error taxonomy, the
//! deterministic seeded RNG and seed folding, the job configuration schema,
//! the tokenizer collaborator interface and provenance descriptors.

pub mod config;
pub mod errors;
pub mod provenance;
pub mod rng;
pub mod tokenizer;

pub use config::{
    AsciiTarget, AxisValue, JobConfig, MutationSettings, Preset, SweepAxis, SweepConfig,
    SweepOverrides,
};
pub use errors::{ErrorInfo, SweepError};
pub use provenance::{RunProvenance, RunStamp};
pub use rng::{hash_seed, sub_seed, SeedPart, SeededRng};
pub use tokenizer::{
    extract_metrics, ByteTokenizer, Encoding, TokenMetrics, Tokenizer, TokenizerInfo,
    TokenizerProvider, TokenizerSet, WhitespaceTokenizer,
};
