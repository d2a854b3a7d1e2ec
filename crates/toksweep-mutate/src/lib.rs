#![deny(missing_docs)]
//! Deterministic text mutation engine for the toksweep benchmark.
//!
//! Pure functions only: every randomized choice comes from a caller-owned
//! [`toksweep_core::SeededRng`], so mutation output is a function of
//! `(text, slice, settings, seed)` and nothing else.

pub mod banks;
pub mod pipeline;
pub mod slice;

pub use pipeline::{ascii_byte_ratio, mutate, MutationResult, ASCII_TOLERANCE, MAX_FILL_ATTEMPTS};
pub use slice::Slice;
