//! Output row schema and assembly.
//!
//! Column order is fixed for downstream tooling compatibility; the header
//! and [`CsvRow::to_record`] must stay in lockstep.

use serde::{Deserialize, Serialize};
use toksweep_core::{RunProvenance, TokenMetrics, TokenizerInfo};
use toksweep_measure::Measurement;
use toksweep_mutate::{MutationResult, Slice};

/// Fixed CSV column order.
pub const CSV_HEADER: [&str; 37] = [
    "slice",
    "lang_tag",
    "template_id",
    "sweep_axis",
    "x_value",
    "text",
    "grapheme_count",
    "byte_count",
    "ascii_ratio_bytes",
    "tokenizer_id",
    "tokenizer_family",
    "tokenizer_vocab_size",
    "add_special_tokens",
    "token_count",
    "tokens_per_100_chars",
    "bytes_per_token",
    "avg_token_len_graphemes",
    "unk_count",
    "unk_percent",
    "timed_op",
    "time_ms_median",
    "time_ms_mad",
    "repeats",
    "normalization",
    "zwj_applied",
    "url_applied",
    "emoji_count",
    "perturbations",
    "browser_ua",
    "os_platform",
    "app_version",
    "transformersjs_version",
    "tiktoken_version",
    "wasm_hash",
    "commit_sha",
    "timestamp_utc",
    "provenance_json",
];

/// Axis name used for the neutral reference row.
pub const BASELINE_AXIS: &str = "baseline";

/// One fully assembled output record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CsvRow {
    /// Language/script slice tag.
    pub slice: String,
    /// BCP-47-style language tag.
    pub lang_tag: String,
    /// Line-derived template identifier.
    pub template_id: String,
    /// `"baseline"` or the swept axis name.
    pub sweep_axis: String,
    /// Swept value rendered as text.
    pub x_value: String,
    /// Mutated text.
    pub text: String,
    /// Character count of the mutated text.
    pub grapheme_count: usize,
    /// UTF-8 byte count of the mutated text.
    pub byte_count: usize,
    /// ASCII byte ratio of the mutated text.
    pub ascii_ratio_bytes: f64,
    /// Tokenizer identifier.
    pub tokenizer_id: String,
    /// Tokenizer family tag.
    pub tokenizer_family: String,
    /// Declared vocabulary size.
    pub tokenizer_vocab_size: u64,
    /// Whether special tokens were added (`0`/`1`).
    pub add_special_tokens: u8,
    /// Token count of the cold encode.
    pub token_count: usize,
    /// Tokens per hundred characters.
    pub tokens_per_100_chars: f64,
    /// Bytes per token.
    pub bytes_per_token: f64,
    /// Average token length in characters.
    pub avg_token_len_graphemes: f64,
    /// Unknown-token count.
    pub unk_count: usize,
    /// Unknown tokens as a percentage.
    pub unk_percent: f64,
    /// Which operation was timed.
    pub timed_op: String,
    /// Median per-call latency in ms.
    pub time_ms_median: f64,
    /// Median absolute deviation in ms.
    pub time_ms_mad: f64,
    /// Timed repetitions taken.
    pub repeats: u32,
    /// Normalization form requested.
    pub normalization: String,
    /// ZWJ flag actually applied.
    pub zwj_applied: u8,
    /// URL flag actually applied.
    pub url_applied: u8,
    /// Emoji appended.
    pub emoji_count: u32,
    /// Random edits applied.
    pub perturbations: u32,
    /// Host identification string.
    pub browser_ua: String,
    /// Operating system / architecture tag.
    pub os_platform: String,
    /// Application version.
    pub app_version: String,
    /// transformers.js runtime version, empty when absent.
    pub transformersjs_version: String,
    /// tiktoken runtime version, empty when absent.
    pub tiktoken_version: String,
    /// Tokenizer artifact hash, empty when none was loaded.
    pub wasm_hash: String,
    /// Source revision.
    pub commit_sha: String,
    /// Run start timestamp (UTC ISO-8601).
    pub timestamp_utc: String,
    /// Full provenance block serialized as JSON.
    pub provenance_json: String,
}

fn fmt_float(value: f64) -> String {
    format!("{value:.6}")
}

impl CsvRow {
    /// Renders the row as CSV fields in [`CSV_HEADER`] order. Escaping is
    /// the writer's concern (the `csv` crate quotes fields containing
    /// commas, quotes or newlines).
    pub fn to_record(&self) -> Vec<String> {
        vec![
            self.slice.clone(),
            self.lang_tag.clone(),
            self.template_id.clone(),
            self.sweep_axis.clone(),
            self.x_value.clone(),
            self.text.clone(),
            self.grapheme_count.to_string(),
            self.byte_count.to_string(),
            fmt_float(self.ascii_ratio_bytes),
            self.tokenizer_id.clone(),
            self.tokenizer_family.clone(),
            self.tokenizer_vocab_size.to_string(),
            self.add_special_tokens.to_string(),
            self.token_count.to_string(),
            fmt_float(self.tokens_per_100_chars),
            fmt_float(self.bytes_per_token),
            fmt_float(self.avg_token_len_graphemes),
            self.unk_count.to_string(),
            fmt_float(self.unk_percent),
            self.timed_op.clone(),
            fmt_float(self.time_ms_median),
            fmt_float(self.time_ms_mad),
            self.repeats.to_string(),
            self.normalization.clone(),
            self.zwj_applied.to_string(),
            self.url_applied.to_string(),
            self.emoji_count.to_string(),
            self.perturbations.to_string(),
            self.browser_ua.clone(),
            self.os_platform.clone(),
            self.app_version.clone(),
            self.transformersjs_version.clone(),
            self.tiktoken_version.clone(),
            self.wasm_hash.clone(),
            self.commit_sha.clone(),
            self.timestamp_utc.clone(),
            self.provenance_json.clone(),
        ]
    }
}

/// Everything needed to assemble one row.
pub struct RowInputs<'a> {
    /// Slice of the source line.
    pub slice: Slice,
    /// Original corpus index of the line.
    pub line_index: usize,
    /// `"baseline"` or the swept axis name.
    pub axis: &'a str,
    /// Rendered swept value.
    pub x_value: String,
    /// Mutation pipeline output.
    pub mutation: &'a MutationResult,
    /// Cold-encode metrics for the mutated text.
    pub metrics: &'a TokenMetrics,
    /// Tokenizer registry metadata.
    pub tokenizer: &'a TokenizerInfo,
    /// Latency measurement.
    pub measurement: &'a Measurement,
    /// Run provenance (host + resolved config).
    pub provenance: &'a RunProvenance,
    /// Serialized provenance for this row (may carry timing samples).
    pub provenance_json: String,
}

/// Combines mutation, measurement and provenance into one output record.
pub fn assemble_row(inputs: RowInputs<'_>) -> CsvRow {
    let prov = inputs.provenance;
    CsvRow {
        slice: inputs.slice.as_str().to_string(),
        lang_tag: inputs.slice.lang_tag().to_string(),
        template_id: format!("line_{:04}", inputs.line_index),
        sweep_axis: inputs.axis.to_string(),
        x_value: inputs.x_value,
        text: inputs.mutation.text.clone(),
        grapheme_count: inputs.mutation.text.chars().count(),
        byte_count: inputs.mutation.text.len(),
        ascii_ratio_bytes: inputs.mutation.ascii_ratio,
        tokenizer_id: inputs.tokenizer.id.clone(),
        tokenizer_family: inputs.tokenizer.family.clone(),
        tokenizer_vocab_size: inputs.tokenizer.vocab_size,
        add_special_tokens: inputs.tokenizer.add_special_tokens as u8,
        token_count: inputs.metrics.token_count,
        tokens_per_100_chars: inputs.metrics.tokens_per_100_chars,
        bytes_per_token: inputs.metrics.bytes_per_token,
        avg_token_len_graphemes: inputs.metrics.avg_token_len_graphemes,
        unk_count: inputs.metrics.unk_count,
        unk_percent: inputs.metrics.unk_percent,
        timed_op: inputs.measurement.timed_op.to_string(),
        time_ms_median: inputs.measurement.median_ms,
        time_ms_mad: inputs.measurement.mad_ms,
        repeats: inputs.measurement.repeats,
        normalization: inputs.mutation.normalization.clone(),
        zwj_applied: inputs.mutation.zwj_applied,
        url_applied: inputs.mutation.url_applied,
        emoji_count: inputs.mutation.emoji_count,
        perturbations: inputs.mutation.perturbations,
        browser_ua: prov.browser_ua.clone(),
        os_platform: prov.os_platform.clone(),
        app_version: prov.app_version.clone(),
        transformersjs_version: prov.tool_version("transformersjs").to_string(),
        tiktoken_version: prov.tool_version("tiktoken").to_string(),
        wasm_hash: prov.wasm_hash.clone(),
        commit_sha: prov.commit_sha.clone(),
        timestamp_utc: prov.timestamp_utc.clone(),
        provenance_json: inputs.provenance_json,
    }
}
