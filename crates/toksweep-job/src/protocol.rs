//! Message shapes crossing the job/host boundary.

use serde::{Deserialize, Serialize};

use crate::row::CsvRow;

/// Lifecycle states of one job. No retry or resume: a terminal state ends
/// the job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobState {
    /// Job accepted but not yet started.
    Idle,
    /// Job executing.
    Running,
    /// Job finished successfully.
    Done,
    /// Job terminated by an error.
    Error,
}

/// Outbound messages streamed from a running job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum JobMessage {
    /// A chunk of assembled rows plus running counters.
    Progress {
        /// Rows emitted so far, including this chunk.
        processed: usize,
        /// Total planned rows.
        total: usize,
        /// The chunk itself.
        rows: Vec<CsvRow>,
    },
    /// Successful completion.
    Done {
        /// Rows emitted in total.
        processed: usize,
        /// Total planned rows.
        total: usize,
        /// Wall-clock duration of the whole job.
        duration_ms: f64,
    },
    /// Terminal failure; no further messages follow.
    Error {
        /// Human readable failure description.
        message: String,
        /// Structured error detail when available.
        #[serde(skip_serializing_if = "Option::is_none")]
        stack: Option<String>,
    },
}
