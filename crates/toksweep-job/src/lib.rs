#![deny(missing_docs)]
//! Sweep job orchestration: plan resolution, deterministic sampling, row
//! assembly and the streaming runner, plus the thread-backed worker and
//! run-manifest persistence.

pub mod hash;
pub mod manifest;
pub mod planner;
pub mod protocol;
pub mod row;
pub mod runner;
pub mod sample;
pub mod worker;

pub use hash::stable_hash_string;
pub use manifest::RunManifest;
pub use planner::{resolve, ResolvedPlan};
pub use protocol::{JobMessage, JobState};
pub use row::{assemble_row, CsvRow, RowInputs, BASELINE_AXIS, CSV_HEADER};
pub use runner::execute;
pub use sample::{sample_lines, SampledLine};
pub use worker::{spawn_job, JobHandle, JobWorker};
