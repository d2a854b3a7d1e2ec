use std::error::Error;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use clap::Args;
use serde_json::json;
use toksweep_job::{execute, JobMessage, JobState, RunManifest, CSV_HEADER};
use tracing::info;

use crate::{build_registry, host_provenance, write_json, ConfigArgs};

#[derive(Args, Debug)]
pub struct RunArgs {
    #[command(flatten)]
    pub config: ConfigArgs,
    /// Output directory; a timestamped run directory is created inside.
    #[arg(long)]
    pub out: PathBuf,
}

/// Runs the job and persists rows.csv, events.jsonl, config.json and
/// manifest.json under a timestamped run directory.
pub fn run(args: &RunArgs) -> Result<(), Box<dyn Error>> {
    let config = args.config.job_config()?;
    let registry = build_registry(&config.tokenizers);
    let provenance = host_provenance();

    let started = chrono::Utc::now();
    let run_dir = args
        .out
        .join(format!("{}-{}", config.job_id, started.format("%Y%m%dT%H%M%SZ")));
    fs::create_dir_all(&run_dir)?;
    write_json(&run_dir.join("config.json"), &config)?;

    let csv_path = run_dir.join("rows.csv");
    let mut writer = csv::Writer::from_path(&csv_path)?;
    writer.write_record(CSV_HEADER)?;
    let events_path = run_dir.join("events.jsonl");
    let mut events = BufWriter::new(File::create(&events_path)?);

    let mut rows_written = 0usize;
    let mut total_rows = 0usize;
    let mut duration_ms = 0.0f64;
    let mut failure: Option<String> = None;
    let mut sink_error: Option<String> = None;
    {
        let mut emit = |message: JobMessage| {
            // The event log keeps counters only; full rows live in the CSV.
            let event = match &message {
                JobMessage::Progress {
                    processed,
                    total,
                    rows,
                } => json!({
                    "type": "progress",
                    "processed": processed,
                    "total": total,
                    "rows": rows.len(),
                }),
                JobMessage::Done {
                    processed,
                    total,
                    duration_ms,
                } => json!({
                    "type": "done",
                    "processed": processed,
                    "total": total,
                    "duration_ms": duration_ms,
                }),
                JobMessage::Error { message, .. } => json!({
                    "type": "error",
                    "message": message,
                }),
            };
            if let Err(err) = writeln!(events, "{event}") {
                sink_error.get_or_insert(err.to_string());
            }
            match message {
                JobMessage::Progress { total, rows, .. } => {
                    total_rows = total;
                    for row in rows {
                        if let Err(err) = writer.write_record(row.to_record()) {
                            sink_error.get_or_insert(err.to_string());
                        }
                        rows_written += 1;
                    }
                }
                JobMessage::Done {
                    total,
                    duration_ms: elapsed,
                    ..
                } => {
                    total_rows = total;
                    duration_ms = elapsed;
                }
                JobMessage::Error { message, .. } => {
                    failure = Some(message);
                }
            }
        };
        execute(&config, &registry, &provenance, &mut emit);
    }
    writer.flush()?;
    events.flush()?;
    if let Some(err) = sink_error {
        return Err(err.into());
    }

    let state = if failure.is_some() {
        JobState::Error
    } else {
        JobState::Done
    };
    let manifest = RunManifest {
        config_hash: RunManifest::config_hash(&config)?,
        master_seed: config.master_seed(),
        config,
        provenance,
        state,
        rows_written,
        total_rows,
        duration_ms,
        csv_file: Some(PathBuf::from("rows.csv")),
        events_file: Some(PathBuf::from("events.jsonl")),
        error: failure.clone(),
    };
    manifest.write(&run_dir.join("manifest.json"))?;
    info!(run_dir = %run_dir.display(), rows_written, "run artifacts written");
    println!("{}", run_dir.display());

    match failure {
        Some(message) => Err(message.into()),
        None => Ok(()),
    }
}
