//! The orchestrating job loop.
//!
//! Iterates tokenizers × sampled lines × (baseline + swept axis values),
//! derives an independent sub-seed per row, and streams chunks of assembled
//! rows through the caller's emit callback. Any error is caught once at the
//! top level, wrapped into a terminal error message, and ends the job.

use std::time::Instant;

use indexmap::IndexSet;
use toksweep_core::{
    extract_metrics, sub_seed, AxisValue, ErrorInfo, JobConfig, MutationSettings, RunProvenance,
    SeedPart, SeededRng, SweepError, Tokenizer, TokenizerProvider,
};
use toksweep_measure::measure;
use toksweep_mutate::{mutate, Slice};
use tracing::{debug, info};

use crate::planner::{self, ResolvedPlan};
use crate::protocol::JobMessage;
use crate::row::{assemble_row, CsvRow, RowInputs, BASELINE_AXIS};
use crate::sample::{self, SampledLine};

/// Runs one job to completion, emitting `progress` chunks and a terminal
/// `done` or `error` message.
///
/// `host_provenance` carries environment identification; the resolved run
/// configuration is stamped onto it before rows are assembled.
pub fn execute<F>(
    config: &JobConfig,
    provider: &dyn TokenizerProvider,
    host_provenance: &RunProvenance,
    emit: &mut F,
) where
    F: FnMut(JobMessage),
{
    let started = Instant::now();
    match run_inner(config, provider, host_provenance, emit) {
        Ok((processed, total)) => {
            let duration_ms = started.elapsed().as_secs_f64() * 1_000.0;
            info!(
                job_id = %config.job_id,
                processed,
                total,
                duration_ms,
                "sweep job finished"
            );
            emit(JobMessage::Done {
                processed,
                total,
                duration_ms,
            });
        }
        Err(err) => {
            let stack = serde_json::to_string(err.info()).ok();
            emit(JobMessage::Error {
                message: err.to_string(),
                stack,
            });
        }
    }
}

fn run_inner<F>(
    config: &JobConfig,
    provider: &dyn TokenizerProvider,
    host_provenance: &RunProvenance,
    emit: &mut F,
) -> Result<(usize, usize), SweepError>
where
    F: FnMut(JobMessage),
{
    let plan = planner::resolve(config)?;
    let sampled = sample::sample_lines(&config.lines, plan.sample_lines, plan.seed);
    if sampled.is_empty() {
        return Err(SweepError::Config(
            ErrorInfo::new("no-usable-lines", "all input lines are blank")
                .with_context("job_id", config.job_id.clone()),
        ));
    }
    let total = plan.total_rows(sampled.len(), config.tokenizers.len());

    let provenance = host_provenance.clone().with_run(plan.stamp());
    let base_prov_value = serde_json::to_value(&provenance).map_err(|err| {
        SweepError::Serde(ErrorInfo::new("provenance-encode", err.to_string()))
    })?;
    let base_prov_json = base_prov_value.to_string();

    info!(
        job_id = %config.job_id,
        seed = plan.seed,
        total,
        tokenizers = config.tokenizers.len(),
        sampled = sampled.len(),
        "starting sweep job"
    );

    let mut warmed: IndexSet<String> = IndexSet::new();
    let mut buffer: Vec<CsvRow> = Vec::new();
    let mut processed = 0usize;

    for tokenizer_id in &config.tokenizers {
        let tokenizer = provider.get(tokenizer_id).ok_or_else(|| {
            SweepError::Tokenizer(
                ErrorInfo::new("unknown-tokenizer", "tokenizer is not registered")
                    .with_context("tokenizer", tokenizer_id.clone()),
            )
        })?;
        if warmed.insert(tokenizer_id.clone()) {
            // First real encode primes any lazily loaded resources before
            // timed iteration; the result is discarded.
            let warm_input = tokenizer.preprocess(&sampled[0].text);
            tokenizer.encode(&warm_input)?;
            debug!(tokenizer = %tokenizer_id, "tokenizer warmed");
        }

        for line in &sampled {
            let slice = Slice::classify(&line.text);
            let baseline = compute_row(
                &plan,
                tokenizer,
                tokenizer_id,
                line,
                slice,
                BASELINE_AXIS,
                &AxisValue::Number(0.0),
                MutationSettings::baseline(),
                &provenance,
                &base_prov_value,
                &base_prov_json,
            )?;
            push_row(baseline, &plan, total, &mut processed, &mut buffer, emit);

            for (axis, values) in &plan.axes {
                for value in values {
                    let settings = MutationSettings::with_axis(*axis, value);
                    let row = compute_row(
                        &plan,
                        tokenizer,
                        tokenizer_id,
                        line,
                        slice,
                        axis.as_str(),
                        value,
                        settings,
                        &provenance,
                        &base_prov_value,
                        &base_prov_json,
                    )?;
                    push_row(row, &plan, total, &mut processed, &mut buffer, emit);
                }
            }
        }
    }

    if !buffer.is_empty() {
        emit(JobMessage::Progress {
            processed,
            total,
            rows: std::mem::take(&mut buffer),
        });
    }
    Ok((processed, total))
}

#[allow(clippy::too_many_arguments)]
fn compute_row(
    plan: &ResolvedPlan,
    tokenizer: &dyn Tokenizer,
    tokenizer_id: &str,
    line: &SampledLine,
    slice: Slice,
    axis: &str,
    value: &AxisValue,
    settings: MutationSettings,
    provenance: &RunProvenance,
    base_prov_value: &serde_json::Value,
    base_prov_json: &str,
) -> Result<CsvRow, SweepError> {
    // Independent per-row stream: execution order never changes results.
    let row_seed = sub_seed(
        plan.seed,
        &[
            SeedPart::Str(tokenizer_id.to_string()),
            SeedPart::Int(line.index as u64),
            SeedPart::Str(axis.to_string()),
            value.seed_part(),
        ],
    );
    let mut rng = SeededRng::new(row_seed);
    let mutation = mutate(&line.text, slice, &settings, &mut rng);

    let encode_input = tokenizer.preprocess(&mutation.text);
    // Cold call for token/byte/char counts, separate from timed calls.
    let encoding = tokenizer.encode(&encode_input)?;
    let metrics = extract_metrics(&mutation.text, &encoding);
    let measurement = measure(tokenizer, &encode_input, plan.repeats)?;

    let provenance_json = match &measurement.samples_ms {
        Some(samples) => {
            let mut value = base_prov_value.clone();
            if let Some(object) = value.as_object_mut() {
                object.insert(
                    "timing_samples_ms".to_string(),
                    serde_json::json!(samples),
                );
            }
            value.to_string()
        }
        None => base_prov_json.to_string(),
    };

    Ok(assemble_row(RowInputs {
        slice,
        line_index: line.index,
        axis,
        x_value: value.render(),
        mutation: &mutation,
        metrics: &metrics,
        tokenizer: tokenizer.info(),
        measurement: &measurement,
        provenance,
        provenance_json,
    }))
}

fn push_row<F>(
    row: CsvRow,
    plan: &ResolvedPlan,
    total: usize,
    processed: &mut usize,
    buffer: &mut Vec<CsvRow>,
    emit: &mut F,
) where
    F: FnMut(JobMessage),
{
    buffer.push(row);
    *processed += 1;
    if buffer.len() >= plan.chunk_size {
        debug!(processed = *processed, total, "flushing row chunk");
        emit(JobMessage::Progress {
            processed: *processed,
            total,
            rows: std::mem::take(buffer),
        });
    }
}
