use std::error::Error;

use clap::Args;
use serde_json::json;
use toksweep_job::planner;

use crate::ConfigArgs;

#[derive(Args, Debug)]
pub struct PlanArgs {
    #[command(flatten)]
    pub config: ConfigArgs,
}

/// Resolves the plan and prints a JSON summary without running anything.
pub fn run(args: &PlanArgs) -> Result<(), Box<dyn Error>> {
    let config = args.config.job_config()?;
    let plan = planner::resolve(&config)?;

    let nonblank = config
        .lines
        .iter()
        .filter(|line| !line.trim().is_empty())
        .count();
    let sampled = plan.sample_lines.min(nonblank);
    let summary = json!({
        "job_id": plan.job_id,
        "preset": plan.preset.as_str(),
        "seed": plan.seed,
        "sampled_lines": sampled,
        "repeats": plan.repeats,
        "chunk_size": plan.chunk_size,
        "enabled_axes": plan.enabled_axes(),
        "sweeps": plan.sweeps,
        "rows_per_line": plan.rows_per_line(),
        "total_rows": plan.total_rows(sampled, config.tokenizers.len()),
    });
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}
