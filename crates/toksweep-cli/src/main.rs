use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use serde::Serialize;
use toksweep_core::{
    ByteTokenizer, JobConfig, Preset, RunProvenance, SweepAxis, SweepOverrides, TokenizerSet,
    WhitespaceTokenizer,
};

use commands::{
    plan::{self, PlanArgs},
    run::{self, RunArgs},
};

mod commands;

#[derive(Parser, Debug)]
#[command(name = "toksweep", about = "Deterministic tokenizer benchmark sweeps")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Execute a sweep job and persist its artifacts.
    Run(RunArgs),
    /// Resolve a job configuration and print the planned work.
    Plan(PlanArgs),
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();
    let cli = Cli::parse();
    match cli.command {
        Command::Run(args) => run::run(&args),
        Command::Plan(args) => plan::run(&args),
    }
}

pub(crate) fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), Box<dyn Error>> {
    let json = serde_json::to_string_pretty(value)?;
    fs::write(path, json)?;
    Ok(())
}

pub(crate) fn parse_preset(name: &str) -> Result<Preset, Box<dyn Error>> {
    match name {
        "fast" => Ok(Preset::Fast),
        "full" => Ok(Preset::Full),
        "custom" => Ok(Preset::Custom),
        other => Err(format!("unknown preset: {other}").into()),
    }
}

/// Common configuration flags shared by the subcommands.
#[derive(clap::Args, Debug)]
pub(crate) struct ConfigArgs {
    /// YAML job configuration; a default config is built when omitted.
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// Corpus file, one input line per row; overrides inline config lines.
    #[arg(long)]
    pub lines: Option<PathBuf>,
    /// Preset overriding the configuration (fast, full or custom).
    #[arg(long)]
    pub preset: Option<String>,
    /// Job identifier used when no config file is given.
    #[arg(long, default_value = "sweep")]
    pub job_id: String,
    /// Tokenizer identifiers used when no config file is given.
    #[arg(long = "tokenizer", value_name = "ID")]
    pub tokenizers: Vec<String>,
    /// Master seed overriding the configuration.
    #[arg(long)]
    pub seed: Option<u32>,
}

impl ConfigArgs {
    /// Resolves the flags into a complete job configuration.
    pub fn job_config(&self) -> Result<JobConfig, Box<dyn Error>> {
        let mut config = match &self.config {
            Some(path) => {
                let raw = fs::read_to_string(path)?;
                serde_yaml::from_str::<JobConfig>(&raw)?
            }
            None => JobConfig {
                job_id: self.job_id.clone(),
                lines: Vec::new(),
                tokenizers: if self.tokenizers.is_empty() {
                    vec!["ws-ascii".to_string(), "byte".to_string()]
                } else {
                    self.tokenizers.clone()
                },
                preset: Preset::Fast,
                sweeps: SweepOverrides::default(),
                enabled_axes: SweepAxis::ALL.to_vec(),
                sample_lines: None,
                repeats: None,
                chunk_size: None,
                seed: None,
            },
        };
        if let Some(path) = &self.lines {
            let corpus = fs::read_to_string(path)?;
            config.lines = corpus.lines().map(str::to_string).collect();
        }
        if let Some(name) = &self.preset {
            config.preset = parse_preset(name)?;
        }
        if let Some(seed) = self.seed {
            config.seed = Some(seed);
        }
        if config.lines.is_empty() {
            return Err("no input lines: provide --lines or inline config lines".into());
        }
        Ok(config)
    }
}

/// Builds the reference tokenizer registry for the identifiers a job names.
///
/// Unregistered identifiers are left out so the runner surfaces them as a
/// structured job error instead of a CLI panic.
pub(crate) fn build_registry(ids: &[String]) -> TokenizerSet {
    let mut set = TokenizerSet::new();
    for id in ids {
        if id.starts_with("byte") {
            set.register(Box::new(ByteTokenizer::new(id.clone())));
        } else if id.starts_with("ws") || id.starts_with("whitespace") {
            set.register(Box::new(WhitespaceTokenizer::new(
                id.clone(),
                id.ends_with("ascii"),
            )));
        }
    }
    set
}

pub(crate) fn host_provenance() -> RunProvenance {
    RunProvenance::for_host(env!("CARGO_PKG_VERSION"), option_env!("TOKSWEEP_COMMIT"))
        .with_tool("toksweep-core", env!("CARGO_PKG_VERSION"))
}
