use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use tempfile::tempdir;

const CONFIG_YAML: &str = r#"
job_id: cli-test
lines:
  - "Kal ka traffic bahut bad tha"
tokenizers: ["ws-ascii"]
preset: custom
sweeps:
  ascii_ratio: [1.0]
enabled_axes: [ascii_ratio]
sample_lines: 1
repeats: 5
chunk_size: 10
seed: 7
"#;

fn write_config(dir: &Path, yaml: &str) -> PathBuf {
    let path = dir.join("job.yaml");
    fs::write(&path, yaml).unwrap();
    path
}

fn toksweep(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_toksweep"))
        .args(args)
        .output()
        .unwrap()
}

#[test]
fn run_writes_all_artifacts() {
    let dir = tempdir().unwrap();
    let config = write_config(dir.path(), CONFIG_YAML);
    let out = dir.path().join("runs");

    let output = toksweep(&[
        "run",
        "--config",
        config.to_str().unwrap(),
        "--out",
        out.to_str().unwrap(),
    ]);
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    let run_dir = PathBuf::from(String::from_utf8(output.stdout).unwrap().trim().to_string());
    assert!(run_dir.starts_with(&out));

    let csv = fs::read_to_string(run_dir.join("rows.csv")).unwrap();
    let mut lines = csv.lines();
    let header = lines.next().unwrap();
    assert!(header.starts_with("slice,lang_tag,template_id,sweep_axis,x_value"));
    // baseline plus one swept ascii_ratio value
    assert_eq!(lines.count(), 2);

    let manifest: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(run_dir.join("manifest.json")).unwrap()).unwrap();
    assert_eq!(manifest["state"], "done");
    assert_eq!(manifest["rows_written"], 2);
    assert_eq!(manifest["total_rows"], 2);
    assert_eq!(manifest["config"]["job_id"], "cli-test");

    let events = fs::read_to_string(run_dir.join("events.jsonl")).unwrap();
    let last: serde_json::Value =
        serde_json::from_str(events.lines().last().unwrap()).unwrap();
    assert_eq!(last["type"], "done");
    assert_eq!(last["processed"], 2);

    let config_echo: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(run_dir.join("config.json")).unwrap()).unwrap();
    assert_eq!(config_echo["seed"], 7);
}

#[test]
fn run_with_unknown_tokenizer_fails_but_persists_manifest() {
    let dir = tempdir().unwrap();
    let yaml = CONFIG_YAML.replace("ws-ascii", "mystery-model");
    let config = write_config(dir.path(), &yaml);
    let out = dir.path().join("runs");

    let output = toksweep(&[
        "run",
        "--config",
        config.to_str().unwrap(),
        "--out",
        out.to_str().unwrap(),
    ]);
    assert!(!output.status.success());

    let run_dir = PathBuf::from(String::from_utf8(output.stdout).unwrap().trim().to_string());
    let manifest: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(run_dir.join("manifest.json")).unwrap()).unwrap();
    assert_eq!(manifest["state"], "error");
    assert_eq!(manifest["rows_written"], 0);
    assert!(manifest["error"]
        .as_str()
        .unwrap()
        .contains("unknown-tokenizer"));
}

#[test]
fn corpus_file_overrides_inline_lines() {
    let dir = tempdir().unwrap();
    let config = write_config(dir.path(), CONFIG_YAML);
    let corpus = dir.path().join("corpus.txt");
    fs::write(&corpus, "The quick brown fox\n\nಇಂದು ಮಳೆ ಬರುತ್ತದೆ\n").unwrap();
    let out = dir.path().join("runs");

    let output = toksweep(&[
        "run",
        "--config",
        config.to_str().unwrap(),
        "--lines",
        corpus.to_str().unwrap(),
        "--out",
        out.to_str().unwrap(),
    ]);
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    let run_dir = PathBuf::from(String::from_utf8(output.stdout).unwrap().trim().to_string());
    let csv = fs::read_to_string(run_dir.join("rows.csv")).unwrap();
    // sample_lines is 1, so exactly one corpus line contributes rows
    assert_eq!(csv.lines().count(), 3);
    assert!(!csv.contains("Kal ka traffic"));
}

#[test]
fn preset_flag_builds_a_default_config() {
    let dir = tempdir().unwrap();
    let corpus = dir.path().join("corpus.txt");
    fs::write(&corpus, "Kal ka traffic bahut bad tha\nThe quick brown fox\n").unwrap();
    let out = dir.path().join("runs");

    let output = toksweep(&[
        "run",
        "--preset",
        "fast",
        "--lines",
        corpus.to_str().unwrap(),
        "--out",
        out.to_str().unwrap(),
        "--seed",
        "9",
    ]);
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    let run_dir = PathBuf::from(String::from_utf8(output.stdout).unwrap().trim().to_string());
    let manifest: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(run_dir.join("manifest.json")).unwrap()).unwrap();
    assert_eq!(manifest["state"], "done");
    // 2 lines x 2 default tokenizers x 10 rows per line under the fast grid
    assert_eq!(manifest["total_rows"], 40);
    assert_eq!(manifest["rows_written"], 40);
    assert_eq!(manifest["config"]["preset"], "fast");
    assert_eq!(manifest["master_seed"], 9);
}

#[test]
fn plan_prints_row_totals_without_running() {
    let dir = tempdir().unwrap();
    let config = write_config(dir.path(), CONFIG_YAML);

    let output = toksweep(&["plan", "--config", config.to_str().unwrap()]);
    assert!(output.status.success());

    let summary: serde_json::Value =
        serde_json::from_str(&String::from_utf8(output.stdout).unwrap()).unwrap();
    assert_eq!(summary["job_id"], "cli-test");
    assert_eq!(summary["preset"], "custom");
    assert_eq!(summary["rows_per_line"], 2);
    assert_eq!(summary["total_rows"], 2);
    assert_eq!(summary["seed"], 7);

    // planning must not create artifacts
    assert!(!dir.path().join("runs").exists());
}
