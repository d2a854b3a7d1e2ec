use toksweep_core::{
    JobConfig, Preset, RunProvenance, SweepAxis, SweepOverrides, TokenizerSet,
    WhitespaceTokenizer,
};
use toksweep_job::{execute, CsvRow, JobMessage};

fn provider() -> TokenizerSet {
    let mut set = TokenizerSet::new();
    set.register(Box::new(WhitespaceTokenizer::new("ws-ascii", true)));
    set
}

fn provenance() -> RunProvenance {
    RunProvenance::for_host("0.0.0-test", Some("deadbeef"))
}

fn ascii_sweep_config() -> JobConfig {
    JobConfig {
        job_id: "stream-test".to_string(),
        lines: vec!["Kal ka traffic bahut bad tha".to_string()],
        tokenizers: vec!["ws-ascii".to_string()],
        preset: Preset::Custom,
        sweeps: SweepOverrides {
            ascii_ratio: Some(vec![0.0, 1.0]),
            ..SweepOverrides::default()
        },
        enabled_axes: vec![SweepAxis::AsciiRatio],
        sample_lines: Some(1),
        repeats: Some(5),
        chunk_size: Some(2),
        seed: Some(7),
    }
}

fn run_collect(config: &JobConfig) -> Vec<JobMessage> {
    let set = provider();
    let prov = provenance();
    let mut messages = Vec::new();
    let mut emit = |message: JobMessage| messages.push(message);
    execute(config, &set, &prov, &mut emit);
    messages
}

fn collect_rows(messages: &[JobMessage]) -> Vec<CsvRow> {
    messages
        .iter()
        .filter_map(|message| match message {
            JobMessage::Progress { rows, .. } => Some(rows.clone()),
            _ => None,
        })
        .flatten()
        .collect()
}

#[test]
fn streams_chunks_then_done() {
    let messages = run_collect(&ascii_sweep_config());
    assert_eq!(messages.len(), 3);

    match &messages[0] {
        JobMessage::Progress {
            processed,
            total,
            rows,
        } => {
            assert_eq!(*processed, 2);
            assert_eq!(*total, 3);
            assert_eq!(rows.len(), 2);
        }
        other => panic!("expected first progress chunk, got {other:?}"),
    }
    match &messages[1] {
        JobMessage::Progress {
            processed,
            total,
            rows,
        } => {
            assert_eq!(*processed, 3);
            assert_eq!(*total, 3);
            assert_eq!(rows.len(), 1);
        }
        other => panic!("expected final progress chunk, got {other:?}"),
    }
    match &messages[2] {
        JobMessage::Done {
            processed,
            total,
            duration_ms,
        } => {
            assert_eq!(*processed, 3);
            assert_eq!(*total, 3);
            assert!(*duration_ms >= 0.0);
        }
        other => panic!("expected done, got {other:?}"),
    }
}

#[test]
fn baseline_row_precedes_swept_values() {
    let messages = run_collect(&ascii_sweep_config());
    let rows = collect_rows(&messages);
    assert_eq!(rows.len(), 3);

    assert_eq!(rows[0].sweep_axis, "baseline");
    assert_eq!(rows[0].x_value, "0");
    assert_eq!(rows[0].text, "Kal ka traffic bahut bad tha");
    assert_eq!(rows[0].slice, "hinglish");
    assert_eq!(rows[0].lang_tag, "hi-Latn");
    assert_eq!(rows[0].template_id, "line_0000");

    assert_eq!(rows[1].sweep_axis, "ascii_ratio");
    assert_eq!(rows[1].x_value, "0");
    assert_eq!(rows[2].sweep_axis, "ascii_ratio");
    assert_eq!(rows[2].x_value, "1");
}

#[test]
fn ascii_targets_are_honored() {
    let messages = run_collect(&ascii_sweep_config());
    let rows = collect_rows(&messages);

    // pure-ASCII input already sits at 1.0, steering leaves it alone
    assert!((rows[2].ascii_ratio_bytes - 1.0).abs() <= 0.02);
    assert_eq!(rows[2].text, rows[0].text);

    // target 0.0 dilutes with non-ASCII filler until within tolerance
    assert!(rows[1].ascii_ratio_bytes <= 0.02 + 1e-9);
    assert!(rows[1].byte_count > rows[0].byte_count);
}

#[test]
fn repeated_runs_are_identical_apart_from_timing() {
    let config = ascii_sweep_config();
    let first = collect_rows(&run_collect(&config));
    let second = collect_rows(&run_collect(&config));
    assert_eq!(first.len(), second.len());
    for (a, b) in first.iter().zip(second.iter()) {
        assert_eq!(a.sweep_axis, b.sweep_axis);
        assert_eq!(a.x_value, b.x_value);
        assert_eq!(a.text, b.text);
        assert_eq!(a.slice, b.slice);
        assert_eq!(a.token_count, b.token_count);
        assert_eq!(a.unk_count, b.unk_count);
        assert_eq!(a.byte_count, b.byte_count);
        assert_eq!(a.grapheme_count, b.grapheme_count);
        assert_eq!(a.ascii_ratio_bytes.to_bits(), b.ascii_ratio_bytes.to_bits());
    }
}

#[test]
fn tokenizer_metadata_flows_into_rows() {
    let messages = run_collect(&ascii_sweep_config());
    let rows = collect_rows(&messages);
    for row in &rows {
        assert_eq!(row.tokenizer_id, "ws-ascii");
        assert_eq!(row.tokenizer_family, "whitespace");
        assert_eq!(row.tokenizer_vocab_size, 30_000);
        assert_eq!(row.add_special_tokens, 0);
        assert_eq!(row.repeats, 5);
        assert!(row.time_ms_median >= 0.0);
        assert!(row.provenance_json.contains("\"app_version\":\"0.0.0-test\""));
    }
}

#[test]
fn unknown_tokenizer_yields_single_error_message() {
    let mut config = ascii_sweep_config();
    config.tokenizers = vec!["missing".to_string()];
    let messages = run_collect(&config);
    assert_eq!(messages.len(), 1);
    match &messages[0] {
        JobMessage::Error { message, stack } => {
            assert!(message.contains("unknown-tokenizer"));
            assert!(stack.is_some());
        }
        other => panic!("expected error, got {other:?}"),
    }
}

#[test]
fn blank_only_corpus_is_rejected_at_run_time() {
    let mut config = ascii_sweep_config();
    config.lines = vec!["   ".to_string(), "".to_string()];
    let messages = run_collect(&config);
    assert_eq!(messages.len(), 1);
    assert!(matches!(&messages[0], JobMessage::Error { message, .. }
        if message.contains("no-usable-lines")));
}
