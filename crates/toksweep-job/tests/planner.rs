use toksweep_core::{
    AxisValue, JobConfig, Preset, SweepAxis, SweepError, SweepOverrides,
};
use toksweep_job::planner::resolve;

fn base_config(preset: Preset) -> JobConfig {
    JobConfig {
        job_id: "plan-test".to_string(),
        lines: vec![
            "Kal ka traffic bahut bad tha".to_string(),
            "The quick brown fox".to_string(),
            "कल का ट्रैफिक बहुत खराब था".to_string(),
        ],
        tokenizers: vec!["ws-ascii".to_string()],
        preset,
        sweeps: SweepOverrides::default(),
        enabled_axes: SweepAxis::ALL.to_vec(),
        sample_lines: None,
        repeats: None,
        chunk_size: None,
        seed: Some(11),
    }
}

#[test]
fn fast_preset_resolves_expected_grid() {
    let plan = resolve(&base_config(Preset::Fast)).unwrap();
    assert_eq!(plan.sample_lines, 8);
    assert_eq!(plan.repeats, 5);
    assert_eq!(plan.chunk_size, 25);
    // 1 baseline + 3 ascii + 1 emoji + 1 url + 2 normalize + 1 zwj + 1 pert
    assert_eq!(plan.rows_per_line(), 10);
    assert_eq!(plan.total_rows(3, 2), 60);
}

#[test]
fn full_preset_resolves_denser_grid() {
    let plan = resolve(&base_config(Preset::Full)).unwrap();
    assert_eq!(plan.sample_lines, 32);
    assert_eq!(plan.repeats, 7);
    // 1 + 5 + 3 + 1 + 4 + 1 + 3
    assert_eq!(plan.rows_per_line(), 18);
}

#[test]
fn custom_preset_defaults_to_whole_corpus_and_no_sweeps() {
    let plan = resolve(&base_config(Preset::Custom)).unwrap();
    assert_eq!(plan.sample_lines, 3);
    assert_eq!(plan.repeats, 5);
    assert!(plan.axes.is_empty());
    assert_eq!(plan.rows_per_line(), 1);
}

#[test]
fn overrides_replace_preset_values() {
    let mut config = base_config(Preset::Fast);
    config.sweeps.ascii_ratio = Some(vec![0.25]);
    config.sweeps.normalize = Some(vec![]);
    let plan = resolve(&config).unwrap();
    assert_eq!(plan.sweeps.ascii_ratio, vec![0.25]);
    // an emptied axis disappears from the resolved axis list
    assert!(!plan
        .enabled_axes()
        .contains(&SweepAxis::Normalize));
    // 1 + 1 ascii + 1 emoji + 1 url + 0 normalize + 1 zwj + 1 pert
    assert_eq!(plan.rows_per_line(), 6);
}

#[test]
fn disabled_axes_are_skipped_and_order_is_fixed() {
    let mut config = base_config(Preset::Fast);
    // deliberately reversed relative to sweep order
    config.enabled_axes = vec![SweepAxis::Normalize, SweepAxis::AsciiRatio];
    let plan = resolve(&config).unwrap();
    assert_eq!(
        plan.enabled_axes(),
        vec![SweepAxis::AsciiRatio, SweepAxis::Normalize]
    );
}

#[test]
fn axis_values_render_in_sweep_order() {
    let plan = resolve(&base_config(Preset::Fast)).unwrap();
    let (axis, values) = &plan.axes[0];
    assert_eq!(*axis, SweepAxis::AsciiRatio);
    let rendered: Vec<String> = values.iter().map(AxisValue::render).collect();
    assert_eq!(rendered, vec!["0", "0.5", "1"]);
}

#[test]
fn stamp_echoes_resolved_configuration() {
    let plan = resolve(&base_config(Preset::Fast)).unwrap();
    let stamp = plan.stamp();
    assert_eq!(stamp.preset, Preset::Fast);
    assert_eq!(stamp.seed, 11);
    assert_eq!(stamp.sample_lines, 8);
    assert_eq!(stamp.enabled_axes, plan.enabled_axes());
}

#[test]
fn invalid_configurations_are_rejected() {
    let mut empty_lines = base_config(Preset::Fast);
    empty_lines.lines.clear();
    assert!(matches!(
        resolve(&empty_lines),
        Err(SweepError::Config(info)) if info.code == "empty-lines"
    ));

    let mut empty_tokenizers = base_config(Preset::Fast);
    empty_tokenizers.tokenizers.clear();
    assert!(matches!(
        resolve(&empty_tokenizers),
        Err(SweepError::Config(info)) if info.code == "empty-tokenizers"
    ));

    let mut zero_sample = base_config(Preset::Fast);
    zero_sample.sample_lines = Some(0);
    assert!(matches!(
        resolve(&zero_sample),
        Err(SweepError::Config(info)) if info.code == "zero-sample"
    ));

    let mut zero_repeats = base_config(Preset::Fast);
    zero_repeats.repeats = Some(0);
    assert!(matches!(
        resolve(&zero_repeats),
        Err(SweepError::Config(info)) if info.code == "zero-repeats"
    ));
}
