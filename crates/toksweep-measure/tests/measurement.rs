use toksweep_core::{ByteTokenizer, SweepError, Tokenizer, WhitespaceTokenizer};
use toksweep_measure::{measure, MIN_REPEATS, TIMED_OP_BATCHED, TIMED_OP_SINGLE};

#[test]
fn repeats_are_clamped_to_minimum() {
    let tok = WhitespaceTokenizer::new("ws", true);
    let measurement = measure(&tok, "kal ka traffic bahut bad tha", 1).unwrap();
    assert_eq!(measurement.repeats, MIN_REPEATS);
    assert!(measurement.median_ms >= 0.0);
    assert!(measurement.mad_ms >= 0.0);
}

#[test]
fn configured_repeats_above_minimum_are_kept() {
    let tok = ByteTokenizer::new("byte");
    let measurement = measure(&tok, "some input text", 9).unwrap();
    assert_eq!(measurement.repeats, 9);
}

#[test]
fn timed_op_names_a_known_mode() {
    let tok = WhitespaceTokenizer::new("ws", true);
    let measurement = measure(&tok, "short", 5).unwrap();
    assert!(
        measurement.timed_op == TIMED_OP_SINGLE || measurement.timed_op == TIMED_OP_BATCHED,
        "unexpected timed_op {}",
        measurement.timed_op
    );
    // Whitespace splitting of a short string is far below the batching
    // threshold on any modern host.
    assert_eq!(measurement.timed_op, TIMED_OP_BATCHED);
}

#[test]
fn encode_failure_propagates_without_partial_data() {
    struct FailingTokenizer(toksweep_core::TokenizerInfo);
    impl Tokenizer for FailingTokenizer {
        fn info(&self) -> &toksweep_core::TokenizerInfo {
            &self.0
        }
        fn encode(&self, _text: &str) -> Result<toksweep_core::Encoding, SweepError> {
            Err(SweepError::Tokenizer(toksweep_core::ErrorInfo::new(
                "encode-failed",
                "synthetic failure",
            )))
        }
    }
    let tok = FailingTokenizer(toksweep_core::TokenizerInfo {
        id: "broken".to_string(),
        family: "test".to_string(),
        vocab_size: 0,
        add_special_tokens: false,
    });
    assert!(matches!(
        measure(&tok, "anything", 5),
        Err(SweepError::Tokenizer(_))
    ));
}

#[test]
fn retained_samples_match_repeat_count() {
    let tok = WhitespaceTokenizer::new("ws", true);
    let measurement = measure(&tok, "a b c d e f g", 6).unwrap();
    if let Some(samples) = &measurement.samples_ms {
        assert_eq!(samples.len(), measurement.repeats as usize);
    }
}
