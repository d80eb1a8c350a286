//! End-to-end pipeline tests driven through the exec engine.


use textflow_core::config::EngineConfig;
use textflow_operators::matchers::keyword::{KeywordMatcher, KeywordPredicate};
use textflow_operators::matchers::regex::RegexPredicate;
use textflow_operators::unary::UnaryOperator;
use textflow_exec::{Engine, RunSummary};

use test_support::{text_source, text_tuples};

#[test]
fn test_keyword_spans_feed_a_labeled_regex() {
    let rows = [
        (1, "aspirin taken daily"),
        (2, "no medication here"),
        (3, "ASPIRIN taken at night"),
    ];
    let engine = Engine::default();

    // Stage one produces "drug" spans; stage two resolves `<drug>` from them.
    let keyword = UnaryOperator::with_input(
        KeywordMatcher::new(KeywordPredicate {
            query: "aspirin".to_string(),
            attribute_names: vec!["content".to_string()],
            ignore_case: true,
            spans_attribute: "drug".to_string(),
        }),
        Box::new(text_source(&rows)),
    );
    let mut regex = engine.regex_matcher(RegexPredicate {
        pattern: "<drug> taken".to_string(),
        attribute_names: vec!["content".to_string()],
        ignore_case: true,
        spans_attribute: "mentions".to_string(),
    });
    regex.set_input(Box::new(keyword)).expect("wire pipeline");

    let (tuples, summary) = engine.collect(&mut regex).expect("run pipeline");
    assert_eq!(tuples.len(), 2);
    assert_eq!(summary.tuples_emitted, 2);

    let mentions = tuples[0]
        .field_by_name("mentions")
        .expect("mentions attribute")
        .as_span_list()
        .expect("span list");
    assert_eq!(mentions[0].value(), "aspirin taken");
    let mentions = tuples[1]
        .field_by_name("mentions")
        .expect("mentions attribute")
        .as_span_list()
        .expect("span list");
    assert_eq!(mentions[0].value(), "ASPIRIN taken");

    // Both stages' result attributes are visible downstream.
    assert!(tuples[0].schema().contains("drug"));
    assert!(tuples[0].schema().contains("mentions"));
}

#[test]
fn test_broadcast_branches_feed_independent_matchers() {
    let rows = [
        (1, "rust and regex"),
        (2, "plain text"),
        (3, "regex rules"),
    ];
    let engine = Engine::default();
    let mut connector = engine
        .broadcast(Box::new(text_source(&rows)), 2)
        .expect("connector");

    let mut keyword_branch = UnaryOperator::with_input(
        KeywordMatcher::new(KeywordPredicate {
            query: "rust".to_string(),
            attribute_names: vec!["content".to_string()],
            ignore_case: false,
            spans_attribute: "mentions".to_string(),
        }),
        Box::new(connector.branch(0).expect("branch 0")),
    );
    let mut regex_branch = engine.regex_matcher(RegexPredicate {
        pattern: "regex".to_string(),
        attribute_names: vec!["content".to_string()],
        ignore_case: false,
        spans_attribute: "matches".to_string(),
    });
    regex_branch
        .set_input(Box::new(connector.branch(1).expect("branch 1")))
        .expect("wire branch 1");

    let (keyword_out, _) = engine.collect(&mut keyword_branch).expect("branch 0 run");
    let (regex_out, _) = engine.collect(&mut regex_branch).expect("branch 1 run");

    assert_eq!(keyword_out.len(), 1);
    assert_eq!(regex_out.len(), 2);
}

#[test]
fn test_run_summary_provenance() {
    let rows = [(1, "alpha"), (2, "beta"), (3, "gamma")];
    let engine = Engine::default();
    let mut source = text_source(&rows);

    let (tuples, summary) = engine.collect(&mut source).expect("run");
    assert_eq!(tuples, text_tuples(&rows));
    assert_eq!(summary.tuples_emitted, 3);
    assert_eq!(summary.engine_version, textflow_core::VERSION);
    assert!(summary.started_ms <= summary.finished_ms);

    let json = serde_json::to_string(&summary).expect("serialize summary");
    let parsed: RunSummary = serde_json::from_str(&json).expect("parse summary");
    assert_eq!(parsed.id, summary.id);
    assert_eq!(parsed.tuples_emitted, summary.tuples_emitted);
}

#[test]
fn test_engine_config_from_env() {
    std::env::set_var("TEXTFLOW_BUFFER_CAPACITY", "3");
    std::env::set_var("TEXTFLOW_PATTERN_CACHE_CAPACITY", "7");
    let cfg = EngineConfig::from_env();
    std::env::remove_var("TEXTFLOW_BUFFER_CAPACITY");
    std::env::remove_var("TEXTFLOW_PATTERN_CACHE_CAPACITY");

    assert_eq!(cfg.buffer_capacity, 3);
    assert_eq!(cfg.pattern_cache_capacity, 7);

    // Unset variables fall back to defaults.
    let defaults = EngineConfig::from_env();
    assert_eq!(defaults.buffer_capacity, EngineConfig::default().buffer_capacity);
}

#[test]
fn test_tuples_round_trip_through_serde() {
    let tuples = text_tuples(&[(1, "alpha"), (2, "beta")]);
    let json = serde_json::to_string(&tuples).expect("serialize tuples");
    let parsed: Vec<textflow_core::tuple::Tuple> =
        serde_json::from_str(&json).expect("parse tuples");
    assert_eq!(parsed, tuples);
}
