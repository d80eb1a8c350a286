//! Operator protocol tests: lifecycle guards, idempotence, and the pure
//! schema-transformation contract.


use textflow_core::prelude::{AttributeType, Schema};
use textflow_operators::matchers::regex::{RegexMatcher, RegexPredicate};
use textflow_operators::source::TupleSource;
use textflow_operators::traits::{OpError, Operator};
use textflow_operators::unary::UnaryOperator;

use test_support::{text_schema, text_source, text_tuples};

fn simple_matcher() -> UnaryOperator<RegexMatcher> {
    UnaryOperator::new(RegexMatcher::new(RegexPredicate {
        pattern: "a".to_string(),
        attribute_names: vec!["content".to_string()],
        ignore_case: false,
        spans_attribute: "matches".to_string(),
    }))
}

#[test]
fn test_pull_before_open_is_rejected() {
    let mut source = text_source(&[(1, "alpha")]);
    assert!(matches!(source.pull(), Err(OpError::Config(_))));

    let mut op = simple_matcher();
    op.set_input(Box::new(text_source(&[(1, "alpha")])))
        .expect("set input");
    assert!(matches!(op.pull(), Err(OpError::Config(_))));
}

#[test]
fn test_open_without_input_is_rejected() {
    let mut op = simple_matcher();
    assert!(matches!(op.open(), Err(OpError::Config(_))));
}

#[test]
fn test_rewiring_a_live_pipeline_is_rejected() {
    let mut op = simple_matcher();
    op.set_input(Box::new(text_source(&[(1, "alpha")])))
        .expect("set input");
    op.open().expect("open");
    let err = op.set_input(Box::new(text_source(&[(2, "beta")]))).err();
    assert!(matches!(err, Some(OpError::Config(_))));
    op.close().expect("close");
}

#[test]
fn test_open_and_close_are_idempotent() {
    let rows = [(1, "an apple"), (2, "a pear")];
    let mut op = simple_matcher();
    op.set_input(Box::new(text_source(&rows))).expect("set input");
    op.open().expect("open");
    op.open().expect("second open is a no-op");

    let mut seen = 0;
    while op.pull().expect("pull").is_some() {
        seen += 1;
    }
    assert_eq!(seen, 2);

    op.close().expect("close");
    op.close().expect("second close is a no-op");
}

#[test]
fn test_output_schema_requires_open() {
    let mut op = simple_matcher();
    op.set_input(Box::new(text_source(&[(1, "alpha")])))
        .expect("set input");
    assert!(matches!(op.output_schema(), Err(OpError::Config(_))));

    op.open().expect("open");
    let schema = op.output_schema().expect("schema").clone();
    assert!(schema.contains("matches"));
    assert_eq!(
        schema.attribute("matches").expect("attribute").attribute_type(),
        AttributeType::List
    );
    op.close().expect("close");
}

#[test]
fn test_transform_schema_is_pure_and_probeable() {
    // Probing the output schema must not require opening anything.
    let op = simple_matcher();
    let out = op.transform_schema(&[text_schema()]).expect("transform");
    assert_eq!(out.len(), text_schema().len() + 1);
    assert!(out.contains("matches"));

    // And it must insist on exactly one input.
    assert!(matches!(op.transform_schema(&[]), Err(OpError::Schema(_))));
    assert!(matches!(
        op.transform_schema(&[text_schema(), text_schema()]),
        Err(OpError::Schema(_))
    ));
}

#[test]
fn test_source_rejects_mismatched_tuples() {
    let schema = Schema::new(vec![textflow_core::attribute::Attribute::new(
        "content",
        AttributeType::Text,
    )])
    .expect("schema");
    let err = TupleSource::new(schema, text_tuples(&[(1, "alpha")])).err();
    assert!(matches!(err, Some(OpError::Config(_))));
}

#[test]
fn test_source_rewinds_on_reopen() {
    let mut source = text_source(&[(1, "alpha"), (2, "beta")]);
    source.open().expect("open");
    assert!(source.pull().expect("pull").is_some());
    source.close().expect("close");

    source.open().expect("reopen");
    let mut seen = 0;
    while source.pull().expect("pull").is_some() {
        seen += 1;
    }
    assert_eq!(seen, 2, "reopen rewinds to the first tuple");
    source.close().expect("close");
}
