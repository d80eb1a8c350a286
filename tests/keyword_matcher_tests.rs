//! Keyword matcher tests: literal scan semantics and case handling.


use textflow_core::tuple::Tuple;
use textflow_operators::matchers::keyword::{KeywordMatcher, KeywordPredicate};
use textflow_operators::traits::{OpError, Operator};
use textflow_operators::unary::UnaryOperator;

use test_support::text_source;

fn predicate(query: &str, ignore_case: bool) -> KeywordPredicate {
    KeywordPredicate {
        query: query.to_string(),
        attribute_names: vec!["content".to_string()],
        ignore_case,
        spans_attribute: "mentions".to_string(),
    }
}

fn matcher_over(
    predicate: KeywordPredicate,
    rows: &[(i32, &str)],
) -> UnaryOperator<KeywordMatcher> {
    UnaryOperator::with_input(KeywordMatcher::new(predicate), Box::new(text_source(rows)))
}

fn drain(op: &mut dyn Operator) -> Vec<Tuple> {
    let mut out = Vec::new();
    while let Some(tuple) = op.pull().expect("pull") {
        out.push(tuple);
    }
    out
}

#[test]
fn test_metacharacters_match_literally() {
    let mut op = matcher_over(predicate("c++", false), &[(1, "using c++ and c--")]);
    op.open().expect("open");
    let out = drain(&mut op);
    assert_eq!(out.len(), 1);
    let spans = out[0]
        .field_by_name("mentions")
        .expect("mentions attribute")
        .as_span_list()
        .expect("span list");
    assert_eq!(spans.len(), 1);
    assert_eq!((spans[0].start(), spans[0].end()), (6, 9));
    assert_eq!(spans[0].value(), "c++");
    assert_eq!(spans[0].key(), "c++");
}

#[test]
fn test_case_insensitive_scan() {
    let mut op = matcher_over(predicate("rust", true), &[(1, "Rust is great")]);
    op.open().expect("open");
    let out = drain(&mut op);
    let spans = out[0]
        .field_by_name("mentions")
        .expect("mentions attribute")
        .as_span_list()
        .expect("span list");
    assert_eq!((spans[0].start(), spans[0].end()), (0, 4));
    assert_eq!(spans[0].value(), "Rust");
}

#[test]
fn test_repeated_occurrences_do_not_overlap() {
    let mut op = matcher_over(predicate("aa", false), &[(1, "aaaa")]);
    op.open().expect("open");
    let out = drain(&mut op);
    let spans = out[0]
        .field_by_name("mentions")
        .expect("mentions attribute")
        .as_span_list()
        .expect("span list");
    let offsets: Vec<(usize, usize)> = spans.iter().map(|s| (s.start(), s.end())).collect();
    assert_eq!(offsets, vec![(0, 2), (2, 4)]);
}

#[test]
fn test_non_matching_tuples_are_filtered() {
    let rows = [(1, "rust here"), (2, "go there"), (3, "more rust")];
    let mut op = matcher_over(predicate("rust", false), &rows);
    op.open().expect("open");
    assert_eq!(drain(&mut op).len(), 2);
}

#[test]
fn test_empty_query_is_rejected_at_open() {
    let mut op = matcher_over(predicate("", false), &[(1, "anything")]);
    assert!(matches!(op.open(), Err(OpError::Config(_))));
}
