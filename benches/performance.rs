use criterion::{criterion_group, criterion_main, Criterion};
use textflow_core::prelude::{Attribute, AttributeType, Field, Schema, Tuple};
use textflow_exec::Engine;
use textflow_operators::matchers::regex::RegexPredicate;
use textflow_operators::source::TupleSource;

fn make_tuples(rows: usize) -> (Schema, Vec<Tuple>) {
    let schema = Schema::new(vec![
        Attribute::new("id", AttributeType::Integer),
        Attribute::new("content", AttributeType::Text),
    ])
    .expect("valid schema");
    let tuples = (0..rows)
        .map(|i| {
            Tuple::new(
                schema.clone(),
                vec![
                    Field::Integer(i as i32),
                    Field::Text(format!(
                        "record {} mentions aspirin and a{}c",
                        i,
                        "b".repeat(1 + i % 8)
                    )),
                ],
            )
            .expect("valid tuple")
        })
        .collect();
    (schema, tuples)
}

fn bench_regex_matcher(c: &mut Criterion) {
    let (schema, tuples) = make_tuples(1024);
    let engine = Engine::default();
    c.bench_function("regex_matcher", |b| {
        b.iter(|| {
            let source = TupleSource::new(schema.clone(), tuples.clone()).expect("source");
            let mut op = engine.regex_matcher(RegexPredicate {
                pattern: "ab+c".to_string(),
                attribute_names: vec!["content".to_string()],
                ignore_case: true,
                spans_attribute: "matches".to_string(),
            });
            op.set_input(Box::new(source)).expect("wire");
            let (out, _) = engine.collect(&mut op).expect("run");
            assert_eq!(out.len(), 1024);
        })
    });
}

criterion_group!(matchers, bench_regex_matcher);
criterion_main!(matchers);
