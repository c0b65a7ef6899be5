use assertion_engine::prelude::*;
use assertion_engine::parse_operator;
use criterion::{black_box, criterion_group, criterion_main, Criterion};

fn bench_equality(c: &mut Criterion) {
    let engine = AssertionEngine::new();
    let operator = Some(parse_operator("=="));
    let expected = Some(Value::str("hello world"));
    let formatters = [Formatter::NormalizeSpaces, Formatter::CaseInsensitive];

    c.bench_function("verify_equal_formatted", |b| {
        b.iter(|| {
            engine.verify(
                black_box("  Hello   World "),
                operator.clone(),
                expected.clone(),
                "",
                None,
                &formatters,
            )
        })
    });
}

fn bench_validate(c: &mut Criterion) {
    let engine = AssertionEngine::new();
    let operator = Some(parse_operator("validate"));
    let expected = Some(Value::str("0 < value < 100 and value % 2 == 0"));

    c.bench_function("verify_validate_expression", |b| {
        b.iter(|| engine.verify(black_box(42i64), operator.clone(), expected.clone(), "", None, &[]))
    });
}

fn bench_ordered_collection(c: &mut Criterion) {
    let engine = AssertionEngine::new();
    let operator = Some(parse_operator("=="));
    let actual: Vec<Value> = (0..64i64).rev().map(Value::Int).collect();
    let expected = Some(Value::List((0..64i64).map(Value::Int).collect()));

    c.bench_function("verify_ordered_collection_64", |b| {
        b.iter(|| {
            engine.verify_ordered_collection(black_box(actual.clone()), operator.clone(), expected.clone(), "", None)
        })
    });
}

criterion_group!(benches, bench_equality, bench_validate, bench_ordered_collection);
criterion_main!(benches);
