//! # Comparison Handler Table
//!
//! One predicate and one relation phrase per canonical operator. Validate and
//! Evaluate need the evaluator and are handled by the engine itself.

use crate::types::{AssertionError, AssertionOperator, AssertionResult};
use assertion_expr::{OrderOp, Value};
use regex::Regex;

pub type Predicate = fn(&Value, &Value) -> AssertionResult<bool>;

#[derive(Clone, Copy)]
pub struct ComparisonHandler {
    pub predicate: Predicate,
    pub phrase: &'static str,
}

/// Phrase used when a validate expression is falsy
pub const VALIDATE_PHRASE: &str = "should validate to true with";

static HANDLERS: &[(AssertionOperator, ComparisonHandler)] = &[
    (AssertionOperator::Equal, ComparisonHandler { predicate: equal, phrase: "should be" }),
    (AssertionOperator::NotEqual, ComparisonHandler { predicate: not_equal, phrase: "should not be" }),
    (AssertionOperator::LessThan, ComparisonHandler { predicate: less_than, phrase: "should be less than" }),
    (AssertionOperator::GreaterThan, ComparisonHandler { predicate: greater_than, phrase: "should be greater than" }),
    (AssertionOperator::LessOrEqual, ComparisonHandler { predicate: less_or_equal, phrase: "should be less than or equal" }),
    (AssertionOperator::GreaterOrEqual, ComparisonHandler { predicate: greater_or_equal, phrase: "should be greater than or equal" }),
    (AssertionOperator::Contains, ComparisonHandler { predicate: contains, phrase: "should contain" }),
    (AssertionOperator::NotContains, ComparisonHandler { predicate: not_contains, phrase: "should not contain" }),
    (AssertionOperator::StartsWith, ComparisonHandler { predicate: starts_with, phrase: "should start with" }),
    (AssertionOperator::EndsWith, ComparisonHandler { predicate: ends_with, phrase: "should end with" }),
    (AssertionOperator::Matches, ComparisonHandler { predicate: matches, phrase: "should match" }),
];

pub fn handler_for(operator: AssertionOperator) -> Option<&'static ComparisonHandler> {
    HANDLERS
        .iter()
        .find(|(op, _)| *op == operator)
        .map(|(_, handler)| handler)
}

fn equal(actual: &Value, expected: &Value) -> AssertionResult<bool> {
    Ok(actual == expected)
}

fn not_equal(actual: &Value, expected: &Value) -> AssertionResult<bool> {
    Ok(actual != expected)
}

fn less_than(actual: &Value, expected: &Value) -> AssertionResult<bool> {
    Ok(actual.compare_order(OrderOp::Lt, expected)?)
}

fn greater_than(actual: &Value, expected: &Value) -> AssertionResult<bool> {
    Ok(actual.compare_order(OrderOp::Gt, expected)?)
}

fn less_or_equal(actual: &Value, expected: &Value) -> AssertionResult<bool> {
    Ok(actual.compare_order(OrderOp::Le, expected)?)
}

fn greater_or_equal(actual: &Value, expected: &Value) -> AssertionResult<bool> {
    Ok(actual.compare_order(OrderOp::Ge, expected)?)
}

/// Membership with collection-valued expectations: a list expects all of its
/// items, a dict expected in a dict is a sub-mapping, a list expected in a
/// dict names required keys
pub fn contains(actual: &Value, expected: &Value) -> AssertionResult<bool> {
    match (actual, expected) {
        (Value::List(_), Value::List(items)) => all_contained(actual, items),
        (Value::Dict(entries), Value::Dict(subset)) => Ok(subset
            .iter()
            .all(|(key, value)| entries.get(key) == Some(value))),
        (Value::Dict(_), Value::List(keys)) => all_contained(actual, keys),
        _ => Ok(actual.contains(expected)?),
    }
}

fn all_contained(actual: &Value, items: &[Value]) -> AssertionResult<bool> {
    for item in items {
        if !actual.contains(item)? {
            return Ok(false);
        }
    }
    Ok(true)
}

fn not_contains(actual: &Value, expected: &Value) -> AssertionResult<bool> {
    contains(actual, expected).map(|found| !found)
}

fn string_operands<'a>(
    symbol: &str,
    actual: &'a Value,
    expected: &'a Value,
) -> AssertionResult<(&'a str, &'a str)> {
    match (actual, expected) {
        (Value::Str(a), Value::Str(e)) => Ok((a, e)),
        _ => Err(AssertionError::type_mismatch(format!(
            "'{}' requires string operands, got '{}' and '{}'",
            symbol,
            actual.type_name(),
            expected.type_name()
        ))),
    }
}

fn compile(pattern: &str) -> AssertionResult<Regex> {
    Regex::new(pattern).map_err(|e| AssertionError::InvalidPattern {
        pattern: pattern.to_string(),
        reason: e.to_string(),
    })
}

fn starts_with(actual: &Value, expected: &Value) -> AssertionResult<bool> {
    let (text, prefix) = string_operands("^=", actual, expected)?;
    Ok(compile(&format!("^{}", regex::escape(prefix)))?.is_match(text))
}

fn ends_with(actual: &Value, expected: &Value) -> AssertionResult<bool> {
    let (text, suffix) = string_operands("$=", actual, expected)?;
    Ok(compile(&format!("{}$", regex::escape(suffix)))?.is_match(text))
}

fn matches(actual: &Value, expected: &Value) -> AssertionResult<bool> {
    let (text, pattern) = string_operands("matches", actual, expected)?;
    Ok(compile(pattern)?.is_match(text))
}
