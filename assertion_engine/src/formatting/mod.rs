//! Formatting pipeline run on values before comparison

use crate::types::{AssertionResult, Formatter};
use assertion_expr::Value;

/// Run `formatters` left to right; an empty list is the identity
pub fn apply_formatting(value: Value, formatters: &[Formatter]) -> Value {
    formatters
        .iter()
        .fold(value, |value, formatter| formatter.apply(value))
}

/// Format `expected` with the same pipeline, but only when the
/// `ApplyToExpected` marker is present
pub fn apply_formatting_to_expected(expected: Value, formatters: &[Formatter]) -> Value {
    if formatters.contains(&Formatter::ApplyToExpected) {
        apply_formatting(expected, formatters)
    } else {
        expected
    }
}

pub fn parse_formatters<S: AsRef<str>>(names: &[S]) -> AssertionResult<Vec<Formatter>> {
    names.iter().map(|name| name.as_ref().parse()).collect()
}
