//! Free functions over the process-wide default engine

use crate::adapters::NumericKind;
use crate::execution::default_engine;
use crate::types::{AssertionResult, Formatter, ParsedOperator};
use assertion_expr::Value;
use std::collections::BTreeMap;

pub fn verify(
    actual: impl Into<Value>,
    operator: Option<ParsedOperator>,
    expected: Option<Value>,
    message: &str,
    custom_message: Option<&str>,
    formatters: &[Formatter],
) -> AssertionResult<Value> {
    default_engine().verify(actual, operator, expected, message, custom_message, formatters)
}

pub fn verify_numeric_as_string(
    actual: impl Into<Value>,
    operator: Option<ParsedOperator>,
    expected: Option<Value>,
    kind: NumericKind,
    message: &str,
    custom_message: Option<&str>,
) -> AssertionResult<Value> {
    default_engine().verify_numeric_as_string(actual, operator, expected, kind, message, custom_message)
}

pub fn verify_float_as_string(
    actual: impl Into<Value>,
    operator: Option<ParsedOperator>,
    expected: Option<Value>,
    message: &str,
    custom_message: Option<&str>,
) -> AssertionResult<Value> {
    default_engine().verify_float_as_string(actual, operator, expected, message, custom_message)
}

pub fn verify_int_as_string(
    actual: impl Into<Value>,
    operator: Option<ParsedOperator>,
    expected: Option<Value>,
    message: &str,
    custom_message: Option<&str>,
) -> AssertionResult<Value> {
    default_engine().verify_int_as_string(actual, operator, expected, message, custom_message)
}

pub fn verify_boolean(
    actual: impl Into<Value>,
    operator: Option<ParsedOperator>,
    expected: Option<Value>,
    message: &str,
    custom_message: Option<&str>,
) -> AssertionResult<Value> {
    default_engine().verify_boolean(actual, operator, expected, message, custom_message)
}

pub fn verify_ordered_collection(
    actual: Vec<Value>,
    operator: Option<ParsedOperator>,
    expected: Option<Value>,
    message: &str,
    custom_message: Option<&str>,
) -> AssertionResult<Value> {
    default_engine().verify_ordered_collection(actual, operator, expected, message, custom_message)
}

pub fn verify_keyed_collection(
    actual: BTreeMap<String, Value>,
    operator: Option<ParsedOperator>,
    expected: Option<Value>,
    message: &str,
    custom_message: Option<&str>,
) -> AssertionResult<Value> {
    default_engine().verify_keyed_collection(actual, operator, expected, message, custom_message)
}

pub fn verify_keyed_collection_numeric_per_key(
    actual: BTreeMap<String, Value>,
    operator: Option<ParsedOperator>,
    expected: Option<Value>,
    message: &str,
    custom_message: Option<&str>,
) -> AssertionResult<Value> {
    default_engine().verify_keyed_collection_numeric_per_key(actual, operator, expected, message, custom_message)
}

pub fn verify_flag_set(
    actual: impl Into<Value>,
    operator: Option<ParsedOperator>,
    expected: Option<Value>,
    message: &str,
    custom_message: Option<&str>,
) -> AssertionResult<Value> {
    default_engine().verify_flag_set(actual, operator, expected, message, custom_message)
}
