//! Booleans compared against loosely typed expected values

use super::check_allowed;
use crate::execution::{AssertionEngine, AssertionRequest};
use crate::types::{AssertionOperator, AssertionResult, ParsedOperator};
use assertion_expr::Value;

/// Compared case-insensitively; surrounding whitespace is significant
const FALSE_STRINGS: [&str; 7] = ["FALSE", "NO", "OFF", "0", "UNCHECKED", "NONE", ""];

const ALLOWED: [AssertionOperator; 2] = [AssertionOperator::Equal, AssertionOperator::NotEqual];

pub fn is_truthy_str(text: &str) -> bool {
    !FALSE_STRINGS.contains(&text.to_uppercase().as_str())
}

/// Strings follow `is_truthy_str`; every other kind its usual truthiness
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Str(text) => is_truthy_str(text),
        other => other.is_truthy(),
    }
}

impl AssertionEngine {
    pub fn verify_boolean(
        &self,
        actual: impl Into<Value>,
        operator: Option<ParsedOperator>,
        expected: Option<Value>,
        message: &str,
        custom_message: Option<&str>,
    ) -> AssertionResult<Value> {
        let mut request = AssertionRequest::new(actual).message(message);
        if let Some(operator) = operator {
            request = request.operator(check_allowed(&operator, &ALLOWED, "bool")?);
        }
        let expected = expected.as_ref().map(is_truthy).unwrap_or(false);
        request.expected = Some(Value::Bool(expected));
        request.custom_message = custom_message.map(str::to_string);
        self.verify_request(request)
    }
}
