//! Numeric comparisons where the expected value usually arrives as text

use super::{check_allowed, reject};
use crate::execution::{AssertionEngine, AssertionRequest};
use crate::types::{AssertionError, AssertionOperator, AssertionResult, ParsedOperator};
use assertion_expr::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumericKind {
    Float,
    Int,
}

impl NumericKind {
    pub fn name(&self) -> &'static str {
        match self {
            NumericKind::Float => "float",
            NumericKind::Int => "int",
        }
    }

    /// Coerce an expected value; ints parse as float and truncate toward zero
    pub fn coerce(&self, expected: &Value) -> AssertionResult<Value> {
        let number = match expected {
            Value::Str(text) => text.trim().parse::<f64>().map_err(|e| {
                AssertionError::invalid_expected(text, self.name(), e.to_string())
            })?,
            Value::Bool(_) | Value::Int(_) | Value::Float(_) => {
                if let (NumericKind::Int, Some(i)) = (self, expected.as_i64()) {
                    return Ok(Value::Int(i));
                }
                expected.as_f64().unwrap_or_default()
            }
            other => {
                return Err(AssertionError::invalid_expected(
                    other,
                    self.name(),
                    format!("{} is not numeric", other.type_name()),
                ))
            }
        };

        match self {
            NumericKind::Float => Ok(Value::Float(number)),
            NumericKind::Int => {
                let truncated = number.trunc();
                let in_range = truncated >= i64::MIN as f64 && truncated < i64::MAX as f64;
                if !in_range {
                    return Err(AssertionError::invalid_expected(
                        expected,
                        self.name(),
                        "out of integer range",
                    ));
                }
                Ok(Value::Int(truncated as i64))
            }
        }
    }
}

fn allowed() -> Vec<AssertionOperator> {
    AssertionOperator::NUMERICAL
        .iter()
        .chain(AssertionOperator::EVALUATION.iter())
        .copied()
        .collect()
}

impl AssertionEngine {
    pub fn verify_numeric_as_string(
        &self,
        actual: impl Into<Value>,
        operator: Option<ParsedOperator>,
        expected: Option<Value>,
        kind: NumericKind,
        message: &str,
        custom_message: Option<&str>,
    ) -> AssertionResult<Value> {
        let actual = actual.into();
        let Some(operator) = operator else {
            return Ok(actual);
        };
        let op = check_allowed(&operator, &allowed(), kind.name())?;

        let expected = expected.unwrap_or_default();
        let expected = if op.is_evaluation() {
            match expected {
                Value::Str(_) => expected,
                other => Value::Str(other.to_string()),
            }
        } else {
            kind.coerce(&expected).map_err(reject)?
        };

        let mut request = AssertionRequest::new(actual)
            .operator(op)
            .expected(expected)
            .message(message);
        request.custom_message = custom_message.map(str::to_string);
        self.verify_request(request)
    }

    pub fn verify_float_as_string(
        &self,
        actual: impl Into<Value>,
        operator: Option<ParsedOperator>,
        expected: Option<Value>,
        message: &str,
        custom_message: Option<&str>,
    ) -> AssertionResult<Value> {
        self.verify_numeric_as_string(actual, operator, expected, NumericKind::Float, message, custom_message)
    }

    pub fn verify_int_as_string(
        &self,
        actual: impl Into<Value>,
        operator: Option<ParsedOperator>,
        expected: Option<Value>,
        message: &str,
        custom_message: Option<&str>,
    ) -> AssertionResult<Value> {
        self.verify_numeric_as_string(actual, operator, expected, NumericKind::Int, message, custom_message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn op(text: &str) -> Option<ParsedOperator> {
        Some(ParsedOperator::from(text))
    }

    #[test]
    fn test_coerce() {
        assert_eq!(NumericKind::Int.coerce(&Value::str("3.9")).unwrap(), Value::Int(3));
        assert_eq!(NumericKind::Int.coerce(&Value::str("-3.9")).unwrap(), Value::Int(-3));
        assert_eq!(NumericKind::Float.coerce(&Value::str(" 2.5 ")).unwrap(), Value::Float(2.5));
        assert_eq!(NumericKind::Float.coerce(&Value::Int(2)).unwrap(), Value::Float(2.0));
        assert_matches!(
            NumericKind::Float.coerce(&Value::str("abc")),
            Err(AssertionError::InvalidExpected { kind: "float", .. })
        );
        assert!(NumericKind::Int.coerce(&Value::str("inf")).is_err());
    }

    #[test]
    fn test_numeric_comparisons() {
        let engine = AssertionEngine::new();
        assert_eq!(
            engine.verify_float_as_string(2.5, op(">"), Some(Value::str("1.5")), "", None).unwrap(),
            Value::Float(2.5)
        );
        assert_eq!(
            engine.verify_int_as_string(3i64, op("=="), Some(Value::str("3.1")), "", None).unwrap(),
            Value::Int(3)
        );
        let error = engine
            .verify_int_as_string(3i64, op("=="), Some(Value::str("4")), "", None)
            .unwrap_err();
        assert_eq!(error.to_string(), "'3' (int) should be '4' (int)");
    }

    #[test]
    fn test_no_operator_returns_actual() {
        let engine = AssertionEngine::new();
        assert_eq!(
            engine.verify_float_as_string(1.0, None, Some(Value::str("junk")), "", None).unwrap(),
            Value::Float(1.0)
        );
    }

    #[test]
    fn test_evaluation_keeps_expression_text() {
        let engine = AssertionEngine::new();
        assert_eq!(
            engine.verify_int_as_string(8i64, op("then"), Some(Value::str("value * 2")), "", None).unwrap(),
            Value::Int(16)
        );
    }

    #[test]
    fn test_illegal_operators() {
        let engine = AssertionEngine::new();
        let error = engine
            .verify_float_as_string(1.0, op("contains"), Some(Value::str("1")), "", None)
            .unwrap_err();
        assert!(error.is_usage_error());
        assert_eq!(
            error.to_string(),
            "Operator '*=' is not allowed for float values. Allowed operators are: ==, !=, <, >, <=, >=, validate, then"
        );
        assert_matches!(
            engine.verify_int_as_string(1i64, op("bogus"), Some(Value::str("1")), "", None),
            Err(AssertionError::OperatorNotAllowed { .. })
        );
    }
}
