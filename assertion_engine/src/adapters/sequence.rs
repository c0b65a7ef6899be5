//! Order-insensitive list comparisons

use super::{check_allowed, reject};
use crate::execution::{AssertionEngine, AssertionRequest};
use crate::types::{AssertionError, AssertionOperator, AssertionResult, ParsedOperator};
use assertion_expr::values::sort_values;
use assertion_expr::Value;

const ALLOWED: [AssertionOperator; 5] = [
    AssertionOperator::Contains,
    AssertionOperator::Equal,
    AssertionOperator::NotEqual,
    AssertionOperator::Validate,
    AssertionOperator::Evaluate,
];

/// Empty collections become `None`, singletons their element
pub fn project(items: Vec<Value>) -> Value {
    match items.len() {
        0 => Value::None,
        1 => items.into_iter().next().unwrap_or_default(),
        _ => Value::List(items),
    }
}

fn sorted(items: Vec<Value>) -> AssertionResult<Vec<Value>> {
    sort_values(items).map_err(|e| reject(AssertionError::from(e)))
}

impl AssertionEngine {
    /// Lists compare as multisets for `==`/`!=` and by all-of membership
    /// for `contains`. Membership runs on the whole lists; the other
    /// operators see both sides projected. The returned value is projected.
    pub fn verify_ordered_collection(
        &self,
        actual: Vec<Value>,
        operator: Option<ParsedOperator>,
        expected: Option<Value>,
        message: &str,
        custom_message: Option<&str>,
    ) -> AssertionResult<Value> {
        let op = operator
            .map(|operator| check_allowed(&operator, &ALLOWED, "list"))
            .transpose()?;

        let (actual, expected) = match op {
            Some(AssertionOperator::Contains) => (Value::List(actual), expected),
            Some(AssertionOperator::Equal | AssertionOperator::NotEqual) => {
                let expected = match expected {
                    Some(Value::List(items)) => Some(project(sorted(items)?)),
                    other => other,
                };
                (project(sorted(actual)?), expected)
            }
            _ => {
                let expected = match expected {
                    Some(Value::List(items)) => Some(project(items)),
                    other => other,
                };
                (project(actual), expected)
            }
        };

        let mut request = AssertionRequest::new(actual).message(message);
        request.operator = op.map(Into::into);
        request.expected = expected;
        request.custom_message = custom_message.map(str::to_string);
        match self.verify_request(request)? {
            Value::List(items) if op == Some(AssertionOperator::Contains) => Ok(project(items)),
            value => Ok(value),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn op(text: &str) -> Option<ParsedOperator> {
        Some(ParsedOperator::from(text))
    }

    fn ints(items: &[i64]) -> Vec<Value> {
        items.iter().copied().map(Value::Int).collect()
    }

    #[test]
    fn test_projection() {
        assert_eq!(project(vec![]), Value::None);
        assert_eq!(project(ints(&[4])), Value::Int(4));
        assert_eq!(project(ints(&[1, 2])), Value::list([1i64, 2]));
    }

    #[test]
    fn test_equality_ignores_order() {
        let engine = AssertionEngine::new();
        assert_eq!(
            engine
                .verify_ordered_collection(ints(&[2, 1]), op("=="), Some(Value::list([1i64, 2])), "", None)
                .unwrap(),
            Value::list([1i64, 2])
        );
        let error = engine
            .verify_ordered_collection(ints(&[1, 2]), op("!="), Some(Value::list([2i64, 1])), "", None)
            .unwrap_err();
        assert!(error.is_assertion_failure());
    }

    #[test]
    fn test_singleton_projects_to_element() {
        let engine = AssertionEngine::new();
        let result = engine.verify_ordered_collection(
            vec![Value::str("only")],
            op("=="),
            Some(Value::list(["only"])),
            "",
            None,
        );
        assert_eq!(result.unwrap(), Value::str("only"));
    }

    #[test]
    fn test_contains_is_all_of() {
        let engine = AssertionEngine::new();
        assert!(engine
            .verify_ordered_collection(ints(&[1, 2, 3]), op("contains"), Some(Value::list([3i64, 1])), "", None)
            .is_ok());
        assert!(engine
            .verify_ordered_collection(ints(&[1, 2, 3]), op("contains"), Some(Value::list([3i64, 4])), "", None)
            .unwrap_err()
            .is_assertion_failure());
    }

    #[test]
    fn test_contains_on_singletons_and_empty_lists() {
        let engine = AssertionEngine::new();
        assert_eq!(
            engine
                .verify_ordered_collection(ints(&[5]), op("contains"), Some(Value::list([5i64])), "", None)
                .unwrap(),
            Value::Int(5)
        );
        assert!(engine
            .verify_ordered_collection(ints(&[1, 2]), op("contains"), Some(Value::List(vec![])), "", None)
            .is_ok());
        assert!(engine
            .verify_ordered_collection(ints(&[1, 2]), op("contains"), Some(Value::Int(2)), "", None)
            .is_ok());

        let error = engine
            .verify_ordered_collection(vec![Value::str("abc")], op("contains"), Some(Value::list(["b"])), "", None)
            .unwrap_err();
        assert!(error.is_assertion_failure());
        assert_eq!(error.to_string(), "'['abc']' (list) should contain '['b']' (list)");
    }

    #[test]
    fn test_unorderable_and_illegal() {
        let engine = AssertionEngine::new();
        assert_matches!(
            engine.verify_ordered_collection(
                vec![Value::Int(1), Value::str("a")],
                op("=="),
                Some(Value::list([1i64])),
                "",
                None
            ),
            Err(AssertionError::TypeMismatch { .. })
        );
        assert_matches!(
            engine.verify_ordered_collection(ints(&[1]), op("not contains"), Some(Value::Int(2)), "", None),
            Err(AssertionError::OperatorNotAllowed { kind: "list", .. })
        );
    }

    #[test]
    fn test_validate_sees_projected_value() {
        let engine = AssertionEngine::new();
        assert!(engine
            .verify_ordered_collection(ints(&[1, 2, 3]), op("validate"), Some(Value::str("len(value) == 3")), "", None)
            .is_ok());
    }
}
