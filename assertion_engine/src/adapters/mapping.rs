//! Dictionary comparisons, whole-map or per key

use super::{check_allowed, reject};
use crate::execution::message::filler;
use crate::execution::{AssertionEngine, AssertionRequest};
use crate::types::{AssertionError, AssertionOperator, AssertionResult, ParsedOperator};
use assertion_expr::{literal_eval, log_debug, Value};
use std::collections::BTreeMap;

const KIND: &str = "dict";

/// Text expected values are literal mappings or sequences; for the
/// contains family unparseable text is taken as a bare key
fn parse_expected(op: AssertionOperator, expected: Option<Value>) -> AssertionResult<Option<Value>> {
    let text = match expected {
        Some(Value::Str(text)) if !op.is_evaluation() => text,
        other => return Ok(other),
    };
    match literal_eval(&text) {
        Ok(value) => Ok(Some(value)),
        Err(_) if matches!(op, AssertionOperator::Contains | AssertionOperator::NotContains) => {
            log_debug!("Expected text is not a literal, using it as a key", "key" => &text);
            Ok(Some(Value::Str(text)))
        }
        Err(error) => Err(reject(AssertionError::invalid_expected(text, "literal", error.to_string()))),
    }
}

fn build_request(
    actual: Value,
    op: Option<AssertionOperator>,
    expected: Option<Value>,
    message: &str,
    custom_message: Option<&str>,
) -> AssertionRequest {
    let mut request = AssertionRequest::new(actual).message(message);
    request.operator = op.map(Into::into);
    request.expected = expected;
    request.custom_message = custom_message.map(str::to_string);
    request
}

impl AssertionEngine {
    pub fn verify_keyed_collection(
        &self,
        actual: BTreeMap<String, Value>,
        operator: Option<ParsedOperator>,
        expected: Option<Value>,
        message: &str,
        custom_message: Option<&str>,
    ) -> AssertionResult<Value> {
        let Some(operator) = operator else {
            let request = build_request(Value::Dict(actual), None, expected, message, custom_message);
            return self.verify_request(request);
        };
        let op = check_allowed(&operator, &AssertionOperator::SEQUENCE, KIND)?;
        let expected = parse_expected(op, expected)?;
        self.verify_request(build_request(Value::Dict(actual), Some(op), expected, message, custom_message))
    }

    /// Numerical operators compare each key of `actual` with the same key of
    /// the expected mapping; the other legal operators see the whole map
    pub fn verify_keyed_collection_numeric_per_key(
        &self,
        actual: BTreeMap<String, Value>,
        operator: Option<ParsedOperator>,
        expected: Option<Value>,
        message: &str,
        custom_message: Option<&str>,
    ) -> AssertionResult<Value> {
        let Some(operator) = operator else {
            return Ok(Value::Dict(actual));
        };

        let mut allowed = AssertionOperator::NUMERICAL.to_vec();
        allowed.extend(
            AssertionOperator::SEQUENCE
                .iter()
                .filter(|op| !op.is_numerical()),
        );
        let op = check_allowed(&operator, &allowed, KIND)?;

        if !op.is_numerical() {
            let expected = parse_expected(op, expected)?;
            let request = build_request(Value::Dict(actual), Some(op), expected, message, custom_message);
            return self.verify_request(request);
        }

        let expected = match parse_expected(op, expected)? {
            Some(Value::Dict(entries)) if !entries.is_empty() => entries,
            other => {
                let shown = other.unwrap_or_default();
                return Err(reject(AssertionError::invalid_expected(
                    &shown,
                    "mapping",
                    format!("per-key comparison needs a non-empty dict, got {}", shown.type_name()),
                )));
            }
        };

        for (key, value) in &actual {
            let expected_value = expected
                .get(key)
                .cloned()
                .ok_or_else(|| reject(AssertionError::MissingKey { key: key.clone() }))?;
            let prefix = format!("{}{}Key '{}':", message, filler(message), key);
            let request = build_request(value.clone(), Some(op), Some(expected_value), &prefix, custom_message);
            self.verify_request(request)?;
        }
        Ok(Value::Dict(actual))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn op(text: &str) -> Option<ParsedOperator> {
        Some(ParsedOperator::from(text))
    }

    fn map(entries: &[(&str, i64)]) -> BTreeMap<String, Value> {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), Value::Int(*v)))
            .collect()
    }

    #[test]
    fn test_whole_map_equality_with_literal_text() {
        let engine = AssertionEngine::new();
        assert!(engine
            .verify_keyed_collection(map(&[("a", 1)]), op("=="), Some(Value::str("{'a': 1}")), "", None)
            .is_ok());
        assert_matches!(
            engine.verify_keyed_collection(map(&[("a", 1)]), op("=="), Some(Value::str("{'a': ")), "", None),
            Err(AssertionError::InvalidExpected { .. })
        );
    }

    #[test]
    fn test_contains_family() {
        let engine = AssertionEngine::new();
        let actual = map(&[("a", 1), ("b", 2)]);
        assert!(engine
            .verify_keyed_collection(actual.clone(), op("contains"), Some(Value::str("a")), "", None)
            .is_ok());
        assert!(engine
            .verify_keyed_collection(actual.clone(), op("contains"), Some(Value::str("['a', 'b']")), "", None)
            .is_ok());
        assert!(engine
            .verify_keyed_collection(actual.clone(), op("not contains"), Some(Value::str("c")), "", None)
            .is_ok());
        assert!(engine
            .verify_keyed_collection(actual, op("contains"), Some(Value::str("{'b': 3}")), "", None)
            .unwrap_err()
            .is_assertion_failure());
    }

    #[test]
    fn test_whole_map_rejects_ordering() {
        let engine = AssertionEngine::new();
        assert_matches!(
            engine.verify_keyed_collection(map(&[("a", 1)]), op("<"), Some(Value::str("{'a': 2}")), "", None),
            Err(AssertionError::OperatorNotAllowed { kind: "dict", .. })
        );
    }

    #[test]
    fn test_per_key_numeric() {
        let engine = AssertionEngine::new();
        let actual = map(&[("a", 1), ("b", 2)]);
        assert_eq!(
            engine
                .verify_keyed_collection_numeric_per_key(
                    actual.clone(),
                    op("=="),
                    Some(Value::dict([("a", 1i64), ("b", 2)])),
                    "",
                    None
                )
                .unwrap(),
            Value::Dict(actual.clone())
        );

        let error = engine
            .verify_keyed_collection_numeric_per_key(
                actual.clone(),
                op("=="),
                Some(Value::dict([("a", 1i64), ("b", 3)])),
                "Totals",
                None,
            )
            .unwrap_err();
        assert_eq!(error.to_string(), "Totals Key 'b': '2' (int) should be '3' (int)");

        assert!(engine
            .verify_keyed_collection_numeric_per_key(actual.clone(), op("<"), Some(Value::str("{'a': 5, 'b': 5}")), "", None)
            .is_ok());
    }

    #[test]
    fn test_per_key_errors() {
        let engine = AssertionEngine::new();
        let actual = map(&[("a", 1), ("b", 2)]);
        assert_matches!(
            engine.verify_keyed_collection_numeric_per_key(
                actual.clone(),
                op(">="),
                Some(Value::dict([("a", 0i64)])),
                "",
                None
            ),
            Err(AssertionError::MissingKey { key }) if key == "b"
        );
        assert_matches!(
            engine.verify_keyed_collection_numeric_per_key(actual.clone(), op(">"), None, "", None),
            Err(AssertionError::InvalidExpected { .. })
        );
        assert_matches!(
            engine.verify_keyed_collection_numeric_per_key(actual.clone(), op("matches"), None, "", None),
            Err(AssertionError::OperatorNotAllowed { .. })
        );
        assert!(engine
            .verify_keyed_collection_numeric_per_key(actual, op("contains"), Some(Value::str("a")), "", None)
            .is_ok());
    }
}
