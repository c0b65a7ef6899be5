//! Bit-flag sets compared as sets of member names

use super::{check_allowed, reject};
use crate::execution::comparisons::handler_for;
use crate::execution::{AssertionEngine, AssertionRequest};
use crate::types::{AssertionError, AssertionOperator, AssertionResult, ParsedOperator};
use assertion_expr::logging::codes;
use assertion_expr::{log_success, FlagSet, Namespace, Value};
use std::collections::BTreeSet;

const ALLOWED: [AssertionOperator; 6] = [
    AssertionOperator::Equal,
    AssertionOperator::NotEqual,
    AssertionOperator::Contains,
    AssertionOperator::NotContains,
    AssertionOperator::Validate,
    AssertionOperator::Evaluate,
];

/// Expected flags as member names: a flag set of the same type, a list of
/// names, or one `A|B` string with an optional `Type.` prefix
fn expected_names(flags: &FlagSet, expected: Option<&Value>) -> AssertionResult<BTreeSet<String>> {
    let names: Vec<String> = match expected {
        None | Some(Value::None) => Vec::new(),
        Some(Value::Flags(other)) if other.same_type(flags) => return Ok(other.flag_names()),
        Some(Value::Flags(other)) => {
            return Err(AssertionError::type_mismatch(format!(
                "cannot compare {} flags with {} flags",
                flags.type_name(),
                other.type_name()
            )))
        }
        Some(Value::Str(text)) => {
            let prefix = format!("{}.", flags.type_name());
            text.trim()
                .trim_start_matches(prefix.as_str())
                .split('|')
                .map(str::trim)
                .filter(|name| !name.is_empty())
                .map(str::to_string)
                .collect()
        }
        Some(Value::List(items)) => items
            .iter()
            .map(|item| match item {
                Value::Str(name) => Ok(name.clone()),
                other => Err(AssertionError::invalid_expected(
                    other,
                    "flag name",
                    format!("{} is not a string", other.type_name()),
                )),
            })
            .collect::<AssertionResult<_>>()?,
        Some(other) => {
            return Err(AssertionError::invalid_expected(
                other,
                "flag set",
                format!("cannot read flag names from {}", other.type_name()),
            ))
        }
    };

    for name in &names {
        flags
            .member(name)
            .map_err(|e| AssertionError::invalid_expected(name, "flag name", e.to_string()))?;
    }
    Ok(names.into_iter().collect())
}

fn member_bindings(flags: &FlagSet) -> AssertionResult<Namespace> {
    flags
        .members()
        .map(|name| -> AssertionResult<(String, Value)> {
            Ok((name.to_string(), Value::Flags(flags.member(name)?)))
        })
        .collect()
}

impl AssertionEngine {
    /// Equality is set equality, `contains` a subset test and `not contains`
    /// disjointness; validate/then also see each member under its own name
    pub fn verify_flag_set(
        &self,
        actual: impl Into<Value>,
        operator: Option<ParsedOperator>,
        expected: Option<Value>,
        message: &str,
        custom_message: Option<&str>,
    ) -> AssertionResult<Value> {
        let actual = actual.into();
        let Value::Flags(flags) = &actual else {
            return Err(reject(AssertionError::type_mismatch(format!(
                "flag set comparison requires a flag value, got {}",
                actual.type_name()
            ))));
        };
        let flags = flags.clone();

        let mut request = AssertionRequest::new(actual).message(message);
        request.custom_message = custom_message.map(str::to_string);
        request.expected = expected;

        let Some(operator) = operator else {
            return self.verify_request(request);
        };
        let op = check_allowed(&operator, &ALLOWED, "flag")?;
        request.operator = Some(op.into());

        if op.is_evaluation() {
            let bindings = member_bindings(&flags).map_err(reject)?;
            return self.verify_with_bindings(request, bindings);
        }

        let wanted = expected_names(&flags, request.expected.as_ref()).map_err(reject)?;
        let present = flags.flag_names();
        let holds = match op {
            AssertionOperator::Equal => present == wanted,
            AssertionOperator::NotEqual => present != wanted,
            AssertionOperator::Contains => wanted.is_subset(&present),
            _ => wanted.is_disjoint(&present),
        };

        if holds {
            log_success!(
                codes::success::ASSERTION_PASSED,
                "Flag assertion passed",
                "operator" => op
            );
            return Ok(request.actual);
        }

        let wanted: Vec<String> = wanted.into_iter().collect();
        let shown = Value::Flags(flags.with_flags(&wanted)?);
        let phrase = handler_for(op).map(|handler| handler.phrase).unwrap_or_default();
        let message = self.failure_message(&request, &request.actual, phrase, &shown);
        Err(AssertionError::AssertionFailed { message })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn permissions(names: &[&str]) -> Value {
        let base = FlagSet::new("Permission", [("READ", 1), ("WRITE", 2), ("EXECUTE", 4)]);
        Value::Flags(base.with_flags(names).unwrap())
    }

    fn op(text: &str) -> Option<ParsedOperator> {
        Some(ParsedOperator::from(text))
    }

    #[test]
    fn test_set_semantics() {
        let engine = AssertionEngine::new();
        let rw = permissions(&["READ", "WRITE"]);

        assert!(engine
            .verify_flag_set(rw.clone(), op("=="), Some(Value::list(["WRITE", "READ"])), "", None)
            .is_ok());
        assert!(engine
            .verify_flag_set(rw.clone(), op("=="), Some(permissions(&["READ", "WRITE"])), "", None)
            .is_ok());
        assert!(engine
            .verify_flag_set(rw.clone(), op("contains"), Some(Value::str("READ")), "", None)
            .is_ok());
        assert!(engine
            .verify_flag_set(rw.clone(), op("not contains"), Some(Value::str("EXECUTE")), "", None)
            .is_ok());

        let error = engine
            .verify_flag_set(rw, op("contains"), Some(Value::str("READ|EXECUTE")), "", None)
            .unwrap_err();
        assert_eq!(
            error.to_string(),
            "'Permission.READ|WRITE' (permission) should contain 'Permission.READ|EXECUTE' (permission)"
        );
    }

    #[test]
    fn test_evaluation_binds_member_names() {
        let engine = AssertionEngine::new();
        let rw = permissions(&["READ", "WRITE"]);
        assert!(engine
            .verify_flag_set(rw.clone(), op("validate"), Some(Value::str("READ in value")), "", None)
            .is_ok());
        assert!(engine
            .verify_flag_set(rw.clone(), op("validate"), Some(Value::str("EXECUTE in value")), "", None)
            .unwrap_err()
            .is_assertion_failure());
        assert_eq!(
            engine
                .verify_flag_set(rw, op("then"), Some(Value::str("value | EXECUTE")), "", None)
                .unwrap(),
            permissions(&["READ", "WRITE", "EXECUTE"])
        );
    }

    #[test]
    fn test_rejections() {
        let engine = AssertionEngine::new();
        assert_matches!(
            engine.verify_flag_set(3i64, op("=="), Some(Value::Int(3)), "", None),
            Err(AssertionError::TypeMismatch { .. })
        );
        assert_matches!(
            engine.verify_flag_set(permissions(&["READ"]), op("<"), Some(Value::str("READ")), "", None),
            Err(AssertionError::OperatorNotAllowed { kind: "flag", .. })
        );
        assert_matches!(
            engine.verify_flag_set(permissions(&["READ"]), op("=="), Some(Value::str("DELETE")), "", None),
            Err(AssertionError::InvalidExpected { .. })
        );
    }
}
