//! Safe parsing of literal structured values from text

use crate::evaluator::{compile, EvalResult, EvaluatorError, ExpressionEvaluator, Namespace};
use crate::logging::codes;
use crate::syntax::{Expr, ExprKind, SyntaxError};
use crate::values::Value;
use crate::{log_error, log_success};

/// Parse `text` as a literal: numbers, strings, booleans, `None`, lists,
/// tuples, dicts and signed numbers. Names, calls and operators other than
/// a leading sign are rejected with `SyntaxError::NotALiteral`.
pub fn literal_eval(text: &str) -> EvalResult<Value> {
    let expr = compile(text)?;

    if let Err(error) = check_literal(&expr) {
        log_error!(error.error_code(), &error.to_string(), "text" => text);
        return Err(error.into());
    }

    let value = ExpressionEvaluator::default().evaluate_compiled(&expr, &Namespace::new())?;
    log_success!(
        codes::success::LITERAL_PARSED,
        "Literal parsed",
        "type" => value.type_name()
    );
    Ok(value)
}

fn check_literal(expr: &Expr) -> Result<(), SyntaxError> {
    match &expr.kind {
        ExprKind::Literal(_) => Ok(()),
        ExprKind::List(items) | ExprKind::Tuple(items) => items.iter().try_for_each(check_literal),
        ExprKind::Dict(entries) => entries.iter().try_for_each(|(key, value)| {
            check_literal(key)?;
            check_literal(value)
        }),
        ExprKind::Unary { operand, .. } => match &operand.kind {
            ExprKind::Literal(value) if value.is_numeric() => Ok(()),
            other => Err(SyntaxError::not_a_literal(other.describe(), operand.span)),
        },
        other => Err(SyntaxError::not_a_literal(other.describe(), expr.span)),
    }
}

/// True when `error` means the text was not a literal at all
pub fn is_not_a_literal(error: &EvaluatorError) -> bool {
    matches!(
        error,
        EvaluatorError::Syntax(_) | EvaluatorError::Lexer(_)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_scalars() {
        assert_eq!(literal_eval("42").unwrap(), Value::Int(42));
        assert_eq!(literal_eval("-1.5").unwrap(), Value::Float(-1.5));
        assert_eq!(literal_eval("'text'").unwrap(), Value::str("text"));
        assert_eq!(literal_eval("True").unwrap(), Value::Bool(true));
        assert_eq!(literal_eval("None").unwrap(), Value::None);
    }

    #[test]
    fn test_structures() {
        assert_eq!(
            literal_eval("{'a': 1, 'b': [2, 3]}").unwrap(),
            Value::dict([
                ("a", Value::Int(1)),
                ("b", Value::list([2i64, 3])),
            ])
        );
        assert_eq!(literal_eval("('x', 'y')").unwrap(), Value::list(["x", "y"]));
        assert_eq!(literal_eval("[]").unwrap(), Value::List(Vec::new()));
    }

    #[test]
    fn test_non_literals_are_rejected() {
        assert_matches!(
            literal_eval("key"),
            Err(EvaluatorError::Syntax(SyntaxError::NotALiteral { .. }))
        );
        assert_matches!(
            literal_eval("1 + 2"),
            Err(EvaluatorError::Syntax(SyntaxError::NotALiteral { .. }))
        );
        assert_matches!(
            literal_eval("[len('a')]"),
            Err(EvaluatorError::Syntax(SyntaxError::NotALiteral { .. }))
        );
        assert_matches!(
            literal_eval("-'a'"),
            Err(EvaluatorError::Syntax(SyntaxError::NotALiteral { .. }))
        );
        assert!(is_not_a_literal(&literal_eval("a b").unwrap_err()));
    }
}
