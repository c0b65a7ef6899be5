//! Sandboxed expression evaluation
//!
//! `Evaluator` is the seam the assertion engine calls for `validate` and
//! `then`. `ExpressionEvaluator` implements it with the lexer, parser and
//! tree-walking interpreter of this crate; callers may plug in their own.

mod arithmetic;
mod builtins;
mod error;
mod interpreter;

pub use error::{EvalResult, EvaluatorError};

use crate::config::runtime::EvaluationPreferences;
use crate::lexical::tokenize;
use crate::logging::codes;
use crate::syntax::{parse_tokens, Expr};
use crate::values::Value;
use crate::{log_debug, log_error, log_success};
use interpreter::Interpreter;
use std::collections::HashMap;

/// Names visible to an expression
pub type Namespace = HashMap<String, Value>;

/// Evaluates expression text against a namespace of bound names
pub trait Evaluator: Send + Sync {
    fn evaluate(&self, expression: &str, namespace: &Namespace) -> Result<Value, EvaluatorError>;
}

/// Tokenize and parse without evaluating
pub fn compile(expression: &str) -> EvalResult<Expr> {
    let tokens = tokenize(expression)?;
    Ok(parse_tokens(tokens)?)
}

#[derive(Debug, Clone, Default)]
pub struct ExpressionEvaluator {
    preferences: EvaluationPreferences,
}

impl ExpressionEvaluator {
    /// Evaluator with preferences read from the environment
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_preferences(preferences: EvaluationPreferences) -> Self {
        Self { preferences }
    }

    pub fn preferences(&self) -> &EvaluationPreferences {
        &self.preferences
    }

    /// Evaluate an already compiled expression
    pub fn evaluate_compiled(&self, expr: &Expr, namespace: &Namespace) -> EvalResult<Value> {
        Interpreter::new(namespace).eval(expr)
    }
}

impl Evaluator for ExpressionEvaluator {
    fn evaluate(&self, expression: &str, namespace: &Namespace) -> Result<Value, EvaluatorError> {
        if self.preferences.log_expressions {
            log_debug!(
                "Evaluating expression",
                "expression" => expression,
                "names" => namespace.len()
            );
        }

        let result = compile(expression).and_then(|expr| self.evaluate_compiled(&expr, namespace));

        match &result {
            Ok(value) if self.preferences.log_results => {
                log_success!(
                    codes::success::EXPRESSION_EVALUATED,
                    "Expression evaluated",
                    "expression" => expression,
                    "result" => value.repr(),
                    "type" => value.type_name()
                );
            }
            Ok(_) => {}
            Err(error) if !error.is_compile_error() => {
                // Lexer and parser failures are logged where they occur
                log_error!(error.error_code(), &error.to_string(), "expression" => expression);
            }
            Err(_) => {}
        }

        result
    }
}

/// Evaluate `expression` with a default evaluator
pub fn evaluate(expression: &str, namespace: &Namespace) -> EvalResult<Value> {
    ExpressionEvaluator::new().evaluate(expression, namespace)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::values::FlagSet;
    use assert_matches::assert_matches;

    fn eval(expression: &str) -> EvalResult<Value> {
        evaluate(expression, &Namespace::new())
    }

    fn eval_with(expression: &str, value: impl Into<Value>) -> EvalResult<Value> {
        let mut namespace = Namespace::new();
        namespace.insert("value".to_string(), value.into());
        evaluate(expression, &namespace)
    }

    #[test]
    fn test_arithmetic_precedence() {
        assert_eq!(eval("1 + 2 * 3").unwrap(), Value::Int(7));
        assert_eq!(eval("(1 + 2) * 3").unwrap(), Value::Int(9));
        assert_eq!(eval("-2 ** 2").unwrap(), Value::Int(-4));
        assert_eq!(eval("2 ** 3 ** 2").unwrap(), Value::Int(512));
        assert_eq!(eval("7 // 2 + 7 % 2").unwrap(), Value::Int(4));
    }

    #[test]
    fn test_then_style_transformation() {
        assert_eq!(
            eval_with("'Hello ' + value + '!'", "World").unwrap(),
            Value::str("Hello World!")
        );
        assert_eq!(eval_with("value * 2", 21i64).unwrap(), Value::Int(42));
    }

    #[test]
    fn test_validate_style_predicates() {
        assert_eq!(eval_with("0 < value < 2", 1i64).unwrap(), Value::Bool(true));
        assert_eq!(eval_with("0 < value < 2", 2i64).unwrap(), Value::Bool(false));
        assert_eq!(eval_with("len(value) == 3", "abc").unwrap(), Value::Bool(true));
        assert_eq!(
            eval_with("value.upper().startswith('AB')", "abc").unwrap(),
            Value::Bool(true)
        );
        assert_eq!(eval_with("'b' in value", "abc").unwrap(), Value::Bool(true));
        assert_eq!(eval_with("'z' not in value", "abc").unwrap(), Value::Bool(true));
        assert_eq!(eval_with("value is None", Value::None).unwrap(), Value::Bool(true));
    }

    #[test]
    fn test_boolean_operators_return_operands() {
        assert_eq!(eval("0 or 'fallback'").unwrap(), Value::str("fallback"));
        assert_eq!(eval("'' and 1").unwrap(), Value::str(""));
        assert_eq!(eval("not []").unwrap(), Value::Bool(true));
        // Right operand is never evaluated
        assert_eq!(eval("False and undefined_name").unwrap(), Value::Bool(false));
    }

    #[test]
    fn test_conditional_expression() {
        assert_eq!(eval_with("'big' if value > 10 else 'small'", 3i64).unwrap(), Value::str("small"));
    }

    #[test]
    fn test_subscripts_and_slices() {
        let items = Value::list([1i64, 2, 3, 4]);
        assert_eq!(eval_with("value[-1]", items.clone()).unwrap(), Value::Int(4));
        assert_eq!(eval_with("value[1:3]", items.clone()).unwrap(), Value::list([2i64, 3]));
        assert_eq!(eval_with("value[::-1]", items.clone()).unwrap(), Value::list([4i64, 3, 2, 1]));
        assert_eq!(eval_with("value[::2]", items.clone()).unwrap(), Value::list([1i64, 3]));
        assert_eq!(eval_with("value[-2:]", "hello").unwrap(), Value::str("lo"));
        assert_matches!(eval_with("value[10]", items.clone()), Err(EvaluatorError::IndexError { .. }));
        assert_matches!(eval_with("value[::0]", items), Err(EvaluatorError::ValueError { .. }));

        let dict = Value::dict([("a", 1i64)]);
        assert_eq!(eval_with("value['a']", dict.clone()).unwrap(), Value::Int(1));
        let error = eval_with("value['b']", dict).unwrap_err();
        assert_eq!(error.to_string(), "KeyError: 'b'");
    }

    #[test]
    fn test_collection_literals() {
        assert_eq!(eval("[1, 'a', None]").unwrap(), Value::list([Value::Int(1), Value::str("a"), Value::None]));
        assert_eq!(eval("(1, 2)").unwrap(), Value::list([1i64, 2]));
        assert_eq!(eval("{'a': 1}").unwrap(), Value::dict([("a", 1i64)]));
        assert_matches!(eval("{1: 'a'}"), Err(EvaluatorError::TypeError { .. }));
    }

    #[test]
    fn test_flags_combine_and_test_membership() {
        let perms = FlagSet::new("Perm", [("R", 4), ("W", 2), ("X", 1)]);
        let mut namespace = Namespace::new();
        namespace.insert("value".to_string(), Value::Flags(perms.with_flags(&["R", "W"]).unwrap()));
        namespace.insert("R".to_string(), Value::Flags(perms.member("R").unwrap()));
        namespace.insert("X".to_string(), Value::Flags(perms.member("X").unwrap()));

        assert_eq!(evaluate("R in value", &namespace).unwrap(), Value::Bool(true));
        assert_eq!(evaluate("X in value", &namespace).unwrap(), Value::Bool(false));
        assert_eq!(evaluate("(value & R) == R", &namespace).unwrap(), Value::Bool(true));
        assert_eq!(
            evaluate("value | X", &namespace).unwrap().to_string(),
            "Perm.R|W|X"
        );
    }

    #[test]
    fn test_errors_carry_kind() {
        assert_matches!(eval("undefined"), Err(EvaluatorError::NameError { name }) if name == "undefined");
        assert_matches!(eval("1 / 0"), Err(EvaluatorError::ZeroDivision { .. }));
        assert_matches!(eval("'a' < 1"), Err(EvaluatorError::TypeError { .. }));
        assert_matches!(eval("nosuch(1)"), Err(EvaluatorError::NameError { .. }));
        assert_matches!(eval("1 +"), Err(EvaluatorError::Syntax(_)));
        assert_matches!(eval("1 $ 2"), Err(EvaluatorError::Lexer(_)));
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(
            eval("1 / 0").unwrap_err().error_code(),
            codes::evaluation::ZERO_DIVISION
        );
        assert_eq!(eval("1 +").unwrap_err().error_code(), codes::syntax::UNEXPECTED_END);
    }

    #[test]
    fn test_call_depth_limit() {
        let nested = format!(
            "{}1{}",
            "abs(".repeat(crate::config::compile_time::evaluation::MAX_CALL_DEPTH + 1),
            ")".repeat(crate::config::compile_time::evaluation::MAX_CALL_DEPTH + 1)
        );
        // Either the parser or the interpreter refuses it, depending on profile limits
        assert!(eval(&nested).is_err());
    }

    #[test]
    fn test_compiled_expression_is_reusable() {
        let expr = compile("value + 1").unwrap();
        let evaluator = ExpressionEvaluator::new();
        for i in 0..3i64 {
            let mut namespace = Namespace::new();
            namespace.insert("value".to_string(), Value::Int(i));
            assert_eq!(evaluator.evaluate_compiled(&expr, &namespace).unwrap(), Value::Int(i + 1));
        }
    }
}
