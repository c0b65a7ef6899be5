//! # Verification Core
//!
//! Drives one request through formatting, dispatch and message
//! construction. The engine holds only its evaluator and is safe to share.

use super::comparisons::{handler_for, VALIDATE_PHRASE};
use super::message::{default_failure_message, invalid_operator_message, render_template};
use super::request::AssertionRequest;
use crate::formatting::{apply_formatting, apply_formatting_to_expected};
use crate::types::{AssertionError, AssertionOperator, AssertionResult, Formatter, ParsedOperator};
use assertion_expr::logging::codes;
use assertion_expr::{log_debug, log_error, log_success};
use assertion_expr::{Evaluator, ExpressionEvaluator, Namespace, Value};
use std::fmt;
use std::sync::{Arc, OnceLock};

/// Name under which the actual value is bound for validate/then expressions
pub const VALUE_BINDING: &str = "value";

#[derive(Clone)]
pub struct AssertionEngine {
    evaluator: Arc<dyn Evaluator>,
}

impl fmt::Debug for AssertionEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AssertionEngine").finish_non_exhaustive()
    }
}

impl Default for AssertionEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// Process-wide engine backed by `ExpressionEvaluator`
pub fn default_engine() -> &'static AssertionEngine {
    static ENGINE: OnceLock<AssertionEngine> = OnceLock::new();
    ENGINE.get_or_init(AssertionEngine::new)
}

impl AssertionEngine {
    pub fn new() -> Self {
        Self::with_evaluator(Arc::new(ExpressionEvaluator::new()))
    }

    pub fn with_evaluator(evaluator: Arc<dyn Evaluator>) -> Self {
        Self { evaluator }
    }

    pub fn evaluator(&self) -> &dyn Evaluator {
        self.evaluator.as_ref()
    }

    /// General entry point
    pub fn verify(
        &self,
        actual: impl Into<Value>,
        operator: Option<ParsedOperator>,
        expected: Option<Value>,
        message: &str,
        custom_message: Option<&str>,
        formatters: &[Formatter],
    ) -> AssertionResult<Value> {
        let request = AssertionRequest {
            actual: actual.into(),
            operator,
            expected,
            message: message.to_string(),
            custom_message: custom_message.map(str::to_string),
            formatters: formatters.to_vec(),
            directive: None,
        };
        self.verify_request(request)
    }

    pub fn verify_request(&self, request: AssertionRequest) -> AssertionResult<Value> {
        self.verify_with_bindings(request, Namespace::new())
    }

    /// Like `verify_request`, with extra names visible to validate/then
    /// expressions; `value` always refers to the actual value
    pub(crate) fn verify_with_bindings(
        &self,
        request: AssertionRequest,
        bindings: Namespace,
    ) -> AssertionResult<Value> {
        log_debug!(
            "Verifying assertion",
            "operator" => request.operator.as_ref().map(ParsedOperator::text).unwrap_or("<none>"),
            "actual_type" => request.actual.type_name()
        );

        let result = self.run(request, bindings);
        if let Err(error) = &result {
            report(error);
        }
        result
    }

    fn run(&self, request: AssertionRequest, bindings: Namespace) -> AssertionResult<Value> {
        let operator = match &request.operator {
            Some(operator) => operator.clone(),
            None => {
                if request.expected.as_ref().is_some_and(Value::is_truthy) {
                    return Err(AssertionError::MissingOperator);
                }
                log_success!(codes::success::PASS_THROUGH, "No assertion requested");
                return Ok(request.actual);
            }
        };

        let (actual, expected) = self.format_operands(&request);

        let operator = match operator {
            ParsedOperator::Known(op) => op,
            ParsedOperator::Unknown(text) => {
                return Err(AssertionError::InvalidOperator {
                    message: invalid_operator_message(&request.message, &text),
                    operator: text,
                })
            }
        };

        let (holds, phrase) = match operator {
            AssertionOperator::Evaluate => {
                let result = self.evaluate(&expected, actual, bindings)?;
                log_success!(
                    codes::success::VALUE_TRANSFORMED,
                    "Value transformed by expression",
                    "result_type" => result.type_name()
                );
                return Ok(result);
            }
            AssertionOperator::Validate => {
                let result = self.evaluate(&expected, actual.clone(), bindings)?;
                (result.is_truthy(), VALIDATE_PHRASE)
            }
            op => {
                let handler = handler_for(op).ok_or_else(|| AssertionError::InvalidOperator {
                    operator: op.symbol().to_string(),
                    message: invalid_operator_message(&request.message, op.symbol()),
                })?;
                ((handler.predicate)(&actual, &expected)?, handler.phrase)
            }
        };

        if holds {
            log_success!(
                codes::success::ASSERTION_PASSED,
                "Assertion passed",
                "operator" => operator
            );
            return Ok(actual);
        }

        let message = self.failure_message(&request, &actual, phrase, &expected);
        log_debug!("Assertion failed", "operator" => operator, "message" => &message);
        Err(AssertionError::AssertionFailed { message })
    }

    fn format_operands(&self, request: &AssertionRequest) -> (Value, Value) {
        let mut actual = apply_formatting(request.actual.clone(), &request.formatters);
        let mut expected = apply_formatting_to_expected(
            request.expected.clone().unwrap_or_default(),
            &request.formatters,
        );
        if let Some(directive) = request.directive {
            actual = directive.apply(actual);
            expected = directive.apply(expected);
        }
        (actual, expected)
    }

    /// Run the expected value as an expression with the actual value bound
    fn evaluate(&self, expression: &Value, actual: Value, mut bindings: Namespace) -> AssertionResult<Value> {
        let source = match expression {
            Value::Str(text) => text.clone(),
            other => other.to_string(),
        };
        bindings.insert(VALUE_BINDING.to_string(), actual);
        Ok(self.evaluator.evaluate(&source, &bindings)?)
    }

    pub(crate) fn failure_message(
        &self,
        request: &AssertionRequest,
        actual: &Value,
        phrase: &str,
        expected: &Value,
    ) -> String {
        match request.custom_template() {
            Some(template) => render_template(template, actual, expected),
            None => default_failure_message(&request.message, actual, phrase, expected),
        }
    }
}

/// Usage and evaluator errors are logged; plain failures are an expected outcome
pub(crate) fn report(error: &AssertionError) {
    if !error.is_assertion_failure() {
        log_error!(error.error_code(), &error.to_string());
    }
}
