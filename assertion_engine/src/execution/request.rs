use crate::types::{split_operator_and_directive, AssertionResult, Formatter, ParsedOperator};
use assertion_expr::Value;

/// One verification: built per call, consumed by `AssertionEngine::verify_request`
#[derive(Debug, Clone, Default)]
pub struct AssertionRequest {
    pub actual: Value,
    pub operator: Option<ParsedOperator>,
    pub expected: Option<Value>,
    /// Prefix for default failure messages
    pub message: String,
    /// Replaces the default failure message; empty counts as absent
    pub custom_message: Option<String>,
    pub formatters: Vec<Formatter>,
    /// Formatter taken from `OPERATOR::DIRECTIVE` text; runs on both sides
    pub directive: Option<Formatter>,
}

impl AssertionRequest {
    pub fn new(actual: impl Into<Value>) -> Self {
        Self {
            actual: actual.into(),
            ..Self::default()
        }
    }

    pub fn operator(mut self, operator: impl Into<ParsedOperator>) -> Self {
        self.operator = Some(operator.into());
        self
    }

    /// Operator text, optionally carrying a `::directive` suffix
    pub fn operator_text(mut self, text: &str) -> AssertionResult<Self> {
        let (operator, directive) = split_operator_and_directive(text)?;
        self.operator = Some(operator);
        self.directive = directive;
        Ok(self)
    }

    pub fn expected(mut self, expected: impl Into<Value>) -> Self {
        self.expected = Some(expected.into());
        self
    }

    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    pub fn custom_message(mut self, template: impl Into<String>) -> Self {
        self.custom_message = Some(template.into());
        self
    }

    pub fn formatter(mut self, formatter: Formatter) -> Self {
        self.formatters.push(formatter);
        self
    }

    pub fn formatters(mut self, formatters: impl IntoIterator<Item = Formatter>) -> Self {
        self.formatters.extend(formatters);
        self
    }

    pub(crate) fn custom_template(&self) -> Option<&str> {
        self.custom_message.as_deref().filter(|t| !t.is_empty())
    }
}
