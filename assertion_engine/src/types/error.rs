//! # Assertion Errors

use assertion_expr::logging::{codes, Code};
use assertion_expr::{ComparisonError, EvaluatorError};

pub type AssertionResult<T> = Result<T, AssertionError>;

/// Every way a verification can end other than returning a value
#[derive(Debug, Clone, thiserror::Error)]
pub enum AssertionError {
    /// The comparison was evaluated and did not hold
    #[error("{message}")]
    AssertionFailed { message: String },

    /// Operator text that resolves to no canonical operator, or to one with
    /// no handler in this mode; `message` carries the caller's prefix
    #[error("{message}")]
    InvalidOperator { operator: String, message: String },

    #[error("Operator '{operator}' is not allowed for {kind} values. Allowed operators are: {}", .allowed.join(", "))]
    OperatorNotAllowed {
        operator: String,
        kind: &'static str,
        allowed: Vec<&'static str>,
    },

    #[error("Invalid validation parameters. Assertion operator is mandatory when specifying expected value.")]
    MissingOperator,

    #[error("Malformed operator '{text}': only one '::' directive separator is allowed")]
    MalformedOperator { text: String },

    #[error("Unknown formatter '{name}'. Known formatters are: strip, normalize spaces, case insensitive, apply to expected")]
    UnknownFormatter { name: String },

    #[error("{message}")]
    TypeMismatch { message: String },

    #[error("Expected value '{expected}' is not a valid {kind}: {reason}")]
    InvalidExpected {
        expected: String,
        kind: &'static str,
        reason: String,
    },

    #[error("Expected mapping has no key '{key}'")]
    MissingKey { key: String },

    #[error("Invalid pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    /// Failure raised by the expression evaluator, passed through untouched
    #[error(transparent)]
    Evaluation(#[from] EvaluatorError),
}

impl AssertionError {
    pub fn type_mismatch(message: impl Into<String>) -> Self {
        Self::TypeMismatch {
            message: message.into(),
        }
    }

    pub fn invalid_expected(
        expected: impl ToString,
        kind: &'static str,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidExpected {
            expected: expected.to_string(),
            kind,
            reason: reason.into(),
        }
    }

    /// The comparison ran and did not hold
    pub fn is_assertion_failure(&self) -> bool {
        matches!(self, AssertionError::AssertionFailed { .. })
    }

    /// The call itself was wrong, independent of the values compared
    pub fn is_usage_error(&self) -> bool {
        matches!(
            self,
            AssertionError::OperatorNotAllowed { .. }
                | AssertionError::MissingOperator
                | AssertionError::MalformedOperator { .. }
                | AssertionError::UnknownFormatter { .. }
                | AssertionError::InvalidExpected { .. }
        )
    }

    pub fn is_evaluation_error(&self) -> bool {
        matches!(self, AssertionError::Evaluation(_))
    }

    pub fn error_code(&self) -> Code {
        match self {
            AssertionError::AssertionFailed { .. } => codes::assertion::ASSERTION_FAILED,
            AssertionError::InvalidOperator { .. } => codes::assertion::INVALID_OPERATOR,
            AssertionError::OperatorNotAllowed { .. } => codes::assertion::OPERATOR_NOT_ALLOWED,
            AssertionError::MissingOperator => codes::assertion::MISSING_OPERATOR,
            AssertionError::MalformedOperator { .. } => codes::assertion::MALFORMED_OPERATOR,
            AssertionError::UnknownFormatter { .. } => codes::assertion::UNKNOWN_FORMATTER,
            AssertionError::TypeMismatch { .. } => codes::assertion::TYPE_MISMATCH,
            AssertionError::InvalidExpected { .. } => codes::assertion::INVALID_EXPECTED,
            AssertionError::MissingKey { .. } => codes::assertion::MISSING_KEY,
            AssertionError::InvalidPattern { .. } => codes::assertion::INVALID_PATTERN,
            AssertionError::Evaluation(e) => e.error_code(),
        }
    }
}

impl From<ComparisonError> for AssertionError {
    fn from(error: ComparisonError) -> Self {
        Self::type_mismatch(error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_and_usage_are_disjoint() {
        let failure = AssertionError::AssertionFailed {
            message: "'1' (int) should be '2' (int)".to_string(),
        };
        assert!(failure.is_assertion_failure());
        assert!(!failure.is_usage_error());

        let usage = AssertionError::OperatorNotAllowed {
            operator: "<".to_string(),
            kind: "boolean",
            allowed: vec!["==", "!="],
        };
        assert!(usage.is_usage_error());
        assert!(!usage.is_assertion_failure());
        assert_eq!(
            usage.to_string(),
            "Operator '<' is not allowed for boolean values. Allowed operators are: ==, !="
        );
    }

    #[test]
    fn test_codes() {
        assert_eq!(
            AssertionError::MissingOperator.error_code(),
            codes::assertion::MISSING_OPERATOR
        );
        let evaluation = AssertionError::from(EvaluatorError::NameError {
            name: "x".to_string(),
        });
        assert_eq!(evaluation.error_code(), codes::evaluation::NAME_ERROR);
        assert_eq!(evaluation.to_string(), "name 'x' is not defined");
    }
}
