use crate::lexical::LexerError;
use crate::logging::{codes, Code};
use crate::syntax::SyntaxError;
use crate::values::ComparisonError;

pub type EvalResult<T> = Result<T, EvaluatorError>;

#[derive(Debug, Clone, thiserror::Error)]
pub enum EvaluatorError {
    #[error(transparent)]
    Lexer(#[from] LexerError),

    #[error(transparent)]
    Syntax(#[from] SyntaxError),

    #[error("name '{name}' is not defined")]
    NameError { name: String },

    #[error("'{type_name}' object has no attribute '{name}'")]
    AttributeError { type_name: String, name: String },

    #[error("{message}")]
    TypeError { message: String },

    #[error("{message}")]
    ValueError { message: String },

    #[error("{message}")]
    ZeroDivision { message: String },

    #[error("{message}")]
    IndexError { message: String },

    #[error("KeyError: {key}")]
    KeyError { key: String },

    #[error("{message}")]
    Overflow { message: String },

    #[error("{message}")]
    LimitExceeded { message: String },
}

impl EvaluatorError {
    pub fn type_error(message: impl Into<String>) -> Self {
        Self::TypeError {
            message: message.into(),
        }
    }

    pub fn value_error(message: impl Into<String>) -> Self {
        Self::ValueError {
            message: message.into(),
        }
    }

    pub fn zero_division(message: impl Into<String>) -> Self {
        Self::ZeroDivision {
            message: message.into(),
        }
    }

    pub fn index_error(message: impl Into<String>) -> Self {
        Self::IndexError {
            message: message.into(),
        }
    }

    pub fn overflow(message: impl Into<String>) -> Self {
        Self::Overflow {
            message: message.into(),
        }
    }

    pub fn limit_exceeded(message: impl Into<String>) -> Self {
        Self::LimitExceeded {
            message: message.into(),
        }
    }

    pub fn error_code(&self) -> Code {
        match self {
            EvaluatorError::Lexer(e) => e.error_code(),
            EvaluatorError::Syntax(e) => e.error_code(),
            EvaluatorError::NameError { .. } | EvaluatorError::AttributeError { .. } => {
                codes::evaluation::NAME_ERROR
            }
            EvaluatorError::TypeError { .. } => codes::evaluation::TYPE_ERROR,
            EvaluatorError::ValueError { .. } => codes::evaluation::VALUE_ERROR,
            EvaluatorError::ZeroDivision { .. } => codes::evaluation::ZERO_DIVISION,
            EvaluatorError::IndexError { .. } => codes::evaluation::INDEX_ERROR,
            EvaluatorError::KeyError { .. } => codes::evaluation::KEY_ERROR,
            EvaluatorError::Overflow { .. } => codes::evaluation::OVERFLOW,
            EvaluatorError::LimitExceeded { .. } => codes::evaluation::LIMIT_EXCEEDED,
        }
    }

    /// True when the expression text itself was rejected before evaluation
    pub fn is_compile_error(&self) -> bool {
        matches!(self, EvaluatorError::Lexer(_) | EvaluatorError::Syntax(_))
    }
}

impl From<ComparisonError> for EvaluatorError {
    fn from(error: ComparisonError) -> Self {
        match error {
            ComparisonError::UnknownFlag { .. } => Self::value_error(error.to_string()),
            other => Self::type_error(other.to_string()),
        }
    }
}
