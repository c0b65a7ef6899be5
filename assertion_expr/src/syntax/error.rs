use crate::logging::{codes, Code};
use crate::utils::Span;

pub type SyntaxResult<T> = Result<T, SyntaxError>;

#[derive(Debug, Clone, thiserror::Error)]
pub enum SyntaxError {
    #[error("Unexpected token: expected {expected}, found {found} at {span}")]
    UnexpectedToken {
        expected: String,
        found: String,
        span: Span,
    },

    #[error("Unexpected end of expression: expected {expected}")]
    UnexpectedEnd { expected: String },

    #[error("Maximum nesting depth exceeded at {span}")]
    MaxDepthExceeded { span: Span },

    #[error("{message} at {span}")]
    InvalidConstruct { message: String, span: Span },

    #[error("Not a literal: {construct} at {span}")]
    NotALiteral { construct: String, span: Span },

    #[error("Empty expression")]
    EmptyExpression,
}

impl SyntaxError {
    pub fn unexpected_token(expected: &str, found: &str, span: Span) -> Self {
        Self::UnexpectedToken {
            expected: expected.to_string(),
            found: found.to_string(),
            span,
        }
    }

    pub fn unexpected_end(expected: &str) -> Self {
        Self::UnexpectedEnd {
            expected: expected.to_string(),
        }
    }

    pub fn invalid_construct(message: &str, span: Span) -> Self {
        Self::InvalidConstruct {
            message: message.to_string(),
            span,
        }
    }

    pub fn not_a_literal(construct: &str, span: Span) -> Self {
        Self::NotALiteral {
            construct: construct.to_string(),
            span,
        }
    }

    pub fn error_code(&self) -> Code {
        match self {
            SyntaxError::UnexpectedToken { .. } | SyntaxError::InvalidConstruct { .. } => {
                codes::syntax::UNEXPECTED_TOKEN
            }
            SyntaxError::UnexpectedEnd { .. } => codes::syntax::UNEXPECTED_END,
            SyntaxError::MaxDepthExceeded { .. } => codes::syntax::MAX_DEPTH_EXCEEDED,
            SyntaxError::NotALiteral { .. } => codes::syntax::NOT_A_LITERAL,
            SyntaxError::EmptyExpression => codes::syntax::EMPTY_EXPRESSION,
        }
    }

    pub fn span(&self) -> Option<Span> {
        match self {
            SyntaxError::UnexpectedToken { span, .. }
            | SyntaxError::MaxDepthExceeded { span }
            | SyntaxError::InvalidConstruct { span, .. }
            | SyntaxError::NotALiteral { span, .. } => Some(*span),
            SyntaxError::UnexpectedEnd { .. } | SyntaxError::EmptyExpression => None,
        }
    }
}
