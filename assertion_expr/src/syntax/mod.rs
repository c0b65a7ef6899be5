//! Parsing of expression tokens into an AST

pub mod ast;
pub mod error;
pub mod parser;

pub use ast::{BinaryOp, BoolOp, CompareOp, Expr, ExprKind, UnaryOp};
pub use error::{SyntaxError, SyntaxResult};
pub use parser::parse_tokens;
