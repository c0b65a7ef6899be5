pub mod error;
pub mod formatter;
pub mod operators;

pub use error::{AssertionError, AssertionResult};
pub use formatter::Formatter;
pub use operators::{
    parse_operator, resolve_operator, split_operator_and_directive, AssertionOperator,
    ParsedOperator, UnknownOperator,
};
