//! # Public API
//!
//! The call surface used by wrapper libraries. Everything here delegates to
//! `default_engine()`; build an `AssertionEngine` directly to inject a
//! different evaluator.

pub mod verify;

pub use crate::adapters::{is_truthy, is_truthy_str, NumericKind};
pub use crate::execution::{default_engine, AssertionEngine, AssertionRequest};
pub use crate::formatting::{apply_formatting, apply_formatting_to_expected, parse_formatters};
pub use crate::types::{
    parse_operator, resolve_operator, split_operator_and_directive, AssertionError,
    AssertionOperator, AssertionResult, Formatter, ParsedOperator, UnknownOperator,
};
pub use verify::{
    verify, verify_boolean, verify_flag_set, verify_float_as_string, verify_int_as_string,
    verify_keyed_collection, verify_keyed_collection_numeric_per_key, verify_numeric_as_string,
    verify_ordered_collection,
};
