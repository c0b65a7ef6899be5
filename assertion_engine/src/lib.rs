//! # Assertion Engine
//!
//! Resolves operator text, formats both sides, and checks an actual value
//! against an expected one. Typed adapters fix which operators each kind of
//! value accepts. Expression operators (`validate`, `then`) run through an
//! injectable `assertion_expr::Evaluator`.

pub mod adapters;
pub mod api;
pub mod execution;
pub mod formatting;
pub mod types;

pub use api::*;
pub use assertion_expr::{FlagSet, Value};

pub mod prelude {
    pub use crate::api::{
        verify, verify_boolean, verify_flag_set, verify_float_as_string, verify_int_as_string,
        verify_keyed_collection, verify_keyed_collection_numeric_per_key,
        verify_ordered_collection, AssertionEngine, AssertionError, AssertionOperator,
        AssertionRequest, AssertionResult, Formatter, ParsedOperator,
    };
    pub use assertion_expr::{Evaluator, FlagSet, Namespace, Value};
}
