//! # Typed Coercion Adapters
//!
//! Each adapter fixes which operators are legal for one kind of value and
//! how the expected value is coerced, then delegates to the engine. An
//! illegal operator is rejected before any comparison runs.

pub mod boolean;
pub mod flags;
pub mod mapping;
pub mod numeric;
pub mod sequence;

pub use boolean::{is_truthy, is_truthy_str};
pub use numeric::NumericKind;

use crate::execution::engine::report;
use crate::types::{AssertionError, AssertionOperator, AssertionResult, ParsedOperator};

/// Resolve `operator` against a legality set, or fail naming the legal set
pub(crate) fn check_allowed(
    operator: &ParsedOperator,
    allowed: &[AssertionOperator],
    kind: &'static str,
) -> AssertionResult<AssertionOperator> {
    match operator.known() {
        Some(op) if allowed.contains(&op) => Ok(op),
        _ => Err(reject(AssertionError::OperatorNotAllowed {
            operator: operator.text().to_string(),
            kind,
            allowed: allowed.iter().map(AssertionOperator::symbol).collect(),
        })),
    }
}

/// Log an adapter-level error on its way out
pub(crate) fn reject(error: AssertionError) -> AssertionError {
    report(&error);
    error
}
