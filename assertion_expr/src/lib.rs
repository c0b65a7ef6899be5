//! Value model and sandboxed expression language for assertion checks
//!
//! Layers, bottom-up: `values` (dynamic values and flag sets), `lexical` and
//! `syntax` (tokenizer and parser), `evaluator` (interpreter and the
//! `Evaluator` seam), `literal` (safe literal parsing). `logging` and
//! `config` are shared with the engine crate.

pub mod config;
pub mod evaluator;
pub mod lexical;
pub mod literal;
pub mod logging;
pub mod syntax;
pub mod tokens;
pub mod utils;
pub mod values;

pub use evaluator::{evaluate, EvalResult, Evaluator, EvaluatorError, ExpressionEvaluator, Namespace};
pub use literal::literal_eval;
pub use values::{ComparisonError, FlagSet, OrderOp, Value};
