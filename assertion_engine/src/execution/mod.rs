pub mod comparisons;
pub mod engine;
pub mod message;
pub mod request;

pub use comparisons::{handler_for, ComparisonHandler};
pub use engine::{default_engine, AssertionEngine, VALUE_BINDING};
pub use request::AssertionRequest;
