//! Outcome events emitted by the engine. The global logger can be installed
//! once per process, so everything runs in a single test.

use assertion_engine::prelude::*;
use assertion_engine::parse_operator;
use assertion_expr::logging::{
    codes, init_global_logging_with_service, LogLevel, LoggingService, MemoryLogger,
};
use std::sync::Arc;

#[test]
fn engine_reports_outcomes_through_the_global_logger() {
    let memory = Arc::new(MemoryLogger::new());
    let service = Arc::new(LoggingService::new(memory.clone(), LogLevel::Debug));
    init_global_logging_with_service(service).unwrap();
    memory.clear();

    let engine = AssertionEngine::new();
    let equal = Some(parse_operator("=="));

    engine.verify("same", equal.clone(), Some(Value::str("same")), "", None, &[]).unwrap();
    assert!(memory.has_success_with_code(codes::success::ASSERTION_PASSED));

    engine.verify("value", None, None, "", None, &[]).unwrap();
    assert!(memory.has_success_with_code(codes::success::PASS_THROUGH));

    let usage = engine
        .verify_boolean(true, Some(parse_operator("<")), Some(Value::str("yes")), "", None)
        .unwrap_err();
    assert!(usage.is_usage_error());
    assert!(memory.has_error_with_code(codes::assertion::OPERATOR_NOT_ALLOWED));

    engine.verify("x", None, Some(Value::str("x")), "", None, &[]).unwrap_err();
    assert!(memory.has_error_with_code(codes::assertion::MISSING_OPERATOR));

    // A comparison that does not hold is an expected outcome, not an error event
    let errors_before = memory.get_errors().len();
    let failure = engine
        .verify("a", equal, Some(Value::str("b")), "", None, &[])
        .unwrap_err();
    assert!(failure.is_assertion_failure());
    assert_eq!(memory.get_errors().len(), errors_before);
    assert!(!memory.has_error_with_code(codes::assertion::ASSERTION_FAILED));
    assert!(memory
        .get_events()
        .iter()
        .any(|event| event.level == LogLevel::Debug && event.message == "Assertion failed"));
}
