//! Error and success codes with their classification metadata
//!
//! Every error enum in the workspace maps its variants onto one of these codes
//! through an `error_code()` method, so log output can be filtered by code.

use std::collections::HashMap;
use std::sync::OnceLock;

// ============================================================================
// CODE WRAPPER TYPE
// ============================================================================

/// Universal code wrapper for both error and success codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Code(&'static str);

impl Code {
    pub const fn new(code: &'static str) -> Self {
        Self(code)
    }

    pub fn as_str(&self) -> &'static str {
        self.0
    }
}

impl std::fmt::Display for Code {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// ERROR CLASSIFICATION TYPES
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Critical = 0,
    High = 1,
    Medium = 2,
    Low = 3,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Critical => "Critical",
            Severity::High => "High",
            Severity::Medium => "Medium",
            Severity::Low => "Low",
        }
    }
}

/// Complete metadata for an error code
#[derive(Debug, Clone)]
pub struct ErrorMetadata {
    pub code: &'static str,
    pub category: &'static str,
    pub severity: Severity,
    pub recoverable: bool,
    pub requires_halt: bool,
    pub description: &'static str,
    pub recommended_action: &'static str,
}

// ============================================================================
// CODE CONSTANTS
// ============================================================================

pub mod system {
    use super::Code;

    pub const INTERNAL_ERROR: Code = Code::new("ERR001");
    pub const INITIALIZATION_FAILURE: Code = Code::new("ERR002");
}

/// Tokenizing expression text
pub mod lexical {
    use super::Code;

    pub const INVALID_CHARACTER: Code = Code::new("E020");
    pub const UNTERMINATED_STRING: Code = Code::new("E021");
    pub const INVALID_NUMBER: Code = Code::new("E022");
    pub const STRING_TOO_LARGE: Code = Code::new("E023");
    pub const TOO_MANY_TOKENS: Code = Code::new("E024");
    pub const EXPRESSION_TOO_LONG: Code = Code::new("E025");
    pub const INVALID_ESCAPE: Code = Code::new("E026");
}

/// Parsing expression tokens
pub mod syntax {
    use super::Code;

    pub const UNEXPECTED_TOKEN: Code = Code::new("E040");
    pub const UNEXPECTED_END: Code = Code::new("E041");
    pub const MAX_DEPTH_EXCEEDED: Code = Code::new("E042");
    pub const NOT_A_LITERAL: Code = Code::new("E043");
    pub const EMPTY_EXPRESSION: Code = Code::new("E044");
}

/// Interpreting a parsed expression
pub mod evaluation {
    use super::Code;

    pub const NAME_ERROR: Code = Code::new("E060");
    pub const TYPE_ERROR: Code = Code::new("E061");
    pub const VALUE_ERROR: Code = Code::new("E062");
    pub const ZERO_DIVISION: Code = Code::new("E063");
    pub const INDEX_ERROR: Code = Code::new("E064");
    pub const KEY_ERROR: Code = Code::new("E065");
    pub const OVERFLOW: Code = Code::new("E066");
    pub const LIMIT_EXCEEDED: Code = Code::new("E067");
}

/// Verifying assertions
pub mod assertion {
    use super::Code;

    pub const ASSERTION_FAILED: Code = Code::new("E100");
    pub const INVALID_OPERATOR: Code = Code::new("E101");
    pub const OPERATOR_NOT_ALLOWED: Code = Code::new("E102");
    pub const MISSING_OPERATOR: Code = Code::new("E103");
    pub const MALFORMED_OPERATOR: Code = Code::new("E104");
    pub const UNKNOWN_FORMATTER: Code = Code::new("E105");
    pub const TYPE_MISMATCH: Code = Code::new("E106");
    pub const INVALID_EXPECTED: Code = Code::new("E107");
    pub const MISSING_KEY: Code = Code::new("E108");
    pub const INVALID_PATTERN: Code = Code::new("E109");
}

pub mod success {
    use super::Code;

    pub const SYSTEM_INITIALIZATION_COMPLETED: Code = Code::new("I001");
    pub const EXPRESSION_EVALUATED: Code = Code::new("I010");
    pub const LITERAL_PARSED: Code = Code::new("I011");
    pub const ASSERTION_PASSED: Code = Code::new("I020");
    pub const VALUE_TRANSFORMED: Code = Code::new("I021");
    pub const PASS_THROUGH: Code = Code::new("I022");
}

// ============================================================================
// ERROR METADATA REGISTRY
// ============================================================================

static ERROR_REGISTRY: OnceLock<HashMap<&'static str, ErrorMetadata>> = OnceLock::new();

type Entry = (
    Code,
    &'static str,
    Severity,
    bool,
    bool,
    &'static str,
    &'static str,
);

const ENTRIES: &[Entry] = &[
    // System
    (
        system::INTERNAL_ERROR,
        "System",
        Severity::Critical,
        false,
        true,
        "Critical internal error",
        "File a bug report with the failing input",
    ),
    (
        system::INITIALIZATION_FAILURE,
        "System",
        Severity::Critical,
        false,
        true,
        "Logging or configuration initialization failure",
        "Check the build profile and environment variables",
    ),
    // Lexical
    (
        lexical::INVALID_CHARACTER,
        "Lexical",
        Severity::High,
        false,
        false,
        "Expression contains a character outside the grammar",
        "Remove or quote the offending character",
    ),
    (
        lexical::UNTERMINATED_STRING,
        "Lexical",
        Severity::High,
        false,
        false,
        "String literal is missing its closing quote",
        "Close the string with the same quote it was opened with",
    ),
    (
        lexical::INVALID_NUMBER,
        "Lexical",
        Severity::High,
        false,
        false,
        "Numeric literal could not be parsed",
        "Check the digits and exponent of the number",
    ),
    (
        lexical::STRING_TOO_LARGE,
        "Lexical",
        Severity::High,
        false,
        false,
        "String literal exceeds the configured size limit",
        "Shorten the literal or bind the data as a variable",
    ),
    (
        lexical::TOO_MANY_TOKENS,
        "Lexical",
        Severity::High,
        false,
        false,
        "Expression exceeds the configured token limit",
        "Simplify the expression",
    ),
    (
        lexical::EXPRESSION_TOO_LONG,
        "Lexical",
        Severity::High,
        false,
        false,
        "Expression text exceeds the configured length limit",
        "Simplify the expression",
    ),
    (
        lexical::INVALID_ESCAPE,
        "Lexical",
        Severity::Medium,
        false,
        false,
        "Unsupported escape sequence in string literal",
        "Use one of \\n, \\t, \\r, \\\\, \\', \\\" or \\uXXXX",
    ),
    // Syntax
    (
        syntax::UNEXPECTED_TOKEN,
        "Syntax",
        Severity::High,
        false,
        false,
        "Token not valid at this position",
        "Check operator placement and parentheses",
    ),
    (
        syntax::UNEXPECTED_END,
        "Syntax",
        Severity::High,
        false,
        false,
        "Expression ended before it was complete",
        "Close open brackets and finish the expression",
    ),
    (
        syntax::MAX_DEPTH_EXCEEDED,
        "Syntax",
        Severity::High,
        false,
        false,
        "Expression nesting exceeds the configured depth",
        "Reduce nesting of brackets and operators",
    ),
    (
        syntax::NOT_A_LITERAL,
        "Syntax",
        Severity::Medium,
        true,
        false,
        "Text is a valid expression but not a plain literal",
        "Pass literal values only (numbers, strings, lists, dicts)",
    ),
    (
        syntax::EMPTY_EXPRESSION,
        "Syntax",
        Severity::Medium,
        false,
        false,
        "Expression text is empty",
        "Provide an expression",
    ),
    // Evaluation
    (
        evaluation::NAME_ERROR,
        "Evaluation",
        Severity::Medium,
        false,
        false,
        "Expression references an unknown name",
        "Use `value` or one of the bound names",
    ),
    (
        evaluation::TYPE_ERROR,
        "Evaluation",
        Severity::Medium,
        false,
        false,
        "Operation applied to values of incompatible types",
        "Convert operands explicitly with str(), int() or float()",
    ),
    (
        evaluation::VALUE_ERROR,
        "Evaluation",
        Severity::Medium,
        false,
        false,
        "Value has the right type but an invalid content",
        "Check the conversion input",
    ),
    (
        evaluation::ZERO_DIVISION,
        "Evaluation",
        Severity::Medium,
        false,
        false,
        "Division or modulo by zero",
        "Guard the divisor",
    ),
    (
        evaluation::INDEX_ERROR,
        "Evaluation",
        Severity::Medium,
        false,
        false,
        "Sequence index out of range",
        "Check the sequence length before indexing",
    ),
    (
        evaluation::KEY_ERROR,
        "Evaluation",
        Severity::Medium,
        false,
        false,
        "Mapping key not present",
        "Use .get() for optional keys",
    ),
    (
        evaluation::OVERFLOW,
        "Evaluation",
        Severity::Medium,
        false,
        false,
        "Integer arithmetic overflowed 64 bits",
        "Use float arithmetic for large values",
    ),
    (
        evaluation::LIMIT_EXCEEDED,
        "Evaluation",
        Severity::High,
        false,
        false,
        "Evaluation exceeded a configured resource limit",
        "Reduce the size of intermediate collections",
    ),
    // Assertion
    (
        assertion::ASSERTION_FAILED,
        "Assertion",
        Severity::Medium,
        true,
        false,
        "Assertion did not hold",
        "Compare the actual and expected values in the message",
    ),
    (
        assertion::INVALID_OPERATOR,
        "Assertion",
        Severity::High,
        false,
        false,
        "Operator text does not resolve to a known operator",
        "Use a canonical symbol or a documented alias",
    ),
    (
        assertion::OPERATOR_NOT_ALLOWED,
        "Assertion",
        Severity::High,
        false,
        false,
        "Operator is not legal for this value kind",
        "Pick one of the operators listed in the message",
    ),
    (
        assertion::MISSING_OPERATOR,
        "Assertion",
        Severity::High,
        false,
        false,
        "Expected value given without an operator",
        "Supply an operator or drop the expected value",
    ),
    (
        assertion::MALFORMED_OPERATOR,
        "Assertion",
        Severity::High,
        false,
        false,
        "Operator text has more than one `::` directive separator",
        "Use the form OPERATOR::DIRECTIVE",
    ),
    (
        assertion::UNKNOWN_FORMATTER,
        "Assertion",
        Severity::High,
        false,
        false,
        "Formatter name is not recognized",
        "Use strip, normalize spaces, case insensitive or apply to expected",
    ),
    (
        assertion::TYPE_MISMATCH,
        "Assertion",
        Severity::High,
        false,
        false,
        "Values cannot be compared with this operator",
        "Convert the expected value to the actual value's type",
    ),
    (
        assertion::INVALID_EXPECTED,
        "Assertion",
        Severity::High,
        false,
        false,
        "Expected value cannot be coerced to the adapter's kind",
        "Pass an expected value that parses as the actual's kind",
    ),
    (
        assertion::MISSING_KEY,
        "Assertion",
        Severity::High,
        false,
        false,
        "Per-key comparison found no expected entry for a key",
        "Provide an expected value for every key of the actual mapping",
    ),
    (
        assertion::INVALID_PATTERN,
        "Assertion",
        Severity::High,
        false,
        false,
        "Regular expression failed to compile",
        "Fix the pattern syntax",
    ),
];

fn get_error_registry() -> &'static HashMap<&'static str, ErrorMetadata> {
    ERROR_REGISTRY.get_or_init(|| {
        ENTRIES
            .iter()
            .map(
                |&(code, category, severity, recoverable, requires_halt, description, action)| {
                    (
                        code.as_str(),
                        ErrorMetadata {
                            code: code.as_str(),
                            category,
                            severity,
                            recoverable,
                            requires_halt,
                            description,
                            recommended_action: action,
                        },
                    )
                },
            )
            .collect()
    })
}

// ============================================================================
// CLASSIFICATION FUNCTIONS
// ============================================================================

pub fn get_error_metadata(code: &str) -> Option<&'static ErrorMetadata> {
    get_error_registry().get(code)
}

pub fn get_severity(code: &str) -> Severity {
    get_error_metadata(code)
        .map(|metadata| metadata.severity)
        .unwrap_or(Severity::Medium)
}

pub fn is_recoverable(code: &str) -> bool {
    get_error_metadata(code)
        .map(|metadata| metadata.recoverable)
        .unwrap_or(true)
}

pub fn requires_halt(code: &str) -> bool {
    get_error_metadata(code)
        .map(|metadata| metadata.requires_halt)
        .unwrap_or(false)
}

pub fn get_description(code: &str) -> &'static str {
    get_error_metadata(code)
        .map(|metadata| metadata.description)
        .unwrap_or("Unknown error")
}

pub fn get_action(code: &str) -> &'static str {
    get_error_metadata(code)
        .map(|metadata| metadata.recommended_action)
        .unwrap_or("No specific action available")
}

/// Category of an error code; success codes fall back to their prefix
pub fn get_category(code: &str) -> &'static str {
    match get_error_metadata(code) {
        Some(metadata) => metadata.category,
        None if code.starts_with('I') => "Success",
        None => "Unknown",
    }
}
