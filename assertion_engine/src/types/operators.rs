//! Canonical assertion operators and their textual aliases

use super::error::AssertionError;
use super::formatter::Formatter;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AssertionOperator {
    Equal,
    NotEqual,
    LessThan,
    GreaterThan,
    LessOrEqual,
    GreaterOrEqual,
    Contains,
    NotContains,
    StartsWith,
    EndsWith,
    Matches,
    /// Boolean predicate expression over `value`
    Validate,
    /// Expression whose result replaces the actual value
    Evaluate,
}

/// Every accepted operator text, many-to-one onto the canonical operators
const ALIASES: &[(&str, AssertionOperator)] = &[
    ("==", AssertionOperator::Equal),
    ("equal", AssertionOperator::Equal),
    ("should be", AssertionOperator::Equal),
    ("!=", AssertionOperator::NotEqual),
    ("inequal", AssertionOperator::NotEqual),
    ("should not be", AssertionOperator::NotEqual),
    ("<", AssertionOperator::LessThan),
    ("less than", AssertionOperator::LessThan),
    (">", AssertionOperator::GreaterThan),
    ("greater than", AssertionOperator::GreaterThan),
    ("<=", AssertionOperator::LessOrEqual),
    (">=", AssertionOperator::GreaterOrEqual),
    ("*=", AssertionOperator::Contains),
    ("contains", AssertionOperator::Contains),
    ("not contains", AssertionOperator::NotContains),
    ("^=", AssertionOperator::StartsWith),
    ("starts", AssertionOperator::StartsWith),
    ("should start with", AssertionOperator::StartsWith),
    ("$=", AssertionOperator::EndsWith),
    ("ends", AssertionOperator::EndsWith),
    ("should end with", AssertionOperator::EndsWith),
    ("matches", AssertionOperator::Matches),
    ("validate", AssertionOperator::Validate),
    ("then", AssertionOperator::Evaluate),
    ("evaluate", AssertionOperator::Evaluate),
];

fn alias_table() -> &'static HashMap<&'static str, AssertionOperator> {
    static TABLE: OnceLock<HashMap<&'static str, AssertionOperator>> = OnceLock::new();
    TABLE.get_or_init(|| ALIASES.iter().copied().collect())
}

impl AssertionOperator {
    pub const ALL: [AssertionOperator; 13] = [
        AssertionOperator::Equal,
        AssertionOperator::NotEqual,
        AssertionOperator::LessThan,
        AssertionOperator::GreaterThan,
        AssertionOperator::LessOrEqual,
        AssertionOperator::GreaterOrEqual,
        AssertionOperator::Contains,
        AssertionOperator::NotContains,
        AssertionOperator::StartsWith,
        AssertionOperator::EndsWith,
        AssertionOperator::Matches,
        AssertionOperator::Validate,
        AssertionOperator::Evaluate,
    ];

    pub const NUMERICAL: [AssertionOperator; 6] = [
        AssertionOperator::Equal,
        AssertionOperator::NotEqual,
        AssertionOperator::LessThan,
        AssertionOperator::GreaterThan,
        AssertionOperator::LessOrEqual,
        AssertionOperator::GreaterOrEqual,
    ];

    pub const SEQUENCE: [AssertionOperator; 6] = [
        AssertionOperator::Contains,
        AssertionOperator::NotContains,
        AssertionOperator::Equal,
        AssertionOperator::NotEqual,
        AssertionOperator::Validate,
        AssertionOperator::Evaluate,
    ];

    pub const EVALUATION: [AssertionOperator; 2] =
        [AssertionOperator::Validate, AssertionOperator::Evaluate];

    /// Canonical text
    pub fn symbol(&self) -> &'static str {
        match self {
            AssertionOperator::Equal => "==",
            AssertionOperator::NotEqual => "!=",
            AssertionOperator::LessThan => "<",
            AssertionOperator::GreaterThan => ">",
            AssertionOperator::LessOrEqual => "<=",
            AssertionOperator::GreaterOrEqual => ">=",
            AssertionOperator::Contains => "*=",
            AssertionOperator::NotContains => "not contains",
            AssertionOperator::StartsWith => "^=",
            AssertionOperator::EndsWith => "$=",
            AssertionOperator::Matches => "matches",
            AssertionOperator::Validate => "validate",
            AssertionOperator::Evaluate => "then",
        }
    }

    /// Alternative texts, excluding the canonical symbol
    pub fn aliases(&self) -> Vec<&'static str> {
        ALIASES
            .iter()
            .filter(|(text, op)| op == self && *text != self.symbol())
            .map(|(text, _)| *text)
            .collect()
    }

    pub fn is_numerical(&self) -> bool {
        Self::NUMERICAL.contains(self)
    }

    pub fn is_sequence(&self) -> bool {
        Self::SEQUENCE.contains(self)
    }

    pub fn is_evaluation(&self) -> bool {
        Self::EVALUATION.contains(self)
    }
}

impl fmt::Display for AssertionOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("`{text}` is not a valid assertion operator")]
pub struct UnknownOperator {
    pub text: String,
}

/// Exact lookup first, then the lowercased text
pub fn resolve_operator(text: &str) -> Result<AssertionOperator, UnknownOperator> {
    let table = alias_table();
    table
        .get(text)
        .or_else(|| table.get(text.to_lowercase().as_str()))
        .copied()
        .ok_or_else(|| UnknownOperator {
            text: text.to_string(),
        })
}

impl FromStr for AssertionOperator {
    type Err = UnknownOperator;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        resolve_operator(text)
    }
}

/// Operator as supplied by a caller; unresolvable text is kept so the
/// failure can be reported when a comparison is attempted
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParsedOperator {
    Known(AssertionOperator),
    Unknown(String),
}

impl ParsedOperator {
    pub fn known(&self) -> Option<AssertionOperator> {
        match self {
            ParsedOperator::Known(op) => Some(*op),
            ParsedOperator::Unknown(_) => None,
        }
    }

    pub fn is(&self, op: AssertionOperator) -> bool {
        self.known() == Some(op)
    }

    /// Text for messages: the canonical symbol or the unresolved input
    pub fn text(&self) -> &str {
        match self {
            ParsedOperator::Known(op) => op.symbol(),
            ParsedOperator::Unknown(text) => text,
        }
    }
}

impl From<AssertionOperator> for ParsedOperator {
    fn from(op: AssertionOperator) -> Self {
        ParsedOperator::Known(op)
    }
}

impl From<&str> for ParsedOperator {
    fn from(text: &str) -> Self {
        parse_operator(text)
    }
}

impl fmt::Display for ParsedOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.text())
    }
}

pub fn parse_operator(text: &str) -> ParsedOperator {
    match resolve_operator(text) {
        Ok(op) => ParsedOperator::Known(op),
        Err(UnknownOperator { text }) => ParsedOperator::Unknown(text),
    }
}

/// Split `OPERATOR::DIRECTIVE` once; a second separator is malformed
pub fn split_operator_and_directive(
    text: &str,
) -> Result<(ParsedOperator, Option<Formatter>), AssertionError> {
    match text.split_once("::") {
        None => Ok((parse_operator(text.trim()), None)),
        Some((_, directive)) if directive.contains("::") => Err(AssertionError::MalformedOperator {
            text: text.to_string(),
        }),
        Some((operator, directive)) => {
            let formatter = directive.parse::<Formatter>()?;
            Ok((parse_operator(operator.trim()), Some(formatter)))
        }
    }
}
