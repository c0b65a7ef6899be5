use super::error::AssertionError;
use assertion_expr::Value;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Value transformation applied before comparison
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Formatter {
    /// Remove leading and trailing whitespace
    Strip,
    /// Collapse every whitespace run to a single space, then strip
    NormalizeSpaces,
    /// Lowercase
    CaseInsensitive,
    /// Marker: run the same pipeline on the expected value too
    ApplyToExpected,
}

impl Formatter {
    pub const ALL: [Formatter; 4] = [
        Formatter::Strip,
        Formatter::NormalizeSpaces,
        Formatter::CaseInsensitive,
        Formatter::ApplyToExpected,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Formatter::Strip => "strip",
            Formatter::NormalizeSpaces => "normalize spaces",
            Formatter::CaseInsensitive => "case insensitive",
            Formatter::ApplyToExpected => "apply to expected",
        }
    }

    /// Apply to one value; non-string values pass through
    pub fn apply(&self, value: Value) -> Value {
        let text = match value {
            Value::Str(text) => text,
            other => return other,
        };
        Value::Str(match self {
            Formatter::Strip => text.trim().to_string(),
            Formatter::NormalizeSpaces => text.split_whitespace().collect::<Vec<_>>().join(" "),
            Formatter::CaseInsensitive => text.to_lowercase(),
            Formatter::ApplyToExpected => text,
        })
    }
}

impl FromStr for Formatter {
    type Err = AssertionError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name.trim().to_lowercase().as_str() {
            "strip" => Ok(Formatter::Strip),
            "normalize spaces" => Ok(Formatter::NormalizeSpaces),
            "case insensitive" | "ignore case" => Ok(Formatter::CaseInsensitive),
            "apply to expected" => Ok(Formatter::ApplyToExpected),
            _ => Err(AssertionError::UnknownFormatter {
                name: name.to_string(),
            }),
        }
    }
}

impl fmt::Display for Formatter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_names_parse_case_insensitively() {
        assert_eq!("Strip".parse::<Formatter>().unwrap(), Formatter::Strip);
        assert_eq!(
            " normalize SPACES ".parse::<Formatter>().unwrap(),
            Formatter::NormalizeSpaces
        );
        assert_eq!("ignore case".parse::<Formatter>().unwrap(), Formatter::CaseInsensitive);
        for formatter in Formatter::ALL {
            assert_eq!(formatter.name().parse::<Formatter>().unwrap(), formatter);
        }
        assert_matches!(
            "substitute space".parse::<Formatter>(),
            Err(AssertionError::UnknownFormatter { name }) if name == "substitute space"
        );
    }

    #[test]
    fn test_normalize_spaces_handles_unicode_whitespace() {
        let value = Value::str("\u{a0} a \t\n b\u{a0}\u{a0}c ");
        assert_eq!(Formatter::NormalizeSpaces.apply(value), Value::str("a b c"));
    }

    #[test]
    fn test_non_strings_pass_through() {
        assert_eq!(Formatter::CaseInsensitive.apply(Value::Int(3)), Value::Int(3));
        assert_eq!(
            Formatter::Strip.apply(Value::list([" a "])),
            Value::list([" a "])
        );
    }
}
