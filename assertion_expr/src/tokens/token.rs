use crate::utils::Span;
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    // Literals
    Int(i64),
    Float(f64),
    Str(String),
    Identifier(String),

    // Keywords
    True,
    False,
    None,
    And,
    Or,
    Not,
    In,
    Is,
    If,
    Else,

    // Arithmetic and bitwise
    Plus,
    Minus,
    Star,
    DoubleStar,
    Slash,
    DoubleSlash,
    Percent,
    Pipe,
    Ampersand,

    // Comparison
    EqualEqual,
    NotEqual,
    Less,
    Greater,
    LessEqual,
    GreaterEqual,

    // Delimiters
    LeftParen,
    RightParen,
    LeftBracket,
    RightBracket,
    LeftBrace,
    RightBrace,
    Comma,
    Colon,
    Dot,

    Eof,
}

impl Token {
    pub fn is_comparison(&self) -> bool {
        matches!(
            self,
            Token::EqualEqual
                | Token::NotEqual
                | Token::Less
                | Token::Greater
                | Token::LessEqual
                | Token::GreaterEqual
                | Token::In
                | Token::Is
        )
    }

    /// Short description used in syntax error messages
    pub fn describe(&self) -> String {
        match self {
            Token::Int(_) | Token::Float(_) => "number".to_string(),
            Token::Str(_) => "string".to_string(),
            Token::Identifier(name) => format!("name '{}'", name),
            Token::Eof => "end of expression".to_string(),
            other => format!("'{}'", other),
        }
    }
}

pub fn keyword_from_str(word: &str) -> Option<Token> {
    let token = match word {
        "True" => Token::True,
        "False" => Token::False,
        "None" => Token::None,
        "and" => Token::And,
        "or" => Token::Or,
        "not" => Token::Not,
        "in" => Token::In,
        "is" => Token::Is,
        "if" => Token::If,
        "else" => Token::Else,
        _ => return None,
    };
    Some(token)
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Token::Int(i) => return write!(f, "{}", i),
            Token::Float(x) => return write!(f, "{}", x),
            Token::Str(s) => return write!(f, "{:?}", s),
            Token::Identifier(name) => return write!(f, "{}", name),
            Token::True => "True",
            Token::False => "False",
            Token::None => "None",
            Token::And => "and",
            Token::Or => "or",
            Token::Not => "not",
            Token::In => "in",
            Token::Is => "is",
            Token::If => "if",
            Token::Else => "else",
            Token::Plus => "+",
            Token::Minus => "-",
            Token::Star => "*",
            Token::DoubleStar => "**",
            Token::Slash => "/",
            Token::DoubleSlash => "//",
            Token::Percent => "%",
            Token::Pipe => "|",
            Token::Ampersand => "&",
            Token::EqualEqual => "==",
            Token::NotEqual => "!=",
            Token::Less => "<",
            Token::Greater => ">",
            Token::LessEqual => "<=",
            Token::GreaterEqual => ">=",
            Token::LeftParen => "(",
            Token::RightParen => ")",
            Token::LeftBracket => "[",
            Token::RightBracket => "]",
            Token::LeftBrace => "{",
            Token::RightBrace => "}",
            Token::Comma => ",",
            Token::Colon => ":",
            Token::Dot => ".",
            Token::Eof => "<eof>",
        };
        write!(f, "{}", text)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SpannedToken {
    pub token: Token,
    pub span: Span,
}

impl SpannedToken {
    pub fn new(token: Token, span: Span) -> Self {
        Self { token, span }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keywords_are_case_sensitive() {
        assert_eq!(keyword_from_str("True"), Some(Token::True));
        assert_eq!(keyword_from_str("true"), None);
        assert_eq!(keyword_from_str("not"), Some(Token::Not));
    }

    #[test]
    fn test_describe() {
        assert_eq!(Token::Identifier("value".into()).describe(), "name 'value'");
        assert_eq!(Token::DoubleSlash.describe(), "'//'");
        assert_eq!(Token::Eof.describe(), "end of expression");
    }
}
