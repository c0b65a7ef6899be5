//! Character-level tokenizer for the expression language
//!
//! Produces spanned tokens in a single pass. All limits come from the
//! compile-time `expression` profile section.

use crate::config::compile_time::expression::*;
use crate::logging::codes;
use crate::tokens::{keyword_from_str, SpannedToken, Token, TokenStream};
use crate::utils::{Position, Span};
use crate::{log_debug, log_error};
use std::iter::Peekable;
use std::str::Chars;

#[derive(Debug, Clone, thiserror::Error)]
pub enum LexerError {
    #[error("Invalid character '{character}' at {position}")]
    InvalidCharacter { character: char, position: Position },

    #[error("Unterminated string literal starting at {position}")]
    UnterminatedString { position: Position },

    #[error("Invalid number '{text}' at {position}")]
    InvalidNumber { text: String, position: Position },

    #[error("Invalid escape sequence '{sequence}' at {position}")]
    InvalidEscape { sequence: String, position: Position },

    #[error("String literal too large: {size} bytes (max {MAX_STRING_SIZE})")]
    StringTooLarge { size: usize },

    #[error("Too many tokens: {count} (max {MAX_TOKEN_COUNT})")]
    TooManyTokens { count: usize },

    #[error("Expression too long: {length} bytes (max {MAX_EXPRESSION_LENGTH})")]
    ExpressionTooLong { length: usize },
}

impl LexerError {
    pub fn error_code(&self) -> crate::logging::Code {
        match self {
            LexerError::InvalidCharacter { .. } => codes::lexical::INVALID_CHARACTER,
            LexerError::UnterminatedString { .. } => codes::lexical::UNTERMINATED_STRING,
            LexerError::InvalidNumber { .. } => codes::lexical::INVALID_NUMBER,
            LexerError::InvalidEscape { .. } => codes::lexical::INVALID_ESCAPE,
            LexerError::StringTooLarge { .. } => codes::lexical::STRING_TOO_LARGE,
            LexerError::TooManyTokens { .. } => codes::lexical::TOO_MANY_TOKENS,
            LexerError::ExpressionTooLong { .. } => codes::lexical::EXPRESSION_TOO_LONG,
        }
    }
}

/// Tokenize `source` into a stream ending with `Token::Eof`
pub fn tokenize(source: &str) -> Result<TokenStream, LexerError> {
    if source.len() > MAX_EXPRESSION_LENGTH {
        let error = LexerError::ExpressionTooLong {
            length: source.len(),
        };
        log_error!(error.error_code(), &error.to_string());
        return Err(error);
    }

    let mut lexer = Lexer::new(source);
    match lexer.run() {
        Ok(tokens) => {
            log_debug!("Tokenization complete", "tokens" => tokens.len());
            Ok(TokenStream::new(tokens))
        }
        Err(error) => {
            log_error!(error.error_code(), &error.to_string(), "source" => source);
            Err(error)
        }
    }
}

struct Lexer<'a> {
    chars: Peekable<Chars<'a>>,
    position: Position,
    tokens: Vec<SpannedToken>,
}

impl<'a> Lexer<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            chars: source.chars().peekable(),
            position: Position::start(),
            tokens: Vec::new(),
        }
    }

    fn bump(&mut self) -> Option<char> {
        let ch = self.chars.next()?;
        self.position = self.position.advance(ch);
        Some(ch)
    }

    fn bump_if(&mut self, expected: char) -> bool {
        if self.chars.peek() == Some(&expected) {
            self.bump();
            true
        } else {
            false
        }
    }

    fn push(&mut self, token: Token, start: Position) -> Result<(), LexerError> {
        if self.tokens.len() >= MAX_TOKEN_COUNT {
            return Err(LexerError::TooManyTokens {
                count: self.tokens.len() + 1,
            });
        }
        self.tokens
            .push(SpannedToken::new(token, Span::new(start, self.position)));
        Ok(())
    }

    fn run(&mut self) -> Result<Vec<SpannedToken>, LexerError> {
        while let Some(&ch) = self.chars.peek() {
            let start = self.position;

            if ch.is_whitespace() {
                self.bump();
                continue;
            }

            if ch.is_ascii_digit() || (ch == '.' && self.next_is_digit()) {
                let token = self.number(start)?;
                self.push(token, start)?;
                continue;
            }

            if ch == '\'' || ch == '"' {
                self.bump();
                let text = self.string(ch, start, false)?;
                self.push(Token::Str(text), start)?;
                continue;
            }

            if ch.is_alphabetic() || ch == '_' {
                let word = self.word();
                let raw_prefix = matches!(word.as_str(), "r" | "R");
                match self.chars.peek() {
                    Some(&quote @ ('\'' | '"')) if raw_prefix => {
                        self.bump();
                        let text = self.string(quote, start, true)?;
                        self.push(Token::Str(text), start)?;
                    }
                    _ => {
                        let token = keyword_from_str(&word).unwrap_or(Token::Identifier(word));
                        self.push(token, start)?;
                    }
                }
                continue;
            }

            self.bump();
            let token = match ch {
                '+' => Token::Plus,
                '-' => Token::Minus,
                '*' if self.bump_if('*') => Token::DoubleStar,
                '*' => Token::Star,
                '/' if self.bump_if('/') => Token::DoubleSlash,
                '/' => Token::Slash,
                '%' => Token::Percent,
                '|' => Token::Pipe,
                '&' => Token::Ampersand,
                '=' if self.bump_if('=') => Token::EqualEqual,
                '!' if self.bump_if('=') => Token::NotEqual,
                '<' if self.bump_if('=') => Token::LessEqual,
                '<' => Token::Less,
                '>' if self.bump_if('=') => Token::GreaterEqual,
                '>' => Token::Greater,
                '(' => Token::LeftParen,
                ')' => Token::RightParen,
                '[' => Token::LeftBracket,
                ']' => Token::RightBracket,
                '{' => Token::LeftBrace,
                '}' => Token::RightBrace,
                ',' => Token::Comma,
                ':' => Token::Colon,
                '.' => Token::Dot,
                other => {
                    return Err(LexerError::InvalidCharacter {
                        character: other,
                        position: start,
                    })
                }
            };
            self.push(token, start)?;
        }

        let end = self.position;
        self.tokens
            .push(SpannedToken::new(Token::Eof, Span::new(end, end)));
        Ok(std::mem::take(&mut self.tokens))
    }

    fn next_is_digit(&self) -> bool {
        let mut lookahead = self.chars.clone();
        lookahead.next();
        matches!(lookahead.next(), Some(c) if c.is_ascii_digit())
    }

    fn word(&mut self) -> String {
        let mut word = String::new();
        while let Some(&ch) = self.chars.peek() {
            if ch.is_alphanumeric() || ch == '_' {
                word.push(ch);
                self.bump();
            } else {
                break;
            }
        }
        word
    }

    fn digits(&mut self, text: &mut String) {
        while let Some(&ch) = self.chars.peek() {
            if ch.is_ascii_digit() || ch == '_' {
                text.push(ch);
                self.bump();
            } else {
                break;
            }
        }
    }

    fn number(&mut self, start: Position) -> Result<Token, LexerError> {
        let mut text = String::new();
        let mut is_float = false;

        self.digits(&mut text);

        if self.chars.peek() == Some(&'.') {
            is_float = true;
            text.push('.');
            self.bump();
            self.digits(&mut text);
        }

        if matches!(self.chars.peek(), Some('e' | 'E')) {
            is_float = true;
            text.push('e');
            self.bump();
            if let Some(&sign @ ('+' | '-')) = self.chars.peek() {
                text.push(sign);
                self.bump();
            }
            self.digits(&mut text);
        }

        // A number running straight into a name, as in `3abc`
        if let Some(&ch) = self.chars.peek() {
            if ch.is_alphabetic() || ch == '_' {
                text.push_str(&self.word());
                return Err(LexerError::InvalidNumber {
                    text,
                    position: start,
                });
            }
        }

        let invalid = || LexerError::InvalidNumber {
            text: text.clone(),
            position: start,
        };

        if text.starts_with('_') || text.ends_with('_') || text.contains("__") {
            return Err(invalid());
        }
        let cleaned = text.replace('_', "");

        if is_float {
            cleaned
                .parse::<f64>()
                .map(Token::Float)
                .map_err(|_| invalid())
        } else {
            cleaned.parse::<i64>().map(Token::Int).map_err(|_| invalid())
        }
    }

    fn string(&mut self, quote: char, start: Position, raw: bool) -> Result<String, LexerError> {
        let mut text = String::new();

        loop {
            let escape_position = self.position;
            let ch = match self.bump() {
                Some('\n') | None => return Err(LexerError::UnterminatedString { position: start }),
                Some(ch) => ch,
            };

            if ch == quote {
                break;
            }

            if ch == '\\' {
                let escaped = self
                    .bump()
                    .ok_or(LexerError::UnterminatedString { position: start })?;
                if raw {
                    text.push('\\');
                    text.push(escaped);
                } else {
                    self.escape(escaped, escape_position, &mut text)?;
                }
            } else {
                text.push(ch);
            }

            if text.len() > MAX_STRING_SIZE {
                return Err(LexerError::StringTooLarge { size: text.len() });
            }
        }

        Ok(text)
    }

    fn escape(
        &mut self,
        escaped: char,
        position: Position,
        text: &mut String,
    ) -> Result<(), LexerError> {
        match escaped {
            'n' => text.push('\n'),
            't' => text.push('\t'),
            'r' => text.push('\r'),
            '0' => text.push('\0'),
            '\\' => text.push('\\'),
            '\'' => text.push('\''),
            '"' => text.push('"'),
            '\n' => {}
            'x' | 'u' => {
                let width = if escaped == 'x' { 2 } else { 4 };
                let mut hex = String::new();
                for _ in 0..width {
                    match self.chars.peek() {
                        Some(&c) if c.is_ascii_hexdigit() => {
                            hex.push(c);
                            self.bump();
                        }
                        _ => break,
                    }
                }
                let decoded = u32::from_str_radix(&hex, 16)
                    .ok()
                    .filter(|_| hex.len() == width)
                    .and_then(char::from_u32)
                    .ok_or_else(|| LexerError::InvalidEscape {
                        sequence: format!("\\{}{}", escaped, hex),
                        position,
                    })?;
                text.push(decoded);
            }
            // Unknown escapes are kept verbatim
            other => {
                text.push('\\');
                text.push(other);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn tokens(source: &str) -> Vec<Token> {
        let mut stream = tokenize(source).unwrap();
        let mut out = Vec::new();
        while !stream.is_at_end() {
            out.push(stream.advance().token);
        }
        out
    }

    #[test]
    fn test_arithmetic_expression() {
        assert_eq!(
            tokens("value + 3"),
            vec![Token::Identifier("value".into()), Token::Plus, Token::Int(3)]
        );
    }

    #[test]
    fn test_chained_comparison() {
        assert_eq!(
            tokens("0 < value <= 2.5"),
            vec![
                Token::Int(0),
                Token::Less,
                Token::Identifier("value".into()),
                Token::LessEqual,
                Token::Float(2.5),
            ]
        );
    }

    #[test]
    fn test_two_character_operators() {
        assert_eq!(
            tokens("a ** b // c != d == e >= f"),
            vec![
                Token::Identifier("a".into()),
                Token::DoubleStar,
                Token::Identifier("b".into()),
                Token::DoubleSlash,
                Token::Identifier("c".into()),
                Token::NotEqual,
                Token::Identifier("d".into()),
                Token::EqualEqual,
                Token::Identifier("e".into()),
                Token::GreaterEqual,
                Token::Identifier("f".into()),
            ]
        );
    }

    #[test]
    fn test_strings_and_escapes() {
        assert_eq!(
            tokens(r#"'Hello ' "it's" 'a\tb' 'café' r'\d+'"#),
            vec![
                Token::Str("Hello ".into()),
                Token::Str("it's".into()),
                Token::Str("a\tb".into()),
                Token::Str("café".into()),
                Token::Str("\\d+".into()),
            ]
        );
    }

    #[test]
    fn test_numbers() {
        assert_eq!(
            tokens("1_000 .5 1e3 2E-2"),
            vec![
                Token::Int(1000),
                Token::Float(0.5),
                Token::Float(1000.0),
                Token::Float(0.02),
            ]
        );
    }

    #[test]
    fn test_keywords_and_unicode_names() {
        assert_eq!(
            tokens("not x in y and René is None"),
            vec![
                Token::Not,
                Token::Identifier("x".into()),
                Token::In,
                Token::Identifier("y".into()),
                Token::And,
                Token::Identifier("René".into()),
                Token::Is,
                Token::None,
            ]
        );
    }

    #[test]
    fn test_errors() {
        assert_matches!(
            tokenize("value $ 3"),
            Err(LexerError::InvalidCharacter { character: '$', position }) if position.column == 7
        );
        assert_matches!(
            tokenize("'open"),
            Err(LexerError::UnterminatedString { .. })
        );
        assert_matches!(tokenize("3abc"), Err(LexerError::InvalidNumber { .. }));
        assert_matches!(
            tokenize("99999999999999999999"),
            Err(LexerError::InvalidNumber { .. })
        );
        assert_matches!(tokenize(r"'\x4'"), Err(LexerError::InvalidEscape { .. }));
        assert_matches!(tokenize("a = b"), Err(LexerError::InvalidCharacter { character: '=', .. }));
    }

    #[test]
    fn test_expression_length_limit() {
        let long = "1".repeat(MAX_EXPRESSION_LENGTH + 1);
        assert_matches!(tokenize(&long), Err(LexerError::ExpressionTooLong { .. }));
    }

    #[test]
    fn test_spans() {
        let mut stream = tokenize("ab + 1").unwrap();
        let first = stream.advance();
        assert_eq!(first.span.start.column, 1);
        assert_eq!(first.span.end.column, 3);
        let plus = stream.advance();
        assert_eq!(plus.span.start.offset, 3);
    }
}
