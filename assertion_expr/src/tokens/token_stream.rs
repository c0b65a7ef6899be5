use super::token::{SpannedToken, Token};
use crate::utils::Span;

/// Cursor over lexed tokens; always ends with `Token::Eof`
#[derive(Debug, Clone)]
pub struct TokenStream {
    tokens: Vec<SpannedToken>,
    position: usize,
}

impl TokenStream {
    pub fn new(mut tokens: Vec<SpannedToken>) -> Self {
        if !matches!(tokens.last(), Some(t) if t.token == Token::Eof) {
            let end = tokens.last().map(|t| t.span.end).unwrap_or_default();
            tokens.push(SpannedToken::new(Token::Eof, Span::new(end, end)));
        }
        Self {
            tokens,
            position: 0,
        }
    }

    pub fn current(&self) -> &SpannedToken {
        // The constructor guarantees a trailing Eof, and advance() never moves past it
        &self.tokens[self.position.min(self.tokens.len() - 1)]
    }

    pub fn current_token(&self) -> &Token {
        &self.current().token
    }

    pub fn current_span(&self) -> Span {
        self.current().span
    }

    /// Token after the current one
    pub fn peek(&self) -> &Token {
        self.tokens
            .get(self.position + 1)
            .map(|t| &t.token)
            .unwrap_or(&Token::Eof)
    }

    pub fn advance(&mut self) -> SpannedToken {
        let token = self.current().clone();
        if self.position < self.tokens.len() - 1 {
            self.position += 1;
        }
        token
    }

    pub fn check(&self, token: &Token) -> bool {
        self.current_token() == token
    }

    /// Consume the current token when it equals `token`
    pub fn eat(&mut self, token: &Token) -> bool {
        if self.check(token) {
            self.advance();
            true
        } else {
            false
        }
    }

    pub fn is_at_end(&self) -> bool {
        self.check(&Token::Eof)
    }

    pub fn position(&self) -> usize {
        self.position
    }

    /// Number of tokens, excluding Eof
    pub fn len(&self) -> usize {
        self.tokens.len() - 1
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
