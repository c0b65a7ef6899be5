//! Tokens of the expression language
//!
//! The lexer produces a flat `Vec<SpannedToken>` terminated by `Token::Eof`;
//! `TokenStream` wraps it with the cursor operations the parser needs.

pub mod token;
pub mod token_stream;

pub use token::{keyword_from_str, SpannedToken, Token};
pub use token_stream::TokenStream;
