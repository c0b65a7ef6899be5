//! Lexical analysis of expression text

pub mod analyzer;

pub use analyzer::{tokenize, LexerError};
