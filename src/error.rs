//! The error taxonomy shared by every stage of the query pipeline.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LexError {
    #[error("illegal character '{ch}' at position {pos}")]
    UnexpectedChar { ch: char, pos: usize },

    #[error("unterminated quoted string starting at position {pos}")]
    UnterminatedString { pos: usize },

    #[error("unterminated '[' starting at position {pos}")]
    UnterminatedBracket { pos: usize },

    #[error("unterminated '{{' quantifier starting at position {pos}")]
    UnterminatedQuantifier { pos: usize },

    #[error("malformed quantifier at position {pos}")]
    MalformedQuantifier { pos: usize },

    #[error("empty attribute value at position {pos}")]
    EmptyAttrValue { pos: usize },
}

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("unexpected {found}, expected {expected}")]
    UnexpectedToken { found: String, expected: &'static str },

    #[error("unexpected end of query, expected {expected}")]
    UnexpectedEnd { expected: &'static str },
}

#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("invalid token shape: {0}")]
    InvalidTokenShape(&'static str),
}

#[derive(Debug, Error)]
pub enum CorpusError {
    #[error("document index {0} out of range")]
    DocOutOfRange(usize),

    #[error("sentence index {sent} out of range in document {doc}")]
    SentOutOfRange { doc: usize, sent: usize },

    #[error("token index {tk} out of range in document {doc}, sentence {sent}")]
    TokenOutOfRange { doc: usize, sent: usize, tk: usize },
}

#[derive(Debug, Error)]
pub enum QueryError {
    #[error("max_quant must be at least 1, got {max_quant}")]
    MaxQuantTooSmall { max_quant: usize },
}

/// The aggregate error type returned by every public entry point in this crate.
#[derive(Debug, Error)]
pub enum CqlError {
    #[error(transparent)]
    Lex(#[from] LexError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error(transparent)]
    Corpus(#[from] CorpusError),

    #[error(transparent)]
    Query(#[from] QueryError),
}
