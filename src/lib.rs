//! Keyword-in-context concordance engine with a Corpus Query Language front-end.
//!
//! A corpus of tokenized documents is indexed once into an inverted index
//! over `(attribute, value)` pairs. Queries are written in a small
//! regex-like pattern language (see [`cql`]), lowered to flat query terms,
//! and matched against the index to produce [`Kwic`] records.

pub mod config;
pub mod corpus;
pub mod cql;
pub mod engine;
pub mod error;
pub mod kwic;
pub mod matcher;
pub mod position;
pub mod query_term;
pub mod token;

pub use config::CqlConfig;
pub use corpus::IndexedCorpus;
pub use error::{CorpusError, CqlError, LexError, ParseError, QueryError, SchemaError};
pub use kwic::{Kwic, KwicPosition};
pub use position::Position;
pub use query_term::QueryTerm;
pub use token::{Corpus, CorpusToken, TextField};
