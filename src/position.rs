//! A token's address within the corpus.

/// Identifies a single token by document, sentence, and token index.
///
/// `Ord` follows field declaration order (doc, then sent, then tk), which is
/// exactly document-major order: iterating a sorted `Vec<Position>` visits
/// tokens in the same order they were inserted while building the corpus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
    pub doc: usize,
    pub sent: usize,
    pub tk: usize,
}

impl Position {
    pub fn new(doc: usize, sent: usize, tk: usize) -> Self {
        Self { doc, sent, tk }
    }
}
