//! The flat, AST-free representation the interpreter lowers a pattern into.

use std::collections::BTreeMap;

/// One position in a flattened query: what it must match, what it must not
/// match, and which labels (if any) should capture the token that fills it.
///
/// `match_` and `not_match` are keyed by attribute name; the values under a
/// key are ANDed together, while `not_match` entries are ORed (any one of
/// them matching rejects the token).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryTerm {
    pub match_: BTreeMap<String, Vec<String>>,
    pub not_match: BTreeMap<String, Vec<String>>,
    pub labels: Vec<String>,
}

impl QueryTerm {
    /// True for a term with no constraints at all (an empty token `[]`), which
    /// matches any single token.
    pub fn is_empty(&self) -> bool {
        self.match_.is_empty() && self.not_match.is_empty()
    }
}
