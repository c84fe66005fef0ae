//! The syntax tree produced by the parser and consumed by the expander and
//! interpreter. A single tagged enum, rather than one type per node kind:
//! every variant here is a leaf the interpreter matches on directly.

use super::lexer::{QuantMax, Relation};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuantRange {
    pub min: usize,
    pub max: QuantMax,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AstNode {
    AssignAttr { name: String, relation: Relation, value: String },
    ConjoinAttr(Box<AstNode>, Box<AstNode>),
    DefaultToken(String),
    EmptyToken,
    /// A parenthesized, unquantified, unlabeled sequence of word groups.
    Group(Vec<AstNode>),
    Quantify(Box<AstNode>, QuantRange),
    Label(Box<AstNode>, String),
}
