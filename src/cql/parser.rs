//! Recursive-descent parser over the lexer's token stream.
//!
//! ```text
//! Pattern    = { WordGroup }
//! WordGroup  = [ TOKEN_LABEL ] ( Group | Word )
//! Group      = LPAREN { WordGroup } RPAREN [ TOKEN_QUANTIFIER ]
//! Word       = ( DEFAULT_TOKEN | EMPTY_TOKEN | AttrExpr ) [ TOKEN_QUANTIFIER ]
//! AttrExpr   = AttrPair { ATTR_AND AttrPair }
//! AttrPair   = ATTR_NAME ATTR_RELATION ATTR_VALUE
//! ```
//!
//! Unlike the reference implementation this never aborts the process on a
//! syntax error; every failure is a typed `ParseError` propagated to the caller.

use std::iter::Peekable;
use std::vec::IntoIter;

use log::trace;

use super::ast::{AstNode, QuantRange};
use super::lexer::{CqlToken, Relation};
use crate::error::ParseError;

struct Parser {
    tokens: Peekable<IntoIter<CqlToken>>,
}

pub fn parse(tokens: Vec<CqlToken>) -> Result<Vec<AstNode>, ParseError> {
    trace!("parsing {} tokens", tokens.len());
    let mut parser = Parser { tokens: tokens.into_iter().peekable() };
    let pattern = parser.parse_pattern()?;
    if let Some(tok) = parser.tokens.next() {
        return Err(ParseError::UnexpectedToken { found: describe(&tok), expected: "end of query" });
    }
    trace!("parsed pattern: {pattern:?}");
    Ok(pattern)
}

fn describe(tok: &CqlToken) -> String {
    format!("{tok:?}")
}

impl Parser {
    fn parse_pattern(&mut self) -> Result<Vec<AstNode>, ParseError> {
        let mut nodes = Vec::new();
        while matches!(self.tokens.peek(), Some(tok) if !matches!(tok, CqlToken::RParen)) {
            nodes.push(self.parse_word_group()?);
        }
        Ok(nodes)
    }

    fn parse_word_group(&mut self) -> Result<AstNode, ParseError> {
        trace!("parse_word_group: next = {:?}", self.tokens.peek());
        let label = match self.tokens.peek() {
            Some(CqlToken::TokenLabel(_)) => {
                let Some(CqlToken::TokenLabel(name)) = self.tokens.next() else {
                    unreachable!()
                };
                Some(name)
            }
            _ => None,
        };

        let node = match self.tokens.peek() {
            Some(CqlToken::LParen) => self.parse_group()?,
            Some(_) => self.parse_word()?,
            None => return Err(ParseError::UnexpectedEnd { expected: "a token or group" }),
        };

        Ok(match label {
            Some(name) => AstNode::Label(Box::new(node), name),
            None => node,
        })
    }

    fn parse_group(&mut self) -> Result<AstNode, ParseError> {
        self.expect_lparen()?;
        let mut nodes = Vec::new();
        while !matches!(self.tokens.peek(), Some(CqlToken::RParen) | None) {
            nodes.push(self.parse_word_group()?);
        }
        self.expect_rparen()?;

        let group = AstNode::Group(nodes);
        match self.tokens.peek() {
            Some(CqlToken::TokenQuantifier(..)) => {
                let Some(CqlToken::TokenQuantifier(min, max)) = self.tokens.next() else {
                    unreachable!()
                };
                Ok(AstNode::Quantify(Box::new(group), QuantRange { min, max }))
            }
            _ => Ok(group),
        }
    }

    fn parse_word(&mut self) -> Result<AstNode, ParseError> {
        let node = match self.tokens.next() {
            Some(CqlToken::DefaultToken(s)) => AstNode::DefaultToken(s),
            Some(CqlToken::EmptyToken) => AstNode::EmptyToken,
            Some(CqlToken::AttrName(name)) => self.parse_attr_expr(name)?,
            Some(other) => {
                return Err(ParseError::UnexpectedToken {
                    found: describe(&other),
                    expected: "a token, attribute, or empty token",
                })
            }
            None => return Err(ParseError::UnexpectedEnd { expected: "a word" }),
        };

        match self.tokens.peek() {
            Some(CqlToken::TokenQuantifier(..)) => {
                let Some(CqlToken::TokenQuantifier(min, max)) = self.tokens.next() else {
                    unreachable!()
                };
                Ok(AstNode::Quantify(Box::new(node), QuantRange { min, max }))
            }
            _ => Ok(node),
        }
    }

    fn parse_attr_expr(&mut self, first_name: String) -> Result<AstNode, ParseError> {
        let mut node = self.parse_attr_pair_tail(first_name)?;
        while matches!(self.tokens.peek(), Some(CqlToken::AttrAnd)) {
            self.tokens.next();
            let name = self.expect_attr_name()?;
            let rhs = self.parse_attr_pair_tail(name)?;
            node = AstNode::ConjoinAttr(Box::new(node), Box::new(rhs));
        }
        Ok(node)
    }

    fn parse_attr_pair_tail(&mut self, name: String) -> Result<AstNode, ParseError> {
        let relation = self.expect_relation()?;
        let value = self.expect_attr_value()?;
        Ok(AstNode::AssignAttr { name, relation, value })
    }

    fn expect_lparen(&mut self) -> Result<(), ParseError> {
        match self.tokens.next() {
            Some(CqlToken::LParen) => Ok(()),
            Some(other) => Err(ParseError::UnexpectedToken { found: describe(&other), expected: "'('" }),
            None => Err(ParseError::UnexpectedEnd { expected: "'('" }),
        }
    }

    fn expect_rparen(&mut self) -> Result<(), ParseError> {
        match self.tokens.next() {
            Some(CqlToken::RParen) => Ok(()),
            Some(other) => Err(ParseError::UnexpectedToken { found: describe(&other), expected: "')'" }),
            None => Err(ParseError::UnexpectedEnd { expected: "')'" }),
        }
    }

    fn expect_attr_name(&mut self) -> Result<String, ParseError> {
        match self.tokens.next() {
            Some(CqlToken::AttrName(name)) => Ok(name),
            Some(other) => Err(ParseError::UnexpectedToken { found: describe(&other), expected: "an attribute name" }),
            None => Err(ParseError::UnexpectedEnd { expected: "an attribute name" }),
        }
    }

    fn expect_relation(&mut self) -> Result<Relation, ParseError> {
        match self.tokens.next() {
            Some(CqlToken::AttrRelation(rel)) => Ok(rel),
            Some(other) => Err(ParseError::UnexpectedToken { found: describe(&other), expected: "'=' or '!='" }),
            None => Err(ParseError::UnexpectedEnd { expected: "'=' or '!='" }),
        }
    }

    fn expect_attr_value(&mut self) -> Result<String, ParseError> {
        match self.tokens.next() {
            Some(CqlToken::AttrValue(value)) => Ok(value),
            Some(other) => {
                Err(ParseError::UnexpectedToken { found: describe(&other), expected: "a quoted attribute value" })
            }
            None => Err(ParseError::UnexpectedEnd { expected: "a quoted attribute value" }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cql::lexer::tokenize;

    fn parse_str(src: &str) -> Vec<AstNode> {
        parse(tokenize(src).unwrap()).unwrap()
    }

    #[test]
    fn parses_a_bare_word() {
        let pattern = parse_str("\"dog\"");
        assert_eq!(pattern, vec![AstNode::DefaultToken("dog".to_string())]);
    }

    #[test]
    fn parses_conjoined_attributes() {
        let pattern = parse_str("[word=\"run\" & pos!=\"N\"]");
        assert_eq!(pattern.len(), 1);
        assert!(matches!(pattern[0], AstNode::ConjoinAttr(..)));
    }

    #[test]
    fn parses_quantified_group() {
        let pattern = parse_str("(\"a\" \"b\"){2}");
        assert_eq!(pattern.len(), 1);
        match &pattern[0] {
            AstNode::Quantify(child, range) => {
                assert_eq!(range.min, 2);
                assert!(matches!(**child, AstNode::Group(_)));
            }
            other => panic!("expected Quantify, got {other:?}"),
        }
    }

    #[test]
    fn parses_label() {
        let pattern = parse_str("n:[pos=\"N\"]");
        assert_eq!(pattern.len(), 1);
        assert!(matches!(pattern[0], AstNode::Label(_, ref label) if label == "n"));
    }

    #[test]
    fn rejects_unclosed_group() {
        let tokens = tokenize("(\"a\" \"b\"").unwrap();
        assert!(parse(tokens).is_err());
    }

    #[test]
    fn rejects_dangling_label() {
        let tokens = tokenize("n:").unwrap();
        assert!(parse(tokens).is_err());
    }

    #[test]
    fn rejects_trailing_tokens() {
        let tokens = tokenize("\"a\")").unwrap();
        assert!(parse(tokens).is_err());
    }
}
