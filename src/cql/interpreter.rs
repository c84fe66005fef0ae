//! Lowers one concrete pattern (no remaining range quantifiers, just fixed
//! counts) into a flat sequence of `QueryTerm`s, via an exhaustive match over
//! the AST rather than name-based visitor dispatch.

use std::collections::BTreeMap;

use super::ast::AstNode;
use super::lexer::Relation;
use crate::query_term::QueryTerm;

pub fn lower_pattern(pattern: &[AstNode], default_attr: &str) -> Vec<QueryTerm> {
    pattern.iter().flat_map(|node| lower_node(node, default_attr)).collect()
}

fn lower_node(node: &AstNode, default_attr: &str) -> Vec<QueryTerm> {
    match node {
        AstNode::DefaultToken(value) => {
            let mut qt = QueryTerm::default();
            qt.match_.insert(default_attr.to_string(), vec![value.clone()]);
            vec![qt]
        }
        AstNode::EmptyToken => vec![QueryTerm::default()],
        AstNode::AssignAttr { name, relation, value } => {
            let mut qt = QueryTerm::default();
            match relation {
                Relation::Is => {
                    qt.match_.insert(name.clone(), vec![value.clone()]);
                }
                Relation::IsNot => {
                    qt.not_match.insert(name.clone(), vec![value.clone()]);
                }
            }
            vec![qt]
        }
        AstNode::ConjoinAttr(a, b) => {
            let qa = lower_single(a, default_attr);
            let qb = lower_single(b, default_attr);
            vec![conjoin(qa, qb)]
        }
        AstNode::Group(children) => children.iter().flat_map(|c| lower_node(c, default_attr)).collect(),
        AstNode::Quantify(child, range) => {
            let base = lower_node(child, default_attr);
            let mut out = Vec::with_capacity(base.len() * range.min);
            for _ in 0..range.min {
                out.extend(base.iter().cloned());
            }
            out
        }
        AstNode::Label(child, label) => lower_node(child, default_attr)
            .into_iter()
            .map(|mut qt| {
                if !qt.labels.contains(label) {
                    qt.labels.push(label.clone());
                }
                qt
            })
            .collect(),
    }
}

/// `AssignAttr`/`ConjoinAttr` subtrees never contain a `Group`, `Quantify`,
/// or `Label` (the grammar doesn't allow it), so they always lower to
/// exactly one term.
fn lower_single(node: &AstNode, default_attr: &str) -> QueryTerm {
    lower_node(node, default_attr)
        .into_iter()
        .next()
        .expect("attribute expressions lower to exactly one query term")
}

fn conjoin(a: QueryTerm, b: QueryTerm) -> QueryTerm {
    let mut out = QueryTerm::default();
    merge(&mut out.match_, a.match_);
    merge(&mut out.match_, b.match_);
    merge(&mut out.not_match, a.not_match);
    merge(&mut out.not_match, b.not_match);
    out
}

fn merge(target: &mut BTreeMap<String, Vec<String>>, source: BTreeMap<String, Vec<String>>) {
    for (key, values) in source {
        let entry = target.entry(key).or_default();
        for value in values {
            if !entry.contains(&value) {
                entry.push(value);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cql::expander::expand_pattern;
    use crate::cql::lexer::tokenize;
    use crate::cql::parser::parse;

    fn lower_str(src: &str, max_quant: usize, default_attr: &str) -> Vec<Vec<QueryTerm>> {
        let pattern = parse(tokenize(src).unwrap()).unwrap();
        expand_pattern(&pattern, max_quant)
            .iter()
            .map(|concrete| lower_pattern(concrete, default_attr))
            .collect()
    }

    #[test]
    fn default_token_uses_default_attr() {
        let terms = &lower_str("\"dog\"", 6, "word")[0];
        assert_eq!(terms.len(), 1);
        assert_eq!(terms[0].match_.get("word"), Some(&vec!["dog".to_string()]));
    }

    #[test]
    fn conjunction_merges_match_and_not_match() {
        let terms = &lower_str("[word=\"run\" & pos!=\"N\"]", 6, "word")[0];
        assert_eq!(terms.len(), 1);
        assert_eq!(terms[0].match_.get("word"), Some(&vec!["run".to_string()]));
        assert_eq!(terms[0].not_match.get("pos"), Some(&vec!["N".to_string()]));
    }

    #[test]
    fn quantifier_repeats_the_term() {
        let patterns = lower_str("\"b\"{2}", 6, "word");
        assert_eq!(patterns.len(), 1);
        assert_eq!(patterns[0].len(), 2);
    }

    #[test]
    fn label_attaches_to_every_term_it_produces() {
        let terms = &lower_str("n:(\"a\" \"b\")", 6, "word")[0];
        assert_eq!(terms.len(), 2);
        assert!(terms.iter().all(|t| t.labels == vec!["n".to_string()]));
    }
}
