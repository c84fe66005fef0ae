//! Rewrites a single parametric pattern into the finite set of concrete
//! patterns obtained by choosing one value from each quantifier's range.
//!
//! Quantifier nodes are not removed here: each alternative keeps a `Quantify`
//! node with a fixed count, and the interpreter is the one that actually
//! flattens it into repeated query terms. This mirrors the reference
//! implementation, where quantifier expansion narrows a range down to a
//! single integer and leaves the repetition itself to the later lowering
//! pass.

use super::ast::{AstNode, QuantRange};
use super::lexer::QuantMax;

/// Enumerates every concrete pattern, in Cartesian-product order across all
/// quantifier sites, with structural duplicates suppressed.
pub fn expand_pattern(pattern: &[AstNode], max_quant: usize) -> Vec<Vec<AstNode>> {
    let mut seen: Vec<Vec<AstNode>> = Vec::new();
    for alt in cartesian(pattern, max_quant) {
        if !seen.contains(&alt) {
            seen.push(alt);
        }
    }
    seen
}

fn cartesian(nodes: &[AstNode], max_quant: usize) -> Vec<Vec<AstNode>> {
    let mut acc: Vec<Vec<AstNode>> = vec![Vec::new()];
    for node in nodes {
        let alts = expand_node(node, max_quant);
        let mut next = Vec::with_capacity(acc.len() * alts.len().max(1));
        for prefix in &acc {
            for alt in &alts {
                let mut combined = prefix.clone();
                combined.push(alt.clone());
                next.push(combined);
            }
        }
        acc = next;
    }
    acc
}

/// Alternative single-node replacements for `node`. A leaf has exactly one
/// alternative (itself); a `Quantify` fans out over every admissible count;
/// a `Group` fans out over the Cartesian product of its children.
fn expand_node(node: &AstNode, max_quant: usize) -> Vec<AstNode> {
    match node {
        AstNode::Quantify(child, range) => {
            let max = match range.max {
                QuantMax::Bounded(m) => m,
                QuantMax::Unbounded => max_quant,
            };
            let mut out = Vec::new();
            for n in range.min..=max {
                for child_alt in expand_node(child, max_quant) {
                    out.push(AstNode::Quantify(Box::new(child_alt), QuantRange { min: n, max: QuantMax::Bounded(n) }));
                }
            }
            out
        }
        AstNode::Group(children) => cartesian(children, max_quant).into_iter().map(AstNode::Group).collect(),
        AstNode::Label(child, label) => expand_node(child, max_quant)
            .into_iter()
            .map(|c| AstNode::Label(Box::new(c), label.clone()))
            .collect(),
        leaf => vec![leaf.clone()],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cql::lexer::tokenize;
    use crate::cql::parser::parse;

    fn expand_str(src: &str, max_quant: usize) -> Vec<Vec<AstNode>> {
        let pattern = parse(tokenize(src).unwrap()).unwrap();
        expand_pattern(&pattern, max_quant)
    }

    #[test]
    fn fixed_quantifier_produces_one_pattern() {
        let patterns = expand_str("\"a\" \"b\"{2} \"c\"", 6);
        assert_eq!(patterns.len(), 1);
    }

    #[test]
    fn ranged_quantifier_produces_one_pattern_per_count() {
        let patterns = expand_str("\"a\" \"b\"{1,3} \"c\"", 6);
        assert_eq!(patterns.len(), 3);
    }

    #[test]
    fn star_is_bounded_by_max_quant() {
        let patterns = expand_str("\"a\"*", 4);
        assert_eq!(patterns.len(), 5); // 0..=4
    }

    #[test]
    fn duplicate_expansions_are_suppressed() {
        let patterns = expand_str("\"a\"{2,2}", 6);
        assert_eq!(patterns.len(), 1);
    }
}
