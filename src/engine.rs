//! Selectivity-driven candidate search: pick the most selective query term's
//! postings as seeds, verify each candidate alignment against the raw
//! corpus, and emit KWIC records.

use std::collections::BTreeMap;
use std::collections::BTreeSet;

use log::debug;

use crate::corpus::IndexedCorpus;
use crate::cql::{expander, interpreter, lexer, parser};
use crate::error::CqlError;
use crate::kwic::{Kwic, KwicPosition};
use crate::matcher::{token_matches, CompiledValue, ValueCache};
use crate::position::Position;
use crate::query_term::QueryTerm;
use crate::token::CorpusToken;

pub struct MatchEngine<'c> {
    corpus: &'c IndexedCorpus,
}

impl<'c> MatchEngine<'c> {
    pub fn new(corpus: &'c IndexedCorpus) -> Self {
        Self { corpus }
    }

    pub fn search(&self, pattern: &[QueryTerm], left: usize, right: usize, cache: &ValueCache) -> Vec<Kwic> {
        let n = pattern.len();
        if n == 0 {
            return Vec::new();
        }

        let Some((seed_idx, seed_set)) = self.select_seed(pattern, cache) else {
            return Vec::new();
        };
        debug!("seed term {seed_idx} of {n} yields {} candidate position(s)", seed_set.len());

        let mut results = Vec::new();
        for seed_pos in &seed_set {
            if seed_idx > seed_pos.tk {
                continue;
            }
            let start_tk = seed_pos.tk - seed_idx;
            let Ok(sent_len) = self.corpus.sentence_len(seed_pos.doc, seed_pos.sent) else {
                continue;
            };
            if start_tk + n > sent_len {
                continue;
            }

            let mut matched = true;
            for (j, term) in pattern.iter().enumerate() {
                let tok = self
                    .corpus
                    .token(seed_pos.doc, seed_pos.sent, start_tk + j)
                    .expect("bounds already checked against sentence length");
                if !token_matches(term, tok, cache) {
                    matched = false;
                    break;
                }
            }
            if matched {
                results.push(self.emit(seed_pos.doc, seed_pos.sent, start_tk, pattern, left, right));
            }
        }
        results
    }

    /// Picks the query term whose postings set is smallest (ties broken by
    /// lowest index), and returns `None` if any non-empty term has no
    /// postings at all (making the whole pattern unsatisfiable).
    fn select_seed(&self, pattern: &[QueryTerm], cache: &ValueCache) -> Option<(usize, Vec<Position>)> {
        let mut best: Option<(usize, Vec<Position>)> = None;
        for (i, term) in pattern.iter().enumerate() {
            let postings = self.term_postings(term, cache);
            if !term.is_empty() && postings.is_empty() {
                return None;
            }
            best = match best {
                None => Some((i, postings)),
                Some((bi, bp)) if postings.len() < bp.len() => Some((i, postings)),
                some => some,
            };
        }
        best
    }

    fn term_postings(&self, term: &QueryTerm, cache: &ValueCache) -> Vec<Position> {
        if term.is_empty() {
            return self.corpus.all_positions().to_vec();
        }

        let positives: BTreeSet<Position> = if term.match_.is_empty() {
            self.corpus.all_positions().iter().copied().collect()
        } else {
            let mut sets = term.match_.iter().map(|(attr, values)| self.union_postings(attr, values, cache));
            let first = sets.next().unwrap_or_default();
            sets.fold(first, |acc, set| acc.intersection(&set).copied().collect())
        };

        let mut negatives = BTreeSet::new();
        for (attr, values) in &term.not_match {
            negatives.extend(self.union_postings(attr, values, cache));
        }

        positives.difference(&negatives).copied().collect()
    }

    fn union_postings(&self, attr: &str, values: &[String], cache: &ValueCache) -> BTreeSet<Position> {
        let mut set = BTreeSet::new();
        for value in values {
            match &*cache.get(value) {
                CompiledValue::Literal(literal) => set.extend(self.corpus.literal_postings(attr, literal).iter().copied()),
                CompiledValue::Regex { search, .. } => set.extend(self.corpus.regex_postings(attr, search)),
            }
        }
        set
    }

    fn emit(&self, doc: usize, sent: usize, start_tk: usize, pattern: &[QueryTerm], left: usize, right: usize) -> Kwic {
        let flat = self.corpus.flatten_document(doc).expect("document already validated by caller");
        let kw_start = self
            .corpus
            .flat_token_index(doc, sent, start_tk)
            .expect("position already validated by caller");
        let kw_end = kw_start + pattern.len();
        let left_start = kw_start.saturating_sub(left);
        let right_end = (kw_end + right).min(flat.len());

        let keyword: Vec<CorpusToken> = flat[kw_start..kw_end].iter().map(|t| (*t).clone()).collect();
        let left_tokens = flat[left_start..kw_start].iter().map(|t| (*t).clone()).collect();
        let right_tokens = flat[kw_end..right_end].iter().map(|t| (*t).clone()).collect();

        let mut capture_groups: BTreeMap<String, Vec<CorpusToken>> = BTreeMap::new();
        for (j, term) in pattern.iter().enumerate() {
            for label in &term.labels {
                capture_groups.entry(label.clone()).or_default().push(keyword[j].clone());
            }
        }

        Kwic {
            left: left_tokens,
            keyword,
            right: right_tokens,
            position: KwicPosition { doc_idx: doc, sent_idx: sent, tk_idx: start_tk },
            capture_groups,
        }
    }
}

impl IndexedCorpus {
    /// Runs a CQL query end to end: lex, parse, expand quantifiers, lower
    /// each concrete pattern, and search it against the index. Results from
    /// distinct concrete patterns are concatenated in expansion order.
    pub fn search(&self, cql: &str, left: usize, right: usize) -> Result<impl Iterator<Item = Kwic> + '_, CqlError> {
        let tokens = lexer::tokenize(cql)?;
        let pattern = parser::parse(tokens)?;
        let concrete = expander::expand_pattern(&pattern, self.config().max_quant);
        let default_attr = self.config().default_attr.clone();
        let cache = ValueCache::default();
        let engine = MatchEngine::new(self);

        Ok(concrete.into_iter().flat_map(move |concrete_pattern| {
            let terms = interpreter::lower_pattern(&concrete_pattern, &default_attr);
            engine.search(&terms, left, right, &cache).into_iter()
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CqlConfig;
    use crate::token::{Corpus, TextField};
    use serde_json::json;

    fn build(doc: serde_json::Value) -> IndexedCorpus {
        let corpus = Corpus { documents: vec![doc], text_field: TextField::Bare };
        IndexedCorpus::build(corpus, CqlConfig::default()).unwrap()
    }

    #[test]
    fn harvested_candidates_are_a_superset_of_verified_matches() {
        // "b.*" harvests every token whose value contains "b" anywhere (search,
        // unanchored), but only full matches survive verification.
        let corpus = build(json!([[{"word": "ab"}, {"word": "ba"}, {"word": "bb"}]]));
        let engine = MatchEngine::new(&corpus);
        let cache = ValueCache::default();
        let mut term = QueryTerm::default();
        term.match_.insert("word".to_string(), vec!["b.*".to_string()]);
        let harvested = engine.term_postings(&term, &cache);
        let verified = engine.search(std::slice::from_ref(&term), 0, 0, &cache);
        assert!(verified.len() <= harvested.len());
        assert_eq!(verified.len(), 2); // "ba" and "bb" match ^(?:b.*)$, "ab" does not
    }
}
