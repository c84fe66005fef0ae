//! The three-level inverted index over (attribute, value) -> positions, built
//! once at load time and never mutated afterward.

use std::collections::{BTreeMap, BTreeSet};

use regex::Regex;

use crate::config::CqlConfig;
use crate::error::{CorpusError, CqlError, QueryError, SchemaError};
use crate::position::Position;
use crate::token::{normalize_token, Corpus, CorpusToken};

#[derive(Debug)]
pub struct IndexedCorpus {
    documents: Vec<Vec<Vec<CorpusToken>>>,
    index: BTreeMap<String, BTreeMap<String, Vec<Position>>>,
    all_positions: Vec<Position>,
    schema: Vec<String>,
    config: CqlConfig,
}

impl IndexedCorpus {
    /// Normalizes every token, derives the schema from the first token seen,
    /// and builds the inverted index in one pass. The first token's attribute
    /// keys become the indexable schema; later tokens may carry a superset of
    /// attributes, but only schema attributes are indexed.
    pub fn build(corpus: Corpus, config: CqlConfig) -> Result<Self, CqlError> {
        if config.max_quant < 1 {
            return Err(QueryError::MaxQuantTooSmall { max_quant: config.max_quant }.into());
        }

        let mut documents = Vec::with_capacity(corpus.documents.len());
        let mut index: BTreeMap<String, BTreeMap<String, Vec<Position>>> = BTreeMap::new();
        let mut all_positions = Vec::new();
        let mut schema: Option<Vec<String>> = None;

        for (doc_idx, doc) in corpus.documents.iter().enumerate() {
            let sentences = corpus.sentences_of(doc)?;
            let mut doc_sents = Vec::with_capacity(sentences.len());
            for (sent_idx, sent) in sentences.iter().enumerate() {
                let raw_tokens = sent
                    .as_array()
                    .ok_or(SchemaError::InvalidTokenShape("sentence must be an array of tokens"))?;
                let mut sent_tokens = Vec::with_capacity(raw_tokens.len());
                for (tk_idx, raw_tok) in raw_tokens.iter().enumerate() {
                    let token = normalize_token(raw_tok)?;
                    let schema_attrs = schema.get_or_insert_with(|| token.attrs.keys().cloned().collect());
                    let position = Position::new(doc_idx, sent_idx, tk_idx);
                    for attr in schema_attrs.iter() {
                        if let Some(value) = token.attrs.get(attr) {
                            index
                                .entry(attr.clone())
                                .or_default()
                                .entry(value.clone())
                                .or_default()
                                .push(position);
                        }
                    }
                    all_positions.push(position);
                    sent_tokens.push(token);
                }
                doc_sents.push(sent_tokens);
            }
            documents.push(doc_sents);
        }

        Ok(Self {
            documents,
            index,
            all_positions,
            schema: schema.unwrap_or_default(),
            config,
        })
    }

    pub fn schema(&self) -> &[String] {
        &self.schema
    }

    pub fn config(&self) -> &CqlConfig {
        &self.config
    }

    pub fn all_positions(&self) -> &[Position] {
        &self.all_positions
    }

    pub fn document(&self, doc: usize) -> Result<&[Vec<CorpusToken>], CorpusError> {
        self.documents.get(doc).map(|d| d.as_slice()).ok_or(CorpusError::DocOutOfRange(doc))
    }

    pub fn sentence(&self, doc: usize, sent: usize) -> Result<&[CorpusToken], CorpusError> {
        let d = self.document(doc)?;
        d.get(sent).map(|s| s.as_slice()).ok_or(CorpusError::SentOutOfRange { doc, sent })
    }

    pub fn token(&self, doc: usize, sent: usize, tk: usize) -> Result<&CorpusToken, CorpusError> {
        let s = self.sentence(doc, sent)?;
        s.get(tk).ok_or(CorpusError::TokenOutOfRange { doc, sent, tk })
    }

    pub fn sentence_len(&self, doc: usize, sent: usize) -> Result<usize, CorpusError> {
        Ok(self.sentence(doc, sent)?.len())
    }

    /// Index of `(doc, sent, tk)` within the document's sentences flattened
    /// end to end. Used to compute left/right context across sentence
    /// boundaries.
    pub fn flat_token_index(&self, doc: usize, sent: usize, tk: usize) -> Result<usize, CorpusError> {
        let d = self.document(doc)?;
        if sent >= d.len() {
            return Err(CorpusError::SentOutOfRange { doc, sent });
        }
        let mut idx = tk;
        for s in &d[..sent] {
            idx += s.len();
        }
        Ok(idx)
    }

    pub fn flatten_document(&self, doc: usize) -> Result<Vec<&CorpusToken>, CorpusError> {
        let d = self.document(doc)?;
        Ok(d.iter().flatten().collect())
    }

    /// Exact-match postings for `attr == value`. Empty if either is unknown.
    pub fn literal_postings(&self, attr: &str, value: &str) -> &[Position] {
        self.index.get(attr).and_then(|m| m.get(value)).map(|v| v.as_slice()).unwrap_or(&[])
    }

    /// Union of postings for every stored value under `attr` whose text
    /// matches `re` (unanchored search, used for index harvesting).
    pub fn regex_postings(&self, attr: &str, re: &Regex) -> Vec<Position> {
        let Some(values) = self.index.get(attr) else {
            return Vec::new();
        };
        let mut set = BTreeSet::new();
        for (val, postings) in values {
            if re.is_match(val) {
                set.extend(postings.iter().copied());
            }
        }
        set.into_iter().collect()
    }
}
