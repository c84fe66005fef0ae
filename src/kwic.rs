//! The result record a search yields: a keyword span in its context, plus
//! whatever labeled capture groups the pattern asked for.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::token::CorpusToken;

#[derive(Debug, Clone, Serialize)]
pub struct KwicPosition {
    pub doc_idx: usize,
    pub sent_idx: usize,
    pub tk_idx: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct Kwic {
    pub left: Vec<CorpusToken>,
    pub keyword: Vec<CorpusToken>,
    pub right: Vec<CorpusToken>,
    pub position: KwicPosition,
    #[serde(rename = "captureGroups")]
    pub capture_groups: BTreeMap<String, Vec<CorpusToken>>,
}
