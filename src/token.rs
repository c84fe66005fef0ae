//! The corpus token model: normalization of the three accepted shapes a raw
//! token may arrive in, plus the document/sentence container types.

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;

use crate::error::SchemaError;

/// A token normalized to a flat attribute map. A bare string becomes `{word: s}`,
/// an array becomes `{"0": v0, "1": v1, ...}`, and an object is carried through
/// as-is (with every value required to be a string). Attributes keep the order
/// they were first seen in, so `IndexedCorpus::schema` reflects document order
/// rather than an alphabetical resort.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct CorpusToken {
    pub attrs: IndexMap<String, String>,
}

impl CorpusToken {
    pub fn get(&self, attr: &str) -> Option<&str> {
        self.attrs.get(attr).map(|s| s.as_str())
    }
}

pub fn normalize_token(raw: &Value) -> Result<CorpusToken, SchemaError> {
    let attrs = match raw {
        Value::String(s) => {
            let mut m = IndexMap::new();
            m.insert("word".to_string(), s.clone());
            m
        }
        Value::Array(items) => {
            let mut m = IndexMap::new();
            for (i, item) in items.iter().enumerate() {
                let s = item
                    .as_str()
                    .ok_or(SchemaError::InvalidTokenShape("array token element must be a string"))?;
                m.insert(i.to_string(), s.to_string());
            }
            m
        }
        Value::Object(map) => {
            let mut m = IndexMap::new();
            for (k, v) in map {
                let s = v
                    .as_str()
                    .ok_or(SchemaError::InvalidTokenShape("object token value must be a string"))?;
                m.insert(k.clone(), s.to_string());
            }
            m
        }
        _ => return Err(SchemaError::InvalidTokenShape("token must be a string, array, or object")),
    };
    Ok(CorpusToken { attrs })
}

/// Where to find the sentence/token data within each document.
#[derive(Debug, Clone)]
pub enum TextField {
    /// Documents are mappings; sentences live under this key.
    Named(String),
    /// Documents are themselves the bare sequence of sentences.
    Bare,
}

/// The raw, not-yet-indexed corpus: a sequence of documents plus the shape
/// describing where each document's sentences live.
#[derive(Debug, Clone)]
pub struct Corpus {
    pub documents: Vec<Value>,
    pub text_field: TextField,
}

impl Corpus {
    pub(crate) fn sentences_of<'a>(&self, doc: &'a Value) -> Result<&'a [Value], SchemaError> {
        let field = match &self.text_field {
            TextField::Named(name) => doc
                .get(name)
                .ok_or(SchemaError::InvalidTokenShape("document is missing its text field"))?,
            TextField::Bare => doc,
        };
        field
            .as_array()
            .map(|v| v.as_slice())
            .ok_or(SchemaError::InvalidTokenShape("text field must be an array of sentences"))
    }
}
