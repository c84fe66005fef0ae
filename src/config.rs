//! Knobs threaded explicitly through corpus construction and search, rather
//! than read from a global. There is no ambient state in this crate: two
//! `IndexedCorpus` instances built with different configs behave independently.

/// Parameters governing how a corpus is indexed and how its queries are lowered.
#[derive(Debug, Clone)]
pub struct CqlConfig {
    /// Attribute name a bare quoted token (e.g. `"dog"`) is matched against.
    pub default_attr: String,
    /// Upper bound substituted for an unbounded quantifier (`+`, `*`, `{n,}`).
    pub max_quant: usize,
}

impl Default for CqlConfig {
    fn default() -> Self {
        Self {
            default_attr: "word".to_string(),
            max_quant: 6,
        }
    }
}

/// Default left/right context window used by callers that don't care to tune it.
pub const DEFAULT_LEFT: usize = 5;
pub const DEFAULT_RIGHT: usize = 5;
