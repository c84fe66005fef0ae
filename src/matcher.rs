//! Value classification (literal vs. regex) and token-level matching.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use log::warn;
use regex::Regex;

use crate::query_term::QueryTerm;
use crate::token::CorpusToken;

const REGEX_META: &str = "[].^$*+{}|()";
const SPECIAL_CLASSES: [&str; 6] = ["\\d", "\\D", "\\s", "\\S", "\\w", "\\W"];

/// A query value, classified once into the mode it's matched with.
pub enum CompiledValue {
    Literal(String),
    Regex { search: Regex, full: Regex },
}

/// A value is treated as a regex if it contains an unescaped metacharacter
/// or one of the two-character escape classes (`\d`, `\w`, ...). Anything
/// else is a literal, with backslashes stripped.
fn looks_like_regex(raw: &str) -> bool {
    let chars: Vec<char> = raw.chars().collect();
    for i in 0..chars.len() {
        if i > 0 {
            let pair: String = chars[i - 1..=i].iter().collect();
            if SPECIAL_CLASSES.contains(&pair.as_str()) {
                return true;
            }
        }
        if REGEX_META.contains(chars[i]) && (i == 0 || chars[i - 1] != '\\') {
            return true;
        }
    }
    false
}

fn strip_backslashes(raw: &str) -> String {
    raw.chars().filter(|&c| c != '\\').collect()
}

/// Classify and compile a query value. A value that looks like a regex but
/// fails to compile is downgraded to a literal instead of aborting the query.
pub fn compile_value(raw: &str) -> CompiledValue {
    if looks_like_regex(raw) {
        let full_pattern = format!("^(?:{raw})$");
        match (Regex::new(raw), Regex::new(&full_pattern)) {
            (Ok(search), Ok(full)) => return CompiledValue::Regex { search, full },
            _ => warn!("value '{raw}' looks like a regex but failed to compile; matching it as a literal"),
        }
    }
    CompiledValue::Literal(strip_backslashes(raw))
}

pub fn value_matches(compiled: &CompiledValue, target: &str) -> bool {
    match compiled {
        CompiledValue::Literal(lit) => lit == target,
        CompiledValue::Regex { full, .. } => full.is_match(target),
    }
}

/// Compiles values lazily and memoizes them for the lifetime of one query,
/// so the same string is never compiled twice across query terms.
#[derive(Default)]
pub struct ValueCache {
    compiled: RefCell<HashMap<String, Rc<CompiledValue>>>,
}

impl ValueCache {
    pub fn get(&self, raw: &str) -> Rc<CompiledValue> {
        if let Some(hit) = self.compiled.borrow().get(raw) {
            return hit.clone();
        }
        let compiled = Rc::new(compile_value(raw));
        self.compiled.borrow_mut().insert(raw.to_string(), compiled.clone());
        compiled
    }
}

/// Whether `token` satisfies `term`: every positive constraint must hold and
/// attribute must be present, and no negative constraint may hold.
pub fn token_matches(term: &QueryTerm, token: &CorpusToken, cache: &ValueCache) -> bool {
    for (attr, values) in &term.match_ {
        let Some(target) = token.get(attr) else {
            return false;
        };
        for value in values {
            if !value_matches(&cache.get(value), target) {
                return false;
            }
        }
    }
    for (attr, values) in &term.not_match {
        if let Some(target) = token.get(attr) {
            for value in values {
                if value_matches(&cache.get(value), target) {
                    return false;
                }
            }
        }
    }
    true
}
