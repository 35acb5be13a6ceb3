//! Unique key coercion and the per-call result cache
//!
//! Only strings and numbers are accepted as unique keys. Numbers key by their
//! shortest decimal rendering, so `1`, `1.0` and `"1"` all share a key.

use serde_json::{Number, Value};
use std::collections::HashMap;

/// Coerce a read value to its unique key, or name the offending value kind
pub(crate) fn unique_key(value: Option<&Value>) -> Result<String, &'static str> {
    match value {
        Some(Value::String(s)) => Ok(s.clone()),
        Some(Value::Number(n)) => Ok(number_key(n)),
        Some(Value::Null) => Err("null"),
        Some(Value::Bool(_)) => Err("boolean"),
        Some(Value::Array(_)) => Err("array"),
        Some(Value::Object(_)) => Err("object"),
        None => Err("undefined"),
    }
}

fn number_key(n: &Number) -> String {
    if let Some(i) = n.as_i64() {
        return i.to_string();
    }
    if let Some(u) = n.as_u64() {
        return u.to_string();
    }
    match n.as_f64() {
        // -0 and 0 are the same key
        Some(f) if f == 0.0 => "0".to_string(),
        Some(f) => f.to_string(),
        None => n.to_string(),
    }
}

/// Results already computed in one populate call, keyed by unique key
#[derive(Debug, Default)]
pub(crate) struct UniqueCache {
    results: HashMap<String, Value>,
    hits: usize,
}

impl UniqueCache {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Cached result for `key`, counting the hit
    pub(crate) fn lookup(&mut self, key: &str) -> Option<Value> {
        let hit = self.results.get(key).cloned();
        if hit.is_some() {
            self.hits += 1;
        }
        hit
    }

    pub(crate) fn store(&mut self, key: String, value: Value) {
        self.results.insert(key, value);
    }

    /// Number of distinct keys computed
    pub(crate) fn len(&self) -> usize {
        self.results.len()
    }

    /// Number of lookups served from the cache
    pub(crate) fn hits(&self) -> usize {
        self.hits
    }
}
