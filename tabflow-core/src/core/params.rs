//! Loosely-typed transform parameters with lenient accessors.
//!
//! Node parameters arrive as arbitrary JSON from the pipeline editor. The
//! accessors here implement the engine's defaulting policy: absence or a
//! type mismatch yields the caller's default, never an error, so a malformed
//! parameter degrades to the closest sensible behavior instead of failing
//! the node.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A node's parameter map.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Params(Map<String, Value>);

impl Params {
    /// Create an empty parameter map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw access to a parameter value.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Set a parameter, replacing any previous value.
    pub fn insert(&mut self, key: impl Into<String>, value: Value) {
        self.0.insert(key.into(), value);
    }

    /// Integer parameter, or `default` when absent or not a number.
    ///
    /// Floats truncate toward zero.
    pub fn int_or(&self, key: &str, default: i64) -> i64 {
        match self.0.get(key) {
            Some(Value::Number(n)) => n
                .as_i64()
                .or_else(|| n.as_f64().map(|f| f as i64))
                .unwrap_or(default),
            _ => default,
        }
    }

    /// String parameter, or `default` when absent or not a string.
    pub fn str_or<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        match self.0.get(key) {
            Some(Value::String(s)) => s.as_str(),
            _ => default,
        }
    }

    /// Number of parameters.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the map is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Map<String, Value>> for Params {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl From<Value> for Params {
    /// A JSON object becomes its entries; any other value becomes an empty
    /// map.
    fn from(value: Value) -> Self {
        match value {
            Value::Object(map) => Self(map),
            _ => Self::default(),
        }
    }
}
