//! The in-memory tabular value model.
//!
//! A [`Table`] is an ordered sequence of rows plus an advisory column list.
//! Rows are insertion-ordered maps from column name to a JSON scalar; rows in
//! the same table may carry different key sets (sparse rows are legal, an
//! absent key reads as null). The column list is the declared schema for
//! consumers and is not enforced per-row.

use std::borrow::Cow;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A single row: column name to scalar value, in insertion order.
pub type Row = IndexMap<String, Value>;

/// An ordered rowset with a declared column list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Table {
    /// Declared column names, advisory for consumers.
    pub columns: Vec<String>,
    /// The rows, in creation/insertion order.
    pub rows: Vec<Row>,
}

impl Table {
    /// Create a table from an explicit column list and rows.
    pub fn new(columns: Vec<String>, rows: Vec<Row>) -> Self {
        Self { columns, rows }
    }

    /// Create a table inferring columns from the first row's key set.
    ///
    /// An empty rowset infers an empty column list. Heterogeneous rowsets
    /// under-report columns here; consumers that need the full key union must
    /// compute it themselves.
    pub fn from_rows(rows: Vec<Row>) -> Self {
        let columns = infer_columns(&rows);
        Self { columns, rows }
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Clone the first `n` rows.
    pub fn head(&self, n: usize) -> Vec<Row> {
        self.rows.iter().take(n).cloned().collect()
    }
}

/// Column names of the first row, or empty when there are no rows.
pub fn infer_columns(rows: &[Row]) -> Vec<String> {
    rows.first()
        .map(|row| row.keys().cloned().collect())
        .unwrap_or_default()
}

/// Canonical string form of a scalar, used by the string-comparing filter
/// operators.
///
/// Strings pass through, numbers use their JSON form (`35`, `35.5`), booleans
/// are `true`/`false`, null is empty. Nested values (legal but unexpected in
/// cells) fall back to their JSON text.
pub fn scalar_text(value: &Value) -> Cow<'_, str> {
    match value {
        Value::String(s) => Cow::Borrowed(s),
        Value::Number(n) => Cow::Owned(n.to_string()),
        Value::Bool(true) => Cow::Borrowed("true"),
        Value::Bool(false) => Cow::Borrowed("false"),
        Value::Null => Cow::Borrowed(""),
        other => Cow::Owned(other.to_string()),
    }
}

/// Numeric coercion of a scalar, used by the numeric filter operators.
///
/// Numbers convert directly, numeric strings parse (surrounding whitespace
/// tolerated), booleans coerce to 1/0. Anything else is not coercible and
/// yields `None`.
pub fn scalar_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        _ => None,
    }
}
