//! Column projection.

use serde_json::Value;

use crate::core::{Params, Result, Row};

use super::Transform;

/// Projects rows onto a requested column list.
///
/// `columns` is a comma-separated string of names, trimmed. Names not
/// present on the first row are dropped from the request before projecting;
/// when nothing valid remains (or the parameter is absent/empty) the input
/// passes through unchanged. A selected key absent on a given row projects
/// to null, per the sparse-row model.
pub struct SelectColumns;

impl Transform for SelectColumns {
    fn name(&self) -> &'static str {
        "select-columns"
    }

    fn apply(&self, rows: Vec<Row>, params: &Params) -> Result<Vec<Row>> {
        if rows.is_empty() {
            return Ok(rows);
        }

        let requested = params.str_or("columns", "");
        if requested.is_empty() {
            return Ok(rows);
        }

        let first = &rows[0];
        let selected: Vec<&str> = requested
            .split(',')
            .map(str::trim)
            .filter(|name| first.contains_key(*name))
            .collect();
        if selected.is_empty() {
            return Ok(rows);
        }

        Ok(rows
            .iter()
            .map(|row| {
                selected
                    .iter()
                    .map(|&name| {
                        let value = row.get(name).cloned().unwrap_or(Value::Null);
                        (name.to_string(), value)
                    })
                    .collect()
            })
            .collect())
    }
}
