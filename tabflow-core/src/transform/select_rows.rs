//! Row-range slicing.

use crate::core::{Params, Result, Row};

use super::Transform;

/// Keeps the half-open row range `[startRow, endRow)`.
///
/// `startRow` defaults to 0, `endRow` to the row count; both clamp to the
/// available range. `startRow >= endRow` yields an empty result.
pub struct SelectRows;

impl Transform for SelectRows {
    fn name(&self) -> &'static str {
        "select-rows"
    }

    fn apply(&self, mut rows: Vec<Row>, params: &Params) -> Result<Vec<Row>> {
        let len = rows.len() as i64;
        let start = params.int_or("startRow", 0).clamp(0, len) as usize;
        let end = params.int_or("endRow", len).clamp(0, len) as usize;

        if start >= end {
            return Ok(Vec::new());
        }
        rows.truncate(end);
        Ok(rows.split_off(start))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn rows(n: usize) -> Vec<Row> {
        (0..n)
            .map(|i| serde_json::from_value(json!({"i": i})).unwrap())
            .collect()
    }

    fn indices(rows: &[Row]) -> Vec<i64> {
        rows.iter()
            .map(|row| row.get("i").unwrap().as_i64().unwrap())
            .collect()
    }

    #[test]
    fn test_half_open_slice() {
        let out = SelectRows
            .apply(rows(10), &Params::from(json!({"startRow": 2, "endRow": 5})))
            .unwrap();
        assert_eq!(indices(&out), vec![2, 3, 4]);
    }

    #[test]
    fn test_defaults_keep_everything() {
        let out = SelectRows.apply(rows(4), &Params::new()).unwrap();
        assert_eq!(out.len(), 4);
    }

    #[test]
    fn test_out_of_range_clamps() {
        let out = SelectRows
            .apply(rows(5), &Params::from(json!({"startRow": -2, "endRow": 99})))
            .unwrap();
        assert_eq!(out.len(), 5);
    }

    #[test]
    fn test_start_at_or_past_end_yields_empty() {
        let out = SelectRows
            .apply(rows(5), &Params::from(json!({"startRow": 3, "endRow": 3})))
            .unwrap();
        assert!(out.is_empty());

        let out = SelectRows
            .apply(rows(5), &Params::from(json!({"startRow": 4, "endRow": 2})))
            .unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn test_empty_input() {
        let out = SelectRows
            .apply(Vec::new(), &Params::from(json!({"startRow": 0, "endRow": 5})))
            .unwrap();
        assert!(out.is_empty());
    }
}
