//! Row predicate filtering.

use std::str::FromStr;

use serde_json::Value;

use crate::core::{scalar_number, scalar_text, Params, Result, Row};

use super::Transform;

/// Comparison operators understood by [`FilterMore`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display, strum::EnumString)]
pub enum FilterOp {
    /// Equal on canonical string form.
    #[strum(serialize = "==")]
    Eq,
    /// Not equal on canonical string form.
    #[strum(serialize = "!=")]
    Ne,
    /// Numeric greater-than.
    #[strum(serialize = ">")]
    Gt,
    /// Numeric less-than.
    #[strum(serialize = "<")]
    Lt,
    /// Numeric greater-or-equal.
    #[strum(serialize = ">=")]
    Ge,
    /// Numeric less-or-equal.
    #[strum(serialize = "<=")]
    Le,
    /// Cell's string form contains the value's string form.
    #[strum(serialize = "contains")]
    Contains,
    /// Cell's string form starts with the value's string form.
    #[strum(serialize = "startswith")]
    StartsWith,
}

impl FilterOp {
    fn matches(self, cell: &Value, value: &Value) -> bool {
        match self {
            FilterOp::Eq => scalar_text(cell) == scalar_text(value),
            FilterOp::Ne => scalar_text(cell) != scalar_text(value),
            FilterOp::Gt | FilterOp::Lt | FilterOp::Ge | FilterOp::Le => {
                // Coercion failure on either side excludes the row.
                match (scalar_number(cell), scalar_number(value)) {
                    (Some(left), Some(right)) => match self {
                        FilterOp::Gt => left > right,
                        FilterOp::Lt => left < right,
                        FilterOp::Ge => left >= right,
                        FilterOp::Le => left <= right,
                        _ => unreachable!(),
                    },
                    _ => false,
                }
            }
            FilterOp::Contains => scalar_text(cell).contains(scalar_text(value).as_ref()),
            FilterOp::StartsWith => scalar_text(cell).starts_with(scalar_text(value).as_ref()),
        }
    }
}

/// Keeps rows where `operator(row[column], value)` holds.
///
/// A row lacking `column` is excluded. When `column`, `operator` or `value`
/// is missing (or null), the input passes through unchanged; an operator
/// outside [`FilterOp`] matches no rows.
pub struct FilterMore;

impl Transform for FilterMore {
    fn name(&self) -> &'static str {
        "filter-more"
    }

    fn apply(&self, rows: Vec<Row>, params: &Params) -> Result<Vec<Row>> {
        let column = params.str_or("column", "");
        let operator = params.str_or("operator", "");
        let value = match params.get("value") {
            Some(value) if !value.is_null() => value,
            _ => return Ok(rows),
        };
        if column.is_empty() || operator.is_empty() {
            return Ok(rows);
        }

        let op = FilterOp::from_str(operator).ok();

        Ok(rows
            .into_iter()
            .filter(|row| match (op, row.get(column)) {
                (Some(op), Some(cell)) => op.matches(cell, value),
                _ => false,
            })
            .collect())
    }
}
