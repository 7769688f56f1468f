//! Flattening of raw rows into a uniform set of string columns.

use crate::datamodel::{NormalizedRow, RawRow};
use std::collections::HashMap;

pub mod flatten;
pub mod keys;

pub use flatten::flatten;
pub use keys::normalize_key;

/// Flattens every row, then re-emits each one with the union of all columns.
///
/// Columns keep their first-seen order across the sample and absent cells are
/// backfilled with an empty string, so every output row has the same columns.
pub fn normalize_rows(rows: &[RawRow]) -> Vec<NormalizedRow> {
    let flattened = rows.iter().map(flatten).collect::<Vec<_>>();

    let mut columns: Vec<&str> = Vec::new();
    let mut positions: HashMap<&str, usize> = HashMap::new();
    for row in &flattened {
        for column in row.columns() {
            positions.entry(column).or_insert_with(|| {
                columns.push(column);
                columns.len() - 1
            });
        }
    }

    flattened
        .iter()
        .map(|row| {
            let mut values = vec![""; columns.len()];
            for (column, value) in row.iter() {
                if let Some(&position) = positions.get(column) {
                    values[position] = value;
                }
            }
            NormalizedRow::from_unique_cells(
                columns
                    .iter()
                    .zip(values)
                    .map(|(column, value)| (column.to_string(), value.to_string()))
                    .collect(),
            )
        })
        .collect()
}

/// Column names of a normalized sample, taken from its first row.
pub fn column_names(rows: &[NormalizedRow]) -> Vec<String> {
    rows.first()
        .map(|row| row.columns().map(str::to_string).collect())
        .unwrap_or_default()
}
