//! Heuristic column typing over a normalized sample.

use crate::datamodel::{ColumnSchema, NormalizedRow};
use crate::normalize::column_names;

pub mod columns;
pub mod geo_guesser;
pub mod parsing;

pub use columns::infer_column;
pub use parsing::{parse_datetime, try_parse_number};

/// Infers one schema entry per column from the first `sample_limit` rows.
///
/// Columns are taken from the first row, which holds every column once rows
/// have gone through the normalizer.
pub fn infer_schema(rows: &[NormalizedRow], sample_limit: usize) -> Vec<ColumnSchema> {
    let probe = &rows[..rows.len().min(sample_limit)];
    column_names(rows)
        .iter()
        .map(|column| {
            let values = probe
                .iter()
                .map(|row| row.get(column).unwrap_or_default())
                .collect::<Vec<_>>();
            infer_column(column, &values)
        })
        .collect()
}
