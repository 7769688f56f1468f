use super::geo_guesser::{coordinate_from_name, looks_like_geo_names};
use super::parsing::{parse_datetime, try_parse_number};
use crate::datamodel::{ColumnSchema, ColumnType};
use std::collections::HashSet;

/// Share of non-empty values that must parse as numbers.
pub const NUMERIC_THRESHOLD: f64 = 0.8;
/// Share of non-empty values that must parse as dates, checked after numbers.
pub const DATETIME_THRESHOLD: f64 = 0.6;
/// Representative values kept per column.
pub const MAX_SAMPLE_VALUES: usize = 5;

/// Classifies one column from its probed values.
///
/// Value-based classification runs first. Name hints for coordinates then replace
/// it, and a column mentioning enough region names ends up as `geo_name` whatever
/// came before.
pub fn infer_column(name: &str, values: &[&str]) -> ColumnSchema {
    let non_empty = values
        .iter()
        .map(|value| value.trim())
        .filter(|value| !value.is_empty())
        .collect::<Vec<_>>();

    let mut inferred_type = classify_values(&non_empty);

    if let Some(coordinate) = coordinate_from_name(name) {
        inferred_type = coordinate;
    }
    if looks_like_geo_names(&non_empty) {
        inferred_type = ColumnType::GeoName;
    }

    let unique_count = non_empty
        .iter()
        .map(|value| value.to_lowercase())
        .collect::<HashSet<_>>()
        .len();
    let sample_values = non_empty
        .iter()
        .take(MAX_SAMPLE_VALUES)
        .map(|value| value.to_string())
        .collect();

    ColumnSchema::new(name, inferred_type).with_samples(sample_values, unique_count)
}

fn classify_values(non_empty: &[&str]) -> ColumnType {
    if non_empty.is_empty() {
        return ColumnType::String;
    }
    let total = non_empty.len() as f64;

    let numbers = non_empty
        .iter()
        .filter(|value| try_parse_number(value).is_some())
        .count();
    if numbers as f64 / total >= NUMERIC_THRESHOLD {
        return ColumnType::Numeric;
    }

    let dates = non_empty
        .iter()
        .filter(|value| parse_datetime(value).is_some())
        .count();
    if dates as f64 / total >= DATETIME_THRESHOLD {
        return ColumnType::Datetime;
    }

    ColumnType::String
}
