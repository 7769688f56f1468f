use super::keys::{OVERFLOW_MARKER, normalize_key};
use crate::datamodel::{NormalizedRow, RawRow, RawValue};

/// Elements kept from a sequence, both when joining scalars and when recursing.
const MAX_SEQUENCE_ITEMS: usize = 3;

/// Column used for a scalar reached without any key, e.g. a bare list item.
pub const FALLBACK_COLUMN: &str = "Value";

/// Flattens one raw row into space-joined column paths.
pub fn flatten(row: &RawRow) -> NormalizedRow {
    let mut output = NormalizedRow::with_capacity(row.len());
    flatten_mapping(row, "", &mut output);
    output
}

fn flatten_mapping(row: &RawRow, prefix: &str, output: &mut NormalizedRow) {
    for (key, value) in row.iter() {
        let path = join_path(prefix, &normalize_key(key));
        flatten_value(value, &path, output);
    }
}

fn flatten_value(value: &RawValue, prefix: &str, output: &mut NormalizedRow) {
    match value {
        RawValue::Null => output.insert(column_name(prefix), ""),
        RawValue::Scalar(text) => output.insert(column_name(prefix), text.as_str()),
        RawValue::Mapping(row) => flatten_mapping(row, prefix, output),
        RawValue::Sequence(items) if items.iter().all(RawValue::is_scalar) => {
            let mut joined = items
                .iter()
                .take(MAX_SEQUENCE_ITEMS)
                .map(RawValue::scalar_text)
                .collect::<Vec<_>>()
                .join(", ");
            if items.len() > MAX_SEQUENCE_ITEMS {
                joined.push_str(", ...");
            }
            output.insert(column_name(prefix), joined);
        }
        RawValue::Sequence(items) => {
            for (index, item) in items.iter().take(MAX_SEQUENCE_ITEMS).enumerate() {
                let path = join_path(prefix, &(index + 1).to_string());
                flatten_value(item, &path, output);
            }
            if items.len() > MAX_SEQUENCE_ITEMS {
                output.insert(
                    join_path(prefix, OVERFLOW_MARKER),
                    (items.len() - MAX_SEQUENCE_ITEMS).to_string(),
                );
            }
        }
    }
}

fn join_path(prefix: &str, segment: &str) -> String {
    match (prefix.is_empty(), segment.is_empty()) {
        (_, true) => prefix.to_string(),
        (true, false) => segment.to_string(),
        (false, false) => format!("{} {}", prefix, segment),
    }
}

fn column_name(prefix: &str) -> String {
    if prefix.is_empty() {
        FALLBACK_COLUMN.to_string()
    } else {
        prefix.to_string()
    }
}
