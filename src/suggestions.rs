//! Rule-based chart recommendations from an inferred schema.

use crate::datamodel::{ColumnSchema, ColumnType, Suggestion, SuggestionKind};

/// String columns with at least this many distinct values are not charted as categories.
pub const MAX_CATEGORY_CARDINALITY: usize = 200;

/// Kinds in decreasing order of preference for the primary suggestion.
pub const PRIMARY_PREFERENCE: [SuggestionKind; 6] = [
    SuggestionKind::Timeseries,
    SuggestionKind::Barchart,
    SuggestionKind::Piechart,
    SuggestionKind::Choropleth,
    SuggestionKind::Heatmap,
    SuggestionKind::Table,
];

fn names_of(schema: &[ColumnSchema], inferred_type: ColumnType) -> Vec<&str> {
    schema
        .iter()
        .filter(|column| column.inferred_type == inferred_type)
        .map(|column| column.name.as_str())
        .collect()
}

/// Every applicable chart for the schema, ending with the table fallback.
pub fn build_suggestions(schema: &[ColumnSchema]) -> Vec<Suggestion> {
    let numeric = names_of(schema, ColumnType::Numeric);
    let datetime = names_of(schema, ColumnType::Datetime);
    let latitude = names_of(schema, ColumnType::Latitude);
    let longitude = names_of(schema, ColumnType::Longitude);
    let geo_names = names_of(schema, ColumnType::GeoName);
    let categories = schema
        .iter()
        .filter(|column| {
            column.inferred_type == ColumnType::String
                && column.unique_count_estimate < MAX_CATEGORY_CARDINALITY
        })
        .map(|column| column.name.as_str())
        .collect::<Vec<_>>();

    let mut suggestions = Vec::new();

    for x in &datetime {
        for y in &numeric {
            suggestions.push(Suggestion::timeseries(x, y));
        }
    }

    for category in &categories {
        for value in &numeric {
            suggestions.push(Suggestion::barchart(category, value));
            suggestions.push(Suggestion::piechart(category, value));
        }
    }

    if let (Some(lat), Some(lon)) = (latitude.first(), longitude.first()) {
        suggestions.push(Suggestion::heatmap(lat, lon));
    }

    if let Some(geo_name) = geo_names.first() {
        for value in &numeric {
            suggestions.push(Suggestion::choropleth(geo_name, value));
        }
    }

    suggestions.push(Suggestion::table());
    suggestions
}

/// The first suggestion of the most preferred kind present, or a bare table.
pub fn choose_primary(suggestions: &[Suggestion]) -> Suggestion {
    PRIMARY_PREFERENCE
        .iter()
        .find_map(|kind| suggestions.iter().find(|s| s.kind() == *kind))
        .cloned()
        .unwrap_or_else(Suggestion::table)
}
