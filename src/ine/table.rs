use crate::datamodel::{ColumnSchema, ColumnType, NormalizedRow, Series, TimeSeriesResult};
use crate::infer::parse_datetime;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::collections::{HashMap, HashSet};

pub const DATE_FIELD: &str = "Fecha";
pub const VALUE_FIELD: &str = "Valor";
pub const UNNAMED_SERIES: &str = "Sin nombre";

/// Values probed per column of the reconstructed table.
const TYPE_PROBE_SIZE: usize = 20;
const TYPE_THRESHOLD: f64 = 0.8;
const MAX_SAMPLE_VALUES: usize = 5;

/// One series of a `DATOS_TABLA` response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct IneSeries {
    #[serde(rename = "Nombre", default)]
    pub name: Option<String>,
    /// Observation points, fields kept in response order
    #[serde(rename = "Data", default)]
    pub data: Vec<Map<String, Value>>,
}

impl IneSeries {
    /// Drops all but the last `count` observations.
    pub fn keep_last(&mut self, count: usize) {
        let excess = self.data.len().saturating_sub(count);
        self.data.drain(..excess);
    }
}

/// Text rendering used for labels and table cells. Lists are joined with commas.
pub fn value_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Array(items) => items.iter().map(value_text).collect::<Vec<_>>().join(", "),
        other => other.to_string(),
    }
}

/// Observation value, reading a comma as decimal separator.
pub fn parse_observation(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) if !s.trim().is_empty() => s.trim().replace(',', ".").parse().ok(),
        _ => None,
    }
}

/// Builds aligned labels and series plus a flat table of every observation.
///
/// Labels are the distinct observation dates, sorted chronologically when all of
/// them parse as dates and lexicographically otherwise. Points without a date
/// appear in the table only.
pub fn normalize_series(raw: &[IneSeries]) -> TimeSeriesResult {
    let labels = collect_labels(raw);

    let series = raw
        .iter()
        .map(|serie| {
            let values = serie
                .data
                .iter()
                .filter_map(|point| {
                    let date = value_text(point.get(DATE_FIELD)?);
                    let value = point.get(VALUE_FIELD).and_then(parse_observation);
                    Some((date, value))
                })
                .collect::<HashMap<_, _>>();
            Series {
                name: serie
                    .name
                    .clone()
                    .unwrap_or_else(|| UNNAMED_SERIES.to_string()),
                data: labels
                    .iter()
                    .map(|label| values.get(label).copied().flatten())
                    .collect(),
            }
        })
        .collect();

    let mut columns: Vec<&str> = Vec::new();
    for point in raw.iter().flat_map(|serie| &serie.data) {
        for key in point.keys() {
            if !columns.contains(&key.as_str()) {
                columns.push(key);
            }
        }
    }

    let sample_rows = raw
        .iter()
        .flat_map(|serie| &serie.data)
        .map(|point| {
            columns
                .iter()
                .map(|column| (*column, point.get(*column).map(value_text).unwrap_or_default()))
                .collect::<NormalizedRow>()
        })
        .collect::<Vec<_>>();

    let schema = columns
        .iter()
        .map(|column| infer_table_column(column, &sample_rows))
        .collect();

    TimeSeriesResult {
        schema,
        items_count: sample_rows.len(),
        sample_rows,
        labels,
        series,
    }
}

fn collect_labels(raw: &[IneSeries]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut labels = raw
        .iter()
        .flat_map(|serie| &serie.data)
        .filter_map(|point| point.get(DATE_FIELD).map(value_text))
        .filter(|label| seen.insert(label.clone()))
        .collect::<Vec<_>>();

    let dates = labels
        .iter()
        .map(|label| parse_datetime(label))
        .collect::<Option<Vec<_>>>();
    match dates {
        Some(dates) => {
            let mut paired = dates.into_iter().zip(labels).collect::<Vec<_>>();
            paired.sort_by(|(a, _), (b, _)| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
            paired.into_iter().map(|(_, label)| label).collect()
        }
        None => {
            labels.sort();
            labels
        }
    }
}

fn infer_table_column(column: &str, rows: &[NormalizedRow]) -> ColumnSchema {
    let non_empty = rows
        .iter()
        .filter_map(|row| row.get(column))
        .filter(|value| !value.is_empty())
        .take(TYPE_PROBE_SIZE)
        .collect::<Vec<_>>();

    let mut numbers = 0;
    let mut dates = 0;
    for value in &non_empty {
        if value.replace(',', ".").parse::<f64>().is_ok() {
            numbers += 1;
        } else if parse_datetime(value).is_some() {
            dates += 1;
        }
    }

    let total = non_empty.len() as f64;
    let inferred_type = if non_empty.is_empty() {
        ColumnType::String
    } else if numbers as f64 / total >= TYPE_THRESHOLD {
        ColumnType::Numeric
    } else if dates as f64 / total >= TYPE_THRESHOLD {
        ColumnType::Datetime
    } else {
        ColumnType::String
    };

    let unique = non_empty
        .iter()
        .map(|value| value.to_lowercase())
        .collect::<HashSet<_>>()
        .len();
    let samples = non_empty
        .iter()
        .take(MAX_SAMPLE_VALUES)
        .map(|value| value.to_string())
        .collect();
    ColumnSchema::new(column, inferred_type).with_samples(samples, unique)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn series(value: Value) -> Vec<IneSeries> {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_alignment_with_gaps() {
        let raw = series(json!([
            {
                "Nombre": "Total Nacional",
                "Data": [
                    {"Fecha": "2023-02-01T00:00:00.000+01:00", "Valor": 2.5},
                    {"Fecha": "2023-01-01T00:00:00.000+01:00", "Valor": "1,5"}
                ]
            },
            {
                "Data": [
                    {"Fecha": "2023-03-01T00:00:00.000+01:00", "Valor": null}
                ]
            }
        ]));
        let result = normalize_series(&raw);
        assert_eq!(
            result.labels,
            vec![
                "2023-01-01T00:00:00.000+01:00",
                "2023-02-01T00:00:00.000+01:00",
                "2023-03-01T00:00:00.000+01:00",
            ]
        );
        assert!(result.is_aligned());
        assert_eq!(result.series[0].name, "Total Nacional");
        assert_eq!(result.series[0].data, vec![Some(1.5), Some(2.5), None]);
        assert_eq!(result.series[1].name, UNNAMED_SERIES);
        assert_eq!(result.series[1].data, vec![None, None, None]);
    }

    #[test]
    fn test_lexicographic_labels() {
        let raw = series(json!([
            {"Nombre": "A", "Data": [{"Fecha": "b"}, {"Fecha": "2023"}, {"Fecha": "a"}]}
        ]));
        let result = normalize_series(&raw);
        assert_eq!(result.labels, vec!["2023", "a", "b"]);
        assert!(result.is_aligned());
    }

    #[test]
    fn test_table_reconstruction() {
        let raw = series(json!([
            {
                "Nombre": "Paro",
                "Data": [
                    {"Fecha": "2023-01-01", "Anyo": 2023, "Valor": "7,5", "Notas": ["p", "e"]},
                    {"Fecha": "2023-04-01", "Anyo": 2023, "Valor": "7,1", "Secreto": false}
                ]
            }
        ]));
        let result = normalize_series(&raw);
        assert_eq!(result.items_count, 2);
        assert_eq!(
            result.sample_rows[0].columns().collect::<Vec<_>>(),
            vec!["Fecha", "Anyo", "Valor", "Notas", "Secreto"]
        );
        assert_eq!(result.sample_rows[0].get("Notas"), Some("p, e"));
        assert_eq!(result.sample_rows[0].get("Secreto"), Some(""));
        assert_eq!(result.sample_rows[1].get("Secreto"), Some("false"));

        let types = result
            .schema
            .iter()
            .map(|c| (c.name.as_str(), c.inferred_type))
            .collect::<Vec<_>>();
        assert_eq!(
            types,
            vec![
                ("Fecha", ColumnType::Datetime),
                ("Anyo", ColumnType::Numeric),
                ("Valor", ColumnType::Numeric),
                ("Notas", ColumnType::String),
                ("Secreto", ColumnType::String),
            ]
        );
    }

    #[test]
    fn test_keep_last() {
        let mut serie = series(json!([
            {"Data": [{"Fecha": "1"}, {"Fecha": "2"}, {"Fecha": "3"}]}
        ]))
        .remove(0);
        serie.keep_last(2);
        assert_eq!(serie.data.len(), 2);
        assert_eq!(serie.data[0]["Fecha"], json!("2"));
        serie.keep_last(10);
        assert_eq!(serie.data.len(), 2);
    }

    #[test]
    fn test_empty() {
        let result = normalize_series(&[]);
        assert!(result.labels.is_empty());
        assert!(result.series.is_empty());
        assert!(result.schema.is_empty());
        assert_eq!(result.items_count, 0);
    }
}
