use super::source::decode_text;
use super::{DataSource, Fetcher, Format};
use crate::datamodel::RawRow;
use crate::error::AnalysisError;
use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

/// Conventional keys wrapping the list of records, probed in order.
const RECORD_LIST_KEYS: [&str; 6] = ["data", "rows", "result", "results", "records", "items"];

#[derive(Debug, Clone, Default)]
pub struct JsonFetcher;

#[async_trait]
impl Fetcher for JsonFetcher {
    async fn fetch(
        &self,
        source: &dyn DataSource,
        locator: &str,
        max_rows: usize,
    ) -> Result<Vec<RawRow>, AnalysisError> {
        let body = source.fetch_bytes(locator).await?;
        let rows = parse_json_sample(&decode_text(&body), max_rows)?;
        debug!("JSON sampling found {} records in {}", rows.len(), locator);
        Ok(rows)
    }
}

/// Parses a JSON document and samples its list of records.
///
/// A document without any list yields no rows rather than an error.
pub fn parse_json_sample(text: &str, max_rows: usize) -> Result<Vec<RawRow>, AnalysisError> {
    let document: Value =
        serde_json::from_str(text).map_err(|err| AnalysisError::parse(Format::Json, err))?;

    Ok(find_record_list(document)
        .map(|items| {
            items
                .into_iter()
                .take(max_rows)
                .map(RawRow::from)
                .collect()
        })
        .unwrap_or_default())
}

/// The top-level array, a conventional wrapper key, or the first array member.
pub fn find_record_list(document: Value) -> Option<Vec<Value>> {
    match document {
        Value::Array(items) => Some(items),
        Value::Object(mut map) => {
            let key = RECORD_LIST_KEYS
                .iter()
                .find(|key| map.get(**key).is_some_and(Value::is_array))
                .map(|key| key.to_string())
                .or_else(|| {
                    map.iter()
                        .find(|(_, value)| value.is_array())
                        .map(|(key, _)| key.clone())
                })?;
            match map.remove(&key) {
                Some(Value::Array(items)) => Some(items),
                _ => None,
            }
        }
        _ => None,
    }
}
