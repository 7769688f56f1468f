//! Delegate for the INE (Spanish national statistics institute) time-series API.

use crate::datamodel::TimeSeriesResult;
use crate::error::AnalysisError;
use crate::importers::{DataSource, Format, decode_text};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info};
use url::Url;

pub mod table;

pub use table::{IneSeries, normalize_series};

static TABLE_PARAM_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[?&]t=([^&]+)").expect("Failed to compile table parameter regex"));

static TPX_PARAM_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[?&]tpx=([^&]+)").expect("Failed to compile tpx parameter regex"));

/// Whether a locator points at the INE: its domain, a bare table number, or a PC-Axis file.
pub fn is_ine_dataset(locator: &str) -> bool {
    let locator = locator.trim().to_lowercase();
    if locator.is_empty() {
        return false;
    }
    locator.contains("ine.es")
        || (locator.len() >= 4 && locator.chars().all(|c| c.is_ascii_digit()))
        || locator.contains(".px")
}

/// Table identifier for the `DATOS_TABLA` endpoint.
///
/// Tried in order: the whole locator when numeric, the `t`, `tpx` and `file` (with
/// `path`) query parameters, a raw pattern match on `t=`/`tpx=`, then the last path
/// segment.
pub fn extract_table_id(locator: &str) -> Option<String> {
    let locator = locator.trim();
    if locator.is_empty() {
        return None;
    }
    if locator.chars().all(|c| c.is_ascii_digit()) {
        return Some(locator.to_string());
    }

    if let Ok(url) = Url::parse(locator) {
        let param = |name: &str| {
            url.query_pairs()
                .find(|(key, value)| key == name && !value.is_empty())
                .map(|(_, value)| value.into_owned())
        };
        if let Some(id) = param("t").or_else(|| param("tpx")) {
            return Some(id);
        }
        if let Some(file) = param("file") {
            let path = param("path").unwrap_or_default();
            let path = path.trim_matches('/');
            return Some(if path.is_empty() {
                file
            } else {
                format!("{}/{}", path, file)
            });
        }
    }

    for regex in [&TABLE_PARAM_REGEX, &TPX_PARAM_REGEX] {
        if let Some(captures) = regex.captures(locator) {
            return Some(captures[1].to_string());
        }
    }

    locator
        .rsplit('/')
        .next()
        .filter(|segment| !segment.is_empty() && segment.len() < locator.len())
        .map(str::to_string)
}

/// Fetches tables from the INE and reshapes them into labels and series.
#[derive(Clone)]
pub struct IneClient {
    base_url: String,
    source: Arc<dyn DataSource>,
}

impl IneClient {
    pub fn new(base_url: impl Into<String>, source: Arc<dyn DataSource>) -> Self {
        Self {
            base_url: base_url.into(),
            source,
        }
    }

    pub fn table_url(&self, table_id: &str) -> String {
        format!(
            "{}/DATOS_TABLA/{}",
            self.base_url.trim_end_matches('/'),
            table_id
        )
    }

    /// Raw series of a table, each cut to its last `sample_rows` observations.
    pub async fn fetch_table(
        &self,
        table_id: &str,
        sample_rows: usize,
    ) -> Result<Vec<IneSeries>, AnalysisError> {
        let url = self.table_url(table_id);
        let body = self.source.fetch_bytes(&url).await?;
        let document: Value = serde_json::from_str(&decode_text(&body))
            .map_err(|err| AnalysisError::parse(Format::IneApi, err))?;
        if !document.is_array() {
            return Err(AnalysisError::parse(
                Format::IneApi,
                "expected a list of series",
            ));
        }

        let mut series: Vec<IneSeries> = serde_json::from_value(document)
            .map_err(|err| AnalysisError::parse(Format::IneApi, err))?;
        for serie in series.iter_mut() {
            serie.keep_last(sample_rows);
        }
        debug!("INE table {} returned {} series", table_id, series.len());
        Ok(series)
    }

    pub async fn fetch_and_normalize(
        &self,
        locator: &str,
        sample_rows: usize,
    ) -> Result<TimeSeriesResult, AnalysisError> {
        let table_id = extract_table_id(locator)
            .ok_or_else(|| AnalysisError::InvalidTableId(locator.to_string()))?;
        info!("Fetching INE table {} for {}", table_id, locator);
        let series = self.fetch_table(&table_id, sample_rows).await?;
        Ok(normalize_series(&series))
    }
}
