use crate::config::DataProbeConfig;
use crate::datamodel::{
    AnalysisResult, ColumnSchema, MAX_ECHOED_ROWS, NormalizedRow, RawRow, SampleSize, Suggestion,
    SuggestionKind,
};
use crate::error::AnalysisError;
use crate::importers::{
    DataSource, FALLBACK_ORDER, FetchLimits, Format, HttpDataSource, get_fetcher, resolve_format,
};
use crate::ine::{self, IneClient};
use crate::infer::infer_schema;
use crate::normalize::normalize_rows;
use crate::suggestions::{build_suggestions, choose_primary};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Sampling and inference bounds used by [`Analyzer`].
#[derive(Debug, Clone, PartialEq)]
pub struct AnalyzerSettings {
    pub default_sample_rows: usize,
    pub max_sample_rows: usize,
    pub csv_max_lines: usize,
    pub max_inference_rows: usize,
    pub ine_base_url: String,
}

impl Default for AnalyzerSettings {
    fn default() -> Self {
        Self {
            default_sample_rows: 80,
            max_sample_rows: 5000,
            csv_max_lines: 1000,
            max_inference_rows: 30,
            ine_base_url: "https://servicios.ine.es/wstempus/js/es".to_string(),
        }
    }
}

impl From<&DataProbeConfig> for AnalyzerSettings {
    fn from(config: &DataProbeConfig) -> Self {
        Self {
            default_sample_rows: config.default_sample_rows,
            max_sample_rows: config.max_sample_rows,
            csv_max_lines: config.csv_max_lines,
            max_inference_rows: config.max_inference_rows,
            ine_base_url: config.ine_base_url.clone(),
        }
    }
}

/// Entry point of the analysis pipeline.
///
/// Holds no per-request state, so a single instance is shared between requests.
#[derive(Clone)]
pub struct Analyzer {
    source: Arc<dyn DataSource>,
    settings: AnalyzerSettings,
    ine: IneClient,
}

impl Analyzer {
    pub fn new(source: Arc<dyn DataSource>, settings: AnalyzerSettings) -> Self {
        let ine = IneClient::new(settings.ine_base_url.clone(), source.clone());
        Self {
            source,
            settings,
            ine,
        }
    }

    /// Analyzer fetching over HTTP with the configured timeout and bounds.
    pub fn from_config(config: &DataProbeConfig) -> anyhow::Result<Self> {
        let source = HttpDataSource::new(config.fetch_timeout(), &config.user_agent())?;
        Ok(Self::new(Arc::new(source), AnalyzerSettings::from(config)))
    }

    pub fn settings(&self) -> &AnalyzerSettings {
        &self.settings
    }

    pub fn ine(&self) -> &IneClient {
        &self.ine
    }

    /// The requested sample size, or the configured default.
    pub fn sample_size(&self, requested: Option<SampleSize>) -> SampleSize {
        requested.unwrap_or(SampleSize::Limited(self.settings.default_sample_rows))
    }

    /// Samples, normalizes and types a resource, then suggests charts for it.
    ///
    /// INE locators are delegated to the time-series client. Otherwise the format
    /// comes from the override or the locator. When neither gives one, CSV, JSON
    /// and PC-Axis are tried in turn and the first one yielding rows wins.
    pub async fn analyze(
        &self,
        locator: &str,
        format_override: Option<&str>,
        sample: SampleSize,
    ) -> Result<AnalysisResult, AnalysisError> {
        let max_rows = sample.resolve(self.settings.max_sample_rows);

        if ine::is_ine_dataset(locator) {
            info!("Delegating {} to the INE time-series API", locator);
            return self.analyze_ine(locator, max_rows).await;
        }

        let (format, rows) = match resolve_format(locator, format_override)? {
            Some(format) if !format.is_supported() => {
                return Err(AnalysisError::UnsupportedFormat(format.to_string()));
            }
            Some(format) => {
                info!("Sampling {} as {}", locator, format);
                let rows = self.fetch_rows(format, locator, max_rows).await?;
                (format, rows)
            }
            None => self.fetch_with_fallback(locator, max_rows).await?,
        };

        if rows.is_empty() {
            info!("No rows sampled from {} as {}", locator, format);
            return Ok(self.envelope(None, Vec::new()));
        }

        Ok(self.envelope(Some(format), rows))
    }

    async fn fetch_rows(
        &self,
        format: Format,
        locator: &str,
        max_rows: usize,
    ) -> Result<Vec<RawRow>, AnalysisError> {
        let limits = FetchLimits {
            csv_max_lines: self.settings.csv_max_lines,
        };
        let fetcher = get_fetcher(format, &limits)?;
        fetcher.fetch(self.source.as_ref(), locator, max_rows).await
    }

    /// Tries each fallback format, swallowing failures, until one yields rows.
    async fn fetch_with_fallback(
        &self,
        locator: &str,
        max_rows: usize,
    ) -> Result<(Format, Vec<RawRow>), AnalysisError> {
        for format in FALLBACK_ORDER {
            match self.fetch_rows(format, locator, max_rows).await {
                Ok(rows) if !rows.is_empty() => {
                    info!("Detected {} for {} ({} rows)", format, locator, rows.len());
                    return Ok((format, rows));
                }
                Ok(_) => debug!("No {} rows in {}, trying next format", format, locator),
                Err(err) => warn!("Sampling {} as {} failed: {}", locator, format, err),
            }
        }
        Err(AnalysisError::NoData {
            attempted: FALLBACK_ORDER.to_vec(),
        })
    }

    fn envelope(&self, format: Option<Format>, rows: Vec<RawRow>) -> AnalysisResult {
        let normalized = normalize_rows(&rows);
        let schema = infer_schema(&normalized, self.settings.max_inference_rows);
        debug!(
            "Inferred {} columns from {} rows",
            schema.len(),
            normalized.len()
        );
        build_envelope(format.map(|f| f.to_string()), schema, normalized)
    }

    async fn analyze_ine(
        &self,
        locator: &str,
        max_rows: usize,
    ) -> Result<AnalysisResult, AnalysisError> {
        let result = self.ine.fetch_and_normalize(locator, max_rows).await?;
        let has_series = !result.labels.is_empty() && !result.series.is_empty();

        let mut envelope = build_envelope(
            Some(Format::IneApi.to_string()),
            result.schema,
            result.sample_rows,
        );
        // Aligned labels and series can always be drawn as a time chart
        if has_series && envelope.suggestion.kind() == SuggestionKind::Table {
            envelope.suggestion =
                Suggestion::timeseries(ine::table::DATE_FIELD, ine::table::VALUE_FIELD);
        }
        envelope.sample_rows_count = result.items_count;
        envelope.labels = Some(result.labels);
        envelope.series = Some(result.series);
        Ok(envelope)
    }
}

fn build_envelope(
    format_detected: Option<String>,
    schema: Vec<ColumnSchema>,
    mut rows: Vec<NormalizedRow>,
) -> AnalysisResult {
    let suggestions = build_suggestions(&schema);
    let suggestion = choose_primary(&suggestions);
    let sample_rows_count = rows.len();
    rows.truncate(MAX_ECHOED_ROWS);

    AnalysisResult {
        format_detected,
        schema,
        sample_rows: rows,
        suggestions,
        suggestion,
        sample_rows_count,
        labels: None,
        series: None,
    }
}
