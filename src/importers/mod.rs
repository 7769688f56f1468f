use crate::datamodel::RawRow;
use crate::error::AnalysisError;
use async_trait::async_trait;

pub mod csv;
pub mod format;
pub mod json;
pub mod pcaxis;
pub mod source;

pub use format::{Format, resolve_format};
pub use source::{DataSource, HttpDataSource, decode_text};

/// Order in which fetchers are tried when the format is unknown.
pub const FALLBACK_ORDER: [Format; 3] = [Format::Csv, Format::Json, Format::PcAxis];

/// Samples up to `max_rows` raw records of one format.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(
        &self,
        source: &dyn DataSource,
        locator: &str,
        max_rows: usize,
    ) -> Result<Vec<RawRow>, AnalysisError>;
}

#[derive(Debug, Clone, Copy)]
pub struct FetchLimits {
    /// Hard cap on lines read by the CSV fetcher
    pub csv_max_lines: usize,
}

impl Default for FetchLimits {
    fn default() -> Self {
        Self {
            csv_max_lines: 1000,
        }
    }
}

pub fn get_fetcher(format: Format, limits: &FetchLimits) -> Result<Box<dyn Fetcher>, AnalysisError> {
    match format {
        Format::Csv => Ok(Box::new(csv::CsvFetcher::new(limits.csv_max_lines))),
        Format::Json => Ok(Box::new(json::JsonFetcher)),
        Format::PcAxis => Ok(Box::new(pcaxis::PcAxisFetcher)),
        Format::IneApi | Format::Rdf => Err(AnalysisError::UnsupportedFormat(format.to_string())),
    }
}
