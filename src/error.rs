use crate::importers::Format;
use thiserror::Error;

/// Errors surfaced by the analysis pipeline.
///
/// Normalization, inference and suggestion building never fail, so every variant
/// here comes from retrieving or decoding the remote resource.
#[derive(Error, Debug)]
pub enum AnalysisError {
    /// Network failure or timeout while retrieving the resource
    #[error("Failed to fetch {locator}: {reason}")]
    Fetch { locator: String, reason: String },

    /// The remote server answered with a non-success status
    #[error("Fetching {locator} returned HTTP status {status}")]
    HttpStatus { locator: String, status: u16 },

    /// The payload does not match the expected format
    #[error("Invalid {format} payload: {message}")]
    Parse { format: Format, message: String },

    /// The resolved format has no fetcher, or the requested format is unknown
    #[error("Format not supported: {0}")]
    UnsupportedFormat(String),

    /// Every fetcher of the fallback cascade failed or returned no rows
    #[error("No data could be sampled (attempted formats: {})", format_list(.attempted))]
    NoData { attempted: Vec<Format> },

    /// No table identifier could be extracted for the statistics provider
    #[error("Could not extract a table identifier from {0}")]
    InvalidTableId(String),
}

fn format_list(formats: &[Format]) -> String {
    formats
        .iter()
        .map(|format| format.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

impl AnalysisError {
    pub fn fetch(locator: &str, reason: impl ToString) -> Self {
        AnalysisError::Fetch {
            locator: locator.to_string(),
            reason: reason.to_string(),
        }
    }

    pub fn parse(format: Format, message: impl ToString) -> Self {
        AnalysisError::Parse {
            format,
            message: message.to_string(),
        }
    }
}
