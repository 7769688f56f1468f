use super::{ColumnSchema, NormalizedRow, Suggestion};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use utoipa::ToSchema;

/// Maximum number of sample rows echoed back in an [`AnalysisResult`].
pub const MAX_ECHOED_ROWS: usize = 200;

/// The envelope returned for every analyzed resource.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AnalysisResult {
    /// `csv`, `json`, `pc-axis`, `ine-api`, or null when nothing was sampled
    pub format_detected: Option<String>,
    pub schema: Vec<ColumnSchema>,
    #[schema(value_type = Vec<Object>)]
    pub sample_rows: Vec<NormalizedRow>,
    pub suggestions: Vec<Suggestion>,
    /// Primary suggestion
    pub suggestion: Suggestion,
    pub sample_rows_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub labels: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub series: Option<Vec<Series>>,
}

/// One named series, positionally aligned with the labels it was built with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Series {
    pub name: String,
    pub data: Vec<Option<f64>>,
}

/// Output of the statistics provider delegate.
#[derive(Debug, Clone, Default, Serialize, ToSchema)]
pub struct TimeSeriesResult {
    pub schema: Vec<ColumnSchema>,
    #[schema(value_type = Vec<Object>)]
    pub sample_rows: Vec<NormalizedRow>,
    pub items_count: usize,
    pub labels: Vec<String>,
    pub series: Vec<Series>,
}

impl TimeSeriesResult {
    /// Every series has exactly one data point per label.
    pub fn is_aligned(&self) -> bool {
        self.series.iter().all(|s| s.data.len() == self.labels.len())
    }
}

/// Caller-requested sample size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleSize {
    Limited(usize),
    /// Sentinel for "as many as possible", bounded by configuration
    Unbounded,
}

impl SampleSize {
    /// Concrete row bound, never above `max_rows`.
    pub fn resolve(self, max_rows: usize) -> usize {
        match self {
            SampleSize::Limited(rows) => rows.min(max_rows),
            SampleSize::Unbounded => max_rows,
        }
    }
}

impl FromStr for SampleSize {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("all") {
            return Ok(SampleSize::Unbounded);
        }
        match s.parse::<usize>() {
            Ok(0) => Ok(SampleSize::Unbounded),
            Ok(rows) => Ok(SampleSize::Limited(rows)),
            Err(_) => Err(format!("Invalid sample size: {}", s)),
        }
    }
}
