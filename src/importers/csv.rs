use super::{DataSource, Fetcher, Format};
use crate::datamodel::{RawRow, RawValue};
use crate::error::AnalysisError;
use async_trait::async_trait;
use csv_async::AsyncReaderBuilder;
use futures::StreamExt;
use tracing::debug;

/// Extra lines read beyond the requested row count, for blank lines and the header.
const LINE_SLACK: usize = 20;
/// Lines always read when the line budget allows it.
const MIN_LINES: usize = 50;

const DELIMITER_CANDIDATES: [u8; 4] = [b',', b';', b'\t', b'|'];

/// Keywords opening a PC-Axis file, whose `KEY=value;` lines would otherwise read as records.
const PC_AXIS_PREAMBLE: [&str; 3] = ["CHARSET=", "AXIS-VERSION=", "CODEPAGE="];

/// Samples a delimited text resource line by line.
#[derive(Debug, Clone)]
pub struct CsvFetcher {
    max_lines: usize,
}

impl CsvFetcher {
    pub fn new(max_lines: usize) -> Self {
        Self { max_lines }
    }

    /// Number of lines to read for `max_rows` records, capped by `max_lines`.
    pub fn line_budget(&self, max_rows: usize) -> usize {
        self.max_lines
            .min(max_rows.saturating_add(LINE_SLACK).max(MIN_LINES))
    }
}

#[async_trait]
impl Fetcher for CsvFetcher {
    async fn fetch(
        &self,
        source: &dyn DataSource,
        locator: &str,
        max_rows: usize,
    ) -> Result<Vec<RawRow>, AnalysisError> {
        let lines = source
            .fetch_lines(locator, self.line_budget(max_rows))
            .await?;
        debug!("CSV sampling read {} lines from {}", lines.len(), locator);
        parse_csv_sample(&lines.join("\n"), max_rows).await
    }
}

/// Parses delimited text using its first line as header.
pub async fn parse_csv_sample(text: &str, max_rows: usize) -> Result<Vec<RawRow>, AnalysisError> {
    match text.trim_start().chars().next() {
        None => return Ok(Vec::new()),
        Some('{') | Some('[') => {
            return Err(AnalysisError::parse(
                Format::Csv,
                "payload looks like JSON",
            ));
        }
        Some('<') => {
            return Err(AnalysisError::parse(
                Format::Csv,
                "payload looks like markup",
            ));
        }
        Some(_) => {}
    }
    let start = text.trim_start().to_uppercase();
    if PC_AXIS_PREAMBLE.iter().any(|keyword| start.starts_with(keyword)) {
        return Err(AnalysisError::parse(
            Format::Csv,
            "payload looks like PC-Axis",
        ));
    }

    // csv-async skips empty lines before the header
    let header_line = text
        .lines()
        .find(|line| !line.is_empty())
        .unwrap_or_default();
    let delimiter = sniff_delimiter(header_line);

    let mut reader = AsyncReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .flexible(true)
        .create_reader(text.as_bytes());

    let headers = reader
        .headers()
        .await
        .map_err(|err| AnalysisError::parse(Format::Csv, err))?
        .iter()
        .map(|header| header.trim().to_string())
        .collect::<Vec<_>>();

    let mut rows = Vec::new();
    let mut records = reader.records();
    while rows.len() < max_rows {
        let Some(record) = records.next().await else {
            break;
        };
        let record = record.map_err(|err| AnalysisError::parse(Format::Csv, err))?;
        // Extra fields without a header are dropped, missing ones are backfilled later
        let row = headers
            .iter()
            .zip(record.iter())
            .map(|(header, value)| (header.as_str(), RawValue::from(value.trim())))
            .collect::<RawRow>();
        rows.push(row);
    }

    Ok(rows)
}

/// Most frequent candidate delimiter outside quotes, comma on ties.
pub fn sniff_delimiter(line: &str) -> u8 {
    let mut counts = [0_usize; DELIMITER_CANDIDATES.len()];
    let mut in_quotes = false;
    for byte in line.bytes() {
        if byte == b'"' {
            in_quotes = !in_quotes;
        } else if !in_quotes {
            if let Some(index) = DELIMITER_CANDIDATES.iter().position(|c| *c == byte) {
                counts[index] += 1;
            }
        }
    }

    let mut best = 0;
    for (index, count) in counts.iter().enumerate() {
        if *count > counts[best] {
            best = index;
        }
    }
    DELIMITER_CANDIDATES[best]
}
