use crate::error::AnalysisError;
use serde::Serialize;
use std::{fmt, str::FromStr};

/// Resource formats known to the analyzer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Format {
    Csv,
    Json,
    PcAxis,
    /// National statistics time-series API, handled by the `ine` delegate
    IneApi,
    /// RDF/XML is recognised so it can be rejected explicitly
    Rdf,
}

impl Format {
    pub fn is_supported(self) -> bool {
        !matches!(self, Format::Rdf)
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Format::Csv => "csv",
            Format::Json => "json",
            Format::PcAxis => "pc-axis",
            Format::IneApi => "ine-api",
            Format::Rdf => "rdf",
        };
        write!(f, "{}", s)
    }
}

/// Parses a caller-supplied format override.
impl FromStr for Format {
    type Err = AnalysisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "csv" => Ok(Format::Csv),
            "json" => Ok(Format::Json),
            "pc-axis" => Ok(Format::PcAxis),
            "rdf" => Ok(Format::Rdf),
            other => Err(AnalysisError::UnsupportedFormat(other.to_string())),
        }
    }
}

const PC_AXIS_HINTS: [&str; 4] = ["format=px", "format=pc-axis", "pc-axis", "pcaxis"];
const CSV_HINTS: [&str; 3] = ["rows.csv", "format=csv", ".csv?"];
const JSON_HINTS: [&str; 3] = ["rows.json", "format=json", ".json?"];
const RDF_HINTS: [&str; 2] = ["rdf", "xml"];

/// Picks a format for a locator.
///
/// A non-empty override wins without looking at the locator. Otherwise the locator
/// text is sniffed; `Ok(None)` means the format is unknown and the caller should
/// fall back to trying fetchers in turn. Membership in the statistics provider is
/// checked by the caller before this runs.
pub fn resolve_format(
    locator: &str,
    format_override: Option<&str>,
) -> Result<Option<Format>, AnalysisError> {
    if let Some(requested) = format_override.filter(|f| !f.trim().is_empty()) {
        return requested.parse().map(Some);
    }

    let locator = locator.trim().to_lowercase();
    let has_hint = |suffix: &str, hints: &[&str]| {
        locator.ends_with(suffix) || hints.iter().any(|hint| locator.contains(hint))
    };

    if has_hint(".px", &PC_AXIS_HINTS) {
        Ok(Some(Format::PcAxis))
    } else if has_hint(".csv", &CSV_HINTS) {
        Ok(Some(Format::Csv))
    } else if has_hint(".json", &JSON_HINTS) {
        Ok(Some(Format::Json))
    } else if RDF_HINTS.iter().any(|hint| locator.contains(hint)) {
        Ok(Some(Format::Rdf))
    } else {
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sniff(locator: &str) -> Option<Format> {
        resolve_format(locator, None).unwrap()
    }

    #[test]
    fn test_override_wins() {
        assert_eq!(
            resolve_format("https://example.org/data.csv", Some("JSON")).unwrap(),
            Some(Format::Json)
        );
        assert_eq!(
            resolve_format("https://example.org/data", Some("pc-axis")).unwrap(),
            Some(Format::PcAxis)
        );
        assert_eq!(
            resolve_format("https://example.org/data", Some("rdf")).unwrap(),
            Some(Format::Rdf)
        );
    }

    #[test]
    fn test_empty_override_is_ignored() {
        assert_eq!(
            resolve_format("https://example.org/data.csv", Some("  ")).unwrap(),
            Some(Format::Csv)
        );
    }

    #[test]
    fn test_unknown_override_is_rejected() {
        let error = resolve_format("https://example.org/data.csv", Some("xlsx")).unwrap_err();
        assert!(matches!(error, AnalysisError::UnsupportedFormat(f) if f == "xlsx"));
    }

    #[test]
    fn test_suffix_sniffing() {
        assert_eq!(sniff("https://example.org/table.px"), Some(Format::PcAxis));
        assert_eq!(sniff("https://example.org/Table.CSV"), Some(Format::Csv));
        assert_eq!(sniff("https://example.org/items.json"), Some(Format::Json));
    }

    #[test]
    fn test_embedded_hints() {
        assert_eq!(
            sniff("https://example.org/api/views/abc/rows.csv?accessType=DOWNLOAD"),
            Some(Format::Csv)
        );
        assert_eq!(
            sniff("https://example.org/export?format=json&limit=10"),
            Some(Format::Json)
        );
        assert_eq!(
            sniff("https://example.org/download?format=px"),
            Some(Format::PcAxis)
        );
        assert_eq!(sniff("https://example.org/data.csv?v=2"), Some(Format::Csv));
        assert_eq!(sniff("https://example.org/catalog.rdf"), Some(Format::Rdf));
        assert_eq!(sniff("https://example.org/feed.xml"), Some(Format::Rdf));
    }

    #[test]
    fn test_precedence() {
        // PC-Axis is tested before CSV
        assert_eq!(
            sniff("https://example.org/pcaxis/export.csv"),
            Some(Format::PcAxis)
        );
        // CSV before JSON
        assert_eq!(
            sniff("https://example.org/rows.csv?format=json"),
            Some(Format::Csv)
        );
    }

    #[test]
    fn test_unknown() {
        assert_eq!(sniff("https://example.org/download/1234abcd"), None);
        assert_eq!(sniff(""), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(Format::PcAxis.to_string(), "pc-axis");
        assert_eq!(Format::IneApi.to_string(), "ine-api");
        assert!(!Format::Rdf.is_supported());
        assert!(Format::Csv.is_supported());
    }
}
