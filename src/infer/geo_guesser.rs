use crate::datamodel::ColumnType;
use once_cell::sync::Lazy;
use regex::Regex;

static LATITUDE_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)lat").expect("Failed to compile latitude regex"));

static LONGITUDE_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(lon|lng)").expect("Failed to compile longitude regex"));

/// Spanish autonomous communities and cities, lower-cased, with unaccented
/// and alternative spellings.
pub static SPANISH_REGIONS: &[&str] = &[
    "andalucía",
    "andalucia",
    "aragón",
    "aragon",
    "asturias",
    "islas baleares",
    "baleares",
    "canarias",
    "cantabria",
    "castilla-la mancha",
    "castilla y león",
    "castilla y leon",
    "cataluña",
    "cataluna",
    "comunidad valenciana",
    "valenciana",
    "extremadura",
    "galicia",
    "la rioja",
    "madrid",
    "murcia",
    "navarra",
    "país vasco",
    "pais vasco",
    "paisvasco",
    "ceuta",
    "melilla",
];

/// Values probed when looking for region names.
pub const GEO_PROBE_LIMIT: usize = 30;
/// Share of probed values that must mention a region.
pub const GEO_NAME_THRESHOLD: f64 = 0.2;

/// Coordinate type hinted by a column name, if any.
///
/// Longitude wins when a name hints at both.
pub fn coordinate_from_name(column_name: &str) -> Option<ColumnType> {
    if LONGITUDE_REGEX.is_match(column_name) {
        Some(ColumnType::Longitude)
    } else if LATITUDE_REGEX.is_match(column_name) {
        Some(ColumnType::Latitude)
    } else {
        None
    }
}

pub fn mentions_region(value: &str) -> bool {
    let value = value.to_lowercase();
    SPANISH_REGIONS.iter().any(|region| value.contains(region))
}

/// Whether enough of the first non-empty values name a Spanish region.
pub fn looks_like_geo_names(non_empty_values: &[&str]) -> bool {
    let probe = &non_empty_values[..non_empty_values.len().min(GEO_PROBE_LIMIT)];
    if probe.is_empty() {
        return false;
    }
    let matches = probe.iter().filter(|value| mentions_region(value)).count();
    matches as f64 / probe.len() as f64 >= GEO_NAME_THRESHOLD
}
