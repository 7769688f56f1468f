use once_cell::sync::Lazy;
use regex::Regex;

static CAMEL_BOUNDARY_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\p{Ll}|\d)(\p{Lu})").expect("Failed to compile camel case regex")
});

/// Time dimension markers such as `T1` or `t12` found in statistical tables.
static PERIOD_CODE_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\bT\d+\b").expect("Failed to compile period code regex"));

/// Trailing segment of the column counting sequence items left out of a flattened row.
pub const OVERFLOW_MARKER: &str = "(more)";

/// Turns a source column key into a readable, title-cased column name.
///
/// `fecha_ref`, `fechaRef` and `FECHA-REF` all become `Fecha Ref`. Keys made only of
/// period codes or punctuation normalize to an empty string. A trailing
/// [`OVERFLOW_MARKER`] is kept as is.
pub fn normalize_key(key: &str) -> String {
    if let Some(stem) = key.strip_suffix(OVERFLOW_MARKER) {
        let stem = normalize_key(stem);
        return if stem.is_empty() {
            OVERFLOW_MARKER.to_string()
        } else {
            format!("{} {}", stem, OVERFLOW_MARKER)
        };
    }

    let spaced = key.replace(['_', '-'], " ");
    let split = CAMEL_BOUNDARY_REGEX.replace_all(&spaced, "$1 $2");
    let without_periods = PERIOD_CODE_REGEX.replace_all(&split, " ");

    let cleaned: String = without_periods
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || c.is_whitespace() || is_latin1_letter(*c))
        .collect();

    cleaned
        .split_whitespace()
        .map(title_case)
        .collect::<Vec<_>>()
        .join(" ")
}

fn is_latin1_letter(c: char) -> bool {
    ('\u{C0}'..='\u{FF}').contains(&c) && c.is_alphabetic()
}

fn title_case(token: &str) -> String {
    let mut chars = token.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}
