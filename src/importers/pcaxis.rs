use super::source::decode_text;
use super::{DataSource, Fetcher, Format};
use crate::datamodel::{RawRow, RawValue};
use crate::error::AnalysisError;
use async_trait::async_trait;
use nom::{
    IResult, Parser,
    branch::alt,
    bytes::complete::{take_while, take_while1},
    character::complete::{char, multispace0},
    combinator::opt,
    multi::{many1, separated_list0, separated_list1},
    sequence::{delimited, preceded},
};
use tracing::debug;

/// Column holding the cell value in decoded rows.
pub const VALUE_COLUMN: &str = "Value";

/// Cell markers used by statistical offices for missing or confidential data.
const MISSING_MARKERS: [&str; 8] = [".", "..", "...", "....", ".....", "......", "-", ":"];

/// Decodes PC-Axis statistical cubes into one row per cell.
#[derive(Debug, Clone, Default)]
pub struct PcAxisFetcher;

#[async_trait]
impl Fetcher for PcAxisFetcher {
    async fn fetch(
        &self,
        source: &dyn DataSource,
        locator: &str,
        max_rows: usize,
    ) -> Result<Vec<RawRow>, AnalysisError> {
        let body = source.fetch_bytes(locator).await?;
        let cube = PcAxisCube::parse(&decode_text(&body))?;
        debug!(
            "PC-Axis cube from {} has {} dimensions and {} cells",
            locator,
            cube.dimensions.len(),
            cube.data.len()
        );
        Ok(cube.expand(max_rows))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Dimension {
    pub name: String,
    pub values: Vec<String>,
}

/// Dimensions in stub then heading order, with the flat data array.
#[derive(Debug, Clone, PartialEq)]
pub struct PcAxisCube {
    pub title: Option<String>,
    pub dimensions: Vec<Dimension>,
    pub data: Vec<String>,
}

/// One `KEYWORD[lang]("subkey")=value` statement, value left unparsed.
#[derive(Debug, PartialEq)]
struct Statement<'a> {
    keyword: &'a str,
    language: Option<&'a str>,
    subkeys: Vec<&'a str>,
    value: &'a str,
}

impl PcAxisCube {
    pub fn parse(text: &str) -> Result<Self, AnalysisError> {
        let statements = split_statements(text)
            .into_iter()
            .filter_map(|raw| parse_statement(raw).ok().map(|(_, statement)| statement))
            // Translations are ignored, only the default language is decoded
            .filter(|statement| statement.language.is_none())
            .collect::<Vec<_>>();

        let find = |keyword: &str| {
            statements
                .iter()
                .find(|s| s.keyword.eq_ignore_ascii_case(keyword) && s.subkeys.is_empty())
        };

        let data = find("DATA")
            .map(|s| parse_data(s.value))
            .ok_or_else(|| AnalysisError::parse(Format::PcAxis, "missing DATA keyword"))?;

        let mut names = Vec::new();
        for keyword in ["STUB", "HEADING"] {
            if let Some(statement) = find(keyword) {
                names.extend(parse_value_list(statement.value)?);
            }
        }
        if names.is_empty() {
            return Err(AnalysisError::parse(
                Format::PcAxis,
                "missing STUB and HEADING keywords",
            ));
        }

        let dimensions = names
            .into_iter()
            .map(|name| {
                let statement = statements
                    .iter()
                    .find(|s| {
                        s.keyword.eq_ignore_ascii_case("VALUES")
                            && s.subkeys.first() == Some(&name.as_str())
                    })
                    .ok_or_else(|| {
                        AnalysisError::parse(
                            Format::PcAxis,
                            format!("missing VALUES for dimension {}", name),
                        )
                    })?;
                Ok(Dimension {
                    values: parse_value_list(statement.value)?,
                    name,
                })
            })
            .collect::<Result<Vec<_>, AnalysisError>>()?;

        let expected = dimensions
            .iter()
            .try_fold(1_usize, |acc, d| acc.checked_mul(d.values.len()))
            .ok_or_else(|| AnalysisError::parse(Format::PcAxis, "cube is too large"))?;
        if expected != data.len() {
            return Err(AnalysisError::parse(
                Format::PcAxis,
                format!("DATA has {} cells, expected {}", data.len(), expected),
            ));
        }

        let title = match find("TITLE") {
            Some(statement) => parse_value_list(statement.value)?.into_iter().next(),
            None => None,
        };

        Ok(Self {
            title,
            dimensions,
            data,
        })
    }

    /// Cross-product expansion of the first `max_rows` cells.
    /// The last dimension varies fastest, matching the DATA layout.
    pub fn expand(&self, max_rows: usize) -> Vec<RawRow> {
        let mut rows = Vec::with_capacity(self.data.len().min(max_rows));
        for (cell, value) in self.data.iter().enumerate().take(max_rows) {
            let mut indices = vec![0_usize; self.dimensions.len()];
            let mut remainder = cell;
            for (position, dimension) in self.dimensions.iter().enumerate().rev() {
                let len = dimension.values.len();
                indices[position] = remainder % len;
                remainder /= len;
            }

            let mut row = RawRow::new();
            for (dimension, index) in self.dimensions.iter().zip(indices) {
                row.push(dimension.name.as_str(), dimension.values[index].as_str());
            }
            row.push(VALUE_COLUMN, RawValue::from(value.as_str()));
            rows.push(row);
        }
        rows
    }
}

/// Splits on `;` outside double quotes.
fn split_statements(text: &str) -> Vec<&str> {
    let mut statements = Vec::new();
    let mut in_quotes = false;
    let mut start = 0;
    for (index, c) in text.char_indices() {
        match c {
            '"' => in_quotes = !in_quotes,
            ';' if !in_quotes => {
                statements.push(&text[start..index]);
                start = index + 1;
            }
            _ => {}
        }
    }
    statements
        .into_iter()
        .filter(|statement| !statement.trim().is_empty())
        .collect()
}

fn keyword(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| c.is_ascii_alphanumeric() || c == '-' || c == '_').parse(input)
}

fn quoted(input: &str) -> IResult<&str, &str> {
    delimited(char('"'), take_while(|c: char| c != '"'), char('"')).parse(input)
}

fn language(input: &str) -> IResult<&str, &str> {
    delimited(char('['), take_while1(|c: char| c != ']'), char(']')).parse(input)
}

fn subkeys(input: &str) -> IResult<&str, Vec<&str>> {
    delimited(
        char('('),
        separated_list1(delimited(multispace0, char(','), multispace0), quoted),
        char(')'),
    )
    .parse(input)
}

fn parse_statement(input: &str) -> IResult<&str, Statement<'_>> {
    let (value, (keyword, language, subkeys, _)) = (
        preceded(multispace0, keyword),
        opt(language),
        opt(subkeys),
        preceded(multispace0, char('=')),
    )
        .parse(input)?;
    Ok((
        "",
        Statement {
            keyword,
            language,
            subkeys: subkeys.unwrap_or_default(),
            value,
        },
    ))
}

/// A quoted string, possibly continued by adjacent quoted strings, or a bare token.
fn value_item(input: &str) -> IResult<&str, String> {
    alt((
        many1(preceded(multispace0, quoted)).map(|parts: Vec<&str>| parts.concat()),
        preceded(
            multispace0,
            take_while1(|c: char| c != ',' && !c.is_whitespace()),
        )
        .map(str::to_string),
    ))
    .parse(input)
}

fn parse_value_list(value: &str) -> Result<Vec<String>, AnalysisError> {
    let (rest, items) = separated_list0(preceded(multispace0, char(',')), value_item)
        .parse(value)
        .map_err(|err| AnalysisError::parse(Format::PcAxis, err))?;
    if !rest.trim().is_empty() {
        return Err(AnalysisError::parse(
            Format::PcAxis,
            format!("unexpected trailing content: {}", rest.trim()),
        ));
    }
    Ok(items)
}

fn parse_data(value: &str) -> Vec<String> {
    value
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|token| !token.is_empty())
        .map(|token| {
            let token = token.trim_matches('"');
            if MISSING_MARKERS.contains(&token) {
                String::new()
            } else {
                token.to_string()
            }
        })
        .collect()
}
