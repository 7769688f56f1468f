use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use utoipa::ToSchema;

/// Semantic type inferred for a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ColumnType {
    Numeric,
    Datetime,
    Latitude,
    Longitude,
    GeoName,
    String,
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ColumnType::Numeric => "numeric",
            ColumnType::Datetime => "datetime",
            ColumnType::Latitude => "latitude",
            ColumnType::Longitude => "longitude",
            ColumnType::GeoName => "geo_name",
            ColumnType::String => "string",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for ColumnType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "numeric" => Ok(ColumnType::Numeric),
            "datetime" => Ok(ColumnType::Datetime),
            "latitude" => Ok(ColumnType::Latitude),
            "longitude" => Ok(ColumnType::Longitude),
            "geo_name" => Ok(ColumnType::GeoName),
            "string" => Ok(ColumnType::String),
            _ => Err(format!("Unknown column type: {}", s)),
        }
    }
}

/// Inferred description of one normalized column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ColumnSchema {
    pub name: String,
    pub inferred_type: ColumnType,
    /// Up to five non-empty values, in sample order
    pub sample_values: Vec<String>,
    /// Distinct lower-cased values within the probed sample only
    pub unique_count_estimate: usize,
}

impl ColumnSchema {
    pub fn new(name: impl Into<String>, inferred_type: ColumnType) -> Self {
        Self {
            name: name.into(),
            inferred_type,
            sample_values: Vec::new(),
            unique_count_estimate: 0,
        }
    }

    pub fn with_samples(mut self, sample_values: Vec<String>, unique_count_estimate: usize) -> Self {
        self.sample_values = sample_values;
        self.unique_count_estimate = unique_count_estimate;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_type_roundtrip() {
        for column_type in [
            ColumnType::Numeric,
            ColumnType::Datetime,
            ColumnType::Latitude,
            ColumnType::Longitude,
            ColumnType::GeoName,
            ColumnType::String,
        ] {
            assert_eq!(
                column_type.to_string().parse::<ColumnType>(),
                Ok(column_type)
            );
            // serde and Display agree
            assert_eq!(
                serde_json::to_value(column_type).unwrap(),
                serde_json::Value::String(column_type.to_string())
            );
        }
        assert!("location".parse::<ColumnType>().is_err());
    }
}
