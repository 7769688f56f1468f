use serde::{Deserialize, Serialize};
use std::fmt;
use utoipa::ToSchema;

/// A chart recommendation referencing columns by normalized name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Suggestion {
    Timeseries {
        title: String,
        x: String,
        y: String,
    },
    Barchart {
        title: String,
        category: String,
        value: String,
    },
    Piechart {
        title: String,
        category: String,
        value: String,
    },
    Heatmap {
        title: String,
        lat: String,
        lon: String,
    },
    Choropleth {
        title: String,
        geo_name: String,
        value: String,
    },
    Table {
        title: String,
    },
}

/// Discriminant of [`Suggestion`], used to rank suggestions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SuggestionKind {
    Timeseries,
    Barchart,
    Piechart,
    Heatmap,
    Choropleth,
    Table,
}

impl fmt::Display for SuggestionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SuggestionKind::Timeseries => "timeseries",
            SuggestionKind::Barchart => "barchart",
            SuggestionKind::Piechart => "piechart",
            SuggestionKind::Heatmap => "heatmap",
            SuggestionKind::Choropleth => "choropleth",
            SuggestionKind::Table => "table",
        };
        write!(f, "{}", s)
    }
}

impl Suggestion {
    pub fn timeseries(x: &str, y: &str) -> Self {
        Suggestion::Timeseries {
            title: format!("Time series: {} by {}", y, x),
            x: x.to_string(),
            y: y.to_string(),
        }
    }

    pub fn barchart(category: &str, value: &str) -> Self {
        Suggestion::Barchart {
            title: format!("Bars by {} ({})", category, value),
            category: category.to_string(),
            value: value.to_string(),
        }
    }

    pub fn piechart(category: &str, value: &str) -> Self {
        Suggestion::Piechart {
            title: format!("Pie by {} ({})", category, value),
            category: category.to_string(),
            value: value.to_string(),
        }
    }

    pub fn heatmap(lat: &str, lon: &str) -> Self {
        Suggestion::Heatmap {
            title: format!("Heatmap by coordinates ({} / {})", lat, lon),
            lat: lat.to_string(),
            lon: lon.to_string(),
        }
    }

    pub fn choropleth(geo_name: &str, value: &str) -> Self {
        Suggestion::Choropleth {
            title: format!("Value by geographic unit ({} - {})", geo_name, value),
            geo_name: geo_name.to_string(),
            value: value.to_string(),
        }
    }

    pub fn table() -> Self {
        Suggestion::Table {
            title: "Show table (raw view)".to_string(),
        }
    }

    pub fn kind(&self) -> SuggestionKind {
        match self {
            Suggestion::Timeseries { .. } => SuggestionKind::Timeseries,
            Suggestion::Barchart { .. } => SuggestionKind::Barchart,
            Suggestion::Piechart { .. } => SuggestionKind::Piechart,
            Suggestion::Heatmap { .. } => SuggestionKind::Heatmap,
            Suggestion::Choropleth { .. } => SuggestionKind::Choropleth,
            Suggestion::Table { .. } => SuggestionKind::Table,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            Suggestion::Timeseries { title, .. }
            | Suggestion::Barchart { title, .. }
            | Suggestion::Piechart { title, .. }
            | Suggestion::Heatmap { title, .. }
            | Suggestion::Choropleth { title, .. }
            | Suggestion::Table { title } => title,
        }
    }
}
