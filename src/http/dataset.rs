use super::app_error::AppError;
use super::state::HttpServerState;
use crate::datamodel::{AnalysisResult, SampleSize, TimeSeriesResult};
use axum::Json;
use axum::extract::{Query, State};
use serde::Deserialize;
use std::str::FromStr;
use tracing::debug;

#[derive(Debug, Deserialize)]
pub struct AnalyzeQuery {
    pub url: String,
    pub format: Option<String>,
    pub rows: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct IneQuery {
    pub id: String,
    pub rows: Option<String>,
}

fn parse_rows(rows: Option<&str>) -> Result<Option<SampleSize>, AppError> {
    rows.map(SampleSize::from_str)
        .transpose()
        .map_err(|message| AppError::bad_request(anyhow::anyhow!(message)))
}

/// Analyze an open-data resource.
///
/// Samples the resource, infers a typed schema and suggests charts for it.
/// When the format cannot be told from the URL, CSV, JSON and PC-Axis are tried in turn.
#[utoipa::path(
    get,
    path = "/api/dataset/analyze",
    tag = "Dataset",
    params(
        ("url" = String, Query, description = "Resource URL", example = "https://datos.example.org/paro.csv"),
        ("format" = Option<String>, Query, description = "Format override. One of csv, json, pc-axis, rdf"),
        ("rows" = Option<String>, Query, description = "Number of rows to sample. 0 or all for the configured maximum"),
    ),
    responses(
        (status = 200, description = "Analysis result", body = AnalysisResult),
        (status = 400, description = "Bad Request", body = AppError),
        (status = 422, description = "Unprocessable Entity", body = AppError),
        (status = 502, description = "Bad Gateway", body = AppError),
    )
)]
pub async fn analyze_dataset(
    State(state): State<HttpServerState>,
    Query(AnalyzeQuery { url, format, rows }): Query<AnalyzeQuery>,
) -> Result<Json<AnalysisResult>, AppError> {
    if url.trim().is_empty() {
        return Err(AppError::bad_request(anyhow::anyhow!(
            "The url parameter must not be empty"
        )));
    }
    let sample = state.analyzer.sample_size(parse_rows(rows.as_deref())?);
    debug!("Analyzing {} with {:?}", url, sample);

    let result = state
        .analyzer
        .analyze(url.trim(), format.as_deref(), sample)
        .await?;
    Ok(Json(result))
}

/// Fetch an INE table as aligned series.
///
/// Accepts a bare table identifier or any INE URL carrying one. The delegate output is
/// returned as is, without chart suggestions.
#[utoipa::path(
    get,
    path = "/api/dataset/ine",
    tag = "Dataset",
    params(
        ("id" = String, Query, description = "INE table identifier or URL", example = "50902"),
        ("rows" = Option<String>, Query, description = "Observations kept per series. 0 or all for the configured maximum"),
    ),
    responses(
        (status = 200, description = "Labels, aligned series and the flat table view", body = TimeSeriesResult),
        (status = 400, description = "Bad Request", body = AppError),
        (status = 422, description = "Unprocessable Entity", body = AppError),
        (status = 502, description = "Bad Gateway", body = AppError),
    )
)]
pub async fn ine_dataset(
    State(state): State<HttpServerState>,
    Query(IneQuery { id, rows }): Query<IneQuery>,
) -> Result<Json<TimeSeriesResult>, AppError> {
    let sample = state.analyzer.sample_size(parse_rows(rows.as_deref())?);
    let max_rows = sample.resolve(state.analyzer.settings().max_sample_rows);
    let result = state
        .analyzer
        .ine()
        .fetch_and_normalize(id.trim(), max_rows)
        .await?;
    Ok(Json(result))
}
