use crate::error::AnalysisError;
use axum::Json;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use serde_json::json;
use tracing::error;
use utoipa::ToSchema;

#[derive(Debug, ToSchema)]
pub enum AppError {
    #[schema(example = "Internal Server Error", value_type = String)]
    InternalServerError(anyhow::Error),
    #[schema(example = "Format not supported: xlsx", value_type = String)]
    BadRequest(anyhow::Error),
    #[schema(example = "No data could be sampled (attempted formats: csv, json, pc-axis)", value_type = String)]
    UnprocessableEntity(anyhow::Error),
    #[schema(example = "Fetching https://example.org/data.csv returned HTTP status 404", value_type = String)]
    BadGateway(anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::InternalServerError(error) => {
                error!("Internal Server Error: {}", error);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal Server Error".to_string(),
                )
            }
            AppError::BadRequest(error) => (StatusCode::BAD_REQUEST, error.to_string()),
            AppError::UnprocessableEntity(error) => {
                (StatusCode::UNPROCESSABLE_ENTITY, error.to_string())
            }
            AppError::BadGateway(error) => (StatusCode::BAD_GATEWAY, error.to_string()),
        };
        let body = Json(json!({ "error": message }));
        (status, body).into_response()
    }
}

impl From<AnalysisError> for AppError {
    fn from(err: AnalysisError) -> Self {
        match err {
            AnalysisError::UnsupportedFormat(_) | AnalysisError::InvalidTableId(_) => {
                Self::BadRequest(err.into())
            }
            AnalysisError::Parse { .. } | AnalysisError::NoData { .. } => {
                Self::UnprocessableEntity(err.into())
            }
            AnalysisError::Fetch { .. } | AnalysisError::HttpStatus { .. } => {
                Self::BadGateway(err.into())
            }
        }
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        Self::InternalServerError(err)
    }
}

impl AppError {
    pub fn bad_request(err: impl Into<anyhow::Error>) -> Self {
        Self::BadRequest(err.into())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::UnprocessableEntity(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::BadGateway(_) => StatusCode::BAD_GATEWAY,
        }
    }
}
