use super::StaticDataSource;
use crate::analyzer::{Analyzer, AnalyzerSettings};
use crate::http::server::build_app_routes;
use crate::http::state::HttpServerState;
/// HTTP testing utilities
use anyhow::Result;
use axum::body::Body;
use axum::http::{HeaderMap, Request, StatusCode};
use std::sync::Arc;
use tower::ServiceExt; // for `oneshot`

/// HTTP test client driving the production routes over canned resources
pub struct TestApp {
    app: axum::Router,
    source: Arc<StaticDataSource>,
}

impl TestApp {
    pub fn new(source: StaticDataSource) -> Self {
        Self::with_settings(source, AnalyzerSettings::default())
    }

    pub fn with_settings(source: StaticDataSource, settings: AnalyzerSettings) -> Self {
        let source = Arc::new(source);
        let state = HttpServerState {
            name: Arc::new("DataProbe Test".to_string()),
            analyzer: Arc::new(Analyzer::new(source.clone(), settings)),
        };
        let app = build_app_routes(state, 10);

        Self { app, source }
    }

    /// Locators fetched so far
    pub fn requests(&self) -> Vec<String> {
        self.source.requests()
    }

    /// Send a GET request
    pub async fn get(&self, path: &str) -> Result<TestResponse> {
        let request = Request::builder()
            .method("GET")
            .uri(path)
            .body(Body::empty())?;

        let response = self.app.clone().oneshot(request).await?;
        Ok(TestResponse::new(response).await)
    }

    /// GET /api/dataset/analyze with the given query parameters, URL-encoded
    pub async fn analyze(&self, params: &[(&str, &str)]) -> Result<TestResponse> {
        let query = url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(params)
            .finish();
        self.get(&format!("/api/dataset/analyze?{}", query)).await
    }
}

/// Test response wrapper for easier assertions
pub struct TestResponse {
    status: StatusCode,
    headers: HeaderMap,
    body: String,
}

impl TestResponse {
    async fn new(response: axum::response::Response) -> Self {
        let status = response.status();
        let headers = response.headers().clone();
        let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap_or_default();
        let body = String::from_utf8_lossy(&body_bytes).to_string();

        Self {
            status,
            headers,
            body,
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Parse response body as JSON
    pub fn json<T>(&self) -> Result<T>
    where
        T: serde::de::DeserializeOwned,
    {
        serde_json::from_str(&self.body).map_err(Into::into)
    }

    /// The `error` field of an error body
    pub fn error_message(&self) -> Option<String> {
        self.json::<serde_json::Value>()
            .ok()?
            .get("error")?
            .as_str()
            .map(str::to_string)
    }

    pub fn assert_status(&self, expected: StatusCode) -> &Self {
        assert_eq!(
            self.status, expected,
            "Expected status {}, got {}. Body: {}",
            expected, self.status, self.body
        );
        self
    }

    pub fn assert_body_contains(&self, text: &str) -> &Self {
        assert!(
            self.body.contains(text),
            "Expected body to contain '{}', but body was: {}",
            text,
            self.body
        );
        self
    }
}
