//! In-memory fixtures for exercising the pipeline without network access.

use crate::error::AnalysisError;
use crate::importers::DataSource;
use crate::importers::source::split_lines;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

pub mod http;

#[derive(Debug, Clone)]
enum CannedResponse {
    Body(Vec<u8>),
    Status(u16),
    Unreachable(String),
}

/// A [`DataSource`] answering from canned bodies keyed by locator.
///
/// Unknown locators answer with a 404 status. Every requested locator is
/// recorded so tests can check what was fetched.
#[derive(Debug, Default)]
pub struct StaticDataSource {
    responses: HashMap<String, CannedResponse>,
    requests: Mutex<Vec<String>>,
}

impl StaticDataSource {
    pub fn with_body(mut self, locator: &str, body: impl Into<Vec<u8>>) -> Self {
        self.responses
            .insert(locator.to_string(), CannedResponse::Body(body.into()));
        self
    }

    pub fn with_status(mut self, locator: &str, status: u16) -> Self {
        self.responses
            .insert(locator.to_string(), CannedResponse::Status(status));
        self
    }

    /// Simulates a connection failure or timeout.
    pub fn with_failure(mut self, locator: &str, reason: &str) -> Self {
        self.responses.insert(
            locator.to_string(),
            CannedResponse::Unreachable(reason.to_string()),
        );
        self
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    fn respond(&self, locator: &str) -> Result<Vec<u8>, AnalysisError> {
        self.requests.lock().unwrap().push(locator.to_string());
        match self.responses.get(locator) {
            Some(CannedResponse::Body(body)) => Ok(body.clone()),
            Some(CannedResponse::Status(status)) => Err(AnalysisError::HttpStatus {
                locator: locator.to_string(),
                status: *status,
            }),
            Some(CannedResponse::Unreachable(reason)) => Err(AnalysisError::fetch(locator, reason)),
            None => Err(AnalysisError::HttpStatus {
                locator: locator.to_string(),
                status: 404,
            }),
        }
    }
}

#[async_trait]
impl DataSource for StaticDataSource {
    async fn fetch_bytes(&self, locator: &str) -> Result<Vec<u8>, AnalysisError> {
        self.respond(locator)
    }

    async fn fetch_lines(
        &self,
        locator: &str,
        max_lines: usize,
    ) -> Result<Vec<String>, AnalysisError> {
        let body = self.respond(locator)?;
        Ok(split_lines(&body, max_lines))
    }
}
