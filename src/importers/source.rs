use crate::error::AnalysisError;
use anyhow::{Context, Result};
use async_trait::async_trait;
use futures::StreamExt;
use std::time::Duration;
use tracing::debug;

/// Retrieves raw resource content for the fetchers.
#[async_trait]
pub trait DataSource: Send + Sync {
    /// Full response body.
    async fn fetch_bytes(&self, locator: &str) -> Result<Vec<u8>, AnalysisError>;

    /// At most `max_lines` lines from the start of the resource.
    /// Implementations stop reading once enough lines have been received.
    async fn fetch_lines(
        &self,
        locator: &str,
        max_lines: usize,
    ) -> Result<Vec<String>, AnalysisError>;
}

/// HTTP implementation backed by a shared reqwest client.
#[derive(Debug, Clone)]
pub struct HttpDataSource {
    client: reqwest::Client,
}

impl HttpDataSource {
    pub fn new(timeout: Duration, user_agent: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self { client })
    }

    async fn get(&self, locator: &str) -> Result<reqwest::Response, AnalysisError> {
        let response = self
            .client
            .get(locator)
            .send()
            .await
            .map_err(|err| AnalysisError::fetch(locator, describe_error(&err)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AnalysisError::HttpStatus {
                locator: locator.to_string(),
                status: status.as_u16(),
            });
        }
        Ok(response)
    }
}

fn describe_error(err: &reqwest::Error) -> String {
    if err.is_timeout() {
        "request timed out".to_string()
    } else {
        err.to_string()
    }
}

#[async_trait]
impl DataSource for HttpDataSource {
    async fn fetch_bytes(&self, locator: &str) -> Result<Vec<u8>, AnalysisError> {
        let response = self.get(locator).await?;
        let body = response
            .bytes()
            .await
            .map_err(|err| AnalysisError::fetch(locator, describe_error(&err)))?;
        debug!("Fetched {} bytes from {}", body.len(), locator);
        Ok(body.to_vec())
    }

    async fn fetch_lines(
        &self,
        locator: &str,
        max_lines: usize,
    ) -> Result<Vec<String>, AnalysisError> {
        let response = self.get(locator).await?;
        let mut stream = response.bytes_stream();
        let mut buffer: Vec<u8> = Vec::new();
        let mut newlines = 0;

        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|err| AnalysisError::fetch(locator, describe_error(&err)))?;
            newlines += chunk.iter().filter(|b| **b == b'\n').count();
            buffer.extend_from_slice(&chunk);
            if newlines >= max_lines {
                // The rest of the body is never read
                break;
            }
        }
        debug!(
            "Read {} bytes ({} lines) from {}",
            buffer.len(),
            newlines,
            locator
        );

        Ok(split_lines(&buffer, max_lines))
    }
}

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

/// Decodes a payload as UTF-8, falling back to Latin-1.
///
/// A multi-byte sequence cut at the very end of a partial read is dropped
/// rather than triggering the fallback.
pub fn decode_text(bytes: &[u8]) -> String {
    let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
    match std::str::from_utf8(bytes) {
        Ok(text) => text.to_string(),
        Err(err) if err.error_len().is_none() => {
            String::from_utf8_lossy(&bytes[..err.valid_up_to()]).into_owned()
        }
        Err(_) => bytes.iter().map(|&b| char::from(b)).collect(),
    }
}

pub fn split_lines(bytes: &[u8], max_lines: usize) -> Vec<String> {
    decode_text(bytes)
        .lines()
        .take(max_lines)
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_utf8() {
        assert_eq!(decode_text("Andalucía".as_bytes()), "Andalucía");
    }

    #[test]
    fn test_decode_strips_bom() {
        let mut bytes = UTF8_BOM.to_vec();
        bytes.extend_from_slice(b"a,b");
        assert_eq!(decode_text(&bytes), "a,b");
    }

    #[test]
    fn test_decode_latin1_fallback() {
        // "Cataluña" in ISO-8859-1
        let bytes = b"Catalu\xf1a";
        assert_eq!(decode_text(bytes), "Cataluña");
    }

    #[test]
    fn test_decode_truncated_sequence() {
        let mut bytes = "año".as_bytes().to_vec();
        bytes.extend_from_slice(&"ñ".as_bytes()[..1]);
        assert_eq!(decode_text(&bytes), "año");
    }

    #[test]
    fn test_split_lines() {
        let lines = split_lines(b"a,b\r\n1,2\n3,4\n5,6", 3);
        assert_eq!(lines, vec!["a,b", "1,2", "3,4"]);
    }
}
