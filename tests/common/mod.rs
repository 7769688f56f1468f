use async_trait::async_trait;
use dataprobe::error::AnalysisError;
use dataprobe::importers::DataSource;
use dataprobe::importers::source::split_lines;

pub mod fixtures;

/// Serves different bodies to line-based and whole-body reads of the same locator.
///
/// Lets a test make the CSV fetcher, which reads lines, see something else than
/// the JSON and PC-Axis fetchers, which read the whole body.
pub struct SplitDataSource {
    pub lines: &'static str,
    pub body: &'static str,
}

#[async_trait]
impl DataSource for SplitDataSource {
    async fn fetch_bytes(&self, _locator: &str) -> Result<Vec<u8>, AnalysisError> {
        Ok(self.body.as_bytes().to_vec())
    }

    async fn fetch_lines(
        &self,
        _locator: &str,
        max_lines: usize,
    ) -> Result<Vec<String>, AnalysisError> {
        Ok(split_lines(self.lines.as_bytes(), max_lines))
    }
}
