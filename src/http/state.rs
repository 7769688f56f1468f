use crate::analyzer::Analyzer;
use std::sync::Arc;

#[derive(Clone)]
pub struct HttpServerState {
    pub name: Arc<String>,
    pub analyzer: Arc<Analyzer>,
}
