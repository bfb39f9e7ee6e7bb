use crate::domain::models::{LogWorkflowsRequest, LogWorkflowsResponse};
use crate::utils::error::Result;
use async_trait::async_trait;

/// What the HTTP client needs to know about its configuration.
pub trait ConfigProvider: Send + Sync {
    fn api_url(&self) -> &str;
    fn api_key(&self) -> Option<&str>;
    fn bearer_token(&self) -> Option<&str>;
    fn timeout_seconds(&self) -> u64;
    fn raise_on_unexpected_status(&self) -> bool;
    fn verify_ssl(&self) -> bool;
}

/// Destination of buffered workflow traces.
#[async_trait]
pub trait TelemetrySink: Send + Sync {
    /// `Ok(None)` when the server answered with an undocumented status and the
    /// client is configured not to raise on it.
    async fn ingest_workflows(
        &self,
        request: LogWorkflowsRequest,
    ) -> Result<Option<LogWorkflowsResponse>>;
}
