use crate::core::client::{Endpoint, GalileoClient, Parsed, Response};
use crate::core::integration::{Integrations, Provider, ProviderCredentials};
use crate::core::telemetry::{
    bypass_if_disabled_blocking, warn_on_infrastructure_error, LoggingSwitch,
};
use crate::domain::enums::IntegrationName;
use crate::domain::models::{Dataset, LogWorkflowsRequest, LogWorkflowsResponse};
use crate::domain::ports::{ConfigProvider, TelemetrySink};
use crate::utils::error::Result;
use std::future::Future;
use tokio::runtime::{Builder, Runtime};

/// Synchronous facade over [`GalileoClient`].
///
/// Owns a current-thread runtime, so it must not be used from inside another
/// tokio runtime.
pub struct BlockingClient {
    runtime: Runtime,
    inner: GalileoClient,
}

impl BlockingClient {
    pub fn new<C: ConfigProvider + ?Sized>(config: &C) -> Result<Self> {
        let runtime = Builder::new_current_thread().enable_all().build()?;
        let inner = GalileoClient::new(config)?;
        Ok(Self { runtime, inner })
    }

    pub fn async_client(&self) -> &GalileoClient {
        &self.inner
    }

    pub fn block_on<F: Future>(&self, future: F) -> F::Output {
        self.runtime.block_on(future)
    }

    pub fn execute_detailed<E: Endpoint>(&self, endpoint: &E) -> Result<Response<E::Output>> {
        self.block_on(self.inner.execute_detailed(endpoint))
    }

    pub fn execute<E: Endpoint>(&self, endpoint: &E) -> Result<Option<Parsed<E::Output>>> {
        self.block_on(self.inner.execute(endpoint))
    }

    pub fn expect_success<E: Endpoint>(&self, endpoint: &E) -> Result<E::Output> {
        self.block_on(self.inner.expect_success(endpoint))
    }

    pub fn healthcheck(&self) -> Result<bool> {
        self.block_on(self.inner.healthcheck())
    }

    pub fn list_all_datasets(&self, page_size: i64) -> Result<Vec<Dataset>> {
        self.block_on(self.inner.list_all_datasets(page_size))
    }

    pub fn ingest_workflows(
        &self,
        request: LogWorkflowsRequest,
    ) -> Result<Option<LogWorkflowsResponse>> {
        self.block_on(self.inner.ingest_workflows(request))
    }

    /// Blocking ingestion routed through the kill switch: nothing is sent
    /// while `switch` is disabled, and transport failures only warn.
    pub fn log_workflows(
        &self,
        switch: LoggingSwitch,
        request: LogWorkflowsRequest,
    ) -> Result<Option<LogWorkflowsResponse>> {
        let sent = bypass_if_disabled_blocking(switch, "log_workflows", || {
            self.block_on(warn_on_infrastructure_error(
                "log_workflows",
                self.inner.ingest_workflows(request),
            ))
        })?;
        Ok(sent.flatten())
    }

    pub fn list_integrations(&self) -> Result<Vec<Provider>> {
        self.block_on(Integrations::new(self.inner.clone()).list())
    }

    pub fn get_integration(&self, name: IntegrationName) -> Result<Option<Provider>> {
        self.block_on(Integrations::new(self.inner.clone()).get(name))
    }

    pub fn create_integration(&self, credentials: ProviderCredentials) -> Result<Provider> {
        self.block_on(Integrations::new(self.inner.clone()).create(credentials))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GalileoConfig;
    use crate::domain::types::AdditionalProperties;

    #[test]
    fn test_disabled_switch_sends_nothing() {
        // nothing listens on this port; a real request would fail
        let config = GalileoConfig::new("https://console.demo.galileo.ai")
            .with_api_url("http://127.0.0.1:9")
            .with_api_key("k");
        let client = BlockingClient::new(&config).unwrap();
        let request = LogWorkflowsRequest {
            workflows: vec![],
            project_id: Default::default(),
            project_name: Default::default(),
            log_stream_id: Default::default(),
            log_stream_name: Default::default(),
            additional_properties: AdditionalProperties::new(),
        };

        let result = client.log_workflows(LoggingSwitch::disabled(), request).unwrap();
        assert!(result.is_none());
    }
}
