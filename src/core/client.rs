use crate::core::endpoints::{Healthcheck, ListDatasets, LogWorkflows};
use crate::domain::models::{Dataset, HttpValidationError, LogWorkflowsRequest, LogWorkflowsResponse};
use crate::domain::ports::{ConfigProvider, TelemetrySink};
use crate::utils::error::{GalileoError, Result};
use crate::utils::validation::{validate_positive_number, validate_url};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, AUTHORIZATION};
use reqwest::{Client, Method};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

const API_KEY_HEADER: &str = "galileo-api-key";
const CLIENT_TYPE_HEADER: &str = "client-type";
const CLIENT_TYPE: &str = "sdk-rust";

/// One REST operation: where it goes, what it sends, and what a 200 decodes into.
pub trait Endpoint: Send + Sync {
    type Output: DeserializeOwned + Send;

    fn method(&self) -> Method;

    /// Path relative to the API base URL, starting with `/`.
    fn path(&self) -> String;

    fn query(&self) -> Vec<(&'static str, String)> {
        Vec::new()
    }

    fn body(&self) -> Result<Option<Value>> {
        Ok(None)
    }

    /// Turns raw 200 content into JSON. An empty body reads as `null`.
    fn decode_body(&self, content: &[u8]) -> Result<Value> {
        if content.is_empty() {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_slice(content)?)
    }

    /// Decodes a 200 body. Overridden by endpoints that need request context
    /// to pick a variant.
    fn parse_success(&self, value: Value) -> Result<Self::Output> {
        Ok(serde_json::from_value(value)?)
    }
}

/// Outcome of a documented status.
#[derive(Debug, Clone, PartialEq)]
pub enum Parsed<T> {
    Success(T),
    ValidationError(HttpValidationError),
}

impl<T> Parsed<T> {
    pub fn is_success(&self) -> bool {
        matches!(self, Parsed::Success(_))
    }

    pub fn into_success(self) -> Option<T> {
        match self {
            Parsed::Success(value) => Some(value),
            Parsed::ValidationError(_) => None,
        }
    }
}

/// Full response record. `parsed` is `None` for undocumented statuses.
#[derive(Debug, Clone)]
pub struct Response<T> {
    pub status: u16,
    pub headers: HeaderMap,
    pub content: Vec<u8>,
    pub parsed: Option<Parsed<T>>,
}

/// Shared HTTP client. Cheap to clone; clones share the connection pool.
#[derive(Debug, Clone)]
pub struct GalileoClient {
    http: Client,
    base_url: String,
    raise_on_unexpected_status: bool,
}

impl GalileoClient {
    pub fn new<C: ConfigProvider + ?Sized>(config: &C) -> Result<Self> {
        validate_url("api_url", config.api_url())?;
        validate_positive_number("timeout_seconds", config.timeout_seconds(), 1)?;

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(
            HeaderName::from_static(CLIENT_TYPE_HEADER),
            HeaderValue::from_static(CLIENT_TYPE),
        );
        if let Some(api_key) = config.api_key() {
            headers.insert(
                HeaderName::from_static(API_KEY_HEADER),
                sensitive_header("api_key", api_key)?,
            );
        } else if let Some(token) = config.bearer_token() {
            headers.insert(
                AUTHORIZATION,
                sensitive_header("bearer_token", &format!("Bearer {}", token))?,
            );
        }

        let http = Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_seconds()))
            .danger_accept_invalid_certs(!config.verify_ssl())
            .build()?;

        debug!("🔗 API client ready for {}", config.api_url());

        Ok(Self {
            http,
            base_url: config.api_url().trim_end_matches('/').to_string(),
            raise_on_unexpected_status: config.raise_on_unexpected_status(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn raises_on_unexpected_status(&self) -> bool {
        self.raise_on_unexpected_status
    }

    /// Sends the request and maps the status: 200 decodes the payload, 422
    /// decodes the validation error, anything else either fails or yields no
    /// parsed value depending on `raise_on_unexpected_status`.
    pub async fn execute_detailed<E: Endpoint>(&self, endpoint: &E) -> Result<Response<E::Output>> {
        let url = format!("{}{}", self.base_url, endpoint.path());
        let method = endpoint.method();
        debug!("➡️ {} {}", method, url);

        let mut request = self.http.request(method.clone(), &url);
        let query = endpoint.query();
        if !query.is_empty() {
            request = request.query(&query);
        }
        if let Some(body) = endpoint.body()? {
            request = request.json(&body);
        }

        let response = request.send().await?;
        let status = response.status().as_u16();
        let headers = response.headers().clone();
        let content = response.bytes().await?.to_vec();
        debug!("⬅️ {} {} -> {}", method, url, status);

        let parsed = match status {
            200 => {
                let value = endpoint.decode_body(&content)?;
                Some(Parsed::Success(endpoint.parse_success(value)?))
            }
            422 => Some(Parsed::ValidationError(serde_json::from_slice(&content)?)),
            _ if self.raise_on_unexpected_status => {
                return Err(GalileoError::UnexpectedStatus {
                    status,
                    body: String::from_utf8_lossy(&content).into_owned(),
                });
            }
            _ => {
                warn!("⚠️ Unexpected status {} from {} {}", status, method, url);
                None
            }
        };

        Ok(Response {
            status,
            headers,
            content,
            parsed,
        })
    }

    pub async fn execute<E: Endpoint>(&self, endpoint: &E) -> Result<Option<Parsed<E::Output>>> {
        Ok(self.execute_detailed(endpoint).await?.parsed)
    }

    /// Like [`execute`](Self::execute) but treats everything except a 200 as an error.
    pub async fn expect_success<E: Endpoint>(&self, endpoint: &E) -> Result<E::Output> {
        match self.execute_detailed(endpoint).await? {
            Response {
                parsed: Some(Parsed::Success(value)),
                ..
            } => Ok(value),
            Response {
                parsed: Some(Parsed::ValidationError(error)),
                ..
            } => Err(GalileoError::ValidationFailed(error)),
            Response { status, .. } => Err(GalileoError::ApiError {
                message: format!(
                    "{} {} returned status {} with no usable body",
                    endpoint.method(),
                    endpoint.path(),
                    status
                ),
            }),
        }
    }

    /// `true` only when the health endpoint answers 200, whatever the body.
    pub async fn healthcheck(&self) -> Result<bool> {
        match self.execute(&Healthcheck).await {
            Ok(parsed) => Ok(matches!(parsed, Some(Parsed::Success(_)))),
            Err(GalileoError::UnexpectedStatus { status, .. }) => {
                debug!("Healthcheck answered {}", status);
                Ok(false)
            }
            Err(e) => Err(e),
        }
    }

    /// Pages through `GET /datasets` until `next_starting_token` runs out.
    pub async fn list_all_datasets(&self, page_size: i64) -> Result<Vec<Dataset>> {
        let mut datasets = Vec::new();
        let mut starting_token = 0;

        loop {
            let page = self
                .expect_success(&ListDatasets {
                    starting_token,
                    limit: page_size,
                })
                .await?;
            datasets.extend(page.datasets);

            match page.next_starting_token.into_option() {
                Some(next) if next > starting_token => starting_token = next,
                _ => break,
            }
        }

        debug!("📚 Listed {} datasets", datasets.len());
        Ok(datasets)
    }
}

#[async_trait]
impl TelemetrySink for GalileoClient {
    async fn ingest_workflows(
        &self,
        request: LogWorkflowsRequest,
    ) -> Result<Option<LogWorkflowsResponse>> {
        match self.execute(&LogWorkflows { body: request }).await? {
            Some(Parsed::Success(response)) => Ok(Some(response)),
            Some(Parsed::ValidationError(error)) => Err(GalileoError::ValidationFailed(error)),
            None => Ok(None),
        }
    }
}

fn sensitive_header(field: &str, value: &str) -> Result<HeaderValue> {
    let mut header =
        HeaderValue::from_str(value).map_err(|_| GalileoError::InvalidConfigValueError {
            field: field.to_string(),
            value: "***".to_string(),
            reason: "contains characters not allowed in an HTTP header".to_string(),
        })?;
    header.set_sensitive(true);
    Ok(header)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GalileoConfig;

    #[test]
    fn test_client_rejects_invalid_api_url() {
        let config = GalileoConfig::new("https://console.demo.galileo.ai")
            .with_api_url("not a url")
            .with_api_key("k");
        assert!(GalileoClient::new(&config).is_err());
    }

    #[test]
    fn test_client_rejects_header_unsafe_key() {
        let config = GalileoConfig::new("https://console.demo.galileo.ai")
            .with_api_url("https://api.demo.galileo.ai")
            .with_api_key("bad\nkey");
        assert!(matches!(
            GalileoClient::new(&config),
            Err(GalileoError::InvalidConfigValueError { .. })
        ));
    }

    #[test]
    fn test_base_url_is_normalised() {
        let config = GalileoConfig::new("https://console.demo.galileo.ai")
            .with_api_url("https://api.demo.galileo.ai/")
            .with_api_key("k");
        let client = GalileoClient::new(&config).unwrap();
        assert_eq!(client.base_url(), "https://api.demo.galileo.ai");
        assert!(!client.raises_on_unexpected_status());
    }

    #[test]
    fn test_parsed_helpers() {
        let ok: Parsed<u8> = Parsed::Success(1);
        let rejected: Parsed<u8> = Parsed::ValidationError(HttpValidationError::default());
        assert!(ok.is_success());
        assert_eq!(ok.into_success(), Some(1));
        assert_eq!(rejected.into_success(), None);
    }
}
