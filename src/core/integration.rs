//! Convenience layer over the integration endpoints.

use crate::core::client::{GalileoClient, Parsed};
use crate::core::endpoints::{
    CreateOrUpdateIntegration, DeleteIntegration, GetAvailableModels, GetIntegration,
    ListAvailableIntegrations, ListIntegrations,
};
use crate::domain::enums::{AwsCredentialType, IntegrationName};
use crate::domain::models::{
    AnthropicIntegrationCreate, AwsBedrockIntegrationCreate, AwsCredentials,
    AzureIntegrationCreate, IntegrationConfig, IntegrationDb, OpenAiIntegrationCreate,
};
use crate::domain::types::{AdditionalProperties, Tristate};
use crate::utils::error::{GalileoError, Result};
use crate::utils::validation::{validate_non_empty_string, Validate};
use chrono::{DateTime, Utc};
use serde_json::Value;
use tracing::{debug, error, info};

pub use crate::domain::models::IntegrationCreate as ProviderCredentials;

/// Where a provider stands relative to the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncState {
    LocalOnly,
    Synced,
    Dirty,
    FailedSync,
    Deleted,
}

/// A model offered by a provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Model {
    pub name: String,
    pub alias: String,
    pub provider_name: IntegrationName,
}

impl ProviderCredentials {
    pub fn openai(token: impl Into<String>, organization_id: Option<String>) -> Self {
        ProviderCredentials::OpenAi(OpenAiIntegrationCreate {
            token: token.into(),
            organization_id: organization_id.map(Tristate::Value).unwrap_or_default(),
            additional_properties: AdditionalProperties::new(),
        })
    }

    pub fn azure(token: impl Into<String>, endpoint: impl Into<String>) -> Self {
        ProviderCredentials::Azure(AzureIntegrationCreate {
            token: token.into(),
            endpoint: endpoint.into(),
            api_version: Tristate::Absent,
            proxy: Tristate::Absent,
            azure_deployment: Tristate::Absent,
            authentication_scope: Tristate::Absent,
            additional_properties: AdditionalProperties::new(),
        })
    }

    pub fn bedrock(
        access_key_id: impl Into<String>,
        secret_access_key: impl Into<String>,
        region: Option<String>,
        credential_type: Option<AwsCredentialType>,
    ) -> Self {
        ProviderCredentials::AwsBedrock(AwsBedrockIntegrationCreate {
            token: AwsCredentials {
                aws_access_key_id: access_key_id.into(),
                aws_secret_access_key: secret_access_key.into(),
                additional_properties: AdditionalProperties::new(),
            },
            region: region.map(Tristate::Value).unwrap_or_default(),
            credential_type: credential_type.map(Tristate::Value).unwrap_or_default(),
            additional_properties: AdditionalProperties::new(),
        })
    }

    pub fn anthropic(token: impl Into<String>) -> Self {
        ProviderCredentials::Anthropic(AnthropicIntegrationCreate {
            token: token.into(),
            endpoint: Tristate::Absent,
            authentication_scope: Tristate::Absent,
            additional_properties: AdditionalProperties::new(),
        })
    }
}

/// Required secrets must be non-blank before anything is sent.
impl Validate for ProviderCredentials {
    fn validate(&self) -> Result<()> {
        let checked = match self {
            ProviderCredentials::OpenAi(c) => validate_non_empty_string("token", &c.token),
            ProviderCredentials::Azure(c) => validate_non_empty_string("token", &c.token)
                .and_then(|_| validate_non_empty_string("endpoint", &c.endpoint)),
            ProviderCredentials::AwsBedrock(c) => {
                validate_non_empty_string("aws_access_key_id", &c.token.aws_access_key_id).and_then(
                    |_| {
                        validate_non_empty_string(
                            "aws_secret_access_key",
                            &c.token.aws_secret_access_key,
                        )
                    },
                )
            }
            ProviderCredentials::Anthropic(c) => validate_non_empty_string("token", &c.token),
        };
        checked.map_err(|e| match e {
            GalileoError::InvalidConfigValueError { field, reason, .. } => {
                GalileoError::ValidationError {
                    message: format!("{} credentials: {}: {}", self.name(), field, reason),
                }
            }
            other => other,
        })
    }
}

/// Entry point for listing and creating providers.
#[derive(Debug, Clone)]
pub struct Integrations {
    client: GalileoClient,
}

impl Integrations {
    pub fn new(client: GalileoClient) -> Self {
        Self { client }
    }

    /// Integrations configured for the current user.
    pub async fn list(&self) -> Result<Vec<Provider>> {
        let entries = self.client.expect_success(&ListIntegrations).await?;
        debug!("Found {} configured integration(s)", entries.len());
        Ok(entries
            .into_iter()
            .map(|entry| Provider::from_db(entry, self.client.clone()))
            .collect())
    }

    /// Every vendor the server supports, configured or not.
    pub async fn list_available(&self) -> Result<Vec<IntegrationName>> {
        Ok(self
            .client
            .expect_success(&ListAvailableIntegrations)
            .await?
            .integrations)
    }

    /// The configured integration for `name`, preferring the selected one.
    pub async fn get(&self, name: IntegrationName) -> Result<Option<Provider>> {
        let mut matching: Vec<Provider> = self
            .list()
            .await?
            .into_iter()
            .filter(|p| p.name == name)
            .collect();
        if matching.is_empty() {
            debug!("Integration '{}' is not configured", name);
            return Ok(None);
        }
        let index = matching.iter().position(|p| p.is_selected).unwrap_or(0);
        Ok(Some(matching.swap_remove(index)))
    }

    /// Creates the integration, replacing an existing one for the same vendor.
    pub async fn create(&self, credentials: ProviderCredentials) -> Result<Provider> {
        credentials.validate()?;
        let name = credentials.name();
        info!("Creating {} integration", name);
        let entry = self
            .client
            .expect_success(&CreateOrUpdateIntegration { body: credentials })
            .await
            .map_err(|e| {
                error!("❌ Failed to create {} integration: {}", name, e);
                wrap_api_error("create", name, e)
            })?;
        Ok(Provider::from_db(entry, self.client.clone()))
    }

    pub async fn create_openai(
        &self,
        token: impl Into<String>,
        organization_id: Option<String>,
    ) -> Result<Provider> {
        self.create(ProviderCredentials::openai(token, organization_id))
            .await
    }

    pub async fn create_azure(
        &self,
        token: impl Into<String>,
        endpoint: impl Into<String>,
    ) -> Result<Provider> {
        self.create(ProviderCredentials::azure(token, endpoint)).await
    }

    pub async fn create_bedrock(
        &self,
        access_key_id: impl Into<String>,
        secret_access_key: impl Into<String>,
        region: Option<String>,
        credential_type: Option<AwsCredentialType>,
    ) -> Result<Provider> {
        self.create(ProviderCredentials::bedrock(
            access_key_id,
            secret_access_key,
            region,
            credential_type,
        ))
        .await
    }

    pub async fn create_anthropic(&self, token: impl Into<String>) -> Result<Provider> {
        self.create(ProviderCredentials::anthropic(token)).await
    }
}

/// Local handle on one stored integration.
#[derive(Debug, Clone)]
pub struct Provider {
    client: GalileoClient,
    pub id: String,
    pub name: IntegrationName,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub created_by: String,
    pub is_selected: bool,
    pub permissions: Option<Vec<Value>>,
    config: Option<IntegrationConfig>,
    state: SyncState,
}

impl Provider {
    fn from_db(entry: IntegrationDb, client: GalileoClient) -> Self {
        Self {
            client,
            id: entry.id,
            name: entry.name,
            created_at: entry.created_at,
            updated_at: entry.updated_at,
            created_by: entry.created_by,
            is_selected: entry.is_selected.unwrap_or(false),
            permissions: entry.permissions.into_option(),
            config: None,
            state: SyncState::Synced,
        }
    }

    pub fn state(&self) -> SyncState {
        self.state
    }

    /// Vendor-specific settings from the last [`refresh`](Self::refresh).
    pub fn config(&self) -> Option<&IntegrationConfig> {
        self.config.as_ref()
    }

    pub async fn refresh(&mut self) -> Result<&IntegrationConfig> {
        debug!("Provider.refresh: id='{}' - started", self.id);
        let outcome = self.client.execute(&GetIntegration { name: self.name }).await;
        let config = match outcome {
            Ok(Some(Parsed::Success(config))) => config,
            Ok(_) => {
                return Err(self.fail(GalileoError::ApiError {
                    message: format!("Provider with ID {} not found", self.id),
                }))
            }
            Err(e) => return Err(self.fail(wrap_api_error("refresh", self.name, e))),
        };

        if let Some(id) = config.id() {
            self.id = id.to_string();
        }
        self.state = SyncState::Synced;
        debug!("Provider.refresh: id='{}' - completed", self.id);
        Ok(self.config.insert(config))
    }

    /// Replaces the stored credentials. The vendor of `credentials` must match.
    pub async fn update(&mut self, credentials: ProviderCredentials) -> Result<()> {
        if credentials.name() != self.name {
            return Err(GalileoError::ValidationError {
                message: format!(
                    "cannot update a {} provider with {} credentials",
                    self.name,
                    credentials.name()
                ),
            });
        }
        credentials.validate()?;

        self.state = SyncState::Dirty;
        let entry = self
            .client
            .expect_success(&CreateOrUpdateIntegration { body: credentials })
            .await
            .map_err(|e| self.fail(wrap_api_error("update", self.name, e)))?;

        self.id = entry.id;
        self.updated_at = entry.updated_at;
        self.is_selected = entry.is_selected.unwrap_or(self.is_selected);
        self.config = None;
        self.state = SyncState::Synced;
        info!("Updated {} integration", self.name);
        Ok(())
    }

    pub async fn delete(&mut self) -> Result<()> {
        debug!("Provider.delete: id='{}' - started", self.id);
        let outcome = self.client.execute(&DeleteIntegration { name: self.name }).await;
        match outcome {
            Ok(Some(Parsed::ValidationError(detail))) => Err(self.fail(GalileoError::ApiError {
                message: format!("Failed to delete provider: {}", detail),
            })),
            Ok(_) => {
                self.state = SyncState::Deleted;
                info!("Deleted {} integration", self.name);
                Ok(())
            }
            Err(e) => Err(self.fail(wrap_api_error("delete", self.name, e))),
        }
    }

    /// Models offered by this provider. Only allowed while synced.
    pub async fn models(&self) -> Result<Vec<Model>> {
        if self.state != SyncState::Synced {
            return Err(GalileoError::ValidationError {
                message: "Cannot get models for provider without syncing".to_string(),
            });
        }

        let names = self
            .client
            .expect_success(&GetAvailableModels { name: self.name })
            .await
            .map_err(|e| wrap_api_error("list models for", self.name, e))?;
        debug!("Found {} model(s) for '{}'", names.len(), self.name);

        Ok(names
            .into_iter()
            .map(|model_name| Model {
                alias: model_name.clone(),
                name: model_name,
                provider_name: self.name,
            })
            .collect())
    }

    /// Looks a model up by exactly one of `name` or `alias`.
    pub async fn get_model(
        &self,
        name: Option<&str>,
        alias: Option<&str>,
    ) -> Result<Option<Model>> {
        let wanted: Box<dyn Fn(&Model) -> bool + Send> = match (name, alias) {
            (Some(name), None) => {
                let name = name.to_string();
                Box::new(move |m: &Model| m.name == name)
            }
            (None, Some(alias)) => {
                let alias = alias.to_string();
                Box::new(move |m: &Model| m.alias == alias)
            }
            (None, None) => {
                return Err(GalileoError::ValidationError {
                    message: "Must specify either 'name' or 'alias'".to_string(),
                })
            }
            (Some(_), Some(_)) => {
                return Err(GalileoError::ValidationError {
                    message: "Cannot specify both 'name' and 'alias'".to_string(),
                })
            }
        };

        Ok(self.models().await?.into_iter().find(|m| wanted(m)))
    }

    fn fail(&mut self, error: GalileoError) -> GalileoError {
        self.state = SyncState::FailedSync;
        error
    }
}

/// Server-side rejections become `ApiError`; transport and config errors pass through.
fn wrap_api_error(action: &str, name: IntegrationName, error: GalileoError) -> GalileoError {
    match error {
        GalileoError::ValidationFailed(detail) => GalileoError::ApiError {
            message: format!("Failed to {} {} provider: {}", action, name, detail),
        },
        GalileoError::UnexpectedStatus { status, body } => GalileoError::ApiError {
            message: format!(
                "Failed to {} {} provider: status {}: {}",
                action, name, status, body
            ),
        },
        other => other,
    }
}
