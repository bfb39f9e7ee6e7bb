//! Third-party LLM credentials stored on the platform.
//!
//! Create bodies carry the secret `token`; read models never do.

use super::common::{into_object, take_tag, with_tag};
use crate::domain::enums::{AwsCredentialType, IntegrationName};
use crate::domain::types::{AdditionalProperties, Tristate};
use crate::utils::error::{GalileoError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

/// Entry of `GET /integrations`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntegrationDb {
    pub id: String,
    pub name: IntegrationName,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub created_by: String,
    #[serde(default, skip_serializing_if = "Tristate::is_absent")]
    pub is_selected: Tristate<bool>,
    #[serde(default, skip_serializing_if = "Tristate::is_absent")]
    pub permissions: Tristate<Vec<Value>>,
    #[serde(flatten)]
    pub additional_properties: AdditionalProperties,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AvailableIntegrations {
    pub integrations: Vec<IntegrationName>,
    #[serde(flatten)]
    pub additional_properties: AdditionalProperties,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpenAiIntegrationCreate {
    pub token: String,
    #[serde(default, skip_serializing_if = "Tristate::is_absent")]
    pub organization_id: Tristate<String>,
    #[serde(flatten)]
    pub additional_properties: AdditionalProperties,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AzureIntegrationCreate {
    pub token: String,
    pub endpoint: String,
    #[serde(default, skip_serializing_if = "Tristate::is_absent")]
    pub api_version: Tristate<String>,
    #[serde(default, skip_serializing_if = "Tristate::is_absent")]
    pub proxy: Tristate<bool>,
    #[serde(default, skip_serializing_if = "Tristate::is_absent")]
    pub azure_deployment: Tristate<String>,
    #[serde(default, skip_serializing_if = "Tristate::is_absent")]
    pub authentication_scope: Tristate<String>,
    #[serde(flatten)]
    pub additional_properties: AdditionalProperties,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AwsCredentials {
    pub aws_access_key_id: String,
    pub aws_secret_access_key: String,
    #[serde(flatten)]
    pub additional_properties: AdditionalProperties,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AwsBedrockIntegrationCreate {
    pub token: AwsCredentials,
    #[serde(default, skip_serializing_if = "Tristate::is_absent")]
    pub region: Tristate<String>,
    #[serde(default, skip_serializing_if = "Tristate::is_absent")]
    pub credential_type: Tristate<AwsCredentialType>,
    #[serde(flatten)]
    pub additional_properties: AdditionalProperties,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnthropicIntegrationCreate {
    pub token: String,
    #[serde(default, skip_serializing_if = "Tristate::is_absent")]
    pub endpoint: Tristate<String>,
    #[serde(default, skip_serializing_if = "Tristate::is_absent")]
    pub authentication_scope: Tristate<String>,
    #[serde(flatten)]
    pub additional_properties: AdditionalProperties,
}

/// Create-or-update body, one shape per vendor. Encodes as the bare body;
/// the vendor travels in the request path.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum IntegrationCreate {
    OpenAi(OpenAiIntegrationCreate),
    Azure(AzureIntegrationCreate),
    AwsBedrock(AwsBedrockIntegrationCreate),
    Anthropic(AnthropicIntegrationCreate),
}

impl IntegrationCreate {
    pub fn name(&self) -> IntegrationName {
        match self {
            IntegrationCreate::OpenAi(_) => IntegrationName::OpenAi,
            IntegrationCreate::Azure(_) => IntegrationName::Azure,
            IntegrationCreate::AwsBedrock(_) => IntegrationName::AwsBedrock,
            IntegrationCreate::Anthropic(_) => IntegrationName::Anthropic,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct OpenAiIntegration {
    #[serde(default, skip_serializing_if = "Tristate::is_absent")]
    pub id: Tristate<String>,
    #[serde(default, skip_serializing_if = "Tristate::is_absent")]
    pub organization_id: Tristate<String>,
    #[serde(flatten)]
    pub additional_properties: AdditionalProperties,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AzureIntegration {
    #[serde(default, skip_serializing_if = "Tristate::is_absent")]
    pub id: Tristate<String>,
    pub endpoint: String,
    #[serde(default, skip_serializing_if = "Tristate::is_absent")]
    pub api_version: Tristate<String>,
    #[serde(default, skip_serializing_if = "Tristate::is_absent")]
    pub proxy: Tristate<bool>,
    #[serde(default, skip_serializing_if = "Tristate::is_absent")]
    pub deployments: Tristate<Value>,
    #[serde(default, skip_serializing_if = "Tristate::is_absent")]
    pub available_deployments: Tristate<Vec<Value>>,
    #[serde(flatten)]
    pub additional_properties: AdditionalProperties,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AwsBedrockIntegration {
    #[serde(default, skip_serializing_if = "Tristate::is_absent")]
    pub id: Tristate<String>,
    #[serde(default, skip_serializing_if = "Tristate::is_absent")]
    pub region: Tristate<String>,
    #[serde(default, skip_serializing_if = "Tristate::is_absent")]
    pub credential_type: Tristate<AwsCredentialType>,
    #[serde(flatten)]
    pub additional_properties: AdditionalProperties,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AnthropicIntegration {
    #[serde(default, skip_serializing_if = "Tristate::is_absent")]
    pub id: Tristate<String>,
    #[serde(default, skip_serializing_if = "Tristate::is_absent")]
    pub endpoint: Tristate<String>,
    #[serde(flatten)]
    pub additional_properties: AdditionalProperties,
}

/// Shape used for vendors without a dedicated read model.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GenericIntegration {
    #[serde(default, skip_serializing_if = "Tristate::is_absent")]
    pub id: Tristate<String>,
    #[serde(flatten)]
    pub additional_properties: AdditionalProperties,
}

/// Answer of `GET /integrations/{name}`, discriminated by its `name` field.
#[derive(Debug, Clone, PartialEq)]
pub enum IntegrationConfig {
    OpenAi(OpenAiIntegration),
    Azure(AzureIntegration),
    AwsBedrock(AwsBedrockIntegration),
    Anthropic(AnthropicIntegration),
    Other(IntegrationName, GenericIntegration),
}

impl IntegrationConfig {
    pub fn name(&self) -> IntegrationName {
        match self {
            IntegrationConfig::OpenAi(_) => IntegrationName::OpenAi,
            IntegrationConfig::Azure(_) => IntegrationName::Azure,
            IntegrationConfig::AwsBedrock(_) => IntegrationName::AwsBedrock,
            IntegrationConfig::Anthropic(_) => IntegrationName::Anthropic,
            IntegrationConfig::Other(name, _) => *name,
        }
    }

    pub fn id(&self) -> Option<&str> {
        let id = match self {
            IntegrationConfig::OpenAi(c) => &c.id,
            IntegrationConfig::Azure(c) => &c.id,
            IntegrationConfig::AwsBedrock(c) => &c.id,
            IntegrationConfig::Anthropic(c) => &c.id,
            IntegrationConfig::Other(_, c) => &c.id,
        };
        id.as_value().map(String::as_str)
    }

    /// Decodes by the `name` tag. `hint` stands in for the tag when the server
    /// leaves it out, as it does on the single-integration endpoint.
    pub fn from_value_with_hint(value: Value, hint: Option<IntegrationName>) -> Result<Self> {
        let mut object = into_object(value)?;
        let name = match take_tag::<IntegrationName>(&mut object, "name")? {
            Some(name) => name,
            None => hint.ok_or_else(|| GalileoError::MissingDiscriminator {
                field: "name".to_string(),
            })?,
        };
        let rest = Value::Object(object);
        Ok(match name {
            IntegrationName::OpenAi => IntegrationConfig::OpenAi(serde_json::from_value(rest)?),
            IntegrationName::Azure => IntegrationConfig::Azure(serde_json::from_value(rest)?),
            IntegrationName::AwsBedrock => {
                IntegrationConfig::AwsBedrock(serde_json::from_value(rest)?)
            }
            IntegrationName::Anthropic => {
                IntegrationConfig::Anthropic(serde_json::from_value(rest)?)
            }
            other => IntegrationConfig::Other(other, serde_json::from_value(rest)?),
        })
    }

    pub fn to_value(&self) -> Result<Value> {
        let tag = self.name();
        match self {
            IntegrationConfig::OpenAi(c) => with_tag(c, "name", tag.as_str()),
            IntegrationConfig::Azure(c) => with_tag(c, "name", tag.as_str()),
            IntegrationConfig::AwsBedrock(c) => with_tag(c, "name", tag.as_str()),
            IntegrationConfig::Anthropic(c) => with_tag(c, "name", tag.as_str()),
            IntegrationConfig::Other(_, c) => with_tag(c, "name", tag.as_str()),
        }
    }
}

impl Serialize for IntegrationConfig {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.to_value()
            .map_err(serde::ser::Error::custom)?
            .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for IntegrationConfig {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        IntegrationConfig::from_value_with_hint(value, None).map_err(serde::de::Error::custom)
    }
}
