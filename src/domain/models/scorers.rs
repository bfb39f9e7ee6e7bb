//! Scorer configurations attached to evaluate runs.
//!
//! Built-in scorers are tagged by `name`. Customized scorers also carry a
//! `name` (the scorer they override) and are told apart by `scorer_name`,
//! which is therefore checked first.

use super::common::{into_object, take_tag, with_tag};
use crate::domain::enums::{CustomizedScorerKind, FilterOperator, ScorerKind, ScorerModelType};
use crate::domain::types::{AdditionalProperties, Tristate};
use crate::utils::error::{GalileoError, Result};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetadataFilter {
    pub key: String,
    /// A single string, or a list for `one_of` / `not_in`.
    pub value: Value,
    pub operator: FilterOperator,
    #[serde(default, skip_serializing_if = "Tristate::is_absent")]
    pub filter_type: Tristate<String>,
    #[serde(flatten)]
    pub additional_properties: AdditionalProperties,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeNameFilter {
    pub value: String,
    pub operator: FilterOperator,
    #[serde(default, skip_serializing_if = "Tristate::is_absent")]
    pub case_sensitive: Tristate<bool>,
    #[serde(default, skip_serializing_if = "Tristate::is_absent")]
    pub filter_type: Tristate<String>,
    #[serde(flatten)]
    pub additional_properties: AdditionalProperties,
}

/// Restricts which nodes a scorer runs on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "name", rename_all = "snake_case")]
pub enum ScorerFilter {
    Metadata(MetadataFilter),
    NodeName(NodeNameFilter),
}

/// Settings shared by every built-in scorer. Scorers that take no judge
/// settings (e.g. `bleu`) simply leave them absent.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct StandardScorer {
    #[serde(default, skip_serializing_if = "Tristate::is_absent")]
    pub filters: Tristate<Vec<ScorerFilter>>,
    #[serde(default, skip_serializing_if = "Tristate::is_absent")]
    pub model_name: Tristate<String>,
    #[serde(default, skip_serializing_if = "Tristate::is_absent")]
    pub num_judges: Tristate<i64>,
    #[serde(rename = "type", default, skip_serializing_if = "Tristate::is_absent")]
    pub model_type: Tristate<ScorerModelType>,
    #[serde(flatten)]
    pub additional_properties: AdditionalProperties,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CustomizedScorer {
    #[serde(default, skip_serializing_if = "Tristate::is_absent")]
    pub name: Tristate<ScorerKind>,
    #[serde(default, skip_serializing_if = "Tristate::is_absent")]
    pub model_alias: Tristate<String>,
    #[serde(default, skip_serializing_if = "Tristate::is_absent")]
    pub num_judges: Tristate<i64>,
    #[serde(default, skip_serializing_if = "Tristate::is_absent")]
    pub filters: Tristate<Vec<ScorerFilter>>,
    #[serde(default, skip_serializing_if = "Tristate::is_absent")]
    pub prompt: Tristate<String>,
    #[serde(default, skip_serializing_if = "Tristate::is_absent")]
    pub metric_name: Tristate<String>,
    #[serde(default, skip_serializing_if = "Tristate::is_absent")]
    pub description: Tristate<String>,
    #[serde(default, skip_serializing_if = "Tristate::is_absent")]
    pub aggregate_keys: Tristate<Vec<String>>,
    #[serde(default, skip_serializing_if = "Tristate::is_absent")]
    pub registered_scorer_id: Tristate<String>,
    #[serde(default, skip_serializing_if = "Tristate::is_absent")]
    pub generated_scorer_id: Tristate<String>,
    #[serde(flatten)]
    pub additional_properties: AdditionalProperties,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ScorerConfig {
    Standard(ScorerKind, StandardScorer),
    Customized(CustomizedScorerKind, CustomizedScorer),
}

impl ScorerConfig {
    pub fn standard(kind: ScorerKind) -> Self {
        ScorerConfig::Standard(kind, StandardScorer::default())
    }

    /// The built-in scorer this configuration runs or overrides.
    pub fn kind(&self) -> ScorerKind {
        match self {
            ScorerConfig::Standard(kind, _) => *kind,
            ScorerConfig::Customized(kind, _) => kind.base_kind(),
        }
    }

    pub fn from_value(value: Value) -> Result<Self> {
        let mut object = into_object(value)?;
        if let Some(kind) = take_tag::<CustomizedScorerKind>(&mut object, "scorer_name")? {
            let body = serde_json::from_value(Value::Object(object))?;
            return Ok(ScorerConfig::Customized(kind, body));
        }
        match take_tag::<ScorerKind>(&mut object, "name")? {
            Some(kind) => Ok(ScorerConfig::Standard(
                kind,
                serde_json::from_value(Value::Object(object))?,
            )),
            None => Err(GalileoError::MissingDiscriminator {
                field: "name".to_string(),
            }),
        }
    }

    pub fn to_value(&self) -> Result<Value> {
        match self {
            ScorerConfig::Standard(kind, body) => with_tag(body, "name", kind.as_str()),
            ScorerConfig::Customized(kind, body) => with_tag(body, "scorer_name", kind.as_str()),
        }
    }
}

impl Serialize for ScorerConfig {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.to_value()
            .map_err(serde::ser::Error::custom)?
            .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for ScorerConfig {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        ScorerConfig::from_value(Value::deserialize(deserializer)?).map_err(serde::de::Error::custom)
    }
}
