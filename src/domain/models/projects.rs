use crate::domain::enums::{ProjectType, Split};
use crate::domain::types::{AdditionalProperties, Tristate};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Tristate::is_absent")]
    pub created_by: Tristate<String>,
    #[serde(default, skip_serializing_if = "Tristate::is_absent")]
    pub name: Tristate<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Tristate::is_absent")]
    pub project_type: Tristate<ProjectType>,
    #[serde(default, skip_serializing_if = "Tristate::is_absent")]
    pub bookmark: Tristate<bool>,
    #[serde(default, skip_serializing_if = "Tristate::is_absent")]
    pub description: Tristate<String>,
    #[serde(default, skip_serializing_if = "Tristate::is_absent")]
    pub runs: Tristate<Vec<Value>>,
    #[serde(flatten)]
    pub additional_properties: AdditionalProperties,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    pub id: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Tristate::is_absent")]
    pub project_count: Tristate<i64>,
    #[serde(default, skip_serializing_if = "Tristate::is_absent")]
    pub num_rows: Tristate<i64>,
    #[serde(default, skip_serializing_if = "Tristate::is_absent")]
    pub column_names: Tristate<Vec<String>>,
    #[serde(default, skip_serializing_if = "Tristate::is_absent")]
    pub current_version_index: Tristate<i64>,
    #[serde(default, skip_serializing_if = "Tristate::is_absent")]
    pub draft: Tristate<bool>,
    #[serde(flatten)]
    pub additional_properties: AdditionalProperties,
}

/// One page of `GET /datasets`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListDatasetResponse {
    #[serde(default)]
    pub datasets: Vec<Dataset>,
    #[serde(default, skip_serializing_if = "Tristate::is_absent")]
    pub limit: Tristate<i64>,
    #[serde(default, skip_serializing_if = "Tristate::is_absent")]
    pub starting_token: Tristate<i64>,
    /// `null` or missing on the last page.
    #[serde(default, skip_serializing_if = "Tristate::is_absent")]
    pub next_starting_token: Tristate<i64>,
    #[serde(flatten)]
    pub additional_properties: AdditionalProperties,
}

/// A recorded change to a run's data, e.g. a relabel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edit {
    pub id: String,
    pub project_id: String,
    pub run_id: String,
    pub split: Split,
    pub created_at: DateTime<Utc>,
    pub exported: bool,
    pub edit_action: String,
    #[serde(default, skip_serializing_if = "Tristate::is_absent")]
    pub created_by: Tristate<String>,
    #[serde(default, skip_serializing_if = "Tristate::is_absent")]
    pub note: Tristate<String>,
    #[serde(default, skip_serializing_if = "Tristate::is_absent")]
    pub new_label: Tristate<String>,
    #[serde(default, skip_serializing_if = "Tristate::is_absent")]
    pub sample_ids: Tristate<Vec<i64>>,
    #[serde(default, skip_serializing_if = "Tristate::is_absent")]
    pub inference_name: Tristate<String>,
    #[serde(flatten)]
    pub additional_properties: AdditionalProperties,
}
