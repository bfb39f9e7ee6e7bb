//! Typed endpoint definitions. Each struct holds the request parameters and
//! implements [`Endpoint`] with its success payload type.

use crate::core::client::Endpoint;
use crate::domain::enums::{IntegrationName, ProjectType, Split};
use crate::domain::models::{
    AvailableIntegrations, Edit, EvaluateRunRequest, EvaluateRunResponse, IntegrationConfig,
    IntegrationCreate, IntegrationDb, ListDatasetResponse, LogWorkflowsRequest,
    LogWorkflowsResponse, Project,
};
use crate::domain::types::Tristate;
use crate::utils::error::Result;
use reqwest::Method;
use serde_json::Value;

pub const DEFAULT_PAGE_SIZE: i64 = 100;

#[derive(Debug, Clone, Copy, Default)]
pub struct Healthcheck;

impl Endpoint for Healthcheck {
    type Output = Value;

    fn method(&self) -> Method {
        Method::GET
    }

    fn path(&self) -> String {
        "/healthcheck".to_string()
    }

    // some deployments answer with plain text
    fn decode_body(&self, content: &[u8]) -> Result<Value> {
        Ok(serde_json::from_slice(content)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(content).into_owned())))
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ListIntegrations;

impl Endpoint for ListIntegrations {
    type Output = Vec<IntegrationDb>;

    fn method(&self) -> Method {
        Method::GET
    }

    fn path(&self) -> String {
        "/integrations".to_string()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ListAvailableIntegrations;

impl Endpoint for ListAvailableIntegrations {
    type Output = AvailableIntegrations;

    fn method(&self) -> Method {
        Method::GET
    }

    fn path(&self) -> String {
        "/integrations/available".to_string()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct GetIntegration {
    pub name: IntegrationName,
}

impl Endpoint for GetIntegration {
    type Output = IntegrationConfig;

    fn method(&self) -> Method {
        Method::GET
    }

    fn path(&self) -> String {
        format!("/integrations/{}", self.name)
    }

    // the body may omit `name`; the requested one fills in
    fn parse_success(&self, value: Value) -> Result<Self::Output> {
        IntegrationConfig::from_value_with_hint(value, Some(self.name))
    }
}

/// `PUT /integrations/{name}`; the vendor comes from the body variant.
#[derive(Debug, Clone)]
pub struct CreateOrUpdateIntegration {
    pub body: IntegrationCreate,
}

impl Endpoint for CreateOrUpdateIntegration {
    type Output = IntegrationDb;

    fn method(&self) -> Method {
        Method::PUT
    }

    fn path(&self) -> String {
        format!("/integrations/{}", self.body.name())
    }

    fn body(&self) -> Result<Option<Value>> {
        Ok(Some(serde_json::to_value(&self.body)?))
    }
}

#[derive(Debug, Clone, Copy)]
pub struct DeleteIntegration {
    pub name: IntegrationName,
}

impl Endpoint for DeleteIntegration {
    type Output = Value;

    fn method(&self) -> Method {
        Method::DELETE
    }

    fn path(&self) -> String {
        format!("/integrations/{}", self.name)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct GetAvailableModels {
    pub name: IntegrationName,
}

impl Endpoint for GetAvailableModels {
    type Output = Vec<String>;

    fn method(&self) -> Method {
        Method::GET
    }

    fn path(&self) -> String {
        format!("/llm_integrations/{}/models", self.name)
    }
}

#[derive(Debug, Clone, Default)]
pub struct ListProjects {
    pub project_name: Tristate<String>,
    pub project_type: Tristate<ProjectType>,
}

impl Endpoint for ListProjects {
    type Output = Vec<Project>;

    fn method(&self) -> Method {
        Method::GET
    }

    fn path(&self) -> String {
        "/projects".to_string()
    }

    fn query(&self) -> Vec<(&'static str, String)> {
        let mut query = Vec::new();
        if let Some(name) = self.project_name.as_value() {
            query.push(("project_name", name.clone()));
        }
        if let Some(project_type) = self.project_type.as_value() {
            query.push(("type", project_type.to_string()));
        }
        query
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ListDatasets {
    pub starting_token: i64,
    pub limit: i64,
}

impl Default for ListDatasets {
    fn default() -> Self {
        Self {
            starting_token: 0,
            limit: DEFAULT_PAGE_SIZE,
        }
    }
}

impl Endpoint for ListDatasets {
    type Output = ListDatasetResponse;

    fn method(&self) -> Method {
        Method::GET
    }

    fn path(&self) -> String {
        "/datasets".to_string()
    }

    fn query(&self) -> Vec<(&'static str, String)> {
        vec![
            ("starting_token", self.starting_token.to_string()),
            ("limit", self.limit.to_string()),
        ]
    }
}

#[derive(Debug, Clone)]
pub struct GetRunEdits {
    pub project_id: String,
    pub run_id: String,
    pub split: Split,
}

impl Endpoint for GetRunEdits {
    type Output = Vec<Edit>;

    fn method(&self) -> Method {
        Method::GET
    }

    fn path(&self) -> String {
        format!(
            "/projects/{}/runs/{}/split/{}/edits",
            self.project_id, self.run_id, self.split
        )
    }
}

#[derive(Debug, Clone)]
pub struct CreateEvaluateRun {
    pub body: EvaluateRunRequest,
}

impl Endpoint for CreateEvaluateRun {
    type Output = EvaluateRunResponse;

    fn method(&self) -> Method {
        Method::POST
    }

    fn path(&self) -> String {
        "/v1/evaluate/runs".to_string()
    }

    fn body(&self) -> Result<Option<Value>> {
        Ok(Some(serde_json::to_value(&self.body)?))
    }
}

#[derive(Debug, Clone)]
pub struct LogWorkflows {
    pub body: LogWorkflowsRequest,
}

impl Endpoint for LogWorkflows {
    type Output = LogWorkflowsResponse;

    fn method(&self) -> Method {
        Method::POST
    }

    fn path(&self) -> String {
        "/v1/observe/workflows".to_string()
    }

    fn body(&self) -> Result<Option<Value>> {
        Ok(Some(serde_json::to_value(&self.body)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::OpenAiIntegrationCreate;
    use crate::domain::types::AdditionalProperties;
    use serde_json::json;

    #[test]
    fn test_paths_use_wire_values() {
        assert_eq!(
            GetIntegration {
                name: IntegrationName::AwsBedrock
            }
            .path(),
            "/integrations/aws_bedrock"
        );
        assert_eq!(
            GetRunEdits {
                project_id: "p".to_string(),
                run_id: "r".to_string(),
                split: Split::Inference,
            }
            .path(),
            "/projects/p/runs/r/split/inference/edits"
        );
    }

    #[test]
    fn test_healthcheck_body_need_not_be_json() {
        assert_eq!(Healthcheck.decode_body(b"OK").unwrap(), json!("OK"));
        assert_eq!(
            Healthcheck.decode_body(br#"{"status": "ok"}"#).unwrap(),
            json!({"status": "ok"})
        );
        assert!(ListDatasets::default().decode_body(b"OK").is_err());
    }

    #[test]
    fn test_absent_and_null_query_values_are_not_sent() {
        assert!(ListProjects::default().query().is_empty());

        let null_name = ListProjects {
            project_name: Tristate::Null,
            project_type: Tristate::Value(ProjectType::GenAi),
        };
        assert_eq!(null_name.query(), vec![("type", "gen_ai".to_string())]);
    }

    #[test]
    fn test_list_datasets_defaults() {
        let endpoint = ListDatasets::default();
        assert_eq!(
            endpoint.query(),
            vec![
                ("starting_token", "0".to_string()),
                ("limit", "100".to_string())
            ]
        );
    }

    #[test]
    fn test_create_body_carries_token_and_path_carries_vendor() {
        let endpoint = CreateOrUpdateIntegration {
            body: IntegrationCreate::OpenAi(OpenAiIntegrationCreate {
                token: "sk-test".to_string(),
                organization_id: Tristate::Value("org".to_string()),
                additional_properties: AdditionalProperties::new(),
            }),
        };
        assert_eq!(endpoint.path(), "/integrations/openai");
        assert_eq!(
            endpoint.body().unwrap(),
            Some(json!({"token": "sk-test", "organization_id": "org"}))
        );
    }

    #[test]
    fn test_get_integration_parses_with_path_hint() {
        let endpoint = GetIntegration {
            name: IntegrationName::Anthropic,
        };
        let parsed = endpoint.parse_success(json!({"id": "i-1"})).unwrap();
        assert_eq!(parsed.name(), IntegrationName::Anthropic);
    }
}
