//! Workflow traces sent to the evaluate and observe endpoints.

use super::scorers::ScorerConfig;
use crate::domain::types::{AdditionalProperties, Tristate};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

pub type StepMetadata = BTreeMap<String, String>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LlmStep {
    /// A prompt string, a chat message, or a list of either.
    pub input: Value,
    #[serde(default, skip_serializing_if = "Tristate::is_absent")]
    pub output: Tristate<Value>,
    #[serde(default, skip_serializing_if = "Tristate::is_absent")]
    pub name: Tristate<String>,
    #[serde(default, skip_serializing_if = "Tristate::is_absent")]
    pub created_at_ns: Tristate<i64>,
    #[serde(default, skip_serializing_if = "Tristate::is_absent")]
    pub duration_ns: Tristate<i64>,
    #[serde(default, skip_serializing_if = "Tristate::is_absent")]
    pub metadata: Tristate<StepMetadata>,
    #[serde(default, skip_serializing_if = "Tristate::is_absent")]
    pub status_code: Tristate<i64>,
    #[serde(default, skip_serializing_if = "Tristate::is_absent")]
    pub ground_truth: Tristate<String>,
    #[serde(default, skip_serializing_if = "Tristate::is_absent")]
    pub model: Tristate<String>,
    #[serde(default, skip_serializing_if = "Tristate::is_absent")]
    pub input_tokens: Tristate<i64>,
    #[serde(default, skip_serializing_if = "Tristate::is_absent")]
    pub output_tokens: Tristate<i64>,
    #[serde(default, skip_serializing_if = "Tristate::is_absent")]
    pub total_tokens: Tristate<i64>,
    #[serde(default, skip_serializing_if = "Tristate::is_absent")]
    pub temperature: Tristate<f64>,
    #[serde(default, skip_serializing_if = "Tristate::is_absent")]
    pub tools: Tristate<Vec<Value>>,
    #[serde(flatten)]
    pub additional_properties: AdditionalProperties,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub content: String,
    #[serde(default, skip_serializing_if = "Tristate::is_absent")]
    pub metadata: Tristate<BTreeMap<String, Value>>,
    #[serde(flatten)]
    pub additional_properties: AdditionalProperties,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrieverStep {
    pub input: String,
    #[serde(default, skip_serializing_if = "Tristate::is_absent")]
    pub output: Tristate<Vec<Document>>,
    #[serde(default, skip_serializing_if = "Tristate::is_absent")]
    pub name: Tristate<String>,
    #[serde(default, skip_serializing_if = "Tristate::is_absent")]
    pub created_at_ns: Tristate<i64>,
    #[serde(default, skip_serializing_if = "Tristate::is_absent")]
    pub duration_ns: Tristate<i64>,
    #[serde(default, skip_serializing_if = "Tristate::is_absent")]
    pub metadata: Tristate<StepMetadata>,
    #[serde(default, skip_serializing_if = "Tristate::is_absent")]
    pub status_code: Tristate<i64>,
    #[serde(default, skip_serializing_if = "Tristate::is_absent")]
    pub ground_truth: Tristate<String>,
    #[serde(flatten)]
    pub additional_properties: AdditionalProperties,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolStep {
    pub input: String,
    #[serde(default, skip_serializing_if = "Tristate::is_absent")]
    pub output: Tristate<String>,
    #[serde(default, skip_serializing_if = "Tristate::is_absent")]
    pub name: Tristate<String>,
    #[serde(default, skip_serializing_if = "Tristate::is_absent")]
    pub created_at_ns: Tristate<i64>,
    #[serde(default, skip_serializing_if = "Tristate::is_absent")]
    pub duration_ns: Tristate<i64>,
    #[serde(default, skip_serializing_if = "Tristate::is_absent")]
    pub metadata: Tristate<StepMetadata>,
    #[serde(default, skip_serializing_if = "Tristate::is_absent")]
    pub status_code: Tristate<i64>,
    #[serde(default, skip_serializing_if = "Tristate::is_absent")]
    pub ground_truth: Tristate<String>,
    #[serde(flatten)]
    pub additional_properties: AdditionalProperties,
}

/// Body of the `workflow`, `agent` and `chain` steps, which nest child steps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompositeStep {
    pub input: String,
    #[serde(default, skip_serializing_if = "Tristate::is_absent")]
    pub output: Tristate<String>,
    #[serde(default, skip_serializing_if = "Tristate::is_absent")]
    pub name: Tristate<String>,
    #[serde(default, skip_serializing_if = "Tristate::is_absent")]
    pub created_at_ns: Tristate<i64>,
    #[serde(default, skip_serializing_if = "Tristate::is_absent")]
    pub duration_ns: Tristate<i64>,
    #[serde(default, skip_serializing_if = "Tristate::is_absent")]
    pub metadata: Tristate<StepMetadata>,
    #[serde(default, skip_serializing_if = "Tristate::is_absent")]
    pub status_code: Tristate<i64>,
    #[serde(default, skip_serializing_if = "Tristate::is_absent")]
    pub ground_truth: Tristate<String>,
    #[serde(default, skip_serializing_if = "Tristate::is_absent")]
    pub steps: Tristate<Vec<WorkflowStep>>,
    #[serde(flatten)]
    pub additional_properties: AdditionalProperties,
}

impl CompositeStep {
    pub fn new(input: impl Into<String>) -> Self {
        CompositeStep {
            input: input.into(),
            output: Tristate::Absent,
            name: Tristate::Absent,
            created_at_ns: Tristate::Absent,
            duration_ns: Tristate::Absent,
            metadata: Tristate::Absent,
            status_code: Tristate::Absent,
            ground_truth: Tristate::Absent,
            steps: Tristate::Absent,
            additional_properties: AdditionalProperties::new(),
        }
    }

    /// Appends a child, creating the list if it was absent or null.
    pub fn push_step(&mut self, step: WorkflowStep) {
        match &mut self.steps {
            Tristate::Value(steps) => steps.push(step),
            slot => *slot = Tristate::Value(vec![step]),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WorkflowStep {
    Llm(LlmStep),
    Retriever(RetrieverStep),
    Tool(ToolStep),
    Workflow(CompositeStep),
    Agent(CompositeStep),
    Chain(CompositeStep),
}

impl WorkflowStep {
    pub fn type_name(&self) -> &'static str {
        match self {
            WorkflowStep::Llm(_) => "llm",
            WorkflowStep::Retriever(_) => "retriever",
            WorkflowStep::Tool(_) => "tool",
            WorkflowStep::Workflow(_) => "workflow",
            WorkflowStep::Agent(_) => "agent",
            WorkflowStep::Chain(_) => "chain",
        }
    }

    pub fn as_composite_mut(&mut self) -> Option<&mut CompositeStep> {
        match self {
            WorkflowStep::Workflow(c) | WorkflowStep::Agent(c) | WorkflowStep::Chain(c) => Some(c),
            _ => None,
        }
    }

    /// The step's own output rendered as text, else the last output found
    /// in its children, searched from the last child down.
    pub fn last_output(&self) -> Option<String> {
        let own = match self {
            WorkflowStep::Llm(s) => s.output.as_value().map(value_text),
            WorkflowStep::Retriever(s) => s
                .output
                .as_value()
                .and_then(|docs| serde_json::to_string(docs).ok()),
            WorkflowStep::Tool(s) => s.output.as_value().cloned(),
            WorkflowStep::Workflow(c) | WorkflowStep::Agent(c) | WorkflowStep::Chain(c) => {
                c.output.as_value().cloned()
            }
        };
        if let Some(output) = own.filter(|o| !o.is_empty()) {
            return Some(output);
        }
        match self {
            WorkflowStep::Workflow(c) | WorkflowStep::Agent(c) | WorkflowStep::Chain(c) => c
                .steps
                .as_value()
                .and_then(|steps| steps.last())
                .and_then(WorkflowStep::last_output),
            _ => None,
        }
    }

    /// Number of steps in this subtree, the step itself included.
    pub fn count(&self) -> usize {
        match self {
            WorkflowStep::Workflow(c) | WorkflowStep::Agent(c) | WorkflowStep::Chain(c) => {
                1 + c
                    .steps
                    .as_value()
                    .map(|steps| steps.iter().map(WorkflowStep::count).sum())
                    .unwrap_or(0)
            }
            _ => 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluateRunRequest {
    pub workflows: Vec<WorkflowStep>,
    #[serde(default, skip_serializing_if = "Tristate::is_absent")]
    pub project_id: Tristate<String>,
    #[serde(default, skip_serializing_if = "Tristate::is_absent")]
    pub project_name: Tristate<String>,
    #[serde(default, skip_serializing_if = "Tristate::is_absent")]
    pub run_name: Tristate<String>,
    #[serde(default, skip_serializing_if = "Tristate::is_absent")]
    pub scorers: Tristate<Vec<ScorerConfig>>,
    #[serde(default, skip_serializing_if = "Tristate::is_absent")]
    pub registered_scorers: Tristate<Vec<Value>>,
    #[serde(default, skip_serializing_if = "Tristate::is_absent")]
    pub generated_scorers: Tristate<Vec<Value>>,
    #[serde(flatten)]
    pub additional_properties: AdditionalProperties,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluateRunResponse {
    pub project_id: String,
    pub run_id: String,
    #[serde(default, skip_serializing_if = "Tristate::is_absent")]
    pub project_name: Tristate<String>,
    #[serde(default, skip_serializing_if = "Tristate::is_absent")]
    pub run_name: Tristate<String>,
    #[serde(default, skip_serializing_if = "Tristate::is_absent")]
    pub workflows_count: Tristate<i64>,
    #[serde(default, skip_serializing_if = "Tristate::is_absent")]
    pub records_count: Tristate<i64>,
    #[serde(default, skip_serializing_if = "Tristate::is_absent")]
    pub link: Tristate<String>,
    #[serde(flatten)]
    pub additional_properties: AdditionalProperties,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogWorkflowsRequest {
    pub workflows: Vec<WorkflowStep>,
    #[serde(default, skip_serializing_if = "Tristate::is_absent")]
    pub project_id: Tristate<String>,
    #[serde(default, skip_serializing_if = "Tristate::is_absent")]
    pub project_name: Tristate<String>,
    #[serde(default, skip_serializing_if = "Tristate::is_absent")]
    pub log_stream_id: Tristate<String>,
    #[serde(default, skip_serializing_if = "Tristate::is_absent")]
    pub log_stream_name: Tristate<String>,
    #[serde(flatten)]
    pub additional_properties: AdditionalProperties,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogWorkflowsResponse {
    pub project_id: String,
    #[serde(default, skip_serializing_if = "Tristate::is_absent")]
    pub project_name: Tristate<String>,
    #[serde(default, skip_serializing_if = "Tristate::is_absent")]
    pub log_stream_id: Tristate<String>,
    #[serde(default, skip_serializing_if = "Tristate::is_absent")]
    pub workflows_count: Tristate<i64>,
    #[serde(default, skip_serializing_if = "Tristate::is_absent")]
    pub records_count: Tristate<i64>,
    #[serde(flatten)]
    pub additional_properties: AdditionalProperties,
}

fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_last_output_falls_back_to_deepest_last_child() {
        let step: WorkflowStep = serde_json::from_value(json!({
            "type": "workflow",
            "input": "q",
            "steps": [
                {"type": "tool", "input": "a", "output": "first"},
                {"type": "chain", "input": "b", "steps": [
                    {"type": "llm", "input": "c", "output": {"answer": 42}}
                ]}
            ]
        }))
        .unwrap();
        assert_eq!(step.last_output(), Some(r#"{"answer":42}"#.to_string()));

        let empty: WorkflowStep =
            serde_json::from_value(json!({"type": "agent", "input": "q"})).unwrap();
        assert_eq!(empty.last_output(), None);
    }

    #[test]
    fn test_evaluate_run_response_round_trip() {
        let raw = json!({
            "project_id": "p-1",
            "run_id": "r-1",
            "run_name": null,
            "records_count": 4,
            "link": "https://console.demo.galileo.ai/runs/r-1",
            "queued_at": "2024-05-01T10:00:00Z"
        });
        let decoded: EvaluateRunResponse = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(decoded.run_name, Tristate::Null);
        assert!(decoded.project_name.is_absent());
        assert_eq!(serde_json::to_value(&decoded).unwrap(), raw);

        let again: EvaluateRunResponse =
            serde_json::from_value(serde_json::to_value(&decoded).unwrap()).unwrap();
        assert_eq!(again, decoded);
    }

    #[test]
    fn test_log_workflows_response_round_trip() {
        let raw = json!({
            "project_id": "p-1",
            "project_name": null,
            "log_stream_id": "ls-1",
            "workflows_count": 2,
            "trace_ids": ["t-1", "t-2"]
        });
        let decoded: LogWorkflowsResponse = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(decoded.project_name, Tristate::Null);
        assert!(decoded.records_count.is_absent());
        assert!(decoded.additional_properties.contains_key("trace_ids"));
        assert_eq!(serde_json::to_value(&decoded).unwrap(), raw);

        let again: LogWorkflowsResponse =
            serde_json::from_value(serde_json::to_value(&decoded).unwrap()).unwrap();
        assert_eq!(again, decoded);
    }

    #[test]
    fn test_nested_steps_decode_by_type() {
        let raw = json!({
            "type": "agent",
            "input": "plan a trip",
            "name": "planner",
            "steps": [
                {"type": "llm", "input": "plan a trip", "output": "go to Rome", "model": "gpt-4o", "temperature": 0.2},
                {"type": "retriever", "input": "Rome", "output": [{"content": "Colosseum"}]},
                {"type": "chain", "input": "book", "steps": [{"type": "tool", "input": "{\"city\":\"Rome\"}"}]}
            ]
        });
        let step: WorkflowStep = serde_json::from_value(raw.clone()).unwrap();

        assert_eq!(step.type_name(), "agent");
        assert_eq!(step.count(), 5);
        assert_eq!(serde_json::to_value(&step).unwrap(), raw);
    }

    #[test]
    fn test_step_with_unknown_type_fails() {
        let raw = json!({"type": "daydream", "input": "x"});
        assert!(serde_json::from_value::<WorkflowStep>(raw).is_err());
        assert!(serde_json::from_value::<WorkflowStep>(json!({"input": "x"})).is_err());
    }

    #[test]
    fn test_push_step_fills_null_children() {
        let mut parent = CompositeStep::new("root");
        parent.steps = Tristate::Null;
        parent.push_step(WorkflowStep::Tool(
            serde_json::from_value(json!({"input": "q"})).unwrap(),
        ));
        assert_eq!(parent.steps.as_value().map(Vec::len), Some(1));
    }

    #[test]
    fn test_evaluate_request_encodes_scorers_with_tags() {
        let request = EvaluateRunRequest {
            workflows: vec![],
            project_id: Tristate::Absent,
            project_name: Tristate::Value("demo".to_string()),
            run_name: Tristate::Null,
            scorers: Tristate::Value(vec![ScorerConfig::standard(
                crate::domain::enums::ScorerKind::Correctness,
            )]),
            registered_scorers: Tristate::Absent,
            generated_scorers: Tristate::Absent,
            additional_properties: AdditionalProperties::new(),
        };
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({
                "workflows": [],
                "project_name": "demo",
                "run_name": null,
                "scorers": [{"name": "correctness"}]
            })
        );
    }
}
