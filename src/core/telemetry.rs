//! Kill switch and buffering for workflow logging.
//!
//! The switch is resolved once from configuration and handed to whatever
//! needs it. When it is off, wrapped operations are skipped entirely and
//! report `Ok(None)`.

use crate::config::GalileoConfig;
use crate::domain::models::{
    CompositeStep, LlmStep, LogWorkflowsRequest, LogWorkflowsResponse, RetrieverStep, ToolStep,
    WorkflowStep,
};
use crate::domain::ports::TelemetrySink;
use crate::domain::types::{AdditionalProperties, Tristate};
use crate::utils::error::{GalileoError, Result};
use std::future::Future;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoggingSwitch {
    disabled: bool,
}

impl LoggingSwitch {
    pub fn new(disabled: bool) -> Self {
        Self { disabled }
    }

    pub fn enabled() -> Self {
        Self::new(false)
    }

    pub fn disabled() -> Self {
        Self::new(true)
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled
    }
}

fn log_bypass(op_name: &str) {
    warn!("Bypassing logging for {}. Logging is currently disabled.", op_name);
}

/// Awaits `call` unless logging is disabled, in which case `call` is dropped unpolled.
pub async fn bypass_if_disabled<T, F>(
    switch: LoggingSwitch,
    op_name: &str,
    call: F,
) -> Result<Option<T>>
where
    F: Future<Output = Result<T>>,
{
    if switch.is_disabled() {
        log_bypass(op_name);
        return Ok(None);
    }
    call.await.map(Some)
}

pub fn bypass_if_disabled_blocking<T, F>(
    switch: LoggingSwitch,
    op_name: &str,
    call: F,
) -> Result<Option<T>>
where
    F: FnOnce() -> Result<T>,
{
    if switch.is_disabled() {
        log_bypass(op_name);
        return Ok(None);
    }
    call().map(Some)
}

/// Ingestion must not take the host application down with it: transport
/// failures become a warning, everything else still propagates.
pub async fn warn_on_infrastructure_error<T, F>(op_name: &str, call: F) -> Result<Option<T>>
where
    F: Future<Output = Result<Option<T>>>,
{
    match call.await {
        Err(e) if e.is_infrastructure() => {
            warn!("⚠️ {} failed to reach the API: {}", op_name, e);
            Ok(None)
        }
        other => other,
    }
}

/// Buffers workflow steps and ships them in one request on [`flush`](Self::flush).
///
/// Composite steps (workflow, agent, chain) form a stack of open parents.
/// Steps added while a parent is open become its children; otherwise each
/// step is logged as its own top-level entry.
pub struct WorkflowLogger<S: TelemetrySink> {
    sink: S,
    switch: LoggingSwitch,
    project_id: Tristate<String>,
    project_name: Tristate<String>,
    log_stream_id: Tristate<String>,
    log_stream_name: Tristate<String>,
    workflows: Vec<WorkflowStep>,
    // innermost parent last
    open: Vec<WorkflowStep>,
}

impl<S: TelemetrySink> WorkflowLogger<S> {
    pub fn new(sink: S, switch: LoggingSwitch) -> Self {
        Self {
            sink,
            switch,
            project_id: Tristate::Absent,
            project_name: Tristate::Absent,
            log_stream_id: Tristate::Absent,
            log_stream_name: Tristate::Absent,
            workflows: Vec::new(),
            open: Vec::new(),
        }
    }

    /// Takes the switch and the project / log stream targets from `config`.
    pub fn from_config(sink: S, config: &GalileoConfig) -> Self {
        let to_tristate = |value: &Option<String>| match value {
            Some(v) => Tristate::Value(v.clone()),
            None => Tristate::Absent,
        };
        Self {
            project_id: to_tristate(&config.project_id),
            project_name: to_tristate(&config.project),
            log_stream_id: to_tristate(&config.log_stream_id),
            log_stream_name: to_tristate(&config.log_stream),
            ..Self::new(sink, config.logging_switch())
        }
    }

    pub fn with_project(mut self, name: impl Into<String>) -> Self {
        self.project_name = Tristate::Value(name.into());
        self
    }

    pub fn with_log_stream(mut self, name: impl Into<String>) -> Self {
        self.log_stream_name = Tristate::Value(name.into());
        self
    }

    pub fn switch(&self) -> LoggingSwitch {
        self.switch
    }

    /// Number of buffered top-level workflows, an open one included.
    pub fn pending(&self) -> usize {
        self.workflows.len() + usize::from(!self.open.is_empty())
    }

    /// How many composite steps are currently open.
    pub fn depth(&self) -> usize {
        self.open.len()
    }

    /// Opens a new top-level workflow. Anything still open is concluded first.
    pub fn add_workflow(
        &mut self,
        input: impl Into<String>,
        name: Option<&str>,
    ) -> Result<Option<()>> {
        let switch = self.switch;
        bypass_if_disabled_blocking(switch, "add_workflow", || {
            self.close_all();
            self.open
                .push(WorkflowStep::Workflow(composite(input.into(), name)));
            Ok(())
        })
    }

    /// Opens a workflow nested under the current parent.
    pub fn add_workflow_step(
        &mut self,
        input: impl Into<String>,
        name: Option<&str>,
    ) -> Result<Option<()>> {
        let switch = self.switch;
        bypass_if_disabled_blocking(switch, "add_workflow_step", || {
            self.open
                .push(WorkflowStep::Workflow(composite(input.into(), name)));
            Ok(())
        })
    }

    pub fn add_agent_step(
        &mut self,
        input: impl Into<String>,
        name: Option<&str>,
    ) -> Result<Option<()>> {
        let switch = self.switch;
        bypass_if_disabled_blocking(switch, "add_agent_step", || {
            self.open
                .push(WorkflowStep::Agent(composite(input.into(), name)));
            Ok(())
        })
    }

    pub fn add_chain_step(
        &mut self,
        input: impl Into<String>,
        name: Option<&str>,
    ) -> Result<Option<()>> {
        let switch = self.switch;
        bypass_if_disabled_blocking(switch, "add_chain_step", || {
            self.open
                .push(WorkflowStep::Chain(composite(input.into(), name)));
            Ok(())
        })
    }

    pub fn add_llm_step(&mut self, step: LlmStep) -> Result<Option<()>> {
        let switch = self.switch;
        bypass_if_disabled_blocking(switch, "add_llm_step", || {
            self.push(WorkflowStep::Llm(step));
            Ok(())
        })
    }

    pub fn add_retriever_step(&mut self, step: RetrieverStep) -> Result<Option<()>> {
        let switch = self.switch;
        bypass_if_disabled_blocking(switch, "add_retriever_step", || {
            self.push(WorkflowStep::Retriever(step));
            Ok(())
        })
    }

    pub fn add_tool_step(&mut self, step: ToolStep) -> Result<Option<()>> {
        let switch = self.switch;
        bypass_if_disabled_blocking(switch, "add_tool_step", || {
            self.push(WorkflowStep::Tool(step));
            Ok(())
        })
    }

    /// Closes the innermost open step and attaches it to its parent.
    ///
    /// Without an explicit `output` the step takes the last output found
    /// among its children.
    pub fn conclude_workflow(&mut self, output: Option<&str>) -> Result<Option<()>> {
        let switch = self.switch;
        bypass_if_disabled_blocking(switch, "conclude_workflow", || {
            if self.open.is_empty() {
                return Err(GalileoError::ValidationError {
                    message: "no workflow is open".to_string(),
                });
            }
            self.close_one(output.map(str::to_string));
            Ok(())
        })
    }

    /// Sends everything buffered in a single request. Nothing is sent when the
    /// buffer is empty. The buffer is only cleared once the server accepted it,
    /// so a failed flush can be retried.
    pub async fn flush(&mut self) -> Result<Option<LogWorkflowsResponse>> {
        let switch = self.switch;
        let sent = bypass_if_disabled(switch, "flush", self.send_buffered()).await?;
        Ok(sent.flatten())
    }

    async fn send_buffered(&mut self) -> Result<Option<LogWorkflowsResponse>> {
        self.close_all();
        if self.workflows.is_empty() {
            debug!("Nothing to flush");
            return Ok(None);
        }

        let count = self.workflows.len();
        let request = LogWorkflowsRequest {
            workflows: self.workflows.clone(),
            project_id: self.project_id.clone(),
            project_name: self.project_name.clone(),
            log_stream_id: self.log_stream_id.clone(),
            log_stream_name: self.log_stream_name.clone(),
            additional_properties: AdditionalProperties::new(),
        };

        let sent =
            warn_on_infrastructure_error("flush", self.sink.ingest_workflows(request)).await?;
        match &sent {
            Some(_) => {
                self.workflows.clear();
                info!("📤 Flushed {} workflow(s)", count);
            }
            None => warn!("⚠️ Flush not accepted; keeping {} workflow(s) buffered", count),
        }
        Ok(sent)
    }

    fn push(&mut self, step: WorkflowStep) {
        match self.open.last_mut().and_then(WorkflowStep::as_composite_mut) {
            Some(parent) => parent.push_step(step),
            None => self.workflows.push(step),
        }
    }

    fn close_one(&mut self, output: Option<String>) {
        let Some(mut step) = self.open.pop() else {
            return;
        };
        let output = output.or_else(|| step.last_output());
        if let (Some(output), Some(composite)) = (output, step.as_composite_mut()) {
            composite.output = Tristate::Value(output);
        }
        self.push(step);
    }

    fn close_all(&mut self) {
        while !self.open.is_empty() {
            self.close_one(None);
        }
    }
}

fn composite(input: String, name: Option<&str>) -> CompositeStep {
    let mut step = CompositeStep::new(input);
    if let Some(name) = name {
        step.name = Tristate::Value(name.to_string());
    }
    step
}
