use anyhow::Result;
use galileo_client::domain::models::{LlmStep, LogWorkflowsRequest, ToolStep};
use galileo_client::{
    BlockingClient, GalileoClient, GalileoConfig, LoggingSwitch, Tristate, WorkflowLogger,
};
use httpmock::prelude::*;
use serde_json::json;

fn config_for(server: &MockServer) -> GalileoConfig {
    GalileoConfig::new("https://console.demo.galileo.ai")
        .with_api_url(server.base_url())
        .with_api_key("test-key")
}

fn llm_step(input: &str, output: &str) -> LlmStep {
    serde_json::from_value(json!({"input": input, "output": output, "model": "gpt-4o"})).unwrap()
}

fn ingest_response() -> serde_json::Value {
    json!({
        "project_id": "p-1",
        "log_stream_id": "ls-1",
        "workflows_count": 1,
        "records_count": 3
    })
}

#[tokio::test]
async fn test_flush_sends_one_nested_workflow() -> Result<()> {
    let server = MockServer::start_async().await;
    let ingest = server
        .mock_async(|when, then| {
            when.method(POST).path("/v1/observe/workflows").json_body(json!({
                "workflows": [{
                    "type": "workflow",
                    "input": "plan a trip",
                    "name": "planner",
                    "output": "done",
                    "steps": [
                        {"type": "llm", "input": "plan a trip", "output": "call weather", "model": "gpt-4o"},
                        {"type": "tool", "input": "paris", "output": "sunny"}
                    ]
                }],
                "project_name": "demo",
                "log_stream_name": "default"
            }));
            then.status(200).json_body(ingest_response());
        })
        .await;

    let config = config_for(&server);
    let client = GalileoClient::new(&config)?;
    let mut logger = WorkflowLogger::new(client, LoggingSwitch::enabled())
        .with_project("demo")
        .with_log_stream("default");

    logger.add_workflow("plan a trip", Some("planner"))?;
    logger.add_llm_step(llm_step("plan a trip", "call weather"))?;
    let tool: ToolStep = serde_json::from_value(json!({"input": "paris", "output": "sunny"}))?;
    logger.add_tool_step(tool)?;
    logger.conclude_workflow(Some("done"))?;
    assert_eq!(logger.pending(), 1);

    let response = logger.flush().await?.unwrap();
    ingest.assert_async().await;
    assert_eq!(response.project_id, "p-1");
    assert_eq!(logger.pending(), 0);

    // empty buffer: no second request
    assert!(logger.flush().await?.is_none());
    assert_eq!(ingest.hits_async().await, 1);
    Ok(())
}

#[tokio::test]
async fn test_disabled_logging_never_reaches_the_server() -> Result<()> {
    let server = MockServer::start_async().await;
    let ingest = server
        .mock_async(|when, then| {
            when.method(POST).path("/v1/observe/workflows");
            then.status(200).json_body(ingest_response());
        })
        .await;

    let config = config_for(&server).with_logging_disabled(true);
    let client = GalileoClient::new(&config)?;
    let mut logger = WorkflowLogger::from_config(client, &config);

    assert!(logger.switch().is_disabled());
    assert!(logger.add_workflow("ignored", None)?.is_none());
    assert!(logger.add_llm_step(llm_step("a", "b"))?.is_none());
    assert_eq!(logger.pending(), 0);
    assert!(logger.flush().await?.is_none());

    assert_eq!(ingest.hits_async().await, 0);
    Ok(())
}

#[tokio::test]
async fn test_server_error_does_not_fail_flush() -> Result<()> {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/v1/observe/workflows");
            then.status(503).body("unavailable");
        })
        .await;

    let config = config_for(&server);
    let client = GalileoClient::new(&config)?;
    let mut logger = WorkflowLogger::new(client, LoggingSwitch::enabled());

    logger.add_llm_step(llm_step("q", "a"))?;
    assert!(logger.flush().await?.is_none());
    Ok(())
}

#[tokio::test]
async fn test_failed_flush_is_retried_on_next_flush() -> Result<()> {
    let server = MockServer::start_async().await;
    let unavailable = server
        .mock_async(|when, then| {
            when.method(POST).path("/v1/observe/workflows");
            then.status(503).body("unavailable");
        })
        .await;

    let config = config_for(&server);
    let client = GalileoClient::new(&config)?;
    let mut logger = WorkflowLogger::new(client, LoggingSwitch::enabled());

    logger.add_llm_step(llm_step("q", "a"))?;
    assert!(logger.flush().await?.is_none());
    unavailable.assert_async().await;
    assert_eq!(logger.pending(), 1);

    unavailable.delete_async().await;
    let ingest = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/v1/observe/workflows")
                .json_body_partial(r#"{"workflows": [{"type": "llm", "input": "q", "output": "a"}]}"#);
            then.status(200).json_body(ingest_response());
        })
        .await;

    let response = logger.flush().await?.unwrap();
    assert_eq!(response.project_id, "p-1");
    assert_eq!(ingest.hits_async().await, 1);
    assert_eq!(logger.pending(), 0);
    Ok(())
}

#[tokio::test]
async fn test_unreachable_server_only_warns() -> Result<()> {
    // nothing listens on port 9
    let config = GalileoConfig::new("https://console.demo.galileo.ai")
        .with_api_url("http://127.0.0.1:9")
        .with_api_key("test-key")
        .with_timeout_seconds(2);
    let client = GalileoClient::new(&config)?;
    let mut logger = WorkflowLogger::new(client, LoggingSwitch::enabled());

    logger.add_llm_step(llm_step("q", "a"))?;
    assert!(logger.flush().await?.is_none());
    Ok(())
}

#[test]
fn test_blocking_client_logs_workflows() -> Result<()> {
    let server = MockServer::start();
    let ingest = server.mock(|when, then| {
        when.method(POST)
            .path("/v1/observe/workflows")
            .json_body_partial(r#"{"workflows": [{"type": "llm", "input": "q"}]}"#);
        then.status(200).json_body(ingest_response());
    });

    let client = BlockingClient::new(&config_for(&server))?;
    let request = LogWorkflowsRequest {
        workflows: vec![galileo_client::domain::models::WorkflowStep::Llm(llm_step(
            "q", "a",
        ))],
        project_id: Tristate::Value("p-1".to_string()),
        project_name: Tristate::Absent,
        log_stream_id: Tristate::Absent,
        log_stream_name: Tristate::Absent,
        additional_properties: Default::default(),
    };

    let response = client
        .log_workflows(LoggingSwitch::enabled(), request.clone())?
        .unwrap();
    assert_eq!(response.records_count, Tristate::Value(3));

    assert!(client
        .log_workflows(LoggingSwitch::disabled(), request)?
        .is_none());
    ingest.assert_hits(1);
    Ok(())
}

#[test]
fn test_blocking_healthcheck_and_datasets() -> Result<()> {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/healthcheck");
        then.status(200).body("");
    });
    server.mock(|when, then| {
        when.method(GET).path("/datasets");
        then.status(200).json_body(json!({
            "datasets": [{
                "id": "d-1",
                "name": "golden",
                "created_at": "2024-05-01T10:00:00Z",
                "updated_at": "2024-05-01T10:00:00Z",
                "num_rows": 12
            }],
            "next_starting_token": null
        }));
    });

    let client = BlockingClient::new(&config_for(&server))?;
    assert!(client.healthcheck()?);

    let datasets = client.list_all_datasets(50)?;
    assert_eq!(datasets.len(), 1);
    assert_eq!(datasets[0].num_rows, Tristate::Value(12));
    Ok(())
}
