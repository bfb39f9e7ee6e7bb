use anyhow::Result;
use galileo_client::domain::enums::IntegrationName;
use galileo_client::domain::models::IntegrationConfig;
use galileo_client::{GalileoClient, GalileoConfig, GalileoError, Integrations, SyncState, Tristate};
use httpmock::prelude::*;
use serde_json::{json, Value};

fn integrations_for(server: &MockServer) -> Integrations {
    let config = GalileoConfig::new("https://console.demo.galileo.ai")
        .with_api_url(server.base_url())
        .with_api_key("test-key")
        .with_raise_on_unexpected_status(true);
    Integrations::new(GalileoClient::new(&config).unwrap())
}

fn integration_row(id: &str, name: &str, is_selected: bool) -> Value {
    json!({
        "id": id,
        "name": name,
        "created_at": "2024-05-01T10:00:00Z",
        "updated_at": "2024-05-02T10:00:00Z",
        "created_by": "user-1",
        "is_selected": is_selected
    })
}

#[tokio::test]
async fn test_get_prefers_the_selected_integration() -> Result<()> {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/integrations");
            then.status(200).json_body(json!([
                integration_row("oa-1", "openai", false),
                integration_row("az-1", "azure", true),
                integration_row("oa-2", "openai", true),
            ]));
        })
        .await;

    let integrations = integrations_for(&server);

    let providers = integrations.list().await?;
    assert_eq!(providers.len(), 3);
    assert!(providers.iter().all(|p| p.state() == SyncState::Synced));

    let openai = integrations.get(IntegrationName::OpenAi).await?.unwrap();
    assert_eq!(openai.id, "oa-2");
    assert!(openai.is_selected);

    assert!(integrations.get(IntegrationName::Mistral).await?.is_none());
    Ok(())
}

#[tokio::test]
async fn test_list_available_returns_vendor_names() -> Result<()> {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/integrations/available");
            then.status(200)
                .json_body(json!({"integrations": ["openai", "anthropic", "writer"]}));
        })
        .await;

    let available = integrations_for(&server).list_available().await?;
    assert_eq!(
        available,
        vec![
            IntegrationName::OpenAi,
            IntegrationName::Anthropic,
            IntegrationName::Writer
        ]
    );
    Ok(())
}

#[tokio::test]
async fn test_create_refresh_and_delete_provider() -> Result<()> {
    let server = MockServer::start_async().await;
    let create = server
        .mock_async(|when, then| {
            when.method(PUT)
                .path("/integrations/anthropic")
                .json_body(json!({"token": "sk-ant"}));
            then.status(200)
                .json_body(integration_row("an-1", "anthropic", true));
        })
        .await;
    // `name` omitted on purpose; the path decides the variant
    let read = server
        .mock_async(|when, then| {
            when.method(GET).path("/integrations/anthropic");
            then.status(200)
                .json_body(json!({"id": "an-1", "endpoint": "https://proxy.example.com"}));
        })
        .await;
    let delete = server
        .mock_async(|when, then| {
            when.method(DELETE).path("/integrations/anthropic");
            then.status(200).json_body(json!({}));
        })
        .await;

    let integrations = integrations_for(&server);
    let mut provider = integrations.create_anthropic("sk-ant").await?;
    create.assert_async().await;
    assert_eq!(provider.id, "an-1");
    assert_eq!(provider.state(), SyncState::Synced);
    assert!(provider.config().is_none());

    match provider.refresh().await? {
        IntegrationConfig::Anthropic(config) => {
            assert_eq!(config.endpoint, Tristate::Value("https://proxy.example.com".to_string()));
        }
        other => panic!("expected anthropic config, got {:?}", other),
    }
    read.assert_async().await;

    provider.delete().await?;
    delete.assert_async().await;
    assert_eq!(provider.state(), SyncState::Deleted);

    // a deleted provider no longer lists models
    assert!(matches!(
        provider.models().await,
        Err(GalileoError::ValidationError { .. })
    ));
    Ok(())
}

#[tokio::test]
async fn test_failed_refresh_marks_provider() -> Result<()> {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/integrations");
            then.status(200)
                .json_body(json!([integration_row("oa-1", "openai", true)]));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/integrations/openai");
            then.status(404).body("gone");
        })
        .await;

    let integrations = integrations_for(&server);
    let mut provider = integrations.get(IntegrationName::OpenAi).await?.unwrap();

    let err = provider.refresh().await.unwrap_err();
    assert!(matches!(err, GalileoError::ApiError { .. }));
    assert_eq!(provider.state(), SyncState::FailedSync);
    Ok(())
}

#[tokio::test]
async fn test_update_rejects_other_vendor_credentials() -> Result<()> {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/integrations");
            then.status(200)
                .json_body(json!([integration_row("oa-1", "openai", true)]));
        })
        .await;
    let put = server
        .mock_async(|when, then| {
            when.method(PUT).path("/integrations/openai");
            then.status(200)
                .json_body(integration_row("oa-9", "openai", true));
        })
        .await;

    let integrations = integrations_for(&server);
    let mut provider = integrations.get(IntegrationName::OpenAi).await?.unwrap();

    let err = provider
        .update(galileo_client::ProviderCredentials::anthropic("sk-ant"))
        .await
        .unwrap_err();
    assert!(matches!(err, GalileoError::ValidationError { .. }));
    assert_eq!(put.hits_async().await, 0);

    provider
        .update(galileo_client::ProviderCredentials::openai("sk-new", None))
        .await?;
    put.assert_async().await;
    assert_eq!(provider.id, "oa-9");
    assert_eq!(provider.state(), SyncState::Synced);
    Ok(())
}

#[tokio::test]
async fn test_models_and_model_lookup() -> Result<()> {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/integrations");
            then.status(200)
                .json_body(json!([integration_row("oa-1", "openai", true)]));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/llm_integrations/openai/models");
            then.status(200).json_body(json!(["gpt-4o", "gpt-4o-mini"]));
        })
        .await;

    let integrations = integrations_for(&server);
    let provider = integrations.get(IntegrationName::OpenAi).await?.unwrap();

    let models = provider.models().await?;
    assert_eq!(models.len(), 2);
    assert_eq!(models[0].provider_name, IntegrationName::OpenAi);

    let by_alias = provider.get_model(None, Some("gpt-4o-mini")).await?;
    assert_eq!(by_alias.map(|m| m.name), Some("gpt-4o-mini".to_string()));
    assert!(provider.get_model(Some("claude"), None).await?.is_none());
    assert!(provider.get_model(None, None).await.is_err());
    assert!(provider.get_model(Some("a"), Some("b")).await.is_err());
    Ok(())
}

#[tokio::test]
async fn test_create_validation_error_becomes_api_error() -> Result<()> {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(PUT).path("/integrations/azure");
            then.status(422).json_body(json!({
                "detail": [{"loc": ["body", "endpoint"], "msg": "invalid url", "type": "value_error"}]
            }));
        })
        .await;

    let err = integrations_for(&server)
        .create_azure("token", "not-a-url")
        .await
        .unwrap_err();

    match err {
        GalileoError::ApiError { message } => assert!(message.contains("body.endpoint: invalid url")),
        other => panic!("expected ApiError, got {:?}", other),
    }
    Ok(())
}

#[tokio::test]
async fn test_blank_credentials_never_reach_the_server() -> Result<()> {
    let server = MockServer::start_async().await;
    let put = server
        .mock_async(|when, then| {
            when.method(PUT).path_contains("/integrations/");
            then.status(200)
                .json_body(integration_row("x-1", "openai", true));
        })
        .await;

    let integrations = integrations_for(&server);
    for result in [
        integrations.create_openai("", None).await,
        integrations.create_azure("az-key", "   ").await,
        integrations.create_bedrock("AKIA", "", None, None).await,
    ] {
        assert!(matches!(result, Err(GalileoError::ValidationError { .. })));
    }

    assert_eq!(put.hits_async().await, 0);
    Ok(())
}
