use anyhow::{Context, Result};
use clap::Parser;
use galileo_client::config::cli::{
    Command, ConfigAction, DatasetsAction, EditsAction, IntegrationsAction, ProjectsAction,
};
use galileo_client::core::endpoints::{GetRunEdits, ListDatasets, ListProjects};
use galileo_client::utils::error::ErrorCategory;
use galileo_client::utils::{logger, validation::Validate};
use galileo_client::{
    CliConfig, GalileoClient, GalileoConfig, GalileoError, Integrations, Provider, Tristate,
};
use serde::Serialize;
use serde_json::json;

#[tokio::main]
async fn main() {
    let cli = CliConfig::parse();

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            logger::init_cli_logger(cli.verbose, None);
            fail(&e)
        }
    };

    // 初始化日誌
    if cli.json_logs {
        logger::init_json_logger(config.log_level.as_deref());
    } else {
        logger::init_cli_logger(cli.verbose, config.log_level.as_deref());
    }
    tracing::debug!("Resolved config: {:?}", config.masked());

    if let Err(e) = run(&cli, config).await {
        fail(&e);
    }
}

fn load_config(cli: &CliConfig) -> Result<GalileoConfig> {
    let config = GalileoConfig::load(cli.config.as_deref()).context("loading configuration")?;
    Ok(cli.apply_to(config))
}

async fn run(cli: &CliConfig, config: GalileoConfig) -> Result<()> {
    if let Command::Config {
        action: ConfigAction::Show,
    } = &cli.command
    {
        // 未通過驗證的設定也能顯示
        let shown = config.clone().resolve().unwrap_or(config);
        return print_json(&shown.masked());
    }

    let config = config.resolve()?;
    config.validate()?;
    let client = GalileoClient::new(&config)?;

    match &cli.command {
        Command::Config { .. } => Ok(()),
        Command::Health => {
            let healthy = client.healthcheck().await?;
            print_json(&json!({ "healthy": healthy }))?;
            if !healthy {
                anyhow::bail!(GalileoError::ApiError {
                    message: "healthcheck did not return 200".to_string(),
                });
            }
            Ok(())
        }
        Command::Integrations { action } => run_integrations(client, action).await,
        Command::Projects {
            action: ProjectsAction::List { name, project_type },
        } => {
            let endpoint = ListProjects {
                project_name: name.clone().map(Tristate::Value).unwrap_or_default(),
                project_type: project_type.map(Tristate::Value).unwrap_or_default(),
            };
            print_json(&client.expect_success(&endpoint).await?)
        }
        Command::Datasets {
            action: DatasetsAction::List { limit, all },
        } => {
            if *all {
                print_json(&client.list_all_datasets(*limit).await?)
            } else {
                let page = client
                    .expect_success(&ListDatasets {
                        starting_token: 0,
                        limit: *limit,
                    })
                    .await?;
                print_json(&page)
            }
        }
        Command::Edits {
            action:
                EditsAction::List {
                    project_id,
                    run_id,
                    split,
                },
        } => {
            let endpoint = GetRunEdits {
                project_id: project_id.clone(),
                run_id: run_id.clone(),
                split: *split,
            };
            print_json(&client.expect_success(&endpoint).await?)
        }
    }
}

async fn run_integrations(client: GalileoClient, action: &IntegrationsAction) -> Result<()> {
    let integrations = Integrations::new(client);

    match action {
        IntegrationsAction::List { all: true } => print_json(&integrations.list_available().await?),
        IntegrationsAction::List { all: false } => {
            let providers = integrations.list().await?;
            let rows: Vec<_> = providers.iter().map(provider_summary).collect();
            print_json(&rows)
        }
        IntegrationsAction::Get { name } => {
            let mut provider = require_provider(&integrations, *name).await?;
            let config = provider.refresh().await?;
            print_json(config)
        }
        IntegrationsAction::Delete { name } => {
            let mut provider = require_provider(&integrations, *name).await?;
            provider.delete().await?;
            tracing::info!("🗑️ Deleted integration {}", name);
            print_json(&json!({ "deleted": name }))
        }
        IntegrationsAction::Models { name } => {
            let provider = require_provider(&integrations, *name).await?;
            let models = provider.models().await?;
            let names: Vec<&str> = models.iter().map(|m| m.name.as_str()).collect();
            print_json(&names)
        }
    }
}

async fn require_provider(
    integrations: &Integrations,
    name: galileo_client::domain::enums::IntegrationName,
) -> Result<Provider> {
    integrations.get(name).await?.ok_or_else(|| {
        GalileoError::ApiError {
            message: format!("integration '{}' is not configured", name),
        }
        .into()
    })
}

fn provider_summary(provider: &Provider) -> serde_json::Value {
    json!({
        "id": provider.id,
        "name": provider.name,
        "created_at": provider.created_at,
        "updated_at": provider.updated_at,
        "created_by": provider.created_by,
        "is_selected": provider.is_selected,
    })
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// 0 成功、1 設定錯誤、2 API 錯誤、3 網路錯誤
fn exit_code(error: &anyhow::Error) -> i32 {
    match error.downcast_ref::<GalileoError>().map(GalileoError::category) {
        Some(ErrorCategory::Configuration) => 1,
        Some(ErrorCategory::Network) => 3,
        _ => 2,
    }
}

fn fail(error: &anyhow::Error) -> ! {
    match error.downcast_ref::<GalileoError>() {
        Some(e) => {
            tracing::error!("❌ {} (Category: {:?})", e, e.category());
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());
        }
        None => {
            tracing::error!("❌ {:#}", error);
            eprintln!("❌ {:#}", error);
        }
    }
    std::process::exit(exit_code(error));
}
