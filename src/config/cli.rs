use crate::config::GalileoConfig;
use crate::domain::enums::{IntegrationName, ProjectType, Split};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "galileo")]
#[command(about = "Command-line client for the Galileo API", version)]
pub struct CliConfig {
    #[arg(long, global = true, help = "TOML configuration file")]
    pub config: Option<PathBuf>,

    #[arg(long, global = true, env = "GALILEO_CONSOLE_URL")]
    pub console_url: Option<String>,

    #[arg(long, global = true, env = "GALILEO_API_URL")]
    pub api_url: Option<String>,

    #[arg(long, global = true, env = "GALILEO_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    #[arg(long, global = true, env = "GALILEO_BEARER_TOKEN", hide_env_values = true)]
    pub bearer_token: Option<String>,

    #[arg(long, global = true)]
    pub timeout_seconds: Option<u64>,

    #[arg(long, global = true, help = "Skip every telemetry call")]
    pub logging_disabled: bool,

    #[arg(long, global = true, help = "Accept invalid TLS certificates")]
    pub no_verify_ssl: bool,

    #[arg(
        long,
        global = true,
        help = "Fail on undocumented status codes instead of returning nothing"
    )]
    pub raise_on_unexpected_status: bool,

    #[arg(long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Emit logs as JSON")]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Inspect the resolved configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
    /// Manage third-party LLM credentials
    Integrations {
        #[command(subcommand)]
        action: IntegrationsAction,
    },
    Projects {
        #[command(subcommand)]
        action: ProjectsAction,
    },
    Datasets {
        #[command(subcommand)]
        action: DatasetsAction,
    },
    Edits {
        #[command(subcommand)]
        action: EditsAction,
    },
    /// Check that the API answers
    Health,
}

#[derive(Debug, Clone, Subcommand)]
pub enum ConfigAction {
    /// Print the configuration with secrets masked
    Show,
}

#[derive(Debug, Clone, Subcommand)]
pub enum IntegrationsAction {
    List {
        #[arg(long, help = "List every supported vendor instead of the configured ones")]
        all: bool,
    },
    Get {
        name: IntegrationName,
    },
    Delete {
        name: IntegrationName,
    },
    Models {
        name: IntegrationName,
    },
}

#[derive(Debug, Clone, Subcommand)]
pub enum ProjectsAction {
    List {
        #[arg(long)]
        name: Option<String>,
        #[arg(long = "type")]
        project_type: Option<ProjectType>,
    },
}

#[derive(Debug, Clone, Subcommand)]
pub enum DatasetsAction {
    List {
        #[arg(long, default_value = "100")]
        limit: i64,
        #[arg(long, help = "Follow pagination until the last page")]
        all: bool,
    },
}

#[derive(Debug, Clone, Subcommand)]
pub enum EditsAction {
    List {
        #[arg(long)]
        project_id: String,
        #[arg(long)]
        run_id: String,
        #[arg(long)]
        split: Split,
    },
}

impl CliConfig {
    /// 命令列參數優先於環境變數與設定檔
    pub fn apply_to(&self, mut config: GalileoConfig) -> GalileoConfig {
        if let Some(console_url) = &self.console_url {
            config.console_url = Some(console_url.clone());
        }
        if let Some(api_url) = &self.api_url {
            config.api_url = Some(api_url.clone());
        }
        if let Some(api_key) = &self.api_key {
            config.api_key = Some(api_key.clone());
        }
        if let Some(token) = &self.bearer_token {
            config.bearer_token = Some(token.clone());
        }
        if let Some(timeout) = self.timeout_seconds {
            config.timeout_seconds = timeout;
        }
        if self.raise_on_unexpected_status {
            config.raise_on_unexpected_status = true;
        }
        if self.logging_disabled {
            config.logging_disabled = true;
        }
        if self.no_verify_ssl {
            config.verify_ssl = false;
        }
        config
    }
}
