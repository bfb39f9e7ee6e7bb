pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::GalileoConfig;

pub use core::integration::{Integrations, Model, Provider, ProviderCredentials, SyncState};
pub use core::telemetry::{LoggingSwitch, WorkflowLogger};
pub use core::{BlockingClient, Endpoint, GalileoClient, Parsed, Response};
pub use domain::types::{AdditionalProperties, Tristate};
pub use utils::error::{GalileoError, Result};
