#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
pub use cli::CliConfig;
pub use toml_config::{derive_api_url, parse_bool_flag, GalileoConfig, DEFAULT_TIMEOUT_SECONDS};
