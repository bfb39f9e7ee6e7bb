use crate::domain::models::HttpValidationError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GalileoError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Unexpected status code {status}: {body}")]
    UnexpectedStatus { status: u16, body: String },

    #[error("Request rejected by server validation: {0}")]
    ValidationFailed(HttpValidationError),

    #[error("Unknown value '{value}' for {field} (expected one of: {expected})")]
    UnknownVariant {
        field: String,
        value: String,
        expected: String,
    },

    #[error("Missing discriminator field '{field}'")]
    MissingDiscriminator { field: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Validation error: {message}")]
    ValidationError { message: String },

    #[error("API error: {message}")]
    ApiError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Server,
    Client,
    Configuration,
    Data,
}

impl GalileoError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            GalileoError::HttpError(_) => ErrorCategory::Network,
            GalileoError::UnexpectedStatus { status, .. } if *status >= 500 => {
                ErrorCategory::Server
            }
            GalileoError::UnexpectedStatus { .. }
            | GalileoError::ValidationFailed(_)
            | GalileoError::ValidationError { .. }
            | GalileoError::ApiError { .. } => ErrorCategory::Client,
            GalileoError::IoError(_)
            | GalileoError::ConfigError { .. }
            | GalileoError::ConfigValidationError { .. }
            | GalileoError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            GalileoError::SerializationError(_)
            | GalileoError::UnknownVariant { .. }
            | GalileoError::MissingDiscriminator { .. } => ErrorCategory::Data,
        }
    }

    /// Transport-level failures outside the caller's control (connect, timeout, broken body).
    pub fn is_infrastructure(&self) -> bool {
        match self {
            GalileoError::HttpError(e) => {
                e.is_connect() || e.is_timeout() || e.is_request() || e.is_body()
            }
            GalileoError::IoError(_) => true,
            _ => false,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Network => format!("Could not reach the Galileo API: {}", self),
            ErrorCategory::Server => format!("The Galileo API returned a server error: {}", self),
            ErrorCategory::Client => format!("The request was not accepted: {}", self),
            ErrorCategory::Configuration => format!("Configuration problem: {}", self),
            ErrorCategory::Data => format!("Unexpected response payload: {}", self),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Network => {
                "Check GALILEO_CONSOLE_URL and your network connection, then try again"
            }
            ErrorCategory::Server => "The service may be degraded; try again later",
            ErrorCategory::Client => "Check the arguments and your API key permissions",
            ErrorCategory::Configuration => {
                "Set GALILEO_CONSOLE_URL and GALILEO_API_KEY (or pass --config with a TOML file)"
            }
            ErrorCategory::Data => "Upgrade the client; the server may be sending a newer schema",
        }
    }
}

pub type Result<T> = std::result::Result<T, GalileoError>;
