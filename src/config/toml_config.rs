use crate::core::telemetry::LoggingSwitch;
use crate::domain::ports::ConfigProvider;
use crate::utils::error::{GalileoError, Result};
use crate::utils::logger::level_directive;
use crate::utils::validation::{
    validate_non_empty_string, validate_positive_number, validate_url, Validate,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::debug;

pub const DEFAULT_TIMEOUT_SECONDS: u64 = 60;
const LOCAL_API_URL: &str = "http://localhost:8088";

/// Client configuration.
///
/// Resolution order, highest first: explicit value (builder or CLI flag),
/// `GALILEO_*` environment variable, TOML file, default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GalileoConfig {
    pub console_url: Option<String>,
    pub api_url: Option<String>,
    pub api_key: Option<String>,
    pub bearer_token: Option<String>,
    pub project: Option<String>,
    pub project_id: Option<String>,
    pub log_stream: Option<String>,
    pub log_stream_id: Option<String>,
    pub logging_disabled: bool,
    pub log_level: Option<String>,
    pub timeout_seconds: u64,
    pub raise_on_unexpected_status: bool,
    pub verify_ssl: bool,
}

impl Default for GalileoConfig {
    fn default() -> Self {
        Self {
            console_url: None,
            api_url: None,
            api_key: None,
            bearer_token: None,
            project: None,
            project_id: None,
            log_stream: None,
            log_stream_id: None,
            logging_disabled: false,
            log_level: None,
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
            raise_on_unexpected_status: false,
            verify_ssl: true,
        }
    }
}

/// `true`, `1`, `t` 與 `yes` (不分大小寫) 視為開啟
pub fn parse_bool_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "true" | "1" | "t" | "yes"
    )
}

/// 由 console URL 推導 API URL
pub fn derive_api_url(console_url: &str) -> String {
    if console_url.contains("localhost") || console_url.contains("127.0.0.1") {
        return LOCAL_API_URL.to_string();
    }
    console_url.trim_end_matches('/').replace("console", "api")
}

impl GalileoConfig {
    pub fn new(console_url: impl Into<String>) -> Self {
        Self {
            console_url: Some(console_url.into()),
            ..Self::default()
        }
    }

    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = Some(api_url.into());
        self
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_bearer_token(mut self, token: impl Into<String>) -> Self {
        self.bearer_token = Some(token.into());
        self
    }

    pub fn with_logging_disabled(mut self, disabled: bool) -> Self {
        self.logging_disabled = disabled;
        self
    }

    pub fn with_raise_on_unexpected_status(mut self, raise: bool) -> Self {
        self.raise_on_unexpected_status = raise;
        self
    }

    pub fn with_timeout_seconds(mut self, seconds: u64) -> Self {
        self.timeout_seconds = seconds;
        self
    }

    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| GalileoError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${GALILEO_API_KEY})，未設定的變數保留原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = regex::Regex::new(r"\$\{([^}]+)\}").map_err(|e| GalileoError::ConfigError {
            message: format!("invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    /// Loads `.env`, then the optional TOML file, then overlays the process environment.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        // 已存在的環境變數不會被 .env 覆蓋
        if let Ok(env_path) = dotenvy::dotenv() {
            debug!("📄 Loaded environment from {}", env_path.display());
        }

        let base = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        base.apply_env()
    }

    pub fn apply_env(self) -> Result<Self> {
        self.apply_env_with(|key| std::env::var(key).ok())
    }

    /// Overlays `GALILEO_*` values returned by `lookup`. Empty values are ignored.
    pub fn apply_env_with<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let strings: [(&str, &mut Option<String>); 9] = [
            ("GALILEO_CONSOLE_URL", &mut self.console_url),
            ("GALILEO_API_URL", &mut self.api_url),
            ("GALILEO_API_KEY", &mut self.api_key),
            ("GALILEO_BEARER_TOKEN", &mut self.bearer_token),
            ("GALILEO_PROJECT", &mut self.project),
            ("GALILEO_PROJECT_ID", &mut self.project_id),
            ("GALILEO_LOG_STREAM", &mut self.log_stream),
            ("GALILEO_LOG_STREAM_ID", &mut self.log_stream_id),
            ("GALILEO_LOG_LEVEL", &mut self.log_level),
        ];
        for (key, slot) in strings {
            if let Some(value) = get(key) {
                *slot = Some(value);
            }
        }

        if let Some(value) = get("GALILEO_LOGGING_DISABLED") {
            self.logging_disabled = parse_bool_flag(&value);
        }
        if let Some(value) = get("GALILEO_RAISE_ON_UNEXPECTED_STATUS") {
            self.raise_on_unexpected_status = parse_bool_flag(&value);
        }
        if let Some(value) = get("GALILEO_VERIFY_SSL") {
            self.verify_ssl = parse_bool_flag(&value);
        }
        if let Some(value) = get("GALILEO_TIMEOUT_SECONDS") {
            self.timeout_seconds =
                value
                    .trim()
                    .parse()
                    .map_err(|_| GalileoError::InvalidConfigValueError {
                        field: "timeout_seconds".to_string(),
                        value: value.clone(),
                        reason: "expected a whole number of seconds".to_string(),
                    })?;
        }

        Ok(self)
    }

    /// Fills in `api_url` from `console_url` when it was not given explicitly.
    pub fn resolve(mut self) -> Result<Self> {
        if self.api_url.is_none() {
            let console_url = self.console_url.as_deref().ok_or_else(|| {
                GalileoError::ConfigValidationError {
                    field: "console_url".to_string(),
                    message: "GALILEO_CONSOLE_URL must be set".to_string(),
                }
            })?;
            self.api_url = Some(derive_api_url(console_url));
        }
        Ok(self)
    }

    pub fn logging_switch(&self) -> LoggingSwitch {
        LoggingSwitch::new(self.logging_disabled)
    }

    /// Display view with secrets replaced by `***`.
    pub fn masked(&self) -> BTreeMap<&'static str, String> {
        fn show(value: &Option<String>) -> String {
            value.clone().unwrap_or_default()
        }
        fn hide(value: &Option<String>) -> String {
            value.as_ref().map(|_| "***".to_string()).unwrap_or_default()
        }

        BTreeMap::from([
            ("console_url", show(&self.console_url)),
            ("api_url", show(&self.api_url)),
            ("api_key", hide(&self.api_key)),
            ("bearer_token", hide(&self.bearer_token)),
            ("project", show(&self.project)),
            ("project_id", show(&self.project_id)),
            ("log_stream", show(&self.log_stream)),
            ("log_stream_id", show(&self.log_stream_id)),
            ("logging_disabled", self.logging_disabled.to_string()),
            ("log_level", show(&self.log_level)),
            ("timeout_seconds", self.timeout_seconds.to_string()),
            (
                "raise_on_unexpected_status",
                self.raise_on_unexpected_status.to_string(),
            ),
            ("verify_ssl", self.verify_ssl.to_string()),
        ])
    }
}

impl ConfigProvider for GalileoConfig {
    fn api_url(&self) -> &str {
        self.api_url.as_deref().unwrap_or_default()
    }

    fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref()
    }

    fn bearer_token(&self) -> Option<&str> {
        self.bearer_token.as_deref()
    }

    fn timeout_seconds(&self) -> u64 {
        self.timeout_seconds
    }

    fn raise_on_unexpected_status(&self) -> bool {
        self.raise_on_unexpected_status
    }

    fn verify_ssl(&self) -> bool {
        self.verify_ssl
    }
}

impl Validate for GalileoConfig {
    fn validate(&self) -> Result<()> {
        if self.console_url.is_none() && self.api_url.is_none() {
            return Err(GalileoError::ConfigValidationError {
                field: "console_url".to_string(),
                message: "set GALILEO_CONSOLE_URL or GALILEO_API_URL".to_string(),
            });
        }
        if let Some(console_url) = &self.console_url {
            validate_url("console_url", console_url)?;
        }
        if let Some(api_url) = &self.api_url {
            validate_url("api_url", api_url)?;
        }

        match (&self.api_key, &self.bearer_token) {
            (Some(api_key), _) => validate_non_empty_string("api_key", api_key)?,
            (None, Some(token)) => validate_non_empty_string("bearer_token", token)?,
            (None, None) => {
                return Err(GalileoError::ConfigValidationError {
                    field: "api_key".to_string(),
                    message: "set GALILEO_API_KEY or GALILEO_BEARER_TOKEN".to_string(),
                })
            }
        }

        validate_positive_number("timeout_seconds", self.timeout_seconds, 1)?;

        if let Some(level) = &self.log_level {
            if level_directive(level).is_none() {
                return Err(GalileoError::InvalidConfigValueError {
                    field: "log_level".to_string(),
                    value: level.clone(),
                    reason: "expected one of DEBUG, INFO, WARNING, ERROR, CRITICAL".to_string(),
                });
            }
        }

        Ok(())
    }
}
