use crate::core::context::MOLLUSKS;
use crate::core::template::{UrlTemplate, DEFAULT_TEMPLATE};
use crate::core::ConfigProvider;
use crate::utils::error::{MolluskError, Result};
use crate::utils::validation::{
    validate_non_empty_string, validate_range, validate_socket_addr, validate_url, Validate,
};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub client: ClientConfig,
    pub controller: ControllerConfig,
    pub server: ServerConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub url_template: String,
    pub timeout_seconds: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            url_template: DEFAULT_TEMPLATE.to_string(),
            timeout_seconds: 30,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
    /// Resource queried after a create. `Mollusks` unless told otherwise.
    pub refresh_target: String,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            refresh_target: MOLLUSKS.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind: String,
    pub root: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:31415".to_string(),
            root: String::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Compact,
    Json,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub format: LogFormat,
    /// `EnvFilter` directives, overridden by `RUST_LOG`.
    pub filter: Option<String>,
}

impl AppConfig {
    /// Loads configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| MolluskError::ConfigError {
            message: format!("Cannot read config file {}: {}", path.display(), e),
        })?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }
}

impl ConfigProvider for AppConfig {
    fn url_template(&self) -> &str {
        &self.client.url_template
    }

    fn timeout_seconds(&self) -> u64 {
        self.client.timeout_seconds
    }

    fn refresh_target(&self) -> &str {
        &self.controller.refresh_target
    }
}

impl Validate for AppConfig {
    fn validate(&self) -> Result<()> {
        let template = UrlTemplate::parse(&self.client.url_template)?;
        validate_url(
            "client.url_template",
            template.expand(&Default::default())?.as_str(),
        )?;
        validate_range("client.timeout_seconds", self.client.timeout_seconds, 1, 600)?;
        validate_non_empty_string("controller.refresh_target", &self.controller.refresh_target)?;
        validate_socket_addr("server.bind", &self.server.bind)?;
        if let Some(filter) = &self.logging.filter {
            EnvFilter::try_new(filter).map_err(|e| MolluskError::InvalidConfigValueError {
                field: "logging.filter".to_string(),
                value: filter.clone(),
                reason: e.to_string(),
            })?;
        }
        Ok(())
    }
}
