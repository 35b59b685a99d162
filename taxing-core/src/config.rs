//! Portal configuration
//!
//! Layered as: built-in defaults, then an optional TOML file, then
//! `TAXING__SECTION__KEY` environment variables.

use crate::error::{ErrorContext, PortalError, PortalResult};
use crate::logging::LoggingConfig;
use crate::{config_error, validation_error};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Addresses that the original deployment treated as super administrators.
pub const DEFAULT_SUPER_ADMIN_EMAILS: [&str; 2] = ["varunkanu2000@gmail.com", "paras@gmail.com"];

/// Environment variable prefix
pub const ENV_PREFIX: &str = "TAXING";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct PortalConfig {
    pub server: ServerConfig,
    pub backend: BackendSettings,
    pub auth: AuthSettings,
    pub logging: LoggingConfig,
}

/// HTTP listener settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub dev_mode: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            dev_mode: false,
        }
    }
}

/// Where the external REST backend lives
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendSettings {
    pub base_url: String,
    /// Request timeout; `None` leaves requests unbounded
    pub timeout_seconds: Option<u64>,
    pub user_agent: String,
}

impl Default for BackendSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8001".to_string(),
            timeout_seconds: None,
            user_agent: format!("taxing-portal/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// Authorization model settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthSettings {
    /// Emails granted the super-admin dashboard regardless of stored role
    pub super_admin_emails: Vec<String>,
    /// Route unauthorized visitors are sent to
    pub home_path: String,
    /// Delay before following a post-login redirect
    pub redirect_delay_ms: u64,
    /// Session file used by the command-line client
    pub session_file: Option<PathBuf>,
}

impl Default for AuthSettings {
    fn default() -> Self {
        Self {
            super_admin_emails: DEFAULT_SUPER_ADMIN_EMAILS
                .iter()
                .map(|email| email.to_string())
                .collect(),
            home_path: "/".to_string(),
            redirect_delay_ms: 1500,
            session_file: None,
        }
    }
}

impl PortalConfig {
    /// Load configuration from defaults, an optional file and the environment
    pub fn load(path: Option<&Path>) -> PortalResult<Self> {
        let defaults = config::Config::try_from(&PortalConfig::default())
            .map_err(|e| wrap_config_error("Failed to seed default configuration", e))?;

        let mut builder = config::Config::builder().add_source(defaults);

        if let Some(path) = path {
            builder = builder.add_source(
                config::File::from(path.to_path_buf())
                    .format(config::FileFormat::Toml)
                    .required(true),
            );
        }

        builder = builder.add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true)
                .list_separator(",")
                .with_list_parse_key("auth.super_admin_emails"),
        );

        let config: PortalConfig = builder
            .build()
            .map_err(|e| wrap_config_error("Failed to read configuration", e))?
            .try_deserialize()
            .map_err(|e| wrap_config_error("Failed to parse configuration", e))?;

        Ok(config)
    }

    /// Read a configuration file without consulting the environment
    pub fn from_file<P: AsRef<Path>>(path: P) -> PortalResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| PortalError::Config {
            message: format!("Failed to read config file: {}", e),
            source: Some(Box::new(e)),
            context: ErrorContext::new("config")
                .with_operation("read_file")
                .with_suggestion("Check if the config file exists and is readable"),
        })?;

        toml::from_str(&content).map_err(|e| PortalError::Config {
            message: format!("Failed to parse config: {}", e),
            source: Some(Box::new(e)),
            context: ErrorContext::new("config")
                .with_operation("parse_toml")
                .with_suggestion("Check TOML syntax in config file"),
        })
    }

    /// Write configuration to a TOML file, creating parent directories
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> PortalResult<()> {
        let content = toml::to_string_pretty(self).map_err(|e| PortalError::Config {
            message: format!("Failed to serialize config: {}", e),
            source: Some(Box::new(e)),
            context: ErrorContext::new("config").with_operation("serialize_toml"),
        })?;

        if let Some(parent) = path.as_ref().parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, content).map_err(|e| PortalError::Config {
            message: format!("Failed to write config file: {}", e),
            source: Some(Box::new(e)),
            context: ErrorContext::new("config")
                .with_operation("write_file")
                .with_suggestion("Check if the directory exists and is writable"),
        })
    }

    /// Validate configuration
    pub fn validate(&self) -> PortalResult<()> {
        if self.server.host.trim().is_empty() {
            return Err(validation_error!("Host cannot be empty", "server.host", "config"));
        }

        if self.server.port == 0 {
            return Err(validation_error!("Port cannot be 0", "server.port", "config"));
        }

        match url::Url::parse(&self.backend.base_url) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => {}
            Ok(url) => {
                return Err(validation_error!(
                    format!("Unsupported backend scheme: {}", url.scheme()),
                    "backend.base_url",
                    "config"
                ));
            }
            Err(e) => {
                return Err(validation_error!(
                    format!("Invalid backend URL '{}': {}", self.backend.base_url, e),
                    "backend.base_url",
                    "config"
                ));
            }
        }

        if !self.auth.home_path.starts_with('/') {
            return Err(validation_error!(
                "Home path must be an absolute route such as '/'",
                "auth.home_path",
                "config"
            ));
        }

        if self.auth.super_admin_emails.is_empty() {
            return Err(validation_error!(
                "At least one super admin email is required",
                "auth.super_admin_emails",
                "config"
            ));
        }

        Ok(())
    }

    /// Socket address string for the HTTP listener
    pub fn address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

/// Directory holding the CLI's config and session files
pub fn portal_home_dir() -> PortalResult<PathBuf> {
    dirs::home_dir()
        .map(|home| home.join(".taxing"))
        .ok_or_else(|| config_error!("Could not determine the home directory", "config"))
}

/// Default location of the configuration file
pub fn default_config_path() -> PortalResult<PathBuf> {
    Ok(portal_home_dir()?.join("config.toml"))
}

fn wrap_config_error(message: &str, error: config::ConfigError) -> PortalError {
    PortalError::Config {
        message: format!("{}: {}", message, error),
        source: Some(Box::new(error)),
        context: ErrorContext::new("config").with_operation("load"),
    }
}
