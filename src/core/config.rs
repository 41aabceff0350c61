//! Configuration management

use clap::Args;
use config::{Config as ConfigBuilder, ConfigError as BuilderError, Environment, File};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use url::Url;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid api configuration: {0}")]
    InvalidApi(String),

    #[error("Invalid storage configuration: {0}")]
    InvalidStorage(String),

    #[error("Invalid session configuration: {0}")]
    InvalidSession(String),

    #[error("Invalid catalog configuration: {0}")]
    InvalidCatalog(String),

    #[error("Invalid notifications configuration: {0}")]
    InvalidNotifications(String),

    #[error("Invalid logging configuration: {0}")]
    InvalidLogging(String),

    #[error("Failed to load configuration: {0}")]
    LoadError(String),

    #[error("Configuration file not found: {0}")]
    FileNotFound(String),
}

impl From<BuilderError> for ConfigError {
    fn from(err: BuilderError) -> Self {
        ConfigError::LoadError(err.to_string())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub api: ApiConfig,
    pub storage: StorageConfig,
    pub session: SessionConfig,
    pub catalog: CatalogConfig,
    pub notifications: NotificationsConfig,
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration with precedence: CLI args > Environment variables > Config file > Defaults
    pub fn load(cli_args: &CliArgs) -> Result<Self, ConfigError> {
        // 1. Start with defaults (lowest priority)
        let mut builder = with_defaults(ConfigBuilder::builder())?;

        // 2. Load from config file if specified (medium priority)
        if let Some(config_path) = &cli_args.config {
            if !config_path.exists() {
                return Err(ConfigError::FileNotFound(config_path.display().to_string()));
            }
            builder = builder.add_source(File::from(config_path.as_path()));
        }

        // 3. Override with environment variables (higher priority)
        // Example: LENDAREAD_API__BASE_URL=https://library.example.org/api
        builder = builder.add_source(
            Environment::with_prefix("LENDAREAD")
                .separator("__")
                .try_parsing(true),
        );

        // 4. Override with CLI arguments (highest priority)
        if let Some(api_url) = &cli_args.api_url {
            builder = builder.set_override("api.base_url", api_url.clone())?;
        }
        if let Some(data_dir) = &cli_args.data_dir {
            builder = builder.set_override("storage.data_dir", data_dir.display().to_string())?;
        }
        if let Some(log_level) = &cli_args.log_level {
            builder = builder.set_override("logging.level", log_level.clone())?;
        }

        let config: Config = builder.build()?.try_deserialize()?;
        config.validate()?;

        Ok(config)
    }

    /// Load configuration from a specific file path, on top of the defaults
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.display().to_string()));
        }

        let config: Config = with_defaults(ConfigBuilder::builder())?
            .add_source(File::from(path))
            .build()?
            .try_deserialize()?;

        config.validate()?;
        Ok(config)
    }

    /// Built-in defaults only
    pub fn defaults() -> Result<Self, ConfigError> {
        let config: Config = with_defaults(ConfigBuilder::builder())?
            .build()?
            .try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Validate all configuration parameters
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.api.validate()?;
        self.storage.validate()?;
        self.session.validate()?;
        self.catalog.validate()?;
        self.notifications.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}

fn with_defaults(
    builder: config::ConfigBuilder<config::builder::DefaultState>,
) -> Result<config::ConfigBuilder<config::builder::DefaultState>, ConfigError> {
    Ok(builder
        .set_default("api.base_url", "http://127.0.0.1:5000/api")?
        .set_default(
            "api.user_agent",
            format!("lend-a-read/{}", env!("CARGO_PKG_VERSION")),
        )?
        .set_default("storage.data_dir", default_data_dir().display().to_string())?
        .set_default("session.unread_poll_interval", 30)? // seconds
        .set_default("session.search_debounce", 400)? // milliseconds
        .set_default("session.search_min_chars", 2)?
        .set_default("catalog.page_size", 12)?
        .set_default("catalog.dashboard_recent", 4)?
        .set_default("notifications.page_size", 15)?
        .set_default("logging.level", "warn")?
        .set_default("logging.format", "text")?
        .set_default("logging.output", "stderr")?)
}

fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .map(|dir| dir.join("lend-a-read"))
        .unwrap_or_else(|| PathBuf::from("./data"))
}

/// Command-line arguments for configuration override
#[derive(Debug, Clone, Default, Args)]
pub struct CliArgs {
    /// Path to configuration file (TOML format)
    #[arg(short, long, value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    /// Base URL of the backend API
    #[arg(long, value_name = "URL", global = true)]
    pub api_url: Option<String>,

    /// Directory holding the stored session
    #[arg(long, value_name = "DIR", global = true)]
    pub data_dir: Option<PathBuf>,

    /// Log level (debug, info, warn, error)
    #[arg(short, long, value_name = "LEVEL", global = true)]
    pub log_level: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    pub base_url: String,
    pub user_agent: String,
}

impl ApiConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = Url::parse(&self.base_url)
            .map_err(|e| ConfigError::InvalidApi(format!("base_url is not a valid URL: {}", e)))?;

        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(ConfigError::InvalidApi(
                "base_url must use http or https".to_string(),
            ));
        }

        if self.user_agent.is_empty() {
            return Err(ConfigError::InvalidApi("user_agent cannot be empty".to_string()));
        }

        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    pub data_dir: PathBuf,
}

impl StorageConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.data_dir.as_os_str().is_empty() {
            return Err(ConfigError::InvalidStorage("data_dir cannot be empty".to_string()));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    pub unread_poll_interval: u64, // seconds
    pub search_debounce: u64,      // milliseconds
    pub search_min_chars: usize,
}

impl SessionConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.unread_poll_interval == 0 {
            return Err(ConfigError::InvalidSession(
                "unread_poll_interval must be greater than 0".to_string(),
            ));
        }

        if self.search_min_chars == 0 {
            return Err(ConfigError::InvalidSession(
                "search_min_chars must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.unread_poll_interval)
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.search_debounce)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CatalogConfig {
    pub page_size: u32,
    pub dashboard_recent: u32,
}

impl CatalogConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.page_size == 0 {
            return Err(ConfigError::InvalidCatalog("page_size must be greater than 0".to_string()));
        }

        if self.dashboard_recent == 0 {
            return Err(ConfigError::InvalidCatalog(
                "dashboard_recent must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct NotificationsConfig {
    pub page_size: u32,
}

impl NotificationsConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.page_size == 0 {
            return Err(ConfigError::InvalidNotifications(
                "page_size must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
    pub output: String,
    pub log_file: Option<PathBuf>,
}

impl LoggingConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let valid_levels = ["debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.level.as_str()) {
            return Err(ConfigError::InvalidLogging(format!(
                "level must be one of: {:?}",
                valid_levels
            )));
        }

        let valid_formats = ["json", "text"];
        if !valid_formats.contains(&self.format.as_str()) {
            return Err(ConfigError::InvalidLogging(format!(
                "format must be one of: {:?}",
                valid_formats
            )));
        }

        let valid_outputs = ["stderr", "file"];
        if !valid_outputs.contains(&self.output.as_str()) {
            return Err(ConfigError::InvalidLogging(format!(
                "output must be one of: {:?}",
                valid_outputs
            )));
        }

        if self.output == "file" && self.log_file.is_none() {
            return Err(ConfigError::InvalidLogging(
                "log_file must be specified when output is 'file'".to_string(),
            ));
        }

        Ok(())
    }
}
