//! Application configuration loading and validation.
//!
//! Configuration is loaded from a TOML file with environment variable
//! overrides for sensitive values like `AIRTABLE_API_TOKEN`.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing_subscriber::{fmt, EnvFilter};

use crate::domain::StoreKind;
use crate::error::{ConfigError, Result};

/// Config file looked up when no `--config` flag is given.
pub const DEFAULT_CONFIG_PATH: &str = "candor.toml";

#[derive(Debug, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub airtable: AirtableConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
}

fn default_bind() -> String {
    "0.0.0.0:8080".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_level")]
    pub level: String,
    #[serde(default = "default_format")]
    pub format: String,
}

fn default_level() -> String {
    "info".to_string()
}

fn default_format() -> String {
    "pretty".to_string()
}

/// Storage backends and their fallback priority.
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Backends in fallback priority order, highest first.
    #[serde(default = "default_order")]
    pub order: Vec<StoreKind>,
    #[serde(default = "default_csv_path")]
    pub csv_path: PathBuf,
    #[serde(default = "default_database_url")]
    pub database_url: String,
}

fn default_order() -> Vec<StoreKind> {
    vec![StoreKind::Airtable, StoreKind::Sqlite, StoreKind::Csv]
}

fn default_csv_path() -> PathBuf {
    PathBuf::from("data/feedback.csv")
}

fn default_database_url() -> String {
    "data/feedback.db".to_string()
}

/// Airtable credentials.
/// The API token is loaded from the `AIRTABLE_API_TOKEN` env var at runtime
/// (never from the config file).
#[derive(Debug, Clone, Deserialize)]
pub struct AirtableConfig {
    pub base_id: Option<String>,
    #[serde(default = "default_table")]
    pub table: String,
    /// Loaded from `AIRTABLE_API_TOKEN` env var at runtime
    #[serde(skip)]
    pub api_token: Option<String>,
}

fn default_table() -> String {
    "Feedback".to_string()
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;

        let mut config: Self = toml::from_str(&content).map_err(ConfigError::Parse)?;

        // Load the API token from the environment (never from the config
        // file for security)
        config.airtable.api_token = std::env::var("AIRTABLE_API_TOKEN").ok();

        config.validate()?;

        Ok(config)
    }

    /// Load an explicitly-given config file, the default `candor.toml` if
    /// one exists, or built-in defaults otherwise.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Self::load(p),
            None if Path::new(DEFAULT_CONFIG_PATH).exists() => Self::load(DEFAULT_CONFIG_PATH),
            None => {
                let mut config = Self::default();
                config.airtable.api_token = std::env::var("AIRTABLE_API_TOKEN").ok();
                config.validate()?;
                Ok(config)
            }
        }
    }

    fn validate(&self) -> Result<()> {
        if self.storage.order.is_empty() {
            return Err(ConfigError::MissingField {
                field: "storage.order",
            }
            .into());
        }
        for (i, kind) in self.storage.order.iter().enumerate() {
            if self.storage.order[..i].contains(kind) {
                return Err(ConfigError::InvalidValue {
                    field: "storage.order",
                    reason: format!("duplicate store '{kind}'"),
                }
                .into());
            }
        }
        if self.storage.order.contains(&StoreKind::Sqlite) && self.storage.database_url.is_empty() {
            return Err(ConfigError::MissingField {
                field: "storage.database_url",
            }
            .into());
        }
        if self.storage.order.contains(&StoreKind::Csv)
            && self.storage.csv_path.as_os_str().is_empty()
        {
            return Err(ConfigError::MissingField {
                field: "storage.csv_path",
            }
            .into());
        }
        Ok(())
    }

    pub fn init_logging(&self) {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(&self.logging.level));

        match self.logging.format.as_str() {
            "json" => {
                fmt().json().with_env_filter(filter).init();
            }
            _ => {
                fmt().with_env_filter(filter).init();
            }
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            logging: LoggingConfig::default(),
            storage: StorageConfig::default(),
            airtable: AirtableConfig {
                base_id: None,
                table: default_table(),
                api_token: None,
            },
        }
    }
}

impl Default for AirtableConfig {
    fn default() -> Self {
        Self {
            base_id: None,
            table: default_table(),
            api_token: None,
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            format: default_format(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            order: default_order(),
            csv_path: default_csv_path(),
            database_url: default_database_url(),
        }
    }
}
