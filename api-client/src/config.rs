//! Configuration for the FileDeck client
//!
//! Values are layered, later sources winning:
//! - Built-in defaults
//! - An optional TOML file (`~/.config/filedeck/config.toml` unless a path is given)
//! - `FILEDECK__SECTION__KEY` environment variables, with `.env` loaded first

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use shared::{CommonError, Result, DEFAULT_PAGE_LIMIT};

const APP_DIR: &str = "filedeck";
const ENV_PREFIX: &str = "FILEDECK";

/// Main client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    pub api: ApiConfig,
    #[serde(default)]
    pub session: SessionConfig,
    pub logging: LoggingConfig,
}

/// Backend endpoint configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout_seconds: u64,
    pub page_limit: u32,
}

/// Where the login session is persisted
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionConfig {
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000/api".to_string(),
            timeout_seconds: 30,
            page_limit: DEFAULT_PAGE_LIMIT,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            format: "compact".to_string(),
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api: ApiConfig::default(),
            session: SessionConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl ClientConfig {
    /// Load configuration from defaults, the config file and the environment
    pub fn load(config_file: Option<&Path>) -> Result<Self> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let file = config_file
            .map(Path::to_path_buf)
            .or_else(default_config_file);

        Self::load_from(file.as_deref())
    }

    fn load_from(config_file: Option<&Path>) -> Result<Self> {
        let defaults = ClientConfig::default();

        let mut builder = config::Config::builder()
            .set_default("api.base_url", defaults.api.base_url)
            .and_then(|b| b.set_default("api.timeout_seconds", defaults.api.timeout_seconds as i64))
            .and_then(|b| b.set_default("api.page_limit", defaults.api.page_limit as i64))
            .and_then(|b| b.set_default("logging.level", defaults.logging.level))
            .and_then(|b| b.set_default("logging.format", defaults.logging.format))
            .map_err(config_error)?;

        if let Some(path) = config_file {
            builder = builder.add_source(config::File::from(path).required(false));
        }

        let config: ClientConfig = builder
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .and_then(|c| c.try_deserialize())
            .map_err(config_error)?;

        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.api.base_url.trim().is_empty() {
            return Err(CommonError::Config("api.base_url must not be empty".to_string()));
        }
        if !self.api.base_url.starts_with("http://") && !self.api.base_url.starts_with("https://") {
            return Err(CommonError::Config(format!(
                "api.base_url must be an http(s) URL, got '{}'",
                self.api.base_url
            )));
        }
        if self.api.timeout_seconds == 0 {
            return Err(CommonError::Config("api.timeout_seconds must be positive".to_string()));
        }
        if self.api.page_limit == 0 {
            return Err(CommonError::Config("api.page_limit must be positive".to_string()));
        }
        Ok(())
    }

    /// Session file location, defaulting to the user's config directory
    pub fn session_path(&self) -> Result<PathBuf> {
        match &self.session.path {
            Some(path) => Ok(path.clone()),
            None => dirs::config_dir()
                .map(|dir| dir.join(APP_DIR).join("session.json"))
                .ok_or_else(|| {
                    CommonError::Config("Could not determine the config directory".to_string())
                }),
        }
    }
}

fn default_config_file() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR).join("config.toml"))
}

fn config_error(err: config::ConfigError) -> CommonError {
    CommonError::Config(err.to_string())
}
