//! # Settings Module
//!
//! ## Purpose
//! Runtime configuration of the ChemVerse service: where the HTTP server listens, how the
//! AI gateway reaches the provider, which library files replace the embedded ones and how
//! much is logged.
//!
//! ## Sources
//! Values are resolved in three layers, later layers winning:
//! 1. built-in defaults (`AppConfig::default`)
//! 2. the JSON configuration file (`chemverse_config.json` unless another path is given)
//! 3. environment variables
//!
//! | Variable | Field |
//! |----------|-------|
//! | `OPENROUTER_API_KEY` | `ai.api_key` |
//! | `OPENROUTER_BASE_URL` | `ai.base_url` |
//! | `CHEMVERSE_MODELS` | `ai.models` (comma separated) |
//! | `HOST` | `server.host` |
//! | `PORT` | `server.port` |
//! | `CHEMVERSE_LOG` | `log_level` |
//!
//! The API key is never written back when the configuration is saved.

use crate::ai::types::TaskProfiles;
use crate::library_manager::LibraryPaths;
use log::{LevelFilter, info};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;
use url::Url;

pub const DEFAULT_CONFIG_FILE: &str = "chemverse_config.json";

pub const DEFAULT_MODELS: [&str; 3] = [
    "anthropic/claude-3.5-haiku",
    "anthropic/claude-3.5-sonnet",
    "openai/gpt-4o-mini",
];

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to access configuration file '{path}': {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid configuration file '{path}': {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("invalid AI base URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("no AI models are configured")]
    NoModels,
    #[error("AI request timeout must be at least one second")]
    ZeroTimeout,
    #[error("invalid value '{value}' for environment variable {name}")]
    InvalidEnv { name: String, value: String },
    #[error("unknown log level '{0}'")]
    InvalidLogLevel(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    /// how many consecutive ports are tried when the configured one is taken
    pub port_attempts: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
            port_attempts: 10,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AiSettings {
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    pub base_url: String,
    /// ordered model preference list, primary first
    pub models: Vec<String>,
    pub attempts_per_model: u32,
    pub base_delay_ms: u64,
    pub request_timeout_secs: u64,
    pub referer: String,
    pub title: String,
    pub profiles: TaskProfiles,
}

impl Default for AiSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: "https://openrouter.ai/api/v1/".to_string(),
            models: DEFAULT_MODELS.iter().map(|m| m.to_string()).collect(),
            attempts_per_model: 3,
            base_delay_ms: 1000,
            request_timeout_secs: 30,
            referer: "http://localhost:3000".to_string(),
            title: "ChemVerse".to_string(),
            profiles: TaskProfiles::default(),
        }
    }
}

impl AiSettings {
    /// Base URL with a trailing slash, so relative endpoints join below it.
    pub fn base_url(&self) -> Result<Url, ConfigError> {
        let mut base = self.base_url.trim().to_string();
        if !base.ends_with('/') {
            base.push('/');
        }
        Ok(Url::parse(&base)?)
    }

    /// the API key, ignoring blank values
    pub fn api_key(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerSettings,
    pub ai: AiSettings,
    pub libraries: LibraryPaths,
    pub log_level: String,
    pub log_file: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerSettings::default(),
            ai: AiSettings::default(),
            libraries: LibraryPaths::default(),
            log_level: "info".to_string(),
            log_file: None,
        }
    }
}

impl AppConfig {
    /// Loads the configuration file.
    ///
    /// Without an explicit path the default file is used when it exists and the built-in
    /// defaults otherwise. An explicitly named file must exist.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let (path, required) = match path {
            Some(path) => (path.to_path_buf(), true),
            None => (PathBuf::from(DEFAULT_CONFIG_FILE), false),
        };
        if !required && !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(&path).map_err(|source| ConfigError::Io {
            path: path.clone(),
            source,
        })?;
        let config: AppConfig =
            serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
                path: path.clone(),
                source,
            })?;
        info!("Configuration loaded from '{}'", path.display());
        Ok(config)
    }

    /// File, then process environment, then validation.
    pub fn from_sources(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env(|name| std::env::var(name).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Overlays environment variables read through `lookup`.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        if let Some(key) = var("OPENROUTER_API_KEY") {
            self.ai.api_key = Some(key);
        }
        if let Some(base_url) = var("OPENROUTER_BASE_URL") {
            self.ai.base_url = base_url;
        }
        if let Some(models) = var("CHEMVERSE_MODELS") {
            self.ai.models = models
                .split(',')
                .map(str::trim)
                .filter(|model| !model.is_empty())
                .map(str::to_string)
                .collect();
        }
        if let Some(host) = var("HOST") {
            self.server.host = host;
        }
        if let Some(port) = var("PORT") {
            self.server.port = port.parse().map_err(|_| ConfigError::InvalidEnv {
                name: "PORT".to_string(),
                value: port.clone(),
            })?;
        }
        if let Some(level) = var("CHEMVERSE_LOG") {
            self.log_level = level;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.ai.models.iter().all(|model| model.trim().is_empty()) {
            return Err(ConfigError::NoModels);
        }
        if self.ai.request_timeout_secs == 0 {
            return Err(ConfigError::ZeroTimeout);
        }
        self.ai.base_url()?;
        self.level_filter()?;
        Ok(())
    }

    pub fn level_filter(&self) -> Result<LevelFilter, ConfigError> {
        LevelFilter::from_str(self.log_level.trim())
            .map_err(|_| ConfigError::InvalidLogLevel(self.log_level.clone()))
    }

    /// Writes the configuration as pretty JSON, without the API key.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = serde_json::to_string_pretty(self).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        fs::write(path, content).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}
