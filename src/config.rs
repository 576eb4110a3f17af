use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::ChatError;

/// Environment variables checked for the service credential, in order
pub const CREDENTIAL_ENV_VARS: &[&str] = &["GEMINI_API_KEY", "API_KEY"];

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_HISTORY_WINDOW: usize = 10;

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Completion service key; falls back to the environment when unset
    pub api_key: Option<String>,

    /// Model used for every request
    pub model: String,

    /// Base URL of the completion API
    pub base_url: String,

    /// Number of prior turns sent along with each new message
    pub history_window: usize,

    /// UI preferences
    pub ui: UiConfig,
}

/// UI configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// Open the resources sidebar on startup
    pub show_sidebar: bool,
    /// Input poll interval of the terminal loop
    pub tick_rate_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            history_window: DEFAULT_HISTORY_WINDOW,
            ui: UiConfig::default(),
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        UiConfig {
            show_sidebar: false,
            tick_rate_ms: 50,
        }
    }
}

impl Config {
    /// Directory holding the config file and logs
    pub fn home_dir() -> Result<PathBuf> {
        let home = dirs::home_dir().context("Could not find home directory")?;
        Ok(home.join(".orientador"))
    }

    pub fn default_path() -> Result<PathBuf> {
        Ok(Self::home_dir()?.join("config.toml"))
    }

    /// Load configuration from `path`, or the default location when `None`.
    /// Only the default location may be absent, yielding the defaults; an
    /// explicitly named file must exist.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => {
                let config_path = Self::default_path()?;
                if config_path.exists() {
                    Self::from_file(&config_path)
                } else {
                    tracing::debug!("No config file at {}, using defaults", config_path.display());
                    Ok(Config::default())
                }
            }
        }
    }

    fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(ChatError::Config(format!("config file {} does not exist", path.display())).into());
        }
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: Config = toml::from_str(&content).context("Failed to parse config file")?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.model.trim().is_empty() {
            return Err(ChatError::Config("model must not be empty".to_string()).into());
        }
        if self.base_url.trim().is_empty() {
            return Err(ChatError::Config("base_url must not be empty".to_string()).into());
        }
        if self.history_window == 0 {
            return Err(ChatError::Config("history_window must be at least 1".to_string()).into());
        }
        Ok(())
    }

    /// Get API key from config or environment
    pub fn credential(&self) -> Option<String> {
        self.credential_from(|name| std::env::var(name).ok())
    }

    /// Resolve the credential with a custom environment lookup
    pub fn credential_from<F>(&self, lookup: F) -> Option<String>
    where
        F: Fn(&str) -> Option<String>,
    {
        self.api_key
            .clone()
            .filter(|key| !key.trim().is_empty())
            .or_else(|| {
                CREDENTIAL_ENV_VARS
                    .iter()
                    .filter_map(|name| lookup(name))
                    .find(|key| !key.trim().is_empty())
            })
    }

    pub fn with_model(mut self, model: Option<String>) -> Self {
        if let Some(model) = model {
            self.model = model;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_service_expectations() {
        let config = Config::default();
        assert_eq!(config.model, "gemini-2.5-flash");
        assert_eq!(config.history_window, 10);
        assert!(config.api_key.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn config_key_wins_over_environment() {
        let config = Config {
            api_key: Some("from-file".to_string()),
            ..Config::default()
        };
        let key = config.credential_from(|_| Some("from-env".to_string()));
        assert_eq!(key.as_deref(), Some("from-file"));
    }

    #[test]
    fn environment_checked_in_order() {
        let config = Config::default();
        let key = config.credential_from(|name| match name {
            "GEMINI_API_KEY" => None,
            "API_KEY" => Some("legacy".to_string()),
            _ => None,
        });
        assert_eq!(key.as_deref(), Some("legacy"));
    }

    #[test]
    fn blank_keys_count_as_missing() {
        let config = Config {
            api_key: Some("  ".to_string()),
            ..Config::default()
        };
        assert!(config.credential_from(|_| Some(String::new())).is_none());
    }

    #[test]
    fn zero_history_window_is_rejected() {
        let config = Config {
            history_window: 0,
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn model_override() {
        let config = Config::default().with_model(Some("gemini-2.5-pro".to_string()));
        assert_eq!(config.model, "gemini-2.5-pro");
        let config = config.with_model(None);
        assert_eq!(config.model, "gemini-2.5-pro");
    }
}
