//! Engine configuration.
//!
//! Loaded from `<config dir>/contour/config.json` when present. Every field
//! is optional in the file; missing fields take their defaults.

use crate::ConfigError;
use contour_resolve::{Endpoints, DEFAULT_USER_AGENT, RATE_CACHE_TTL};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

pub const DEFAULT_COMMAND_TRIGGER: char = '/';
pub const DEFAULT_TIMER_TICK_MS: u64 = 1000;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContourConfig {
    /// Leading character that opens the command palette.
    pub command_trigger: char,
    /// Target language for focused translator input that names none.
    pub default_target_lang: String,
    /// Language of dictionary lookups.
    pub dictionary_lang: String,
    /// Countdown cadence in milliseconds.
    pub timer_tick_ms: u64,
    /// How long a fetched exchange rate is reused.
    pub rate_cache_ttl_secs: u64,
    pub user_agent: String,
    pub endpoints: Endpoints,
}

impl Default for ContourConfig {
    fn default() -> Self {
        Self {
            command_trigger: DEFAULT_COMMAND_TRIGGER,
            default_target_lang: "en".to_string(),
            dictionary_lang: "en".to_string(),
            timer_tick_ms: DEFAULT_TIMER_TICK_MS,
            rate_cache_ttl_secs: RATE_CACHE_TTL.as_secs(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            endpoints: Endpoints::default(),
        }
    }
}

impl ContourConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json_str(&json)?;
        info!(path = %path.display(), "Loaded config");
        Ok(config)
    }

    /// `<config dir>/contour/config.json`, if the platform has a config dir.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("contour").join("config.json"))
    }

    /// Load from [`Self::default_path`], or fall back to defaults when the
    /// file does not exist. A file that exists but is invalid is an error.
    pub fn load_or_default() -> Result<Self, ConfigError> {
        match Self::default_path() {
            Some(path) if path.exists() => Self::load(&path),
            _ => {
                debug!("No config file, using defaults");
                Ok(Self::default())
            }
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.command_trigger.is_alphanumeric() || self.command_trigger.is_whitespace() {
            return Err(ConfigError::Invalid {
                field: "command_trigger",
                message: format!("'{}' would shadow ordinary input", self.command_trigger),
            });
        }
        if self.timer_tick_ms == 0 {
            return Err(ConfigError::Invalid {
                field: "timer_tick_ms",
                message: "must be positive".to_string(),
            });
        }
        for (field, value) in [
            ("default_target_lang", &self.default_target_lang),
            ("dictionary_lang", &self.dictionary_lang),
        ] {
            if value.trim().is_empty() {
                return Err(ConfigError::Invalid {
                    field,
                    message: "language code is empty".to_string(),
                });
            }
        }
        Ok(())
    }

    pub fn timer_tick(&self) -> Duration {
        Duration::from_millis(self.timer_tick_ms)
    }

    pub fn rate_cache_ttl(&self) -> Duration {
        Duration::from_secs(self.rate_cache_ttl_secs)
    }
}
