//! User preferences: a flat JSON file merged over defaults.
//!
//! The file lives at `~/.grapheus.json` (overridable via the
//! `GRAPHEUS_CONFIG` environment variable). A missing or unparsable file is
//! never fatal: the tool falls back to defaults and logs a warning.

use std::env;
use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::ConfigError;
use crate::prompt::CommitStyle;
use crate::provider::Provider;

/// Environment variable overriding the config file location.
const CONFIG_PATH_ENV_VAR: &str = "GRAPHEUS_CONFIG";

/// Config file name under the home directory.
const CONFIG_FILE_NAME: &str = ".grapheus.json";

/// Default token ceiling for the assembled prompt.
const DEFAULT_MAX_TOKENS: usize = 16_000;

/// User configuration, loaded once at startup.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Model provider: "openai", "anthropic", or "ollama".
    pub provider: Provider,

    /// Model identifier passed through to the provider.
    pub model: String,

    /// Commit message style: "conventional" or "plain".
    pub style: CommitStyle,

    /// Token ceiling for the whole prompt (4 chars ≈ 1 token).
    pub max_tokens: usize,

    /// Extra free-text requirements appended to the user prompt.
    pub custom_rules: Option<String>,

    /// Push after committing without asking.
    pub auto_push: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            provider: Provider::OpenAi,
            model: "gpt-4o-mini".to_string(),
            style: CommitStyle::Conventional,
            max_tokens: DEFAULT_MAX_TOKENS,
            custom_rules: None,
            auto_push: false,
        }
    }
}

impl Config {
    /// Resolve the config file path.
    pub fn path() -> Result<PathBuf, ConfigError> {
        if let Ok(p) = env::var(CONFIG_PATH_ENV_VAR)
            && !p.is_empty()
        {
            return Ok(PathBuf::from(p));
        }
        dirs::home_dir()
            .map(|h| h.join(CONFIG_FILE_NAME))
            .ok_or(ConfigError::NoHomeDirectory)
    }

    /// Load configuration, merging the file (if any) over defaults.
    ///
    /// An absent file yields defaults silently; an unreadable or unparsable
    /// file yields defaults with a warning.
    pub fn load() -> Self {
        let path = match Self::path() {
            Ok(p) => p,
            Err(e) => {
                warn!("Could not resolve config path ({e}), using defaults");
                return Self::default();
            }
        };

        if !path.exists() {
            return Self::default();
        }

        match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(config) => config,
                Err(e) => {
                    warn!("Config file {} is not valid JSON ({e}), using defaults", path.display());
                    Self::default()
                }
            },
            Err(e) => {
                warn!("Could not read config file {} ({e}), using defaults", path.display());
                Self::default()
            }
        }
    }

    /// Write the configuration to its file, creating it if needed.
    pub fn save(&self) -> Result<(), ConfigError> {
        let path = Self::path()?;
        let json = serde_json::to_string_pretty(self).map_err(ConfigError::SerializeFailed)?;
        fs::write(&path, json).map_err(ConfigError::WriteFailed)
    }

    /// Set a single key from its string representation, as used by
    /// `grapheus config set <key> <value>`.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        match key {
            "provider" => {
                self.provider = value.parse().map_err(|_| ConfigError::InvalidValue {
                    key: key.to_string(),
                    value: value.to_string(),
                    reason: "expected openai, anthropic, or ollama".to_string(),
                })?;
            }
            "model" => self.model = value.to_string(),
            "style" => {
                self.style = value.parse().map_err(|_| ConfigError::InvalidValue {
                    key: key.to_string(),
                    value: value.to_string(),
                    reason: "expected conventional or plain".to_string(),
                })?;
            }
            "max_tokens" => {
                self.max_tokens = value.parse().map_err(|_| ConfigError::InvalidValue {
                    key: key.to_string(),
                    value: value.to_string(),
                    reason: "expected a positive integer".to_string(),
                })?;
            }
            "custom_rules" => {
                self.custom_rules = if value.is_empty() {
                    None
                } else {
                    Some(value.to_string())
                };
            }
            "auto_push" => {
                self.auto_push = value.parse().map_err(|_| ConfigError::InvalidValue {
                    key: key.to_string(),
                    value: value.to_string(),
                    reason: "expected true or false".to_string(),
                })?;
            }
            _ => {
                return Err(ConfigError::UnknownKey {
                    key: key.to_string(),
                    known: "provider, model, style, max_tokens, custom_rules, auto_push"
                        .to_string(),
                });
            }
        }
        Ok(())
    }
}
