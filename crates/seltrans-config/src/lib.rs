use std::env;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use self::messages::MessagesConfig;
use self::translator::TranslatorConfig;
use self::watcher::{ScrollPolicy, WatcherConfig};

pub mod messages;
pub mod translator;
pub mod watcher;

fn default_channel_capacity() -> usize {
    64
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct Config {
    pub translator: TranslatorConfig,
    pub watcher: WatcherConfig,
    pub messages: MessagesConfig,

    /// Pending requests the gateway channel can hold
    #[serde(default = "default_channel_capacity")]
    pub channel_capacity: usize,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("Invalid config {path}: {source}")]
    Parse {
        path: String,
        source: serde_json::Error,
    },
}

impl Default for Config {
    fn default() -> Self {
        Self {
            translator: TranslatorConfig::default(),
            watcher: WatcherConfig::default(),
            messages: MessagesConfig::default(),
            channel_capacity: default_channel_capacity(),
        }
    }
}

fn env_parse<T: FromStr>(key: &str) -> Option<T> {
    let raw = env::var(key).ok()?;
    match raw.parse() {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::warn!("Ignoring {key}={raw:?}: not a valid value");
            None
        }
    }
}

impl Config {
    /// Defaults with environment overrides applied
    pub fn new() -> Self {
        let mut config = Self::default();
        config.apply_env();
        config
    }

    /// Reads a JSON profile (missing fields fall back to defaults), then
    /// applies environment overrides. Without a path this is [`Config::new`].
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let Some(path) = path else {
            return Ok(Self::new());
        };

        tracing::info!("Loading config from {}", path.display());
        let data = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let mut config: Config =
            serde_json::from_str(&data).map_err(|source| ConfigError::Parse {
                path: path.display().to_string(),
                source,
            })?;
        config.apply_env();
        Ok(config)
    }

    fn apply_env(&mut self) {
        if let Ok(provider) = env::var("SELTRANS_PROVIDER") {
            self.translator.provider = provider;
        }
        if let Ok(url) = env::var("SELTRANS_API_URL") {
            self.translator.api_url = Some(url);
        }
        if let Some(ms) = env_parse("SELTRANS_TIMEOUT_MS") {
            self.translator.timeout_ms = ms;
        }
        if let Some(ms) = env_parse("SELTRANS_DEBOUNCE_MS") {
            self.watcher.selection_debounce_ms = ms;
        }
        if let Some(ms) = env_parse("SELTRANS_REQUEST_TIMEOUT_MS") {
            self.watcher.request_timeout_ms = ms;
        }
        if let Ok(policy) = env::var("SELTRANS_SCROLL_POLICY") {
            match policy.to_ascii_lowercase().as_str() {
                "reposition" => self.watcher.scroll_policy = ScrollPolicy::Reposition,
                "dismiss" => self.watcher.scroll_policy = ScrollPolicy::Dismiss,
                other => tracing::warn!("Ignoring unknown scroll policy {other:?}"),
            }
        }
    }
}
