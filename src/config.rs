use std::{path::Path, time::Duration};

use burn::config::Config as _;

/// Environment variable holding the search API bearer token
pub static BEARER_TOKEN_VAR: &str = "TWITTER_BEARER_TOKEN";

/// The token value shipped in sample configs, treated as unset
pub static PLACEHOLDER_TOKEN: &str = "YOUR BEARER TOKEN GOES HERE";

/// Application settings shared by the binaries
#[derive(burn::config::Config, Debug)]
pub struct AppConfig {
    /// Address the HTTP server listens on
    #[config(default = "\"127.0.0.1:5000\".to_string()")]
    pub bind: String,

    /// Directory holding the pretrained artifacts
    #[config(default = "\"artifacts\".to_string()")]
    pub artifact_dir: String,

    /// Classifier file name within `artifact_dir`
    #[config(default = "\"model.json\".to_string()")]
    pub model_file: String,

    /// Vectorizer file name within `artifact_dir`
    #[config(default = "\"vectorizer.json\".to_string()")]
    pub vectorizer_file: String,

    /// Text source: "auto", "live" or "fallback"
    #[config(default = "\"auto\".to_string()")]
    pub source: String,

    /// Labelled corpus used by the fallback source
    #[config(default = "\"data/dummy_tweets.txt\".to_string()")]
    pub fallback_corpus: String,

    /// Maximum texts returned by the fallback source
    #[config(default = 100)]
    pub fallback_limit: usize,

    /// Fixed shuffle seed for the fallback source
    pub fallback_seed: Option<u64>,

    /// Search API bearer token; empty means unset
    #[config(default = "String::new()")]
    pub bearer_token: String,

    /// Recent-search endpoint of the live source
    #[config(default = "\"https://api.twitter.com/2/tweets/search/recent\".to_string()")]
    pub search_endpoint: String,

    /// Results requested per search, clamped to 10..=100
    #[config(default = 50)]
    pub max_results: usize,

    /// Timeout for a single source fetch, in seconds
    #[config(default = 10)]
    pub fetch_timeout_secs: u64,
}

impl AppConfig {
    /// Load settings from a JSON or YAML file, chosen by extension
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();

        let config = match path.extension().and_then(|ext| ext.to_str()) {
            Some("yaml") | Some("yml") => {
                let contents = std::fs::read_to_string(path)?;

                serde_yaml::from_str(&contents)?
            }
            _ => Self::load(path).map_err(|e| SettingsError::Json(e.to_string()))?,
        };

        Ok(config)
    }

    /// Load settings from an optional file, falling back to defaults, then apply the environment
    pub fn resolve(path: Option<&str>) -> Result<Self, SettingsError> {
        let config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::new(),
        };

        Ok(config.with_env_overrides())
    }

    /// Take the bearer token from the environment when it is set there
    pub fn with_env_overrides(self) -> Self {
        match std::env::var(BEARER_TOKEN_VAR) {
            Ok(token) if !token.trim().is_empty() => self.with_bearer_token(token),
            _ => self,
        }
    }

    /// The configured bearer token, if it is a real one
    pub fn bearer_token(&self) -> Option<&str> {
        let token = self.bearer_token.trim();

        if token.is_empty() || token == PLACEHOLDER_TOKEN {
            None
        } else {
            Some(token)
        }
    }

    /// The per-fetch timeout
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }
}

/// Settings Error
#[derive(thiserror::Error, Debug)]
pub enum SettingsError {
    /// The settings file could not be read
    #[error("unable to read settings: {0}")]
    Io(#[from] std::io::Error),

    /// The JSON settings file is invalid
    #[error("invalid settings file: {0}")]
    Json(String),

    /// The YAML settings file is invalid
    #[error("invalid settings file: {0}")]
    Yaml(#[from] serde_yaml::Error),
}
