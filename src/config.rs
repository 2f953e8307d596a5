//! Runtime configuration: provider endpoints, credentials and HTTP settings.
//!
//! Configuration comes from an optional YAML file; every field has a
//! default, so an empty file (or none at all) talks straight to the public
//! APIs. API keys are normally supplied through the environment (see
//! [`crate::cli::Cli`]) and are never compiled in.
//!
//! # Proxy mode
//!
//! Pointing the URLs at a server-side proxy that injects credentials and
//! leaving `api_key` unset keeps keys off the client entirely.
//!
//! ```yaml
//! request_timeout_secs: 15
//! providers:
//!   longform:
//!     search_url: https://news-proxy.internal/nyt/search
//!     headlines_url: https://news-proxy.internal/nyt/top
//!   regional:
//!     api_key: test
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;
use tracing::{info, instrument};
use url::Url;

use crate::models::ProviderId;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error reading config: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid {field} for {provider}: {source}")]
    InvalidUrl {
        provider: ProviderId,
        field: &'static str,
        source: url::ParseError,
    },
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub request_timeout_secs: u64,
    pub user_agent: String,
    /// Per-provider overrides keyed by provider name.
    pub providers: HashMap<ProviderId, ProviderConfig>,
}

/// Overrides for one provider; unset fields fall back to the public API.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct ProviderConfig {
    pub search_url: Option<String>,
    pub headlines_url: Option<String>,
    pub key_param: Option<String>,
    pub api_key: Option<String>,
}

/// Fully resolved endpoint settings for one provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    pub search_url: Url,
    pub headlines_url: Url,
    pub key_param: String,
    pub api_key: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            request_timeout_secs: 10,
            user_agent: concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")).to_string(),
            providers: HashMap::new(),
        }
    }
}

/// Public API defaults: (search URL, listing URL, key parameter).
fn public_endpoint(id: ProviderId) -> (&'static str, &'static str, &'static str) {
    match id {
        ProviderId::Headline => (
            "https://newsapi.org/v2/everything",
            "https://newsapi.org/v2/top-headlines?country=us",
            "apiKey",
        ),
        ProviderId::LongForm => (
            "https://api.nytimes.com/svc/search/v2/articlesearch.json",
            "https://api.nytimes.com/svc/topstories/v2/home.json",
            "api-key",
        ),
        ProviderId::Regional => (
            "https://content.guardianapis.com/search",
            "https://content.guardianapis.com/search",
            "api-key",
        ),
    }
}

impl Config {
    /// Load from `path`, or use defaults when no path is given.
    #[instrument(level = "info")]
    pub fn load(path: Option<&str>) -> Result<Self, ConfigError> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let text = std::fs::read_to_string(Path::new(path))?;
        let config = Self::from_yaml(&text)?;
        info!(path, providers = config.providers.len(), "Loaded configuration");
        Ok(config)
    }

    pub fn from_yaml(text: &str) -> Result<Self, ConfigError> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(text)?)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Set the API key for `id` if `key` is present and non-blank.
    pub fn set_api_key(&mut self, id: ProviderId, key: Option<String>) {
        if let Some(key) = key.filter(|k| !k.trim().is_empty()) {
            self.providers.entry(id).or_default().api_key = Some(key);
        }
    }

    pub fn endpoint(&self, id: ProviderId) -> Result<Endpoint, ConfigError> {
        let (search, headlines, key_param) = public_endpoint(id);
        let overrides = self.providers.get(&id).cloned().unwrap_or_default();
        let parse = |field: &'static str, raw: Option<String>, fallback: &str| {
            Url::parse(raw.as_deref().unwrap_or(fallback)).map_err(|source| ConfigError::InvalidUrl {
                provider: id,
                field,
                source,
            })
        };

        Ok(Endpoint {
            search_url: parse("search_url", overrides.search_url, search)?,
            headlines_url: parse("headlines_url", overrides.headlines_url, headlines)?,
            key_param: overrides.key_param.unwrap_or_else(|| key_param.to_string()),
            api_key: overrides.api_key.filter(|k| !k.trim().is_empty()),
        })
    }

    /// Resolve every provider up front so bad URLs fail at startup.
    pub fn endpoints(&self) -> Result<HashMap<ProviderId, Endpoint>, ConfigError> {
        ProviderId::ALL
            .into_iter()
            .map(|id| self.endpoint(id).map(|e| (id, e)))
            .collect()
    }
}
