//! Search orchestration: provider query → HTTP GET → adapter → residual filter.
//!
//! This module turns a provider selector plus [`FilterCriteria`] into a list
//! of normalized articles, or a [`SearchError`] describing why not.
//!
//! # Architecture
//!
//! - [`Transport`]: Core trait performing one HTTP GET
//! - [`HttpTransport`]: `reqwest` implementation with timeout and user agent
//! - [`Searcher`]: Builds provider URLs and normalizes/filter responses
//!
//! # Filtering rule
//!
//! Every present criterion is enforced exactly once. Criteria a provider
//! expresses exactly in its query are trusted to the server; the rest (its
//! `residual`) run through [`crate::filter`] after normalization. Listing
//! endpoints take no criteria, so [`Searcher::feed`] filters everything
//! client-side.

use reqwest::Client;
use serde_json::Value;
use std::collections::HashMap;
use std::error::Error;
use std::time::Instant;
use thiserror::Error;
use tracing::{debug, info, instrument, warn};
use url::Url;

use crate::config::{Config, ConfigError, Endpoint};
use crate::filter::filter_many;
use crate::models::{Article, FilterCriteria, ProviderId};
use crate::providers::QueryPairs;
use crate::utils::truncate_for_log;

/// Errors a search can end in. All are recoverable by searching again.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SearchError {
    #[error("Failed to fetch search results: {0}")]
    RequestFailed(String),

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Unsupported news source: {0}")]
    UnsupportedProvider(String),
}

impl SearchError {
    /// Only network and HTTP failures can succeed on a repeat.
    pub fn is_retryable(&self) -> bool {
        matches!(self, SearchError::RequestFailed(_))
    }
}

/// Status and body of an HTTP response.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

/// A single HTTP GET.
///
/// Implementors only move bytes; status interpretation happens in
/// [`Searcher`].
pub trait Transport {
    async fn get(&self, url: &Url) -> Result<HttpResponse, Box<dyn Error + Send + Sync>>;
}

/// [`Transport`] over a shared `reqwest` client.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new(config: &Config) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(config.request_timeout())
            .user_agent(config.user_agent.clone())
            .build()?;
        Ok(Self { client })
    }
}

impl Transport for HttpTransport {
    // Only host and path are logged; the query carries the API key.
    #[instrument(level = "info", skip_all, fields(host = url.host_str().unwrap_or(""), path = url.path()))]
    async fn get(&self, url: &Url) -> Result<HttpResponse, Box<dyn Error + Send + Sync>> {
        let t0 = Instant::now();
        let response = self.client.get(url.clone()).send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;
        debug!(
            status,
            bytes = body.len(),
            elapsed_ms = t0.elapsed().as_millis() as u64,
            "GET complete"
        );
        Ok(HttpResponse { status, body })
    }
}

/// Builds provider requests and turns responses into articles.
///
/// The searcher never touches the article store; it only returns values.
#[derive(Debug)]
pub struct Searcher<T> {
    transport: T,
    endpoints: HashMap<ProviderId, Endpoint>,
}

impl<T: Transport> Searcher<T> {
    pub fn new(transport: T, endpoints: HashMap<ProviderId, Endpoint>) -> Self {
        Self {
            transport,
            endpoints,
        }
    }

    pub fn from_config(transport: T, config: &Config) -> Result<Self, ConfigError> {
        Ok(Self::new(transport, config.endpoints()?))
    }

    /// Search one provider with `criteria`.
    #[instrument(level = "info", skip_all, fields(%provider))]
    pub async fn search(
        &self,
        provider: ProviderId,
        criteria: &FilterCriteria,
    ) -> Result<Vec<Article>, SearchError> {
        let url = self.search_url(provider, criteria)?;
        let articles = self.fetch(provider, &url).await?;
        let fetched = articles.len();

        let residual = provider.residual(criteria);
        let articles = filter_many(articles, &residual);
        info!(fetched, kept = articles.len(), client_filtered = !residual.is_empty(), "Search complete");
        Ok(articles)
    }

    /// Current headlines from the provider's listing endpoint.
    #[instrument(level = "info", skip_all, fields(%provider))]
    pub async fn headlines(&self, provider: ProviderId) -> Result<Vec<Article>, SearchError> {
        let url = self.headlines_url(provider)?;
        let articles = self.fetch(provider, &url).await?;
        info!(count = articles.len(), "Fetched headlines");
        Ok(articles)
    }

    /// Headlines narrowed by `criteria` entirely on the client.
    pub async fn feed(
        &self,
        provider: ProviderId,
        criteria: &FilterCriteria,
    ) -> Result<Vec<Article>, SearchError> {
        let articles = self.headlines(provider).await?;
        let fetched = articles.len();
        let articles = filter_many(articles, criteria);
        info!(%provider, fetched, kept = articles.len(), "Filtered feed");
        Ok(articles)
    }

    pub fn search_url(&self, provider: ProviderId, criteria: &FilterCriteria) -> Result<Url, SearchError> {
        let endpoint = self.endpoint(provider)?;
        Ok(with_query(&endpoint.search_url, endpoint, provider.search_query(criteria)))
    }

    pub fn headlines_url(&self, provider: ProviderId) -> Result<Url, SearchError> {
        let endpoint = self.endpoint(provider)?;
        Ok(with_query(&endpoint.headlines_url, endpoint, provider.headlines_query()))
    }

    fn endpoint(&self, provider: ProviderId) -> Result<&Endpoint, SearchError> {
        self.endpoints
            .get(&provider)
            .ok_or_else(|| SearchError::UnsupportedProvider(format!("{provider} (not configured)")))
    }

    async fn fetch(&self, provider: ProviderId, url: &Url) -> Result<Vec<Article>, SearchError> {
        let response = self.transport.get(url).await.map_err(|e| {
            warn!(%provider, error = %e, "Request failed");
            SearchError::RequestFailed(e.to_string())
        })?;

        if !(200..300).contains(&response.status) {
            let reason = match error_message(&response.body) {
                Some(message) => format!("{provider} returned HTTP {}: {message}", response.status),
                None => format!("{provider} returned HTTP {}", response.status),
            };
            warn!(%provider, status = response.status, %reason, "Non-success response");
            return Err(SearchError::RequestFailed(reason));
        }

        let raw: Value = serde_json::from_str(&response.body).map_err(|e| {
            warn!(
                %provider,
                error = %e,
                body_preview = %truncate_for_log(&response.body, 300),
                "Response is not JSON"
            );
            SearchError::MalformedResponse(e.to_string())
        })?;

        (provider.adapter())(raw).map_err(|e| {
            warn!(%provider, error = %e, "Response has unexpected shape");
            SearchError::MalformedResponse(e.to_string())
        })
    }
}

fn with_query(base: &Url, endpoint: &Endpoint, pairs: QueryPairs) -> Url {
    let mut url = base.clone();
    if pairs.is_empty() && endpoint.api_key.is_none() {
        return url;
    }
    {
        let mut query = url.query_pairs_mut();
        for (name, value) in &pairs {
            query.append_pair(name, value);
        }
        if let Some(key) = &endpoint.api_key {
            query.append_pair(&endpoint.key_param, key);
        }
    }
    url
}

/// The provider's own explanation in an error body, if it sent one.
fn error_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    ["/message", "/response/message", "/fault/faultstring"]
        .into_iter()
        .find_map(|p| value.pointer(p).and_then(Value::as_str))
        .map(str::to_string)
}
