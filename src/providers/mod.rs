//! Provider adapters: query construction and response normalization.
//!
//! Each submodule covers one news API and exports the same four functions:
//!
//! | Function | Purpose |
//! |----------|---------|
//! | `normalize(raw)` | Raw JSON payload → `Vec<Article>` |
//! | `search_query(criteria)` | Criteria → provider query parameters |
//! | `headlines_query()` | Extra parameters for the listing endpoint |
//! | `residual(criteria)` | Criteria the query cannot express exactly |
//!
//! # Supported Providers
//!
//! | Provider | Module | Array path |
//! |----------|--------|------------|
//! | NewsAPI | [`headline`] | `articles` |
//! | New York Times | [`longform`] | `results` or `response.docs` |
//! | The Guardian | [`regional`] | `response.results` |
//!
//! Dispatch goes through [`ProviderId`], so callers never branch on the
//! provider themselves.

use serde_json::Value;
use thiserror::Error;
use tracing::warn;

use crate::models::{Article, FilterCriteria, PLACEHOLDER_IMAGE, ProviderId};
use crate::utils::{html_to_text, non_empty};

pub mod headline;
pub mod longform;
pub mod regional;

/// Query parameters in the order they are appended to the endpoint URL.
pub type QueryPairs = Vec<(&'static str, String)>;

/// Converts one provider's raw payload into normalized articles.
pub type Adapter = fn(Value) -> Result<Vec<Article>, NormalizeError>;

/// Failure to map a provider payload onto [`Article`]s.
#[derive(Debug, Error)]
pub enum NormalizeError {
    #[error("missing expected array `{0}`")]
    MissingArray(&'static str),

    #[error("unexpected item shape: {0}")]
    Shape(#[from] serde_json::Error),
}

impl ProviderId {
    pub fn adapter(self) -> Adapter {
        match self {
            ProviderId::Headline => headline::normalize,
            ProviderId::LongForm => longform::normalize,
            ProviderId::Regional => regional::normalize,
        }
    }

    pub fn search_query(self, criteria: &FilterCriteria) -> QueryPairs {
        match self {
            ProviderId::Headline => headline::search_query(criteria),
            ProviderId::LongForm => longform::search_query(criteria),
            ProviderId::Regional => regional::search_query(criteria),
        }
    }

    pub fn headlines_query(self) -> QueryPairs {
        match self {
            ProviderId::Headline => headline::headlines_query(),
            ProviderId::LongForm => longform::headlines_query(),
            ProviderId::Regional => regional::headlines_query(),
        }
    }

    /// The part of `criteria` that must be enforced client-side after a search.
    pub fn residual(self, criteria: &FilterCriteria) -> FilterCriteria {
        match self {
            ProviderId::Headline => headline::residual(criteria),
            ProviderId::LongForm => longform::residual(criteria),
            ProviderId::Regional => regional::residual(criteria),
        }
    }
}

/// Detach the array at `pointer` from `raw`.
///
/// A missing or non-array value is [`NormalizeError::MissingArray`].
pub(crate) fn take_array(raw: &mut Value, pointer: &'static str) -> Result<Value, NormalizeError> {
    match raw.pointer_mut(pointer) {
        Some(value) if value.is_array() => Ok(value.take()),
        _ => Err(NormalizeError::MissingArray(pointer)),
    }
}

/// Title and URL, or `None` (logged) if either is missing.
pub(crate) fn require_link(
    provider: ProviderId,
    title: Option<String>,
    url: Option<String>,
) -> Option<(String, String)> {
    match (non_empty(title), non_empty(url)) {
        (Some(title), Some(url)) => Some((title.trim().to_string(), url.trim().to_string())),
        (title, url) => {
            warn!(%provider, ?title, ?url, "Skipping item without title or url");
            None
        }
    }
}

pub(crate) fn clean_description(description: Option<String>) -> Option<String> {
    non_empty(description)
        .map(|d| html_to_text(&d))
        .filter(|d| !d.is_empty())
}

pub(crate) fn image_or_placeholder(image: Option<String>) -> Option<String> {
    Some(non_empty(image).unwrap_or_else(|| PLACEHOLDER_IMAGE.to_string()))
}
