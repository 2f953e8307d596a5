//! Data models shared by every provider and by the store.
//!
//! This module defines the core data structures used throughout the application:
//! - [`Article`]: The normalized article every provider adapter produces
//! - [`FilterCriteria`]: Optional keyword/date/category/source/author constraints
//! - [`FetchStatus`]: The four-state lifecycle of a fetch
//! - [`ProviderId`]: Which news API a request targets
//!
//! Provider-specific payload types live next to their adapters in
//! [`crate::providers`] and never escape them.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::search::SearchError;

/// Image shown for articles whose provider supplies no picture.
pub const PLACEHOLDER_IMAGE: &str =
    "https://unsplash.com/photos/man-sitting-on-bench-reading-newspaper-_Zua2hyvTBk";

/// A news article after normalization.
///
/// Every article has the same shape regardless of which provider it came
/// from. Nested provider structures (multimedia lists, byline objects,
/// `fields` blocks) are fully consumed by the adapters.
///
/// # JSON Schema
///
/// Fields serialize in camelCase (`imageUrl`, `publishedAt`, `sourceName`)
/// so saved searches read the same as the provider payloads they came from.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    /// The article headline.
    pub title: String,
    /// Link to the article on the provider's site.
    pub url: String,
    /// Plain-text teaser or abstract.
    pub description: Option<String>,
    /// Author name with any `By ` prefix removed.
    pub author: Option<String>,
    /// Lead image, or [`PLACEHOLDER_IMAGE`].
    pub image_url: Option<String>,
    /// ISO-8601 publication date: RFC 3339 for timestamps, `YYYY-MM-DD` for date-only values.
    pub published_at: Option<String>,
    /// Publication name, e.g. "The Guardian".
    pub source_name: Option<String>,
    /// Section or category name, when the provider exposes one.
    pub category: Option<String>,
}

/// Optional constraints a user can put on a search.
///
/// Absent and blank fields impose no constraint; present fields are ANDed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct FilterCriteria {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keyword: Option<String>,
    /// A calendar day, no time component.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
}

impl FilterCriteria {
    pub fn keyword(&self) -> Option<&str> {
        present(&self.keyword)
    }

    pub fn category(&self) -> Option<&str> {
        present(&self.category)
    }

    pub fn source(&self) -> Option<&str> {
        present(&self.source)
    }

    pub fn author(&self) -> Option<&str> {
        present(&self.author)
    }

    /// `true` when no field constrains anything.
    pub fn is_empty(&self) -> bool {
        self.keyword().is_none()
            && self.date.is_none()
            && self.category().is_none()
            && self.source().is_none()
            && self.author().is_none()
    }
}

fn present(field: &Option<String>) -> Option<&str> {
    field.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

/// Lifecycle of a single fetch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FetchStatus {
    #[default]
    Idle,
    Loading,
    Succeeded,
    Failed,
}

impl fmt::Display for FetchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FetchStatus::Idle => "idle",
            FetchStatus::Loading => "loading",
            FetchStatus::Succeeded => "succeeded",
            FetchStatus::Failed => "failed",
        };
        f.write_str(s)
    }
}

/// The three supported news APIs.
///
/// | Variant | API | Names accepted |
/// |---------|-----|----------------|
/// | `Headline` | NewsAPI | `headline`, `newsapi` |
/// | `LongForm` | New York Times | `longform`, `nyt` |
/// | `Regional` | The Guardian | `regional`, `guardian` |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderId {
    Headline,
    #[serde(rename = "longform")]
    LongForm,
    Regional,
}

impl ProviderId {
    pub const ALL: [ProviderId; 3] = [ProviderId::Headline, ProviderId::LongForm, ProviderId::Regional];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderId::Headline => "headline",
            ProviderId::LongForm => "longform",
            ProviderId::Regional => "regional",
        }
    }
}

impl fmt::Display for ProviderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderId {
    type Err = SearchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "headline" | "newsapi" => Ok(ProviderId::Headline),
            "longform" | "nyt" => Ok(ProviderId::LongForm),
            "regional" | "guardian" => Ok(ProviderId::Regional),
            _ => Err(SearchError::UnsupportedProvider(s.to_string())),
        }
    }
}
