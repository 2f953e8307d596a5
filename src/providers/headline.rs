//! NewsAPI adapter.
//!
//! Search goes to `/v2/everything`, listings to `/v2/top-headlines`. Both
//! answer with `{ "status": "ok", "articles": [...] }` where each article is
//! already close to the normalized shape.
//!
//! NewsAPI has no author parameter, and `from` is only a lower bound, so
//! both are enforced client-side. `q` also matches article bodies, so the
//! keyword is re-checked against title and description.
//!
//! `/v2/everything` does not honour `category` (only `/v2/top-headlines`
//! does). The parameter is still sent, but the normalized articles carry no
//! category to check against, so a headline search cannot narrow by
//! category.

use serde::Deserialize;
use serde_json::Value;

use super::{NormalizeError, QueryPairs, clean_description, image_or_placeholder, require_link, take_array};
use crate::models::{Article, FilterCriteria, ProviderId};
use crate::utils::{non_empty, normalize_published_at};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawArticle {
    source: Option<RawSource>,
    author: Option<String>,
    title: Option<String>,
    description: Option<String>,
    url: Option<String>,
    url_to_image: Option<String>,
    published_at: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawSource {
    name: Option<String>,
}

impl RawArticle {
    fn into_article(self) -> Option<Article> {
        let (title, url) = require_link(ProviderId::Headline, self.title, self.url)?;
        Some(Article {
            title,
            url,
            description: clean_description(self.description),
            author: non_empty(self.author),
            image_url: image_or_placeholder(self.url_to_image),
            published_at: normalize_published_at(self.published_at.as_deref()),
            source_name: non_empty(self.source.and_then(|s| s.name)),
            category: None,
        })
    }
}

/// Normalize a NewsAPI `{ articles: [...] }` payload.
pub fn normalize(mut raw: Value) -> Result<Vec<Article>, NormalizeError> {
    let items: Vec<RawArticle> = serde_json::from_value(take_array(&mut raw, "/articles")?)?;
    Ok(items.into_iter().filter_map(RawArticle::into_article).collect())
}

pub fn search_query(criteria: &FilterCriteria) -> QueryPairs {
    let mut pairs = QueryPairs::new();
    if let Some(keyword) = criteria.keyword() {
        pairs.push(("q", keyword.to_string()));
    }
    if let Some(date) = criteria.date {
        pairs.push(("from", date.format("%Y-%m-%d").to_string()));
    }
    if let Some(category) = criteria.category() {
        pairs.push(("category", category.to_string()));
    }
    if let Some(source) = criteria.source() {
        pairs.push(("sources", source.to_string()));
    }
    pairs
}

/// The country is part of the configured top-headlines URL.
pub fn headlines_query() -> QueryPairs {
    QueryPairs::new()
}

pub fn residual(criteria: &FilterCriteria) -> FilterCriteria {
    FilterCriteria {
        keyword: criteria.keyword().map(str::to_string),
        date: criteria.date,
        author: criteria.author().map(str::to_string),
        ..Default::default()
    }
}
