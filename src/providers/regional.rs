//! Guardian Open Platform adapter.
//!
//! `/search` answers with `{ "response": { "status": "ok", "results": [...] } }`.
//! Descriptions and thumbnails only come back when requested through
//! `show-fields`, so every query asks for them.
//!
//! The API has no author filter. An author criterion is folded into `q`
//! as a quoted phrase; articles carry no author, so it is never re-checked.
//! `q` also searches body text, so the keyword is re-checked locally.

use serde::Deserialize;
use serde_json::Value;

use super::{NormalizeError, QueryPairs, clean_description, image_or_placeholder, require_link, take_array};
use crate::models::{Article, FilterCriteria, ProviderId};
use crate::utils::{non_empty, normalize_published_at};

const PUBLICATION: &str = "The Guardian";
const SHOW_FIELDS: &str = "thumbnail,trailText";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawResult {
    web_title: Option<String>,
    web_url: Option<String>,
    web_publication_date: Option<String>,
    section_name: Option<String>,
    fields: Option<RawFields>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawFields {
    trail_text: Option<String>,
    thumbnail: Option<String>,
}

impl RawResult {
    fn into_article(self) -> Option<Article> {
        let (title, url) = require_link(ProviderId::Regional, self.web_title, self.web_url)?;
        let fields = self.fields.unwrap_or_default();
        Some(Article {
            title,
            url,
            description: clean_description(fields.trail_text),
            author: None,
            image_url: image_or_placeholder(fields.thumbnail),
            published_at: normalize_published_at(self.web_publication_date.as_deref()),
            source_name: Some(PUBLICATION.to_string()),
            category: non_empty(self.section_name),
        })
    }
}

/// Normalize a `{ response: { results: [...] } }` payload.
pub fn normalize(mut raw: Value) -> Result<Vec<Article>, NormalizeError> {
    let items: Vec<RawResult> = serde_json::from_value(take_array(&mut raw, "/response/results")?)?;
    Ok(items.into_iter().filter_map(RawResult::into_article).collect())
}

fn folded_query(criteria: &FilterCriteria) -> Option<String> {
    let author = criteria.author().map(|a| format!("\"{}\"", a.replace('"', "")));
    match (criteria.keyword(), author) {
        (Some(keyword), Some(author)) => Some(format!("{keyword} AND {author}")),
        (Some(keyword), None) => Some(keyword.to_string()),
        (None, author) => author,
    }
}

pub fn search_query(criteria: &FilterCriteria) -> QueryPairs {
    let mut pairs = QueryPairs::new();
    if let Some(q) = folded_query(criteria) {
        pairs.push(("q", q));
    }
    if let Some(date) = criteria.date {
        let day = date.format("%Y-%m-%d").to_string();
        pairs.push(("from-date", day.clone()));
        pairs.push(("to-date", day));
    }
    if let Some(category) = criteria.category() {
        pairs.push(("section", category.to_string()));
    }
    pairs.push(("show-fields", SHOW_FIELDS.to_string()));
    pairs
}

pub fn headlines_query() -> QueryPairs {
    vec![
        ("order-by", "newest".to_string()),
        ("show-fields", SHOW_FIELDS.to_string()),
    ]
}

pub fn residual(criteria: &FilterCriteria) -> FilterCriteria {
    FilterCriteria {
        keyword: criteria.keyword().map(str::to_string),
        source: criteria.source().map(str::to_string),
        ..Default::default()
    }
}
