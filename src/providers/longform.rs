//! New York Times adapter.
//!
//! The NYT answers in two shapes depending on the endpoint:
//!
//! - Top Stories (`/svc/topstories/v2/home.json`): `{ "results": [...] }`
//!   with `title`, `url`, `byline` as a string, `published_date`, `section`.
//! - Article Search (`/svc/search/v2/articlesearch.json`):
//!   `{ "response": { "docs": [...] } }` with `headline.main`, `web_url`,
//!   `byline.original`, `pub_date`, `section_name`, `source`.
//!
//! Multimedia is a list of `{ url }` (sometimes relative to nytimes.com) or,
//! in newer search responses, an object with a `default.url`.

use itertools::Itertools;
use once_cell::sync::Lazy;
use serde::Deserialize;
use serde_json::Value;
use url::Url;

use super::{NormalizeError, QueryPairs, clean_description, image_or_placeholder, require_link, take_array};
use crate::models::{Article, FilterCriteria, ProviderId};
use crate::utils::{non_empty, normalize_published_at, strip_byline_prefix};

const PUBLICATION: &str = "The New York Times";

static MEDIA_BASE: Lazy<Url> = Lazy::new(|| Url::parse("https://www.nytimes.com/").unwrap());

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Byline {
    Text(String),
    Structured { original: Option<String> },
}

impl Byline {
    fn into_author(self) -> Option<String> {
        let text = match self {
            Byline::Text(text) => Some(text),
            Byline::Structured { original } => original,
        };
        non_empty(text.map(|t| strip_byline_prefix(&t)))
    }
}

#[derive(Debug, Deserialize)]
struct TopStory {
    title: Option<String>,
    url: Option<String>,
    #[serde(rename = "abstract")]
    summary: Option<String>,
    byline: Option<Byline>,
    published_date: Option<String>,
    section: Option<String>,
    multimedia: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct Headline {
    main: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SearchDoc {
    headline: Option<Headline>,
    web_url: Option<String>,
    #[serde(rename = "abstract")]
    summary: Option<String>,
    byline: Option<Byline>,
    pub_date: Option<String>,
    section_name: Option<String>,
    source: Option<String>,
    multimedia: Option<Value>,
}

impl TopStory {
    fn into_article(self) -> Option<Article> {
        let (title, url) = require_link(ProviderId::LongForm, self.title, self.url)?;
        Some(Article {
            title,
            url,
            description: clean_description(self.summary),
            author: self.byline.and_then(Byline::into_author),
            image_url: image_or_placeholder(self.multimedia.as_ref().and_then(first_media_url)),
            published_at: normalize_published_at(self.published_date.as_deref()),
            source_name: Some(PUBLICATION.to_string()),
            category: non_empty(self.section),
        })
    }
}

impl SearchDoc {
    fn into_article(self) -> Option<Article> {
        let title = self.headline.and_then(|h| h.main);
        let (title, url) = require_link(ProviderId::LongForm, title, self.web_url)?;
        Some(Article {
            title,
            url,
            description: clean_description(self.summary),
            author: self.byline.and_then(Byline::into_author),
            image_url: image_or_placeholder(self.multimedia.as_ref().and_then(first_media_url)),
            published_at: normalize_published_at(self.pub_date.as_deref()),
            source_name: non_empty(self.source).or_else(|| Some(PUBLICATION.to_string())),
            category: non_empty(self.section_name),
        })
    }
}

/// URL of the first image, resolved against nytimes.com when relative.
fn first_media_url(multimedia: &Value) -> Option<String> {
    let raw = match multimedia {
        Value::Array(items) => items.first()?.get("url")?.as_str()?,
        Value::Object(_) => multimedia.pointer("/default/url")?.as_str()?,
        _ => return None,
    };
    if raw.trim().is_empty() {
        return None;
    }
    MEDIA_BASE.join(raw.trim()).ok().map(String::from)
}

/// Normalize a Top Stories or Article Search payload.
pub fn normalize(mut raw: Value) -> Result<Vec<Article>, NormalizeError> {
    if raw.get("results").is_some() {
        let items: Vec<TopStory> = serde_json::from_value(take_array(&mut raw, "/results")?)?;
        return Ok(items.into_iter().filter_map(TopStory::into_article).collect());
    }
    let items: Vec<SearchDoc> = serde_json::from_value(take_array(&mut raw, "/response/docs")?)?;
    Ok(items.into_iter().filter_map(SearchDoc::into_article).collect())
}

/// Lucene filter clause, e.g. `section_name:("Politics")`.
fn filter_clause(field: &str, value: &str) -> String {
    format!("{field}:(\"{}\")", value.replace('"', "\\\""))
}

pub fn search_query(criteria: &FilterCriteria) -> QueryPairs {
    let mut pairs = QueryPairs::new();
    if let Some(keyword) = criteria.keyword() {
        pairs.push(("q", keyword.to_string()));
    }
    if let Some(date) = criteria.date {
        pairs.push(("begin_date", date.format("%Y%m%d").to_string()));
    }
    let fq = [
        criteria.category().map(|c| filter_clause("section_name", c)),
        criteria.author().map(|a| filter_clause("byline", a)),
    ]
    .into_iter()
    .flatten()
    .join(" AND ");
    if !fq.is_empty() {
        pairs.push(("fq", fq));
    }
    pairs
}

pub fn headlines_query() -> QueryPairs {
    QueryPairs::new()
}

/// `q` is tokenized, so the keyword is re-checked as a substring.
pub fn residual(criteria: &FilterCriteria) -> FilterCriteria {
    FilterCriteria {
        keyword: criteria.keyword().map(str::to_string),
        date: criteria.date,
        source: criteria.source().map(str::to_string),
        ..Default::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PLACEHOLDER_IMAGE;
    use chrono::NaiveDate;
    use serde_json::json;

    #[test]
    fn test_top_stories_minimal() {
        let payload = json!({
            "results": [{ "title": "T", "url": "u", "published_date": "2024-05-01", "multimedia": [] }]
        });

        let articles = normalize(payload).unwrap();
        assert_eq!(articles.len(), 1);
        assert_eq!(articles[0].image_url.as_deref(), Some(PLACEHOLDER_IMAGE));
        assert_eq!(articles[0].published_at.as_deref(), Some("2024-05-01"));
    }

    #[test]
    fn test_top_stories_full() {
        let payload = json!({
            "status": "OK",
            "section": "home",
            "results": [{
                "section": "us",
                "title": "Senate passes bill",
                "abstract": "The vote was 60 to 40.",
                "url": "https://www.nytimes.com/2024/05/01/us/senate.html",
                "byline": "By Carl Hulse",
                "published_date": "2024-05-01T05:00:00-04:00",
                "multimedia": [
                    { "url": "https://static01.nyt.com/images/senate.jpg", "format": "Super Jumbo" },
                    { "url": "https://static01.nyt.com/images/senate-thumb.jpg" }
                ]
            }]
        });

        let a = &normalize(payload).unwrap()[0];
        assert_eq!(a.author.as_deref(), Some("Carl Hulse"));
        assert_eq!(a.description.as_deref(), Some("The vote was 60 to 40."));
        assert_eq!(a.image_url.as_deref(), Some("https://static01.nyt.com/images/senate.jpg"));
        assert_eq!(a.published_at.as_deref(), Some("2024-05-01T05:00:00-04:00"));
        assert_eq!(a.category.as_deref(), Some("us"));
        assert_eq!(a.source_name.as_deref(), Some("The New York Times"));
    }

    #[test]
    fn test_top_stories_null_multimedia() {
        let payload = json!({ "results": [{ "title": "T", "url": "u", "multimedia": null, "byline": "" }] });
        let a = &normalize(payload).unwrap()[0];
        assert_eq!(a.image_url.as_deref(), Some(PLACEHOLDER_IMAGE));
        assert_eq!(a.author, None);
    }

    #[test]
    fn test_search_docs() {
        let payload = json!({
            "status": "OK",
            "response": {
                "docs": [{
                    "abstract": "A long read.",
                    "web_url": "https://www.nytimes.com/2024/05/01/magazine/read.html",
                    "headline": { "main": "The Long Read", "kicker": null },
                    "byline": { "original": "By Jane Doe", "person": [] },
                    "pub_date": "2024-05-01T09:00:00+0000",
                    "section_name": "Magazine",
                    "source": "The New York Times",
                    "multimedia": [{ "url": "images/2024/05/01/read.jpg" }]
                }]
            }
        });

        let a = &normalize(payload).unwrap()[0];
        assert_eq!(a.title, "The Long Read");
        assert_eq!(a.author.as_deref(), Some("Jane Doe"));
        assert_eq!(a.published_at.as_deref(), Some("2024-05-01T09:00:00+00:00"));
        assert_eq!(a.category.as_deref(), Some("Magazine"));
        assert_eq!(
            a.image_url.as_deref(),
            Some("https://www.nytimes.com/images/2024/05/01/read.jpg")
        );
    }

    #[test]
    fn test_search_docs_object_multimedia() {
        let payload = json!({
            "response": { "docs": [{
                "headline": { "main": "T" },
                "web_url": "u",
                "multimedia": { "default": { "url": "https://static01.nyt.com/x.jpg" } }
            }]}
        });
        let a = &normalize(payload).unwrap()[0];
        assert_eq!(a.image_url.as_deref(), Some("https://static01.nyt.com/x.jpg"));
        assert_eq!(a.source_name.as_deref(), Some("The New York Times"));
    }

    #[test]
    fn test_missing_arrays() {
        assert!(matches!(
            normalize(json!({ "response": { "meta": {} } })),
            Err(NormalizeError::MissingArray("/response/docs"))
        ));
        assert!(matches!(
            normalize(json!({ "results": "nope" })),
            Err(NormalizeError::MissingArray("/results"))
        ));
    }

    #[test]
    fn test_search_query_combines_filters() {
        let criteria = FilterCriteria {
            keyword: Some("climate".into()),
            date: NaiveDate::from_ymd_opt(2024, 5, 1),
            category: Some("Science".into()),
            author: Some("Jane Doe".into()),
            source: Some("nyt".into()),
        };

        assert_eq!(
            search_query(&criteria),
            vec![
                ("q", "climate".to_string()),
                ("begin_date", "20240501".to_string()),
                (
                    "fq",
                    "section_name:(\"Science\") AND byline:(\"Jane Doe\")".to_string()
                ),
            ]
        );

        let rest = residual(&criteria);
        assert_eq!(rest.date, criteria.date);
        assert_eq!(rest.source.as_deref(), Some("nyt"));
        assert_eq!(rest.keyword.as_deref(), Some("climate"));
        assert_eq!(rest.author, None);
    }

    #[test]
    fn test_search_query_author_only() {
        let criteria = FilterCriteria {
            author: Some("Doe".into()),
            ..Default::default()
        };
        assert_eq!(search_query(&criteria), vec![("fq", "byline:(\"Doe\")".to_string())]);
    }
}
