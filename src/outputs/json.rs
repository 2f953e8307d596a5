//! Persistence of the last search as JSON.
//!
//! The most recent search (request, status, results) is written to
//! `{dir}/last_search.json`, replacing the previous file. Nothing in the
//! search path reads it back; it only lets `--show-last` redisplay a result
//! without touching the network. `--clear` deletes it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{error, info, instrument};

use crate::desk::SearchRequest;
use crate::models::{Article, FetchStatus};
use crate::store::StoreView;

pub const LAST_SEARCH_FILE: &str = "last_search.json";

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct SavedSearch {
    pub saved_at: DateTime<Utc>,
    pub request: SearchRequest,
    pub status: FetchStatus,
    pub articles: Vec<Article>,
    pub error: Option<String>,
}

impl SavedSearch {
    pub fn capture(request: &SearchRequest, view: &StoreView<'_>) -> Self {
        Self {
            saved_at: Utc::now(),
            request: request.clone(),
            status: view.status,
            articles: view.articles.map(<[Article]>::to_vec).unwrap_or_default(),
            error: view.error.map(str::to_string),
        }
    }

    /// The saved state in the shape renderers take.
    pub fn view(&self) -> StoreView<'_> {
        StoreView {
            status: self.status,
            articles: Some(&self.articles),
            error: self.error.as_deref(),
        }
    }
}

fn last_search_path(dir: &str) -> PathBuf {
    Path::new(dir).join(LAST_SEARCH_FILE)
}

/// Write `saved` to `{dir}/last_search.json`, creating `dir` if needed.
#[instrument(level = "info", skip_all, fields(%dir))]
pub async fn write_last_search(dir: &str, saved: &SavedSearch) -> Result<PathBuf, Box<dyn Error>> {
    let json = serde_json::to_string_pretty(saved)?;

    if let Err(e) = fs::create_dir_all(dir).await {
        error!(error = %e, "Failed to create save dir");
        return Err(e.into());
    }

    let path = last_search_path(dir);
    fs::write(&path, json).await?;
    info!(path = %path.display(), articles = saved.articles.len(), "Wrote last search");
    Ok(path)
}

/// Read `{dir}/last_search.json`.
#[instrument(level = "info", skip_all, fields(%dir))]
pub async fn read_last_search(dir: &str) -> Result<SavedSearch, Box<dyn Error>> {
    let path = last_search_path(dir);
    let text = fs::read_to_string(&path).await?;
    let saved: SavedSearch = serde_json::from_str(&text)?;
    info!(path = %path.display(), articles = saved.articles.len(), "Read last search");
    Ok(saved)
}

/// Delete `{dir}/last_search.json`. A missing file is not an error.
#[instrument(level = "info", skip_all, fields(%dir))]
pub async fn clear_last_search(dir: &str) -> Result<bool, Box<dyn Error>> {
    let path = last_search_path(dir);
    match fs::remove_file(&path).await {
        Ok(()) => {
            info!(path = %path.display(), "Removed last search");
            Ok(true)
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
        Err(e) => {
            error!(path = %path.display(), error = %e, "Failed to remove last search");
            Err(e.into())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::desk::Mode;
    use crate::models::FilterCriteria;
    use chrono::NaiveDate;

    fn request() -> SearchRequest {
        SearchRequest {
            provider: "guardian".into(),
            criteria: FilterCriteria {
                keyword: Some("floods".into()),
                date: NaiveDate::from_ymd_opt(2024, 5, 1),
                ..Default::default()
            },
            mode: Mode::Search,
        }
    }

    fn article() -> Article {
        Article {
            title: "Floods hit coast".into(),
            url: "https://www.theguardian.com/world/floods".into(),
            description: None,
            author: None,
            image_url: None,
            published_at: Some("2024-05-01".into()),
            source_name: Some("The Guardian".into()),
            category: None,
        }
    }

    #[tokio::test]
    async fn test_write_then_read() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("saved");
        let dir = dir.to_str().unwrap();

        let articles = vec![article()];
        let view = StoreView {
            status: FetchStatus::Succeeded,
            articles: Some(&articles),
            error: None,
        };
        let saved = SavedSearch::capture(&request(), &view);

        let path = write_last_search(dir, &saved).await.unwrap();
        assert!(path.ends_with(LAST_SEARCH_FILE));

        let loaded = read_last_search(dir).await.unwrap();
        assert_eq!(loaded, saved);
        assert_eq!(loaded.view().status, FetchStatus::Succeeded);
        assert_eq!(loaded.view().articles.map(<[Article]>::len), Some(1));
    }

    #[tokio::test]
    async fn test_saved_file_shape() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().to_str().unwrap();
        let view = StoreView {
            status: FetchStatus::Failed,
            articles: None,
            error: Some("timeout"),
        };
        write_last_search(dir, &SavedSearch::capture(&request(), &view))
            .await
            .unwrap();

        let text = std::fs::read_to_string(tmp.path().join(LAST_SEARCH_FILE)).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["status"], "failed");
        assert_eq!(value["error"], "timeout");
        assert_eq!(value["request"]["criteria"]["date"], "2024-05-01");
        assert_eq!(value["request"]["mode"], "search");
        assert!(value["request"]["criteria"].get("author").is_none());
    }

    #[tokio::test]
    async fn test_clear_removes_saved_search() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().to_str().unwrap();
        let articles = vec![article()];
        let view = StoreView {
            status: FetchStatus::Succeeded,
            articles: Some(&articles),
            error: None,
        };
        write_last_search(dir, &SavedSearch::capture(&request(), &view))
            .await
            .unwrap();

        assert!(clear_last_search(dir).await.unwrap());
        assert!(read_last_search(dir).await.is_err());
        assert!(!clear_last_search(dir).await.unwrap());
    }

    #[tokio::test]
    async fn test_read_missing_file() {
        let tmp = tempfile::tempdir().unwrap();
        assert!(read_last_search(tmp.path().to_str().unwrap()).await.is_err());
    }
}
