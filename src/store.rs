//! Result set and fetch status for the current search.
//!
//! The store only changes through its transition methods:
//!
//! ```text
//! idle | succeeded | failed | loading --start-->   loading
//! loading                        --succeed-->  succeeded  (replace list, clear error)
//! loading                        --fail-->     failed     (keep list, set error)
//! any                            --clear-->    idle       (empty list and error)
//! ```
//!
//! A failed fetch keeps the previous results visible.

use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use crate::models::{Article, FetchStatus};

#[derive(Debug, Error, PartialEq, Eq)]
#[error("cannot {event} while {status}")]
pub struct TransitionError {
    pub event: &'static str,
    pub status: FetchStatus,
}

#[derive(Debug, Default)]
pub struct ArticleStore {
    status: FetchStatus,
    articles: Vec<Article>,
    /// Distinguishes "never fetched" from "fetched nothing".
    has_results: bool,
    error: Option<String>,
}

/// What a renderer needs to draw the current state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StoreView<'a> {
    pub status: FetchStatus,
    pub articles: Option<&'a [Article]>,
    pub error: Option<&'a str>,
}

impl ArticleStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(&self) -> FetchStatus {
        self.status
    }

    pub fn start(&mut self) {
        debug!(from = %self.status, "store: start");
        self.status = FetchStatus::Loading;
    }

    pub fn succeed(&mut self, articles: Vec<Article>) -> Result<(), TransitionError> {
        self.expect_loading("succeed")?;
        debug!(from = %self.status, count = articles.len(), "store: succeed");
        self.status = FetchStatus::Succeeded;
        self.articles = articles;
        self.has_results = true;
        self.error = None;
        Ok(())
    }

    pub fn fail(&mut self, reason: impl Into<String>) -> Result<(), TransitionError> {
        self.expect_loading("fail")?;
        let reason = reason.into();
        debug!(from = %self.status, %reason, "store: fail");
        self.status = FetchStatus::Failed;
        self.error = Some(reason);
        Ok(())
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn view(&self) -> StoreView<'_> {
        StoreView {
            status: self.status,
            articles: self.has_results.then_some(self.articles.as_slice()),
            error: self.error.as_deref(),
        }
    }

    fn expect_loading(&self, event: &'static str) -> Result<(), TransitionError> {
        if self.status == FetchStatus::Loading {
            Ok(())
        } else {
            Err(TransitionError {
                event,
                status: self.status,
            })
        }
    }
}
