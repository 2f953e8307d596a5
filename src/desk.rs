//! The coordinator that owns the article store.
//!
//! [`Desk`] is the explicit context object a front end holds: it pairs a
//! [`Searcher`] with an [`ArticleStore`] and is the only place store
//! transitions are applied. Each run is `start → search → succeed | fail`.

use serde::{Deserialize, Serialize};
use tracing::{error, info, instrument};

use crate::models::{Article, FilterCriteria, ProviderId};
use crate::search::{SearchError, Searcher, Transport};
use crate::store::{ArticleStore, StoreView};

/// Which endpoint a request goes to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Provider search endpoint; criteria split between server and client.
    #[default]
    Search,
    /// Provider listing endpoint; criteria ignored.
    Headlines,
    /// Listing endpoint filtered client-side by the criteria.
    Feed,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct SearchRequest {
    /// Provider name as typed by the user; parsed at run time.
    pub provider: String,
    pub criteria: FilterCriteria,
    pub mode: Mode,
}

pub struct Desk<T> {
    searcher: Searcher<T>,
    store: ArticleStore,
}

impl<T: Transport> Desk<T> {
    pub fn new(searcher: Searcher<T>) -> Self {
        Self {
            searcher,
            store: ArticleStore::new(),
        }
    }

    /// Run `request` and record the outcome in the store.
    ///
    /// Returns the number of articles on success. On failure the store is
    /// left in `failed` with the error text and the error is returned too,
    /// so the caller can decide whether to try again.
    #[instrument(level = "info", skip_all, fields(provider = %request.provider, mode = ?request.mode))]
    pub async fn run(&mut self, request: &SearchRequest) -> Result<usize, SearchError> {
        self.store.start();

        match self.fetch(request).await {
            Ok(articles) => {
                let count = articles.len();
                if let Err(e) = self.store.succeed(articles) {
                    error!(error = %e, "Store rejected transition");
                }
                info!(count, status = %self.store.status(), "Desk run succeeded");
                Ok(count)
            }
            Err(e) => {
                if let Err(te) = self.store.fail(e.to_string()) {
                    error!(error = %te, "Store rejected transition");
                }
                info!(error = %e, "Desk run failed");
                Err(e)
            }
        }
    }

    pub fn view(&self) -> StoreView<'_> {
        self.store.view()
    }

    pub fn clear(&mut self) {
        self.store.clear();
    }

    async fn fetch(&self, request: &SearchRequest) -> Result<Vec<Article>, SearchError> {
        let provider: ProviderId = request.provider.parse()?;
        match request.mode {
            Mode::Search => self.searcher.search(provider, &request.criteria).await,
            Mode::Headlines => self.searcher.headlines(provider).await,
            Mode::Feed => self.searcher.feed(provider, &request.criteria).await,
        }
    }
}
