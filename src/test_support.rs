//! Shared fixtures for unit tests: a scripted [`Transport`] and helpers.

use serde_json::Value;
use std::collections::VecDeque;
use std::error::Error;
use std::sync::{Arc, Mutex};
use url::Url;

use crate::config::Config;
use crate::models::ProviderId;
use crate::search::{HttpResponse, Searcher, Transport};

/// Replays canned responses in order and records every requested URL.
///
/// Clones share the same script and request log.
#[derive(Debug, Clone, Default)]
pub struct FakeTransport {
    responses: Arc<Mutex<VecDeque<Result<HttpResponse, String>>>>,
    requests: Arc<Mutex<Vec<Url>>>,
}

impl FakeTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(self, status: u16, body: &str) -> Self {
        self.responses.lock().unwrap().push_back(Ok(HttpResponse {
            status,
            body: body.to_string(),
        }));
        self
    }

    pub fn ok_json(self, body: Value) -> Self {
        self.respond(200, &body.to_string())
    }

    pub fn fail(self, message: &str) -> Self {
        self.responses.lock().unwrap().push_back(Err(message.to_string()));
        self
    }

    pub fn requests(&self) -> Vec<Url> {
        self.requests.lock().unwrap().clone()
    }
}

impl Transport for FakeTransport {
    async fn get(&self, url: &Url) -> Result<HttpResponse, Box<dyn Error + Send + Sync>> {
        self.requests.lock().unwrap().push(url.clone());
        let next = self.responses.lock().unwrap().pop_front();
        match next {
            Some(Ok(response)) => Ok(response),
            Some(Err(message)) => Err(message.into()),
            None => Err("no canned response left".into()),
        }
    }
}

/// A searcher against the public default endpoints, optionally keyed.
pub fn searcher_with(transport: FakeTransport, api_key: Option<&str>) -> Searcher<FakeTransport> {
    let mut config = Config::default();
    for id in ProviderId::ALL {
        config.set_api_key(id, api_key.map(str::to_string));
    }
    Searcher::from_config(transport, &config).unwrap()
}
