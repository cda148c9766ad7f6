//! Feed loading with timed caching and fallback to empty documents.
//!
//! A failed fetch never reaches the caller: it is recorded as a user-facing
//! notice and replaced by an empty document that stays cached for the rest of
//! the TTL window. Callers surface the notices, so the loader itself only logs
//! the failure at debug level.

use crate::cache::DocumentCache;
use crate::config::{FeedConfig, SourceConfig, PERSONAS_PATH, POSTS_PATH};
use anyhow::{Context, Result};
use chrono::Utc;
use feed_core::{personas_from_document, posts_from_document, PersonaMap, Post};
use parking_lot::Mutex;
use serde_json::Value;
use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Transport(String),
    #[error("HTTP {status} from {url}")]
    Status { status: u16, url: String },
    #[error("invalid JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Something that can produce a JSON document for a feed path.
pub trait DocumentSource {
    fn fetch(&self, path: &str) -> Result<Value, FetchError>;
}

/// Fetches documents over HTTP with a fixed timeout.
pub struct HttpSource {
    client: reqwest::blocking::Client,
    source: SourceConfig,
}

impl HttpSource {
    pub fn new(source: SourceConfig, timeout: Duration) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("agentic-feed/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self { client, source })
    }
}

impl DocumentSource for HttpSource {
    fn fetch(&self, path: &str) -> Result<Value, FetchError> {
        let url = self.source.url_for(path);
        tracing::debug!("GET {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                url,
            });
        }

        let body = response
            .text()
            .map_err(|e| FetchError::Transport(e.to_string()))?;
        Ok(serde_json::from_str(&body)?)
    }
}

pub struct FeedLoader<S> {
    source: S,
    cache: DocumentCache,
    ttl: Duration,
    notices: Mutex<Vec<String>>,
}

impl FeedLoader<HttpSource> {
    /// Loader for the configured remote feed.
    pub fn from_config(config: &FeedConfig) -> Result<Self> {
        let source = HttpSource::new(config.source.clone(), config.fetch.timeout())?;
        Ok(Self::new(source, config.cache.ttl()))
    }
}

impl<S: DocumentSource> FeedLoader<S> {
    pub fn new(source: S, ttl: Duration) -> Self {
        Self {
            source,
            cache: DocumentCache::new(),
            ttl,
            notices: Mutex::new(Vec::new()),
        }
    }

    /// Fetch `path`, reusing a cached copy inside the TTL window.
    ///
    /// Returns an empty object on any failure.
    pub fn fetch_document(&self, path: &str) -> Value {
        let now = Utc::now();
        if let Some(cached) = self.cache.get(path) {
            if cached.is_fresh(now, self.ttl) {
                tracing::debug!("cache hit for {}", path);
                return cached.document;
            }
        }

        let document = match self.source.fetch(path) {
            Ok(document) => document,
            Err(e) => {
                tracing::debug!("Failed to fetch {}: {}", path, e);
                self.notices
                    .lock()
                    .push(format!("Failed to fetch {}: {}", path, e));
                Value::Object(serde_json::Map::new())
            }
        };

        self.cache.put(path, document.clone(), now);
        document
    }

    pub fn fetch_posts(&self) -> Vec<Post> {
        posts_from_document(&self.fetch_document(POSTS_PATH))
    }

    pub fn fetch_personas(&self) -> PersonaMap {
        personas_from_document(&self.fetch_document(PERSONAS_PATH))
    }

    /// Forget every cached document so the next fetch goes to the source.
    pub fn refresh(&self) {
        tracing::info!("Clearing feed cache");
        self.cache.clear();
    }

    /// Drain the warnings collected since the last call.
    pub fn take_notices(&self) -> Vec<String> {
        std::mem::take(&mut *self.notices.lock())
    }

    pub fn cache(&self) -> &DocumentCache {
        &self.cache
    }

    pub fn source(&self) -> &S {
        &self.source
    }
}
