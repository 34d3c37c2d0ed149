//! Job sources: one fetcher per external job board.
//!
//! Each source is independently failable; the orchestrator treats an error or
//! timeout from one source as zero postings from it.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use scraper::{ElementRef, Selector};
use thiserror::Error;

use crate::models::posting::RawPosting;

pub mod linkedin;
pub mod naukri;

pub use linkedin::LinkedInSource;
pub use naukri::NaukriSource;

/// What every source is asked for.
#[derive(Debug, Clone)]
pub struct SourceQuery {
    pub keywords: Vec<String>,
    pub countries: Vec<String>,
    pub limit: usize,
}

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{url} returned status {status}")]
    Status { status: u16, url: String },

    #[error("timed out after {0:?}")]
    Timeout(Duration),

    #[error("parse error: {0}")]
    Parse(String),
}

#[async_trait]
pub trait JobSource: Send + Sync {
    /// Identifier callers use to request this source, e.g. `"naukri"`.
    fn id(&self) -> &'static str;

    async fn fetch(&self, query: &SourceQuery) -> Result<Vec<RawPosting>, SourceError>;
}

/// The set of sources a discovery service can fan out to.
#[derive(Clone, Default)]
pub struct SourceRegistry {
    sources: Vec<Arc<dyn JobSource>>,
}

impl SourceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_source(mut self, source: Arc<dyn JobSource>) -> Self {
        self.sources.push(source);
        self
    }

    pub fn get(&self, id: &str) -> Option<Arc<dyn JobSource>> {
        self.sources.iter().find(|s| s.id() == id).cloned()
    }

    pub fn ids(&self) -> Vec<&'static str> {
        self.sources.iter().map(|s| s.id()).collect()
    }
}

/// Registry with every built-in board, sharing one HTTP client.
pub fn default_registry(client: Client) -> SourceRegistry {
    SourceRegistry::new()
        .with_source(Arc::new(LinkedInSource::new(client.clone())))
        .with_source(Arc::new(NaukriSource::new(client)))
}

pub fn build_http_client(user_agent: &str, timeout: Duration) -> reqwest::Result<Client> {
    Client::builder()
        .user_agent(user_agent)
        .timeout(timeout)
        .build()
}

/// Sends `request` and returns the body, treating non-2xx as an error.
pub(crate) async fn fetch_html(request: reqwest::RequestBuilder) -> Result<String, SourceError> {
    let response = request.send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(SourceError::Status {
            status: status.as_u16(),
            url: response.url().to_string(),
        });
    }
    Ok(response.text().await?)
}

pub(crate) fn selector(css: &str) -> Result<Selector, SourceError> {
    Selector::parse(css).map_err(|e| SourceError::Parse(format!("bad selector '{css}': {e}")))
}

/// Resolves a possibly relative `href` against `base`. Empty stays empty.
pub(crate) fn resolve_href(base: &str, href: &str) -> String {
    if href.trim().is_empty() {
        return String::new();
    }
    reqwest::Url::parse(base)
        .and_then(|base| base.join(href.trim()))
        .map(|url| url.to_string())
        .unwrap_or_else(|_| href.to_string())
}

/// Whitespace-collapsed text of the first element under `el` matching `sel`.
pub(crate) fn first_text(el: &ElementRef<'_>, sel: &Selector) -> Option<String> {
    el.select(sel).next().map(|node| {
        node.text()
            .flat_map(str::split_whitespace)
            .collect::<Vec<_>>()
            .join(" ")
    })
}
