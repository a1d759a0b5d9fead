//! Runs the fetch → extract → normalize chain over the registry.
//!
//! # Entry Points
//!
//! - [`Aggregator::fetch_all`]: every source. A failing source is logged and
//!   skipped, so this never fails.
//! - [`Aggregator::fetch_one`]: one source by name. Any failure aborts and is
//!   returned to the caller.
//!
//! # Dispatch
//!
//! [`Dispatch::Sequential`] scrapes one source at a time.
//! [`Dispatch::Concurrent`] keeps up to `n` scrapes in flight. Both return
//! articles in registry order, then in document order within a source.

use crate::extractor::{Extractor, ParseError};
use crate::fetcher::{Fetch, FetchError};
use crate::models::{Article, Source};
use crate::normalizer::{UrlJoin, normalize};
use crate::registry::SourceRegistry;
use futures::stream::{self, StreamExt};
use std::fmt;
use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, instrument, warn};

pub const DEFAULT_KEYWORD: &str = "Amazon";

/// Why scraping a source produced no articles.
#[derive(thiserror::Error, Debug)]
pub enum ScrapeError {
    /// No source with the requested name is registered.
    #[error("source not found: {0}")]
    NotFound(String),

    /// The source's page could not be fetched.
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// The fetched page could not be parsed.
    #[error(transparent)]
    Parse(#[from] ParseError),
}

/// How `fetch_all` schedules its per-source scrapes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Dispatch {
    #[default]
    Sequential,
    /// At most `n` sources in flight at once.
    Concurrent(NonZeroUsize),
}

impl Dispatch {
    /// `1` (or `0`) means sequential; anything larger bounds concurrency.
    pub fn from_limit(limit: usize) -> Self {
        match NonZeroUsize::new(limit) {
            Some(n) if n.get() > 1 => Dispatch::Concurrent(n),
            _ => Dispatch::Sequential,
        }
    }
}

impl fmt::Display for Dispatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dispatch::Sequential => write!(f, "sequential"),
            Dispatch::Concurrent(n) => write!(f, "concurrent({n})"),
        }
    }
}

/// The scraping pipeline, shared by every request behind an `Arc`.
pub struct Aggregator {
    registry: Arc<SourceRegistry>,
    fetcher: Arc<dyn Fetch>,
    extractor: Extractor,
    keyword: String,
    url_join: UrlJoin,
    dispatch: Dispatch,
}

impl Aggregator {
    /// An aggregator using the default keyword, selector, join and dispatch.
    pub fn new(registry: Arc<SourceRegistry>, fetcher: Arc<dyn Fetch>) -> Self {
        Self {
            registry,
            fetcher,
            extractor: Extractor::default(),
            keyword: DEFAULT_KEYWORD.to_string(),
            url_join: UrlJoin::default(),
            dispatch: Dispatch::default(),
        }
    }

    /// Replace the keyword anchors must contain.
    pub fn with_keyword(mut self, keyword: impl Into<String>) -> Self {
        self.keyword = keyword.into();
        self
    }

    /// Replace the extractor, e.g. one built from a custom selector.
    pub fn with_extractor(mut self, extractor: Extractor) -> Self {
        self.extractor = extractor;
        self
    }

    /// Choose how hrefs are joined onto base URLs.
    pub fn with_url_join(mut self, url_join: UrlJoin) -> Self {
        self.url_join = url_join;
        self
    }

    /// Choose how `fetch_all` schedules sources.
    pub fn with_dispatch(mut self, dispatch: Dispatch) -> Self {
        self.dispatch = dispatch;
        self
    }

    /// The sources this aggregator scrapes.
    pub fn registry(&self) -> &SourceRegistry {
        &self.registry
    }

    /// The active keyword.
    pub fn keyword(&self) -> &str {
        &self.keyword
    }

    /// The active dispatch policy.
    pub fn dispatch(&self) -> Dispatch {
        self.dispatch
    }

    /// Fetch, extract and normalize a single source.
    ///
    /// # Arguments
    ///
    /// * `source` - The site to scrape
    ///
    /// # Returns
    ///
    /// The source's articles in document order, or the first
    /// [`ScrapeError`] hit. Nothing partial is returned.
    #[instrument(level = "info", skip_all, fields(source = %source.name))]
    pub async fn scrape(&self, source: &Source) -> Result<Vec<Article>, ScrapeError> {
        let t0 = Instant::now();
        let doc = self.fetcher.fetch(&source.address).await?;
        let articles: Vec<Article> = self
            .extractor
            .extract(&doc, &self.keyword)?
            .into_iter()
            .map(|anchor| normalize(anchor, source, self.url_join))
            .collect();

        info!(
            count = articles.len(),
            elapsed_ms = t0.elapsed().as_millis() as u64,
            "Scraped source"
        );
        Ok(articles)
    }

    /// Scrape every registered source.
    ///
    /// Failed sources are logged at `warn` and contribute nothing; this
    /// never fails.
    ///
    /// # Returns
    ///
    /// All articles, in registry order and then document order.
    #[instrument(level = "info", skip_all, fields(dispatch = %self.dispatch))]
    pub async fn fetch_all(&self) -> Vec<Article> {
        let per_source: Vec<Vec<Article>> = match self.dispatch {
            Dispatch::Sequential => {
                let mut results = Vec::with_capacity(self.registry.len());
                for source in self.registry.list() {
                    results.push(self.scrape_or_skip(source).await);
                }
                results
            }
            Dispatch::Concurrent(limit) => {
                stream::iter(self.registry.list().to_vec())
                    .map(|source| async move { self.scrape_or_skip(&source).await })
                    .buffered(limit.get())
                    .collect()
                    .await
            }
        };

        let articles: Vec<Article> = per_source.into_iter().flatten().collect();
        info!(count = articles.len(), "Aggregated articles from all sources");
        articles
    }

    /// Scrape the source named `id`.
    ///
    /// # Arguments
    ///
    /// * `id` - A source name from the registry
    ///
    /// # Returns
    ///
    /// The source's articles, [`ScrapeError::NotFound`] for an unknown id
    /// (no request is made), or the fetch/parse error for that source.
    #[instrument(level = "info", skip_all, fields(%id))]
    pub async fn fetch_one(&self, id: &str) -> Result<Vec<Article>, ScrapeError> {
        let source = self
            .registry
            .find(id)
            .ok_or_else(|| ScrapeError::NotFound(id.to_string()))?;
        self.scrape(source).await
    }

    async fn scrape_or_skip(&self, source: &Source) -> Vec<Article> {
        match self.scrape(source).await {
            Ok(articles) => articles,
            Err(e) => {
                warn!(source = %source.name, error = %e, "Skipping source");
                Vec::new()
            }
        }
    }
}

impl fmt::Debug for Aggregator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Aggregator")
            .field("sources", &self.registry.len())
            .field("keyword", &self.keyword)
            .field("selector", &self.extractor.selector())
            .field("url_join", &self.url_join)
            .field("dispatch", &self.dispatch)
            .finish()
    }
}
