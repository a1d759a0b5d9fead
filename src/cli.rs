//! Command-line interface definitions for keyword_news.
//!
//! Every option can also be supplied through an environment variable.

use crate::extractor::DEFAULT_SELECTOR;
use crate::normalizer::UrlJoin;
use clap::Parser;
use std::path::PathBuf;

/// Command-line arguments for the keyword_news server.
///
/// # Examples
///
/// ```sh
/// # Built-in sources on port 8000
/// keyword_news
///
/// # Custom sources, keyword and four concurrent fetches
/// keyword_news -s sources.yaml -k Tesla -c 4
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Port to listen on
    #[arg(short, long, env = "PORT", default_value_t = 8000)]
    pub port: u16,

    /// Address to bind
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// YAML file listing the sources to scrape (built-in list when omitted)
    #[arg(short, long, env = "NEWS_SOURCES")]
    pub sources: Option<PathBuf>,

    /// Keyword an anchor's text must contain
    #[arg(short, long, env = "NEWS_KEYWORD", default_value = crate::aggregator::DEFAULT_KEYWORD)]
    pub keyword: String,

    /// CSS selector for candidate anchors
    #[arg(long, env = "NEWS_SELECTOR", default_value = DEFAULT_SELECTOR)]
    pub selector: String,

    /// How hrefs are combined with a source's base URL
    #[arg(long, env = "NEWS_URL_JOIN", value_enum, default_value_t = UrlJoin::Concat)]
    pub url_join: UrlJoin,

    /// Sources scraped at once by /news (1 = one after another)
    #[arg(short, long, env = "NEWS_CONCURRENCY", default_value_t = 1)]
    pub concurrency: usize,

    /// Per-request fetch timeout in seconds (no timeout when omitted)
    #[arg(long, env = "NEWS_TIMEOUT_SECS")]
    pub timeout_secs: Option<u64>,

    /// User-Agent sent to news sites
    #[arg(long, env = "NEWS_USER_AGENT", default_value = concat!("keyword_news/", env!("CARGO_PKG_VERSION")))]
    pub user_agent: String,
}
