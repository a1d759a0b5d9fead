//! Mapping extracted anchors to [`Article`] records.

use crate::models::{AnchorMatch, Article, Source};
use clap::ValueEnum;
use url::Url;

/// How an anchor's `href` is combined with its source's `base_url`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum UrlJoin {
    /// `base_url + href`, verbatim. No slash handling, no scheme checks.
    #[default]
    Concat,
    /// RFC 3986 reference resolution against `base_url`.
    Resolve,
}

/// Build the article for one matched anchor.
///
/// # Arguments
///
/// * `anchor` - The extracted text and href
/// * `source` - The site the anchor came from
/// * `join` - How the href is combined with `source.base_url`
///
/// # Returns
///
/// An [`Article`] whose `title` is the anchor text and whose `source` is
/// the source's name.
pub fn normalize(anchor: AnchorMatch, source: &Source, join: UrlJoin) -> Article {
    let url = match join {
        UrlJoin::Concat => concat(&source.base_url, &anchor.href),
        UrlJoin::Resolve => resolve(&source.base_url, &anchor.href),
    };
    Article {
        title: anchor.text,
        url,
        source: source.name.clone(),
    }
}

fn concat(base_url: &str, href: &str) -> String {
    format!("{base_url}{href}")
}

// Falls back to concatenation when the base is empty or unusable.
fn resolve(base_url: &str, href: &str) -> String {
    if base_url.is_empty() {
        return href.to_string();
    }
    Url::parse(base_url)
        .and_then(|base| base.join(href))
        .map(String::from)
        .unwrap_or_else(|_| concat(base_url, href))
}
