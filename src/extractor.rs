//! Anchor extraction from fetched HTML.
//!
//! An element is selected when it matches the configured CSS selector
//! (`a` by default) and its full descendant text contains the keyword.
//! Matching is a case-sensitive substring test on the untrimmed text. The
//! reported text is trimmed.
//!
//! # Content Types
//!
//! Bodies are parsed as HTML unless the server declared a type that cannot
//! carry markup (images, media, fonts, JSON, PDF, archives, scripts,
//! stylesheets). A missing, empty or unrecognised `Content-Type` is parsed
//! like `text/html`, as are `text/plain` and `application/octet-stream`.

use crate::models::{AnchorMatch, RawDocument};
use scraper::{Html, Selector};
use tracing::{debug, instrument};

pub const DEFAULT_SELECTOR: &str = "a";

const NON_MARKUP_TOP_LEVEL: &[&str] = &["image", "audio", "video", "font", "model"];

const NON_MARKUP_TYPES: &[&str] = &[
    "application/json",
    "application/pdf",
    "application/zip",
    "application/gzip",
    "application/javascript",
    "text/javascript",
    "text/css",
];

/// Errors raised while turning a fetched body into anchor matches.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// The response declared a content type that cannot contain HTML.
    #[error("document is not HTML (content type {0})")]
    NotHtml(String),

    /// The configured anchor selector is not valid CSS.
    #[error("invalid selector {selector:?}: {reason}")]
    Selector { selector: String, reason: String },
}

/// Selects keyword-bearing anchors from HTML documents.
///
/// The selector is compiled once, in [`Extractor::new`].
#[derive(Debug, Clone)]
pub struct Extractor {
    source: String,
    selector: Selector,
}

impl Extractor {
    /// Compile an extractor for a CSS selector.
    ///
    /// # Arguments
    ///
    /// * `selector` - CSS selector for candidate anchors, e.g. `"a"` or `"h2 > a"`
    ///
    /// # Returns
    ///
    /// The extractor, or [`ParseError::Selector`] if `selector` is not valid CSS.
    pub fn new(selector: impl Into<String>) -> Result<Self, ParseError> {
        let source = selector.into();
        let selector = Selector::parse(&source).map_err(|e| ParseError::Selector {
            selector: source.clone(),
            reason: e.to_string(),
        })?;
        Ok(Self { source, selector })
    }

    /// The selector text this extractor was built from.
    pub fn selector(&self) -> &str {
        &self.source
    }

    /// Select every anchor whose visible text contains `keyword`.
    ///
    /// # Arguments
    ///
    /// * `doc` - The fetched page
    /// * `keyword` - Case-sensitive substring the anchor text must contain
    ///
    /// # Returns
    ///
    /// Matches in document order, each with trimmed text and its `href`
    /// (`""` when absent). Returns [`ParseError::NotHtml`] without partial
    /// results when the declared content type cannot be markup.
    #[instrument(level = "debug", skip_all, fields(%keyword, bytes = doc.body.len()))]
    pub fn extract(&self, doc: &RawDocument, keyword: &str) -> Result<Vec<AnchorMatch>, ParseError> {
        if let Some(content_type) = &doc.content_type {
            if is_non_markup(content_type) {
                return Err(ParseError::NotHtml(content_type.clone()));
            }
        }

        let document = Html::parse_document(&doc.body);

        let matches: Vec<AnchorMatch> = document
            .select(&self.selector)
            .filter_map(|element| {
                let text = element.text().collect::<String>();
                if !text.contains(keyword) {
                    return None;
                }
                Some(AnchorMatch {
                    text: text.trim().to_string(),
                    href: element.value().attr("href").unwrap_or_default().to_string(),
                })
            })
            .collect();

        debug!(count = matches.len(), "Extracted anchors");
        Ok(matches)
    }
}

impl Default for Extractor {
    fn default() -> Self {
        Self::new(DEFAULT_SELECTOR).expect("default selector is valid CSS")
    }
}

fn is_non_markup(content_type: &str) -> bool {
    let essence = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    let top_level = essence.split('/').next().unwrap_or_default();
    NON_MARKUP_TOP_LEVEL.contains(&top_level) || NON_MARKUP_TYPES.contains(&essence.as_str())
}
