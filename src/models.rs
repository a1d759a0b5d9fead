//! Data models shared by the scraping pipeline and the HTTP API.
//!
//! - [`Source`]: a configured news site
//! - [`RawDocument`]: the body of one fetched page
//! - [`AnchorMatch`]: one anchor that passed the keyword filter
//! - [`Article`]: the uniform record returned to API clients

use serde::{Deserialize, Serialize};

/// A news site that can be scraped.
///
/// Sources are loaded once at startup and never mutated afterwards.
///
/// # Fields
///
/// * `name` - Unique identifier, used as the `{id}` in `/news/{id}`
/// * `address` - The page that gets fetched
/// * `base_url` - Prefix for relative links; may be empty
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Source {
    /// Unique identifier of the site.
    pub name: String,
    /// Address of the page to fetch.
    pub address: String,
    /// Prefix joined onto every extracted `href`.
    #[serde(default)]
    pub base_url: String,
}

impl Source {
    pub fn new(
        name: impl Into<String>,
        address: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            address: address.into(),
            base_url: base_url.into(),
        }
    }
}

/// A fetched page, before parsing.
#[derive(Debug, Clone, Default)]
pub struct RawDocument {
    /// Decoded response body.
    pub body: String,
    /// The `Content-Type` header, if the server sent one.
    pub content_type: Option<String>,
}

impl RawDocument {
    /// A document with no declared content type; it is treated as HTML.
    pub fn html(body: impl Into<String>) -> Self {
        Self {
            body: body.into(),
            content_type: None,
        }
    }
}

/// An anchor element whose visible text contained the keyword.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnchorMatch {
    /// Trimmed visible text of the anchor.
    pub text: String,
    /// The raw `href` attribute, or `""` when absent.
    pub href: String,
}

/// A matched link, as served by the API.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Article {
    pub title: String,
    pub url: String,
    /// Name of the [`Source`] this article was scraped from.
    pub source: String,
}
