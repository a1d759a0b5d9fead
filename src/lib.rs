//! # keyword_news
//!
//! An HTTP API that scrapes a configured set of news front pages for links
//! whose anchor text contains a keyword, and serves the matches as JSON.
//!
//! ## Architecture
//!
//! Each request runs a short pipeline per source:
//! 1. **Fetching**: GET the source's address ([`fetcher`])
//! 2. **Extraction**: select anchors whose text contains the keyword ([`extractor`])
//! 3. **Normalization**: map each anchor to an [`models::Article`] ([`normalizer`])
//! 4. **Aggregation**: collect results across sources in registry order ([`aggregator`])
//!
//! The [`server`] module exposes the pipeline over axum.

pub mod aggregator;
pub mod cli;
pub mod extractor;
pub mod fetcher;
pub mod models;
pub mod normalizer;
pub mod registry;
pub mod server;
