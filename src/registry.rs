//! The set of news sites the service knows how to scrape.
//!
//! A [`SourceRegistry`] is built once at startup, either from the built-in
//! list or from a YAML file, and handed to the aggregator behind an `Arc`.
//! Names must be unique: `/news/{id}` resolves a source by name, so a
//! duplicate would be unreachable.
//!
//! # File Format
//!
//! ```yaml
//! - name: nyp
//!   address: https://nypost.com/business/
//! - name: nytimes
//!   address: https://www.nytimes.com/section/business
//!   base_url: https://www.nytimes.com
//! ```

use crate::models::Source;
use itertools::Itertools;
use std::io;
use std::path::Path;
use tracing::{info, instrument};

/// Why a registry could not be built.
#[derive(thiserror::Error, Debug)]
pub enum RegistryError {
    /// Two sources share a name.
    #[error("duplicate source name: {0}")]
    DuplicateName(String),

    /// The source list is empty.
    #[error("no sources configured")]
    Empty,

    /// The sources file could not be read.
    #[error("failed to read sources file: {0}")]
    Io(#[from] io::Error),

    /// The sources file is not a valid YAML source list.
    #[error("invalid sources file: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Immutable, ordered collection of [`Source`]s with unique names.
#[derive(Debug, Clone)]
pub struct SourceRegistry {
    sources: Vec<Source>,
}

impl SourceRegistry {
    /// Build a registry from an ordered list of sources.
    ///
    /// # Arguments
    ///
    /// * `sources` - The sites to scrape, in the order `/news` reports them
    ///
    /// # Returns
    ///
    /// The registry, or [`RegistryError::Empty`] / [`RegistryError::DuplicateName`]
    /// (naming the first repeated name).
    pub fn new(sources: Vec<Source>) -> Result<Self, RegistryError> {
        if sources.is_empty() {
            return Err(RegistryError::Empty);
        }
        if let Some(name) = sources.iter().map(|s| s.name.as_str()).duplicates().next() {
            return Err(RegistryError::DuplicateName(name.to_string()));
        }
        Ok(Self { sources })
    }

    /// The sites served when no sources file is given.
    pub fn builtin() -> Self {
        Self {
            sources: vec![
                Source::new("nyp", "https://nypost.com/business/", ""),
                Source::new(
                    "fintimes",
                    "https://www.ft.com/",
                    "https://www.ft.com",
                ),
                Source::new(
                    "nytimes",
                    "https://www.nytimes.com/section/business",
                    "https://www.nytimes.com",
                ),
                Source::new(
                    "yahooFinance",
                    "https://finance.yahoo.com/",
                    "https://finance.yahoo.com",
                ),
                Source::new("cnbc", "https://www.cnbc.com/finance/", ""),
            ],
        }
    }

    /// Parse a registry from YAML text (see the module docs for the format).
    pub fn from_yaml_str(yaml: &str) -> Result<Self, RegistryError> {
        let sources: Vec<Source> = serde_yaml::from_str(yaml)?;
        Self::new(sources)
    }

    /// Load a registry from a YAML sources file.
    ///
    /// # Arguments
    ///
    /// * `path` - Location of the sources file
    ///
    /// # Returns
    ///
    /// The registry, or an error if the file is unreadable, malformed,
    /// empty, or repeats a name.
    #[instrument(level = "info", skip_all, fields(path = %path.as_ref().display()))]
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, RegistryError> {
        let yaml = tokio::fs::read_to_string(path.as_ref()).await?;
        let registry = Self::from_yaml_str(&yaml)?;
        info!(count = registry.len(), "Loaded sources file");
        Ok(registry)
    }

    /// All sources, in configuration order.
    pub fn list(&self) -> &[Source] {
        &self.sources
    }

    /// Find a source by name.
    pub fn find(&self, id: &str) -> Option<&Source> {
        self.sources.iter().find(|s| s.name == id)
    }

    /// Number of sources.
    pub fn len(&self) -> usize {
        self.sources.len()
    }

    /// Always `false` for a registry built through [`SourceRegistry::new`].
    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}
