//! Candidate URL filter
//!
//! Drops URLs that are not articles: taxonomy and pagination pages, feeds,
//! static assets, and aliases of the index page.

use crate::config::FilterConfig;
use url::Url;

/// Filter applied to every discovered URL, whatever the discovery strategy
#[derive(Debug, Clone)]
pub struct UrlFilter {
    skip_patterns: Vec<String>,
    index_aliases: Vec<String>,
}

impl UrlFilter {
    /// Builds a filter from configuration
    pub fn new(config: &FilterConfig) -> Self {
        Self {
            skip_patterns: config
                .skip_patterns
                .iter()
                .map(|p| p.to_lowercase())
                .collect(),
            index_aliases: config.index_aliases.clone(),
        }
    }

    /// Returns true if the URL contains any skip pattern (case-insensitive)
    pub fn is_skipped(&self, url: &str) -> bool {
        let lower = url.to_lowercase();
        self.skip_patterns.iter().any(|p| lower.contains(p.as_str()))
    }

    /// Returns true if the URL's path is an alias of the index page
    pub fn is_index_alias(&self, url: &Url) -> bool {
        let path = url.path();
        self.index_aliases.iter().any(|alias| alias == path)
    }

    /// Returns true if the URL may point to an article
    pub fn accepts(&self, url: &Url) -> bool {
        !self.is_skipped(url.as_str()) && !self.is_index_alias(url)
    }
}

impl Default for UrlFilter {
    fn default() -> Self {
        Self::new(&FilterConfig::default())
    }
}
