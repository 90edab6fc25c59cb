//! Candidate URLs collected during discovery

use crate::url::normalize_url;
use serde::Serialize;
use std::collections::HashSet;
use std::fmt;

/// How a candidate URL was found
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscoverySource {
    /// Listed directly in a flat sitemap
    Sitemap,
    /// Listed in a child of a sitemap index
    SitemapIndex,
    /// Found by following links from the homepage
    HomepageCrawl,
    /// Returned by the platform listing API
    PlatformApi,
}

/// Which strategy produced the final candidate set of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscoveryStrategy {
    PlatformApi,
    Sitemap,
    HomepageCrawl,
}

impl fmt::Display for DiscoveryStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::PlatformApi => "platform_api",
            Self::Sitemap => "sitemap",
            Self::HomepageCrawl => "homepage_crawl",
        };
        write!(f, "{}", name)
    }
}

/// A URL that may point to an article
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateUrl {
    pub url: String,
    pub discovered_via: DiscoverySource,
}

/// Insertion-ordered set of candidates, unique by normalized URL
///
/// Two URLs that differ only in query string or fragment are the same
/// candidate; the first one inserted wins.
#[derive(Debug, Default)]
pub struct CandidateSet {
    seen: HashSet<String>,
    items: Vec<CandidateUrl>,
}

impl CandidateSet {
    /// Creates an empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a candidate
    ///
    /// Returns false if the URL cannot be normalized or is already present.
    pub fn insert(&mut self, url: &str, via: DiscoverySource) -> bool {
        let key = match normalize_url(url) {
            Ok(normalized) => normalized.to_string(),
            Err(e) => {
                tracing::trace!("Ignoring candidate {}: {}", url, e);
                return false;
            }
        };

        if !self.seen.insert(key) {
            return false;
        }

        self.items.push(CandidateUrl {
            url: url.trim().to_string(),
            discovered_via: via,
        });
        true
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CandidateUrl> {
        self.items.iter()
    }

    /// Consumes the set, returning candidates in insertion order
    pub fn into_vec(self) -> Vec<CandidateUrl> {
        self.items
    }
}
