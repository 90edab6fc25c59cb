//! Sitemap discovery
//!
//! This module handles:
//! - Probing well-known sitemap locations until one answers with XML
//! - Recursive resolution of sitemap indexes, preferring post-like children
//! - Flattening every `<loc>` into a filtered, de-duplicated candidate list
//!
//! Probe and child-fetch failures are swallowed; a site without a usable
//! sitemap simply yields no candidates.

use crate::config::SitemapConfig;
use crate::crawler::candidates::{CandidateSet, CandidateUrl, DiscoverySource};
use crate::crawler::extractor::decode_entities;
use crate::crawler::fetcher::Fetcher;
use crate::crawler::target::CrawlTarget;
use crate::url::{is_same_site, UrlFilter};
use futures::future::{BoxFuture, FutureExt};
use regex::Regex;
use std::sync::LazyLock;
use url::Url;

static LOC: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)<loc>\s*(?:<!\[CDATA\[)?\s*([^<\]]+?)\s*(?:\]\]>)?\s*</loc>")
        .expect("valid loc regex")
});

/// A fetched sitemap document and whatever it resolved to
///
/// Lives only for the duration of one [`SitemapResolver::resolve`] call.
#[derive(Debug)]
struct SitemapNode {
    url: String,
    is_index: bool,
    children: Vec<SitemapNode>,
    locs: Vec<String>,
}

impl SitemapNode {
    /// Appends every content location in document order, depth first
    fn flatten(self, nested: bool, out: &mut Vec<(String, DiscoverySource)>) {
        let via = if nested {
            DiscoverySource::SitemapIndex
        } else {
            DiscoverySource::Sitemap
        };
        out.extend(self.locs.into_iter().map(|loc| (loc, via)));
        for child in self.children {
            child.flatten(true, out);
        }
    }

    fn index_count(&self) -> usize {
        usize::from(self.is_index) + self.children.iter().map(Self::index_count).sum::<usize>()
    }
}

/// Returns true if `<?xml` occurs within the first `window` characters
///
/// Leading whitespace or a byte-order mark before the declaration is
/// tolerated as long as the marker still fits in the window.
pub fn has_xml_declaration(body: &str, window: usize) -> bool {
    body.chars().take(window).collect::<String>().contains("<?xml")
}

/// Returns true if the document is a sitemap index rather than a URL set
pub fn is_sitemap_index(body: &str) -> bool {
    body.contains("<sitemapindex") || body.contains("<sitemap>")
}

/// Extracts every `<loc>` value, unescaping XML entities
///
/// # Example
///
/// ```
/// use blogdex_crawl::crawler::extract_locs;
///
/// let xml = "<urlset><url><loc> https://example.com/a?x=1&amp;y=2 </loc></url></urlset>";
/// assert_eq!(extract_locs(xml), vec!["https://example.com/a?x=1&y=2"]);
/// ```
pub fn extract_locs(body: &str) -> Vec<String> {
    LOC.captures_iter(body)
        .filter_map(|caps| caps.get(1))
        .map(|m| decode_entities(&m.as_str().replace("&apos;", "'")))
        .filter(|loc| !loc.is_empty())
        .collect()
}

/// Picks which children of a sitemap index to follow
///
/// Only `.xml` locations are considered. Children whose path contains a
/// preferred token win; if there are none, every child whose path contains
/// no excluded token is taken instead. Duplicates are dropped.
pub fn select_children(locs: &[String], config: &SitemapConfig) -> Vec<String> {
    let mut children: Vec<&String> = Vec::new();
    for loc in locs {
        if loc.to_lowercase().contains(".xml") && !children.contains(&loc) {
            children.push(loc);
        }
    }

    let path_of = |loc: &str| -> String {
        Url::parse(loc)
            .map(|u| u.path().to_lowercase())
            .unwrap_or_else(|_| loc.to_lowercase())
    };
    let has_token = |loc: &str, tokens: &[String]| {
        let path = path_of(loc);
        tokens.iter().any(|t| path.contains(&t.to_lowercase()))
    };

    let preferred: Vec<String> = children
        .iter()
        .filter(|loc| has_token(loc.as_str(), &config.preferred_tokens))
        .map(|loc| loc.to_string())
        .collect();

    if !preferred.is_empty() {
        return preferred;
    }

    children
        .into_iter()
        .filter(|loc| !has_token(loc.as_str(), &config.excluded_tokens))
        .cloned()
        .collect()
}

/// Resolves a site's sitemap into candidate article URLs
#[derive(Debug, Clone)]
pub struct SitemapResolver {
    fetcher: Fetcher,
    config: SitemapConfig,
    filter: UrlFilter,
}

impl SitemapResolver {
    pub fn new(fetcher: Fetcher, config: &SitemapConfig, filter: UrlFilter) -> Self {
        Self {
            fetcher,
            config: config.clone(),
            filter,
        }
    }

    /// Finds the site's sitemap and returns its filtered content URLs
    ///
    /// The first probe path that answers with an XML document wins; the
    /// remaining paths are not tried.
    pub async fn resolve(&self, target: &CrawlTarget) -> Vec<CandidateUrl> {
        let root = target.root();

        let Some((sitemap_url, body)) = self.probe(&root).await else {
            tracing::info!("No sitemap found for {}", root);
            return Vec::new();
        };

        let tree = self.resolve_node(sitemap_url, body, 0, Vec::new()).await;
        tracing::debug!(
            "Sitemap tree at {} holds {} index document(s)",
            tree.url,
            tree.index_count()
        );

        let mut locs = Vec::new();
        tree.flatten(false, &mut locs);
        let found = locs.len();

        let mut candidates = CandidateSet::new();
        for (loc, via) in locs {
            let Ok(parsed) = Url::parse(&loc) else {
                tracing::trace!("Ignoring unparseable sitemap location {}", loc);
                continue;
            };
            if !is_same_site(target.base_url(), &parsed) || !self.filter.accepts(&parsed) {
                continue;
            }
            candidates.insert(&loc, via);
        }

        tracing::info!(
            "Sitemap yielded {} candidate(s) from {} location(s)",
            candidates.len(),
            found
        );
        candidates.into_vec()
    }

    /// Tries each configured path in order
    async fn probe(&self, root: &str) -> Option<(String, String)> {
        for path in &self.config.paths {
            let url = format!("{}{}", root, path);
            if let Some(body) = self.fetch_xml(&url).await {
                tracing::info!("Found sitemap at {}", url);
                return Some((url, body));
            }
            tracing::debug!("No sitemap at {}", url);
        }
        None
    }

    /// Fetches a URL, keeping the body only if it is an XML document
    async fn fetch_xml(&self, url: &str) -> Option<String> {
        let body = self.fetcher.fetch(url).await.ok()?;
        if has_xml_declaration(&body, self.config.declaration_window) {
            Some(body)
        } else {
            tracing::debug!("{} is not an XML document", url);
            None
        }
    }

    /// Builds the node for an already-fetched document, recursing into indexes
    ///
    /// `ancestors` holds the URLs on the path from the root, so an index that
    /// lists itself or a parent is not fetched again.
    fn resolve_node<'a>(
        &'a self,
        url: String,
        body: String,
        depth: u32,
        ancestors: Vec<String>,
    ) -> BoxFuture<'a, SitemapNode> {
        async move {
            if !is_sitemap_index(&body) {
                let locs = extract_locs(&body)
                    .into_iter()
                    .filter(|loc| !loc.to_lowercase().ends_with(".xml"))
                    .collect();
                return SitemapNode {
                    url,
                    is_index: false,
                    children: Vec::new(),
                    locs,
                };
            }

            let mut node = SitemapNode {
                url,
                is_index: true,
                children: Vec::new(),
                locs: Vec::new(),
            };

            if depth >= self.config.max_index_depth {
                tracing::debug!("Sitemap index {} is nested too deep, skipping", node.url);
                return node;
            }

            let selected = select_children(&extract_locs(&body), &self.config);
            tracing::info!(
                "Sitemap index {} lists {} child sitemap(s) to follow",
                node.url,
                selected.len()
            );

            let mut lineage = ancestors;
            lineage.push(node.url.clone());

            for child_url in selected {
                if lineage.contains(&child_url) {
                    tracing::warn!("Sitemap index cycle at {}", child_url);
                    continue;
                }
                let Some(child_body) = self.fetch_xml(&child_url).await else {
                    continue;
                };
                let child = self
                    .resolve_node(child_url, child_body, depth + 1, lineage.clone())
                    .await;
                node.children.push(child);
            }

            node
        }
        .boxed()
    }
}
