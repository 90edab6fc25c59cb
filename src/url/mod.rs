//! URL handling module for Blogdex-Crawl
//!
//! This module provides URL normalization, domain extraction, wildcard host
//! matching, and the candidate filter shared by every discovery strategy.

mod domain;
mod filter;
mod matcher;
mod normalize;

// Re-export main functions
pub use domain::{extract_domain, is_same_site, site_key};
pub use filter::UrlFilter;
pub use matcher::matches_wildcard;
pub use normalize::{normalize_url, strip_query_and_fragment};

/// Checks a host against a list of host patterns
///
/// Each pattern is either an exact host or a `*.`-prefixed wildcard (see
/// [`matches_wildcard`]). The host is lowercased before matching.
///
/// # Examples
///
/// ```
/// use blogdex_crawl::url::matches_any_host;
///
/// let hosts = vec!["blog.naver.com".to_string(), "*.tistory.com".to_string()];
/// assert!(matches_any_host("blog.naver.com", &hosts));
/// assert!(matches_any_host("someone.tistory.com", &hosts));
/// assert!(!matches_any_host("example.com", &hosts));
/// ```
pub fn matches_any_host(host: &str, patterns: &[String]) -> bool {
    let host = host.to_lowercase();
    patterns
        .iter()
        .any(|pattern| matches_wildcard(&pattern.to_lowercase(), &host))
}
