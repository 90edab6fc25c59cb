//! Crawl target: the immutable input of one discovery run

use crate::config::PlatformConfig;
use crate::url::{extract_domain, matches_any_host};
use crate::HarvestError;
use serde::Serialize;
use url::Url;

/// Which discovery path a target is expected to take
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PlatformHint {
    /// Any site; sitemap first, then homepage crawl
    Generic,
    /// A Naver Blog; paginated listing API
    NaverBlog,
}

/// The site to harvest and how many titles to return
#[derive(Debug, Clone)]
pub struct CrawlTarget {
    base_url: Url,
    max_items: usize,
    platform_hint: PlatformHint,
}

impl CrawlTarget {
    /// Parses a user-supplied URL into a target
    ///
    /// `https://` is prepended when the input has no scheme. The platform hint
    /// is chosen by matching the host against `platform.hosts`.
    pub fn new(raw: &str, max_items: usize, platform: &PlatformConfig) -> Result<Self, HarvestError> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(HarvestError::InvalidTarget("empty URL".to_string()));
        }
        if max_items == 0 {
            return Err(HarvestError::InvalidTarget(
                "max items must be at least 1".to_string(),
            ));
        }

        let with_scheme = if has_scheme(raw) {
            raw.to_string()
        } else {
            format!("https://{}", raw)
        };

        let base_url = Url::parse(&with_scheme)
            .map_err(|e| HarvestError::InvalidTarget(format!("{}: {}", raw, e)))?;

        if base_url.scheme() != "http" && base_url.scheme() != "https" {
            return Err(HarvestError::InvalidTarget(format!(
                "unsupported scheme '{}'",
                base_url.scheme()
            )));
        }

        let host = extract_domain(&base_url)
            .filter(|h| !h.is_empty())
            .ok_or_else(|| HarvestError::InvalidTarget(format!("{}: missing host", raw)))?;

        let platform_hint = if matches_any_host(&host, &platform.hosts) {
            PlatformHint::NaverBlog
        } else {
            PlatformHint::Generic
        };

        Ok(Self {
            base_url,
            max_items,
            platform_hint,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn max_items(&self) -> usize {
        self.max_items
    }

    pub fn platform_hint(&self) -> PlatformHint {
        self.platform_hint
    }

    /// Lowercased host of the target
    pub fn host(&self) -> String {
        extract_domain(&self.base_url).unwrap_or_default()
    }

    /// Base URL without query, fragment, or trailing slash
    ///
    /// Sitemap probe paths are appended to this.
    pub fn root(&self) -> String {
        let mut root = self.base_url.clone();
        root.set_query(None);
        root.set_fragment(None);
        root.as_str().trim_end_matches('/').to_string()
    }
}

/// Returns true if the input starts with `scheme://`
///
/// A `://` later in the path or query (`example.com/?next=https://x.org`)
/// does not count.
fn has_scheme(raw: &str) -> bool {
    let Some((scheme, _)) = raw.split_once("://") else {
        return false;
    };
    let mut chars = scheme.chars();
    chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}
