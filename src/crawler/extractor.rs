//! Title extraction from article pages
//!
//! An ordered chain of independent matchers is tried against the raw HTML;
//! the first one that matches wins. The match is entity-decoded and then
//! cleaned of site-name suffixes and prefixes.

use crate::config::TitleConfig;
use regex::Regex;
use std::sync::LazyLock;

static OG_PROPERTY_FIRST: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)property=["']og:title["'][^>]*content=["']([^"']+)"#)
        .expect("valid og:title regex")
});

static OG_CONTENT_FIRST: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)content=["']([^"']+)["'][^>]*property=["']og:title"#)
        .expect("valid og:title regex")
});

static TITLE_ELEMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<title[^>]*>([^<]+)</title>").expect("valid title regex"));

/// One way of locating a title in a page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TitleMatcher {
    /// `<meta property="og:title" content="...">`
    OgPropertyFirst,
    /// `<meta content="..." property="og:title">`
    OgContentFirst,
    /// `<title>...</title>`
    TitleElement,
}

impl TitleMatcher {
    /// The default chain, in priority order
    pub const CHAIN: [TitleMatcher; 3] = [
        TitleMatcher::OgPropertyFirst,
        TitleMatcher::OgContentFirst,
        TitleMatcher::TitleElement,
    ];

    /// Returns the raw, trimmed capture if this matcher finds one
    pub fn find(&self, html: &str) -> Option<String> {
        let pattern: &Regex = match self {
            Self::OgPropertyFirst => &*OG_PROPERTY_FIRST,
            Self::OgContentFirst => &*OG_CONTENT_FIRST,
            Self::TitleElement => &*TITLE_ELEMENT,
        };

        pattern
            .captures(html)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().trim().to_string())
    }
}

/// Un-escapes the fixed entity set `&lt; &gt; &quot; &#39; &amp;`
///
/// `&amp;` is replaced last so `&amp;lt;` decodes to `&lt;`, not `<`.
pub fn decode_entities(text: &str) -> String {
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}

/// Strips site-name decoration from a title
///
/// For each separator present in the text, in order, the text is split on it
/// and the longest piece is kept (the first one on ties). The result is
/// trimmed.
///
/// # Examples
///
/// ```
/// use blogdex_crawl::crawler::clean_title;
///
/// let seps = vec![" - ".to_string(), " | ".to_string()];
/// assert_eq!(clean_title("Article Name - My Blog", &seps), "Article Name");
/// assert_eq!(clean_title("Deep Dive Into Tokio | Notes", &seps), "Deep Dive Into Tokio");
/// ```
pub fn clean_title(raw: &str, separators: &[String]) -> String {
    let mut title = raw.to_string();

    for separator in separators.iter().filter(|s| !s.is_empty()) {
        if !title.contains(separator.as_str()) {
            continue;
        }

        let longest = title
            .rsplit(separator.as_str())
            .max_by_key(|part| part.chars().count())
            .unwrap_or_default()
            .to_string();
        title = longest;
    }

    title.trim().to_string()
}

/// Runs the matcher chain and cleans the result
#[derive(Debug, Clone)]
pub struct TitleExtractor {
    chain: Vec<TitleMatcher>,
    separators: Vec<String>,
    min_length: usize,
}

impl TitleExtractor {
    /// Creates an extractor with the default matcher chain
    pub fn new(config: &TitleConfig) -> Self {
        Self::with_chain(config, TitleMatcher::CHAIN.to_vec())
    }

    /// Creates an extractor with a custom matcher chain
    pub fn with_chain(config: &TitleConfig, chain: Vec<TitleMatcher>) -> Self {
        Self {
            chain,
            separators: config.separators.clone(),
            min_length: config.min_length,
        }
    }

    /// Extracts a clean title from an HTML body
    ///
    /// Only the first matching matcher is used. If its cleaned result is
    /// shorter than the minimum length the page yields no title; later
    /// matchers are not consulted.
    pub fn extract(&self, html: &str) -> Option<String> {
        let raw = self.chain.iter().find_map(|matcher| matcher.find(html))?;
        let title = self.clean(&raw);

        if title.chars().count() < self.min_length {
            tracing::trace!("Dropping short title {:?}", title);
            return None;
        }
        Some(title)
    }

    /// Decodes entities and strips separators
    pub fn clean(&self, raw: &str) -> String {
        clean_title(&decode_entities(raw), &self.separators)
    }
}

impl Default for TitleExtractor {
    fn default() -> Self {
        Self::new(&TitleConfig::default())
    }
}
