use serde::{Deserialize, Serialize};

/// Main configuration structure for Blogdex-Crawl
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent", default)]
    pub user_agent: UserAgentConfig,
    #[serde(default)]
    pub sitemap: SitemapConfig,
    #[serde(default)]
    pub filter: FilterConfig,
    #[serde(default)]
    pub title: TitleConfig,
    #[serde(default)]
    pub platform: PlatformConfig,
}

/// Batching, timeouts and crawl bounds
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// Number of fetches issued concurrently per batch
    #[serde(rename = "batch-width")]
    pub batch_width: usize,

    /// Pause between batches (milliseconds)
    #[serde(rename = "batch-delay-ms")]
    pub batch_delay_ms: u64,

    /// Per-request timeout for generic fetches (seconds)
    #[serde(rename = "fetch-timeout-secs")]
    pub fetch_timeout_secs: u64,

    /// Maximum redirects followed per request
    #[serde(rename = "max-redirects")]
    pub max_redirects: usize,

    /// Number of levels explored by the homepage crawl
    #[serde(rename = "crawl-depth")]
    pub crawl_depth: u32,

    /// Maximum pages expanded per homepage crawl level
    #[serde(rename = "frontier-cap")]
    pub frontier_cap: usize,

    /// Candidates attempted for extraction, as a multiple of max items
    #[serde(rename = "candidate-multiplier")]
    pub candidate_multiplier: usize,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            batch_width: 10,
            batch_delay_ms: 100,
            fetch_timeout_secs: 15,
            max_redirects: 5,
            crawl_depth: 2,
            frontier_cap: 100,
            candidate_multiplier: 2,
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url", skip_serializing_if = "Option::is_none")]
    pub contact_url: Option<String>,

    /// Email address for crawler-related contact
    #[serde(rename = "contact-email", skip_serializing_if = "Option::is_none")]
    pub contact_email: Option<String>,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: "BlogdexCrawl".to_string(),
            crawler_version: env!("CARGO_PKG_VERSION").to_string(),
            contact_url: None,
            contact_email: None,
        }
    }
}

impl UserAgentConfig {
    /// Formats the user agent header value
    ///
    /// `Name/Version`, followed by `(+url; email)` when contact details are set.
    pub fn header_value(&self) -> String {
        let base = format!("{}/{}", self.crawler_name, self.crawler_version);
        match (&self.contact_url, &self.contact_email) {
            (Some(url), Some(email)) => format!("{} (+{}; {})", base, url, email),
            (Some(url), None) => format!("{} (+{})", base, url),
            (None, Some(email)) => format!("{} ({})", base, email),
            (None, None) => base,
        }
    }
}

/// Sitemap probing configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SitemapConfig {
    /// Well-known sitemap paths, probed in order
    pub paths: Vec<String>,

    /// Child sitemaps containing any of these tokens are preferred
    #[serde(rename = "preferred-tokens")]
    pub preferred_tokens: Vec<String>,

    /// Child sitemaps containing any of these tokens are skipped when no
    /// preferred child exists
    #[serde(rename = "excluded-tokens")]
    pub excluded_tokens: Vec<String>,

    /// How many nested sitemap indexes are followed
    #[serde(rename = "max-index-depth")]
    pub max_index_depth: u32,

    /// Number of leading bytes searched for the XML declaration
    #[serde(rename = "declaration-window")]
    pub declaration_window: usize,
}

impl Default for SitemapConfig {
    fn default() -> Self {
        Self {
            paths: to_strings(&[
                "/sitemap.xml",
                "/wp-sitemap.xml",
                "/sitemap_index.xml",
                "/post-sitemap.xml",
                "/sitemap-posts.xml",
            ]),
            preferred_tokens: to_strings(&["post", "entry", "article", "blog"]),
            excluded_tokens: to_strings(&["category", "tag", "author", "page"]),
            max_index_depth: 2,
            declaration_window: 100,
        }
    }
}

/// Candidate URL filtering rules shared by every discovery strategy
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct FilterConfig {
    /// Substrings that mark a URL as non-content (matched case-insensitively)
    #[serde(rename = "skip-patterns")]
    pub skip_patterns: Vec<String>,

    /// Paths that are aliases of the index page
    #[serde(rename = "index-aliases")]
    pub index_aliases: Vec<String>,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            skip_patterns: to_strings(&[
                "/category/",
                "/tag/",
                "/author/",
                "/page/",
                "/feed",
                "/rss",
                "/wp-json/",
                "/wp-content/",
                "/search/",
                "/archive/",
                "/attachment/",
                ".jpg",
                ".png",
                ".gif",
                ".pdf",
                ".css",
                ".js",
            ]),
            index_aliases: to_strings(&["", "/", "/index.html", "/index.php"]),
        }
    }
}

/// Title cleaning configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TitleConfig {
    /// Separators between an article title and the site name
    pub separators: Vec<String>,

    /// Titles shorter than this (in characters) are dropped
    #[serde(rename = "min-length")]
    pub min_length: usize,
}

impl Default for TitleConfig {
    fn default() -> Self {
        Self {
            separators: to_strings(&[" - ", " | ", " :: ", " : ", " >> "]),
            min_length: 3,
        }
    }
}

/// Naver Blog listing API configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PlatformConfig {
    /// Host patterns (e.g. "blog.naver.com" or "*.example.com") that select
    /// the platform crawler
    pub hosts: Vec<String>,

    /// Base URL of the listing endpoint and post URLs
    #[serde(rename = "api-base")]
    pub api_base: String,

    /// Entries requested per listing page
    #[serde(rename = "page-size")]
    pub page_size: u32,

    /// Hard ceiling on listing pages fetched
    #[serde(rename = "max-pages")]
    pub max_pages: u32,

    /// Pause between listing pages (milliseconds)
    #[serde(rename = "page-delay-ms")]
    pub page_delay_ms: u64,

    /// Per-request timeout for listing pages (seconds)
    #[serde(rename = "fetch-timeout-secs")]
    pub fetch_timeout_secs: u64,
}

impl Default for PlatformConfig {
    fn default() -> Self {
        Self {
            hosts: to_strings(&["blog.naver.com", "m.blog.naver.com"]),
            api_base: "https://blog.naver.com".to_string(),
            page_size: 30,
            max_pages: 100,
            page_delay_ms: 300,
            fetch_timeout_secs: 20,
        }
    }
}

fn to_strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}
