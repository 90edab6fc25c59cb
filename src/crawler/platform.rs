//! Naver Blog listing crawler
//!
//! Naver blogs publish a paginated title listing that is almost, but not
//! quite, JSON: titles are percent-encoded and HTML-escaped, and the payload
//! carries backslash escapes JSON does not allow. This module handles:
//! - Building listing and post URLs for a blog id
//! - Sanitizing and parsing listing payloads
//! - Walking the listing page by page, politely and sequentially

use crate::config::PlatformConfig;
use crate::crawler::extractor::decode_entities;
use crate::crawler::fetcher::Fetcher;
use crate::crawler::scheduler::CancelFlag;
use crate::output::ExtractedTitle;
use serde::Deserialize;
use std::collections::HashSet;
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// A listing payload that could not be parsed
#[derive(Debug, Error)]
pub enum PayloadError {
    #[error("Listing payload is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// A JSON value the listing sends either quoted or bare
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Text(String),
    Number(serde_json::Number),
}

impl Scalar {
    /// The value as trimmed text
    pub fn into_text(self) -> String {
        match self {
            Self::Text(s) => s.trim().to_string(),
            Self::Number(n) => n.to_string(),
        }
    }

    /// The value as a non-negative count, if it is one
    pub fn as_count(&self) -> Option<u64> {
        match self {
            Self::Text(s) => s.trim().parse().ok(),
            Self::Number(n) => n.as_u64(),
        }
    }
}

/// One page of the title listing
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingPage {
    #[serde(default)]
    pub post_list: Option<Vec<ListingEntry>>,

    #[serde(default)]
    pub total_count: Option<Scalar>,
}

/// One post in a listing page
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingEntry {
    #[serde(default)]
    pub log_no: Option<Scalar>,

    /// Percent-encoded, HTML-escaped title
    #[serde(default)]
    pub title: Option<String>,

    #[serde(default)]
    pub add_date: Option<Scalar>,
}

/// What a platform crawl produced
#[derive(Debug, Clone)]
pub struct PlatformHarvest {
    pub blog_id: String,

    /// Platform-reported post count, or the number of titles when the
    /// platform did not report one
    pub total_count: u64,

    pub titles: Vec<ExtractedTitle>,

    pub pages_fetched: u32,
}

/// Makes a listing payload parseable as JSON
///
/// `\'` becomes `'`, and any backslash that does not start a valid JSON
/// escape (`\" \\ \/ \b \f \n \r \t \u`) is dropped. An escaped backslash is
/// kept as a pair.
///
/// # Example
///
/// ```
/// use blogdex_crawl::crawler::sanitize_payload;
///
/// assert_eq!(sanitize_payload(r#"{"title":"It\'s \q"}"#), r#"{"title":"It's q"}"#);
/// ```
pub fn sanitize_payload(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }

        match chars.peek().copied() {
            Some('\\') => {
                out.push_str("\\\\");
                chars.next();
            }
            Some('\'') => {
                out.push('\'');
                chars.next();
            }
            Some('"' | '/' | 'b' | 'f' | 'n' | 'r' | 't' | 'u') => out.push('\\'),
            _ => {}
        }
    }

    out
}

/// Parses a listing payload after sanitizing it
pub fn parse_listing(raw: &str) -> Result<ListingPage, PayloadError> {
    Ok(serde_json::from_str(&sanitize_payload(raw))?)
}

/// Decodes a listing title
///
/// `+` is read as a space, percent escapes are decoded (invalid UTF-8 is
/// replaced, not rejected), then the fixed entity set is un-escaped and the
/// result trimmed.
pub fn decode_title(encoded: &str) -> String {
    let spaced = encoded.replace('+', " ");
    let bytes = urlencoding::decode_binary(spaced.as_bytes());
    let text = String::from_utf8_lossy(&bytes);
    decode_entities(&text).trim().to_string()
}

/// Extracts the blog id from a blog URL
///
/// The id is the first path segment (`/someone/223...`), or the `blogId`
/// query parameter for page-style URLs such as `/PostList.naver?blogId=someone`.
pub fn extract_blog_id(url: &Url) -> Option<String> {
    let first = url
        .path_segments()
        .and_then(|mut segments| segments.next())
        .filter(|segment| !segment.is_empty());

    match first {
        Some(segment) if !segment.to_lowercase().ends_with(".naver") => Some(segment.to_string()),
        _ => url
            .query_pairs()
            .find(|(key, _)| key.eq_ignore_ascii_case("blogId"))
            .map(|(_, value)| value.trim().to_string())
            .filter(|value| !value.is_empty()),
    }
}

/// Sequential crawler for the listing API
#[derive(Debug, Clone)]
pub struct PlatformCrawler {
    fetcher: Fetcher,
    config: PlatformConfig,
    min_title_length: usize,
    cancel: CancelFlag,
}

impl PlatformCrawler {
    /// Creates a crawler
    ///
    /// The given fetcher's client is reused with the platform timeout.
    pub fn new(
        fetcher: &Fetcher,
        config: &PlatformConfig,
        min_title_length: usize,
        cancel: CancelFlag,
    ) -> Self {
        Self {
            fetcher: fetcher.with_timeout(Duration::from_secs(config.fetch_timeout_secs)),
            config: config.clone(),
            min_title_length,
            cancel,
        }
    }

    fn api_base(&self) -> &str {
        self.config.api_base.trim_end_matches('/')
    }

    /// URL of one listing page
    pub fn listing_url(&self, blog_id: &str, page: u32, page_size: u32) -> String {
        format!(
            "{}/PostTitleListAsync.naver?blogId={}&currentPage={}&countPerPage={}",
            self.api_base(),
            urlencoding::encode(blog_id),
            page,
            page_size
        )
    }

    /// Public URL of one post
    pub fn post_url(&self, blog_id: &str, log_no: &str) -> String {
        format!("{}/{}/{}", self.api_base(), blog_id, log_no)
    }

    /// Front page of a blog; also sent as the listing `Referer`
    pub fn blog_url(&self, blog_id: &str) -> String {
        format!("{}/{}", self.api_base(), blog_id)
    }

    /// Fetches and parses one listing page
    ///
    /// Returns `None` on any fetch or parse failure; the caller stops there.
    async fn fetch_page(&self, blog_id: &str, page: u32, page_size: u32) -> Option<ListingPage> {
        let url = self.listing_url(blog_id, page, page_size);
        let referer = self.blog_url(blog_id);

        let body = match self.fetcher.fetch_with_referer(&url, Some(&referer)).await {
            Ok(body) => body,
            Err(e) => {
                tracing::info!("Listing page {} unavailable: {}", page, e);
                return None;
            }
        };

        match parse_listing(&body) {
            Ok(listing) => Some(listing),
            Err(e) => {
                tracing::warn!("Listing page {} for {} unparseable: {}", page, blog_id, e);
                None
            }
        }
    }

    /// Reads the platform-reported post total from a one-entry page
    pub async fn fetch_total_count(&self, blog_id: &str) -> Option<u64> {
        self.fetch_page(blog_id, 1, 1)
            .await?
            .total_count
            .and_then(|count| count.as_count())
    }

    /// Walks the listing until `max_items` titles, an empty page, a failure,
    /// the page ceiling, or cancellation
    pub async fn crawl(&self, blog_id: &str, max_items: usize) -> PlatformHarvest {
        let reported_total = self.fetch_total_count(blog_id).await;
        match reported_total {
            Some(total) => tracing::info!("Blog {} reports {} post(s)", blog_id, total),
            None => tracing::info!("Blog {} did not report a post total", blog_id),
        }

        let mut titles: Vec<ExtractedTitle> = Vec::new();
        let mut seen: HashSet<String> = HashSet::new();
        let mut pages_fetched = 0u32;
        let page_delay = Duration::from_millis(self.config.page_delay_ms);

        for page in 1..=self.config.max_pages {
            if titles.len() >= max_items {
                break;
            }
            if self.cancel.is_cancelled() {
                tracing::info!("Listing crawl cancelled after {} page(s)", pages_fetched);
                break;
            }
            if page > 1 && !page_delay.is_zero() {
                tokio::time::sleep(page_delay).await;
            }

            let Some(listing) = self.fetch_page(blog_id, page, self.config.page_size).await else {
                break;
            };
            pages_fetched += 1;

            let entries = listing.post_list.unwrap_or_default();
            if entries.is_empty() {
                tracing::debug!("Listing page {} is empty, stopping", page);
                break;
            }

            for entry in entries {
                if titles.len() >= max_items {
                    break;
                }

                let Some(log_no) = entry
                    .log_no
                    .map(Scalar::into_text)
                    .filter(|log_no| !log_no.is_empty())
                else {
                    continue;
                };

                let title = decode_title(entry.title.as_deref().unwrap_or_default());
                if title.is_empty() || title.chars().count() < self.min_title_length {
                    continue;
                }
                if !seen.insert(log_no.clone()) {
                    continue;
                }

                titles.push(ExtractedTitle {
                    sequence: titles.len() + 1,
                    title,
                    url: self.post_url(blog_id, &log_no),
                    published: entry
                        .add_date
                        .map(Scalar::into_text)
                        .filter(|date| !date.is_empty()),
                });
            }

            tracing::debug!("Listing page {}: {} title(s) so far", page, titles.len());
        }

        tracing::info!(
            "Listing crawl for {} collected {} title(s) from {} page(s)",
            blog_id,
            titles.len(),
            pages_fetched
        );

        PlatformHarvest {
            blog_id: blog_id.to_string(),
            total_count: reported_total.unwrap_or(titles.len() as u64),
            titles,
            pages_fetched,
        }
    }
}
