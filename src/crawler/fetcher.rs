//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler, including:
//! - Building HTTP clients with proper user agent strings
//! - Per-request timeouts and bounded redirect following
//! - Folding every failure into a [`FetchError`] instead of propagating it

use crate::config::{CrawlerConfig, UserAgentConfig};
use reqwest::{header, redirect::Policy, Client};
use std::time::Duration;
use thiserror::Error;

/// Why a fetch produced no body
///
/// Fetch failures never leave the crawler: callers log them and skip the URL.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// The request did not complete within its timeout
    #[error("Request timeout for {url}")]
    Timeout { url: String },

    /// DNS, connect, TLS or transport failure
    #[error("Connection failed for {url}: {message}")]
    ConnectionFailed { url: String, message: String },

    /// The server answered with a non-2xx status
    #[error("HTTP {status} for {url}")]
    HttpStatus { url: String, status: u16 },

    /// Bad URL, redirect overflow, or undecodable body
    #[error("Malformed response from {url}: {message}")]
    Malformed { url: String, message: String },
}

impl FetchError {
    /// The URL that failed
    pub fn url(&self) -> &str {
        match self {
            Self::Timeout { url }
            | Self::ConnectionFailed { url, .. }
            | Self::HttpStatus { url, .. }
            | Self::Malformed { url, .. } => url,
        }
    }

    /// Short name of the failure kind, for logs
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Timeout { .. } => "timeout",
            Self::ConnectionFailed { .. } => "connection_failed",
            Self::HttpStatus { .. } => "http_status",
            Self::Malformed { .. } => "malformed",
        }
    }

    /// Classifies a reqwest error
    fn from_reqwest(url: &str, error: &reqwest::Error) -> Self {
        let url = url.to_string();
        if error.is_timeout() {
            Self::Timeout { url }
        } else if error.is_redirect() {
            Self::Malformed {
                url,
                message: "Too many redirects".to_string(),
            }
        } else if error.is_builder() {
            Self::Malformed {
                url,
                message: error.to_string(),
            }
        } else if error.is_decode() || error.is_body() {
            Self::Malformed {
                url,
                message: format!("Unreadable body: {}", error),
            }
        } else {
            Self::ConnectionFailed {
                url,
                message: error.to_string(),
            }
        }
    }
}

/// Builds an HTTP client with proper configuration
///
/// # Example
///
/// ```no_run
/// use blogdex_crawl::config::{CrawlerConfig, UserAgentConfig};
/// use blogdex_crawl::crawler::build_http_client;
///
/// let client = build_http_client(&UserAgentConfig::default(), &CrawlerConfig::default()).unwrap();
/// ```
pub fn build_http_client(
    user_agent: &UserAgentConfig,
    crawler: &CrawlerConfig,
) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(user_agent.header_value())
        .timeout(Duration::from_secs(crawler.fetch_timeout_secs))
        .connect_timeout(Duration::from_secs(10))
        .redirect(Policy::limited(crawler.max_redirects))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Stateless GET wrapper around a shared HTTP client
///
/// Cloning is cheap; the underlying connection pool is shared.
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
    timeout: Duration,
}

impl Fetcher {
    /// Creates a fetcher from an existing client
    pub fn new(client: Client, timeout: Duration) -> Self {
        Self { client, timeout }
    }

    /// Builds a client from configuration and wraps it
    pub fn from_config(
        user_agent: &UserAgentConfig,
        crawler: &CrawlerConfig,
    ) -> Result<Self, reqwest::Error> {
        let client = build_http_client(user_agent, crawler)?;
        Ok(Self::new(
            client,
            Duration::from_secs(crawler.fetch_timeout_secs),
        ))
    }

    /// Returns a fetcher sharing this client but using a different timeout
    pub fn with_timeout(&self, timeout: Duration) -> Self {
        Self {
            client: self.client.clone(),
            timeout,
        }
    }

    /// The per-request timeout applied by this fetcher
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Fetches a URL and returns its body as text
    ///
    /// | Condition | Result |
    /// |-----------|--------|
    /// | 2xx | `Ok(body)` |
    /// | non-2xx | `HttpStatus` |
    /// | timeout (request or body) | `Timeout` |
    /// | DNS / connect / TLS | `ConnectionFailed` |
    /// | bad URL, redirect overflow, unreadable body | `Malformed` |
    pub async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        self.fetch_with_referer(url, None).await
    }

    /// Fetches a URL, optionally sending a `Referer` header
    pub async fn fetch_with_referer(
        &self,
        url: &str,
        referer: Option<&str>,
    ) -> Result<String, FetchError> {
        let mut request = self.client.get(url).timeout(self.timeout);
        if let Some(referer) = referer {
            request = request.header(header::REFERER, referer);
        }

        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => {
                let error = FetchError::from_reqwest(url, &e);
                tracing::debug!("Fetch failed ({}): {}", error.kind(), error);
                return Err(error);
            }
        };

        let status = response.status();
        if !status.is_success() {
            let error = FetchError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            };
            tracing::debug!("Fetch failed ({}): {}", error.kind(), error);
            return Err(error);
        }

        response.text().await.map_err(|e| {
            let error = FetchError::from_reqwest(url, &e);
            tracing::debug!("Body read failed ({}): {}", error.kind(), error);
            error
        })
    }
}
