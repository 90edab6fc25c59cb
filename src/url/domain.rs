use url::Url;

/// Extracts the domain from a URL
///
/// This function retrieves the host portion of a URL and converts it to lowercase.
/// If the URL has no host, it returns None.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use blogdex_crawl::url::extract_domain;
///
/// let url = Url::parse("https://example.com/path").unwrap();
/// assert_eq!(extract_domain(&url), Some("example.com".to_string()));
///
/// let url = Url::parse("https://EXAMPLE.COM/path").unwrap();
/// assert_eq!(extract_domain(&url), Some("example.com".to_string()));
/// ```
pub fn extract_domain(url: &Url) -> Option<String> {
    url.host_str().map(|h| h.to_lowercase())
}

/// Returns the comparison key for a host: lowercase, without a leading `www.`
pub fn site_key(host: &str) -> String {
    let host = host.to_lowercase();
    match host.strip_prefix("www.") {
        Some(rest) => rest.to_string(),
        None => host,
    }
}

/// Checks whether two URLs belong to the same site
///
/// Hosts are compared case-insensitively with `www.` treated as equivalent to
/// the bare domain. Ports are ignored.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use blogdex_crawl::url::is_same_site;
///
/// let base = Url::parse("https://example.com/").unwrap();
/// assert!(is_same_site(&base, &Url::parse("https://www.example.com/post").unwrap()));
/// assert!(!is_same_site(&base, &Url::parse("https://other.com/post").unwrap()));
/// ```
pub fn is_same_site(a: &Url, b: &Url) -> bool {
    match (a.host_str(), b.host_str()) {
        (Some(a), Some(b)) => site_key(a) == site_key(b),
        _ => false,
    }
}
