use crate::UrlError;
use url::Url;

/// Normalizes a candidate URL for de-duplication
///
/// # Normalization Steps
///
/// 1. Parse the URL; reject if malformed
/// 2. Reject anything but HTTP(S)
/// 3. Reject URLs without a host
/// 4. Remove the query string
/// 5. Remove the fragment
///
/// The host is lowercased by the parser itself. Paths are left untouched so
/// that the normalized URL is still the one the site serves.
///
/// # Examples
///
/// ```
/// use blogdex_crawl::url::normalize_url;
///
/// let url = normalize_url("https://Example.com/post/1?utm_source=x#comments").unwrap();
/// assert_eq!(url.as_str(), "https://example.com/post/1");
/// ```
pub fn normalize_url(url_str: &str) -> Result<Url, UrlError> {
    let mut url = Url::parse(url_str.trim()).map_err(|e| UrlError::Parse(e.to_string()))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(format!(
            "Only HTTP and HTTPS schemes are supported, got: {}",
            url.scheme()
        )));
    }

    if url.host_str().map_or(true, str::is_empty) {
        return Err(UrlError::MissingDomain);
    }

    strip_query_and_fragment(&mut url);
    Ok(url)
}

/// Removes the query string and fragment from a URL in place
pub fn strip_query_and_fragment(url: &mut Url) {
    url.set_query(None);
    url.set_fragment(None);
}
