/// Checks if a host matches a platform host pattern
///
/// Two kinds of pattern are supported:
/// 1. Exact: "blog.naver.com" matches only "blog.naver.com"
/// 2. Wildcard: "*.tistory.com" matches "tistory.com" and any subdomain of it
///
/// Both arguments are expected to be lowercase already.
///
/// # Examples
///
/// ```
/// use blogdex_crawl::url::matches_wildcard;
///
/// assert!(matches_wildcard("blog.naver.com", "blog.naver.com"));
/// assert!(!matches_wildcard("blog.naver.com", "m.blog.naver.com"));
///
/// assert!(matches_wildcard("*.blog.naver.com", "m.blog.naver.com"));
/// assert!(!matches_wildcard("*.blog.naver.com", "naver.com"));
/// ```
pub fn matches_wildcard(pattern: &str, candidate: &str) -> bool {
    match pattern.strip_prefix("*.") {
        Some(base) => {
            candidate == base
                || candidate
                    .strip_suffix(base)
                    .is_some_and(|prefix| prefix.ends_with('.'))
        }
        None => candidate == pattern,
    }
}
