use crate::config::types::{
    Config, CrawlerConfig, FilterConfig, PlatformConfig, SitemapConfig, TitleConfig,
    UserAgentConfig,
};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_user_agent_config(&config.user_agent)?;
    validate_sitemap_config(&config.sitemap)?;
    validate_filter_config(&config.filter)?;
    validate_title_config(&config.title)?;
    validate_platform_config(&config.platform)?;
    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.batch_width < 1 || config.batch_width > 100 {
        return Err(ConfigError::Validation(format!(
            "batch_width must be between 1 and 100, got {}",
            config.batch_width
        )));
    }

    if config.fetch_timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "fetch_timeout_secs must be >= 1, got {}",
            config.fetch_timeout_secs
        )));
    }

    if config.max_redirects < 1 || config.max_redirects > 20 {
        return Err(ConfigError::Validation(format!(
            "max_redirects must be between 1 and 20, got {}",
            config.max_redirects
        )));
    }

    if config.crawl_depth < 1 {
        return Err(ConfigError::Validation(format!(
            "crawl_depth must be >= 1, got {}",
            config.crawl_depth
        )));
    }

    if config.frontier_cap < 1 {
        return Err(ConfigError::Validation(format!(
            "frontier_cap must be >= 1, got {}",
            config.frontier_cap
        )));
    }

    if config.candidate_multiplier < 1 {
        return Err(ConfigError::Validation(format!(
            "candidate_multiplier must be >= 1, got {}",
            config.candidate_multiplier
        )));
    }

    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    // Validate crawler name: non-empty, alphanumeric + hyphens only
    if config.crawler_name.is_empty() {
        return Err(ConfigError::Validation(
            "crawler_name cannot be empty".to_string(),
        ));
    }

    if !config
        .crawler_name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-')
    {
        return Err(ConfigError::Validation(format!(
            "crawler_name must contain only alphanumeric characters and hyphens, got '{}'",
            config.crawler_name
        )));
    }

    if let Some(contact_url) = &config.contact_url {
        Url::parse(contact_url)
            .map_err(|e| ConfigError::InvalidUrl(format!("Invalid contact_url: {}", e)))?;
    }

    if let Some(email) = &config.contact_email {
        validate_email(email)?;
    }

    Ok(())
}

/// Validates sitemap probing configuration
fn validate_sitemap_config(config: &SitemapConfig) -> Result<(), ConfigError> {
    if config.paths.is_empty() {
        return Err(ConfigError::Validation(
            "sitemap paths cannot be empty".to_string(),
        ));
    }

    for path in &config.paths {
        if !path.starts_with('/') {
            return Err(ConfigError::Validation(format!(
                "sitemap path '{}' must start with '/'",
                path
            )));
        }
    }

    if config.declaration_window < 5 {
        return Err(ConfigError::Validation(format!(
            "declaration_window must be >= 5, got {}",
            config.declaration_window
        )));
    }

    Ok(())
}

/// Validates candidate filter configuration
fn validate_filter_config(config: &FilterConfig) -> Result<(), ConfigError> {
    if config.skip_patterns.iter().any(|p| p.is_empty()) {
        return Err(ConfigError::Validation(
            "skip_patterns cannot contain empty patterns".to_string(),
        ));
    }
    Ok(())
}

/// Validates title cleaning configuration
fn validate_title_config(config: &TitleConfig) -> Result<(), ConfigError> {
    if config.separators.iter().any(|s| s.is_empty()) {
        return Err(ConfigError::Validation(
            "title separators cannot be empty strings".to_string(),
        ));
    }

    if config.min_length < 1 {
        return Err(ConfigError::Validation(format!(
            "title min_length must be >= 1, got {}",
            config.min_length
        )));
    }

    Ok(())
}

/// Validates platform listing configuration
fn validate_platform_config(config: &PlatformConfig) -> Result<(), ConfigError> {
    for host in &config.hosts {
        validate_domain_pattern(host)?;
    }

    let api_base = Url::parse(&config.api_base)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid api_base: {}", e)))?;
    if api_base.scheme() != "http" && api_base.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "api_base '{}' must use HTTP or HTTPS",
            config.api_base
        )));
    }

    if config.page_size < 1 || config.page_size > 100 {
        return Err(ConfigError::Validation(format!(
            "page_size must be between 1 and 100, got {}",
            config.page_size
        )));
    }

    if config.max_pages < 1 {
        return Err(ConfigError::Validation(format!(
            "max_pages must be >= 1, got {}",
            config.max_pages
        )));
    }

    if config.fetch_timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "platform fetch_timeout_secs must be >= 1, got {}",
            config.fetch_timeout_secs
        )));
    }

    Ok(())
}

/// Validates a host pattern (supports wildcards)
fn validate_domain_pattern(pattern: &str) -> Result<(), ConfigError> {
    if pattern.is_empty() {
        return Err(ConfigError::InvalidPattern(
            "Domain pattern cannot be empty".to_string(),
        ));
    }

    let domain = pattern.strip_prefix("*.").unwrap_or(pattern);
    validate_domain_string(domain)
}

/// Validates a domain string (without wildcard prefix)
fn validate_domain_string(domain: &str) -> Result<(), ConfigError> {
    if domain.is_empty() {
        return Err(ConfigError::InvalidPattern(
            "Domain cannot be empty".to_string(),
        ));
    }

    if !domain
        .chars()
        .all(|c| c.is_alphanumeric() || c == '.' || c == '-')
    {
        return Err(ConfigError::InvalidPattern(format!(
            "Domain '{}' contains invalid characters",
            domain
        )));
    }

    if domain.starts_with('.')
        || domain.ends_with('.')
        || domain.starts_with('-')
        || domain.ends_with('-')
    {
        return Err(ConfigError::InvalidPattern(format!(
            "Domain '{}' cannot start or end with '.' or '-'",
            domain
        )));
    }

    if domain.contains("..") {
        return Err(ConfigError::InvalidPattern(format!(
            "Domain '{}' cannot contain consecutive dots",
            domain
        )));
    }

    // "localhost"-style single labels are not valid platform hosts
    if !domain.contains('.') {
        return Err(ConfigError::InvalidPattern(format!(
            "Domain '{}' must contain at least one dot (e.g., 'example.com')",
            domain
        )));
    }

    Ok(())
}

/// Basic email validation
fn validate_email(email: &str) -> Result<(), ConfigError> {
    if email.is_empty() {
        return Err(ConfigError::Validation(
            "contact_email cannot be empty".to_string(),
        ));
    }

    let parts: Vec<&str> = email.split('@').collect();
    if parts.len() != 2 || parts[0].is_empty() || parts[1].is_empty() {
        return Err(ConfigError::Validation(format!(
            "Invalid email format: '{}'",
            email
        )));
    }

    if !parts[1].contains('.') {
        return Err(ConfigError::Validation(format!(
            "Invalid email domain: '{}'",
            email
        )));
    }

    Ok(())
}
