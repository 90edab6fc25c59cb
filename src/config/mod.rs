//! Configuration module for Blogdex-Crawl
//!
//! Every tunable the crawler uses (batch width, sitemap paths, skip patterns,
//! title separators, platform endpoint) lives here and is handed to the
//! components at construction. A TOML file is optional; every key has a
//! default.
//!
//! # Example
//!
//! ```no_run
//! use blogdex_crawl::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("blogdex.toml")).unwrap();
//! println!("Batch width: {}", config.crawler.batch_width);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    Config, CrawlerConfig, FilterConfig, PlatformConfig, SitemapConfig, TitleConfig,
    UserAgentConfig,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash};
pub use validation::validate;
