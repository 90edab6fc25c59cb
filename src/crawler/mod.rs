//! Crawler module for content discovery and title extraction
//!
//! This module contains the core harvesting logic, including:
//! - HTTP fetching with timeouts and bounded redirects
//! - Batch scheduling with throttling and cancellation
//! - Sitemap resolution, homepage crawling and the platform listing crawler
//! - Title extraction and overall run coordination

mod candidates;
mod coordinator;
mod extractor;
mod fetcher;
mod homepage;
mod parser;
mod platform;
mod scheduler;
mod sitemap;
mod target;

pub use candidates::{CandidateSet, CandidateUrl, DiscoverySource, DiscoveryStrategy};
pub use coordinator::{harvest, Harvester};
pub use extractor::{clean_title, decode_entities, TitleExtractor, TitleMatcher};
pub use fetcher::{build_http_client, FetchError, Fetcher};
pub use homepage::HomepageCrawler;
pub use parser::extract_links;
pub use platform::{
    decode_title, extract_blog_id, parse_listing, sanitize_payload, ListingEntry, ListingPage,
    PayloadError, PlatformCrawler, PlatformHarvest, Scalar,
};
pub use scheduler::{BatchOutcome, BatchScheduler, CancelFlag};
pub use sitemap::{
    extract_locs, has_xml_declaration, is_sitemap_index, select_children, SitemapResolver,
};
pub use target::{CrawlTarget, PlatformHint};
