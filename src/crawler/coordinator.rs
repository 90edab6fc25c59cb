//! Harvest coordinator - discovery orchestration
//!
//! This module drives one discovery run through its states:
//! - Choosing a discovery strategy (platform listing, sitemap, homepage crawl)
//! - Falling back from sitemap to homepage crawl when the sitemap is empty
//! - Extracting titles from candidates in polite batches
//! - Assembling the final report

use crate::config::Config;
use crate::crawler::candidates::{CandidateUrl, DiscoveryStrategy};
use crate::crawler::extractor::TitleExtractor;
use crate::crawler::fetcher::Fetcher;
use crate::crawler::homepage::HomepageCrawler;
use crate::crawler::platform::{extract_blog_id, PlatformCrawler};
use crate::crawler::scheduler::{BatchScheduler, CancelFlag};
use crate::crawler::sitemap::SitemapResolver;
use crate::crawler::target::{CrawlTarget, PlatformHint};
use crate::output::{ExtractedTitle, HarvestReport};
use crate::state::DiscoveryState;
use crate::url::UrlFilter;
use crate::HarvestError;
use chrono::{DateTime, Utc};
use std::sync::Arc;

/// Runs one discovery and extraction pass over a target
///
/// A harvester is single-use: once a run reaches `Done` or `Failed`, starting
/// another run is an invalid transition.
pub struct Harvester {
    config: Arc<Config>,
    fetcher: Fetcher,
    extractor: TitleExtractor,
    filter: UrlFilter,
    cancel: CancelFlag,
    state: DiscoveryState,
}

impl Harvester {
    /// Creates a new harvester
    ///
    /// # Arguments
    ///
    /// * `config` - Validated configuration
    ///
    /// # Returns
    ///
    /// * `Ok(Harvester)` - Ready to run
    /// * `Err(HarvestError)` - The HTTP client could not be built
    pub fn new(config: Config) -> Result<Self, HarvestError> {
        let fetcher = Fetcher::from_config(&config.user_agent, &config.crawler)?;
        let extractor = TitleExtractor::new(&config.title);
        let filter = UrlFilter::new(&config.filter);

        Ok(Self {
            config: Arc::new(config),
            fetcher,
            extractor,
            filter,
            cancel: CancelFlag::new(),
            state: DiscoveryState::Idle,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Current run state
    pub fn state(&self) -> DiscoveryState {
        self.state
    }

    /// Handle that stops the run at the next batch boundary when set
    pub fn cancel_flag(&self) -> CancelFlag {
        self.cancel.clone()
    }

    fn transition(&mut self, next: DiscoveryState) -> Result<(), HarvestError> {
        if !self.state.can_transition_to(next) {
            return Err(HarvestError::InvalidTransition {
                from: self.state,
                to: next,
            });
        }
        tracing::debug!("Discovery state {} -> {}", self.state, next);
        self.state = next;
        if next.is_terminal() {
            tracing::info!("Harvest finished in state {}", next);
        }
        Ok(())
    }

    fn scheduler(&self) -> BatchScheduler {
        BatchScheduler::from_config(&self.config.crawler, self.cancel.clone())
    }

    /// Runs discovery and extraction for a target
    ///
    /// Returns `NoContentFound` when no strategy finds anything. Network and
    /// parse failures on individual documents never surface here.
    pub async fn run(&mut self, target: &CrawlTarget) -> Result<HarvestReport, HarvestError> {
        let started_at = Utc::now();
        self.transition(DiscoveryState::Discovering)?;

        tracing::info!(
            "Harvesting {} (up to {} titles)",
            target.base_url(),
            target.max_items()
        );

        if target.platform_hint() == PlatformHint::NaverBlog {
            return self.run_platform(target, started_at).await;
        }

        let (strategy, candidates) = self.discover(target).await;
        if candidates.is_empty() {
            self.transition(DiscoveryState::Failed)?;
            tracing::warn!("No discoverable content at {}", target.base_url());
            return Err(HarvestError::NoContentFound {
                target: target.base_url().to_string(),
            });
        }

        tracing::info!(
            "Discovered {} candidate(s) via {}",
            candidates.len(),
            strategy
        );

        self.transition(DiscoveryState::Extracting)?;
        let titles = self.extract_titles(&candidates, target.max_items()).await;
        self.transition(DiscoveryState::Done)?;

        Ok(HarvestReport {
            source: target.base_url().to_string(),
            strategy,
            total_candidates: candidates.len() as u64,
            extracted_count: titles.len(),
            titles,
            started_at,
            finished_at: Utc::now(),
            cancelled: self.cancel.is_cancelled(),
        })
    }

    /// Sitemap first, homepage crawl if the sitemap yields nothing
    async fn discover(&self, target: &CrawlTarget) -> (DiscoveryStrategy, Vec<CandidateUrl>) {
        let resolver =
            SitemapResolver::new(self.fetcher.clone(), &self.config.sitemap, self.filter.clone());
        let candidates = resolver.resolve(target).await;
        if !candidates.is_empty() {
            return (DiscoveryStrategy::Sitemap, candidates);
        }

        tracing::info!("Falling back to homepage crawl for {}", target.base_url());
        let crawler = HomepageCrawler::new(
            self.fetcher.clone(),
            self.scheduler(),
            self.filter.clone(),
            &self.config.crawler,
        );
        (DiscoveryStrategy::HomepageCrawl, crawler.crawl(target).await)
    }

    /// Platform listing run; discovery and extraction happen together
    async fn run_platform(
        &mut self,
        target: &CrawlTarget,
        started_at: DateTime<Utc>,
    ) -> Result<HarvestReport, HarvestError> {
        let Some(blog_id) = extract_blog_id(target.base_url()) else {
            self.transition(DiscoveryState::Failed)?;
            return Err(HarvestError::InvalidTarget(format!(
                "no blog id in {}",
                target.base_url()
            )));
        };

        let crawler = PlatformCrawler::new(
            &self.fetcher,
            &self.config.platform,
            self.config.title.min_length,
            self.cancel.clone(),
        );
        let harvest = crawler.crawl(&blog_id, target.max_items()).await;
        let source = crawler.blog_url(&blog_id);

        if harvest.titles.is_empty() && !self.cancel.is_cancelled() {
            self.transition(DiscoveryState::Failed)?;
            tracing::warn!("No titles listed for blog {}", blog_id);
            return Err(HarvestError::NoContentFound { target: source });
        }

        self.transition(DiscoveryState::Extracting)?;
        self.transition(DiscoveryState::Done)?;

        Ok(HarvestReport {
            source,
            strategy: DiscoveryStrategy::PlatformApi,
            total_candidates: harvest.total_count,
            extracted_count: harvest.titles.len(),
            titles: harvest.titles,
            started_at,
            finished_at: Utc::now(),
            cancelled: self.cancel.is_cancelled(),
        })
    }

    /// Fetches candidates in batches and extracts their titles
    ///
    /// Only the first `max_items * candidate-multiplier` candidates are
    /// considered. Titles are numbered in candidate order, whichever fetch
    /// finished first, and collection stops at `max_items`.
    pub async fn extract_titles(
        &self,
        candidates: &[CandidateUrl],
        max_items: usize,
    ) -> Vec<ExtractedTitle> {
        let limit = candidates
            .len()
            .min(max_items.saturating_mul(self.config.crawler.candidate_multiplier));
        let urls: Vec<String> = candidates[..limit].iter().map(|c| c.url.clone()).collect();

        let scheduler = self.scheduler();
        let mut titles: Vec<ExtractedTitle> = Vec::new();
        let mut fetched = 0usize;

        for (index, chunk) in urls.chunks(scheduler.width()).enumerate() {
            if titles.len() >= max_items {
                break;
            }
            if scheduler.is_cancelled() {
                tracing::info!("Extraction cancelled with {} title(s)", titles.len());
                break;
            }
            if index > 0 {
                scheduler.throttle().await;
            }

            for outcome in scheduler.fetch_batch(&self.fetcher, chunk).await {
                fetched += 1;
                if titles.len() >= max_items {
                    break;
                }
                let body = match outcome.result {
                    Ok(body) => body,
                    Err(e) => {
                        tracing::debug!("Skipping {} ({})", e.url(), e.kind());
                        continue;
                    }
                };
                let Some(title) = self.extractor.extract(&body) else {
                    tracing::debug!("No usable title at {}", outcome.url);
                    continue;
                };

                titles.push(ExtractedTitle {
                    sequence: titles.len() + 1,
                    title,
                    url: outcome.url,
                    published: None,
                });
            }
        }

        tracing::info!(
            "Extracted {} title(s) from {} fetched candidate(s)",
            titles.len(),
            fetched
        );
        titles
    }
}

/// Harvests titles from a site in one call
///
/// This is a convenience wrapper that builds the target and harvester and
/// runs a single pass.
///
/// # Example
///
/// ```no_run
/// use blogdex_crawl::config::Config;
/// use blogdex_crawl::crawler::harvest;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let report = harvest(Config::default(), "example.com", 20).await?;
/// println!("{} titles", report.extracted_count);
/// # Ok(())
/// # }
/// ```
pub async fn harvest(
    config: Config,
    url: &str,
    max_items: usize,
) -> Result<HarvestReport, HarvestError> {
    let target = CrawlTarget::new(url, max_items, &config.platform)?;
    let mut harvester = Harvester::new(config)?;
    harvester.run(&target).await
}
