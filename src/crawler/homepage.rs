//! Breadth-first homepage crawl
//!
//! Fallback discovery for sites without a usable sitemap. Starting from the
//! target's base URL, each level of the crawl is fetched in batches and every
//! same-site link that passes the filter becomes a candidate. Candidates found
//! before the last level are also queued for the next one.

use crate::config::CrawlerConfig;
use crate::crawler::candidates::{CandidateSet, CandidateUrl, DiscoverySource};
use crate::crawler::fetcher::Fetcher;
use crate::crawler::parser::extract_links;
use crate::crawler::scheduler::BatchScheduler;
use crate::crawler::target::CrawlTarget;
use crate::url::{is_same_site, strip_query_and_fragment, UrlFilter};
use std::collections::HashSet;
use url::Url;

/// Same-site link harvester
#[derive(Debug, Clone)]
pub struct HomepageCrawler {
    fetcher: Fetcher,
    scheduler: BatchScheduler,
    filter: UrlFilter,
    depth: u32,
    frontier_cap: usize,
}

impl HomepageCrawler {
    pub fn new(
        fetcher: Fetcher,
        scheduler: BatchScheduler,
        filter: UrlFilter,
        config: &CrawlerConfig,
    ) -> Self {
        Self {
            fetcher,
            scheduler,
            filter,
            depth: config.crawl_depth,
            frontier_cap: config.frontier_cap,
        }
    }

    /// Crawls the target and returns candidates in discovery order
    ///
    /// Every page is fetched at most once. Links found on the final level are
    /// returned but not followed. Each level's frontier is capped.
    pub async fn crawl(&self, target: &CrawlTarget) -> Vec<CandidateUrl> {
        let base = target.base_url();
        let mut visited: HashSet<String> = HashSet::new();
        let mut found = CandidateSet::new();
        let mut to_visit = vec![base.to_string()];
        let mut batches_run = 0usize;

        for level in 0..self.depth {
            if to_visit.is_empty() {
                break;
            }

            let expand = level + 1 < self.depth;
            tracing::info!(
                "Homepage crawl depth {}: {} page(s) to visit",
                level + 1,
                to_visit.len()
            );

            let mut next_visit = Vec::new();

            for chunk in to_visit.chunks(self.scheduler.width()) {
                if self.scheduler.is_cancelled() {
                    tracing::info!("Homepage crawl cancelled with {} candidate(s)", found.len());
                    return found.into_vec();
                }
                if batches_run > 0 {
                    self.scheduler.throttle().await;
                }
                batches_run += 1;

                let batch: Vec<String> = chunk
                    .iter()
                    .filter(|url| visited.insert((*url).clone()))
                    .cloned()
                    .collect();
                if batch.is_empty() {
                    continue;
                }

                for outcome in self.scheduler.fetch_batch(&self.fetcher, &batch).await {
                    let Ok(body) = outcome.result else {
                        continue;
                    };
                    let Ok(page_url) = Url::parse(&outcome.url) else {
                        continue;
                    };

                    for mut link in extract_links(&body, &page_url) {
                        if !is_same_site(base, &link) || !self.filter.accepts(&link) {
                            continue;
                        }
                        strip_query_and_fragment(&mut link);

                        let link = link.to_string();
                        if visited.contains(&link) {
                            continue;
                        }
                        if found.insert(&link, DiscoverySource::HomepageCrawl) && expand {
                            next_visit.push(link);
                        }
                    }
                }
            }

            next_visit.truncate(self.frontier_cap);
            to_visit = next_visit;
        }

        tracing::info!("Homepage crawl found {} candidate(s)", found.len());
        found.into_vec()
    }
}
