use crate::config::ServerConfig;
use crate::error::Result;
use sitemapper_scanner::{Crawler, HttpFetcher};
use std::sync::Arc;

/// Shared across requests. The crawler keeps no per-crawl state, so every
/// request still gets a fresh crawl session.
#[derive(Clone)]
pub struct AppState {
    pub crawler: Arc<Crawler>,
}

impl AppState {
    pub fn new(config: &ServerConfig) -> Result<Self> {
        let fetcher = HttpFetcher::with_policy(config.fetch_policy.clone())?;
        let mut crawler = Crawler::with_fetcher(Arc::new(fetcher));
        if let Some(depth) = config.max_depth {
            crawler = crawler.with_max_depth(depth);
        }
        if let Some(limit) = config.max_concurrency {
            crawler = crawler.with_max_concurrency(limit);
        }

        Ok(Self::with_crawler(crawler))
    }

    pub fn with_crawler(crawler: Crawler) -> Self {
        Self {
            crawler: Arc::new(crawler),
        }
    }
}
