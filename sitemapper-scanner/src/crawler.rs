use crate::error::{Result, ScanError};
use crate::extractor::{HtmlLinkExtractor, LinkExtractor, authority};
use crate::fetcher::{FetchOutcome, HttpFetcher, PageFetcher};
use crate::registry::VisitedRegistry;
use crate::sitemap::{CrawlResult, SitemapNode};
use futures::FutureExt;
use futures::future::{BoxFuture, join_all};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::{debug, info, warn};
use url::Url;

/// Recursive single-domain crawler.
///
/// A `Crawler` holds no per-crawl state, so one instance can serve any
/// number of concurrent [`Crawler::crawl`] calls. Every call is its own
/// session with its own [`VisitedRegistry`].
pub struct Crawler {
    fetcher: Arc<dyn PageFetcher>,
    extractor: Arc<dyn LinkExtractor>,
    max_depth: Option<usize>,
    max_concurrency: Option<usize>,
}

impl Crawler {
    /// Crawler using the default HTTP fetch policy and HTML link extraction.
    pub fn new() -> Result<Self> {
        Ok(Self::with_fetcher(Arc::new(HttpFetcher::new()?)))
    }

    pub fn with_fetcher(fetcher: Arc<dyn PageFetcher>) -> Self {
        Self {
            fetcher,
            extractor: Arc::new(HtmlLinkExtractor),
            max_depth: None,
            max_concurrency: None,
        }
    }

    pub fn with_extractor(mut self, extractor: Arc<dyn LinkExtractor>) -> Self {
        self.extractor = extractor;
        self
    }

    /// Pages deeper than `depth` links from the seed are listed but not fetched.
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = Some(depth);
        self
    }

    /// Cap on fetches in flight at once within one crawl.
    pub fn with_max_concurrency(mut self, limit: usize) -> Self {
        self.max_concurrency = Some(limit.clamp(1, Semaphore::MAX_PERMITS));
        self
    }

    /// Crawl everything reachable from `seed_url` on the seed's domain.
    ///
    /// Only an unusable seed is an error. Pages that fail to load show up
    /// as leaves in the returned tree.
    pub async fn crawl(&self, seed_url: &str) -> Result<CrawlResult> {
        info!("Starting crawl of {}", seed_url);

        let seed = Url::parse(seed_url)
            .map_err(|e| ScanError::InvalidUrl(format!("{}: {}", seed_url, e)))?;
        let domain = authority(&seed)
            .ok_or_else(|| ScanError::InvalidUrl(format!("{}: URL has no host", seed_url)))?;

        let session = Arc::new(CrawlSession {
            domain: domain.clone(),
            visited: VisitedRegistry::new(),
            fetcher: self.fetcher.clone(),
            extractor: self.extractor.clone(),
            max_depth: self.max_depth,
            limiter: self.max_concurrency.map(Semaphore::new),
        });

        let root = session
            .clone()
            .visit(seed.clone(), 0)
            .await
            .unwrap_or_else(|| SitemapNode::new(seed.as_str()));

        info!(
            "Crawl of {} complete. Visited {} pages",
            domain,
            session.visited.len().await
        );

        Ok(CrawlResult { domain, root })
    }
}

/// State shared by every visit task of a single crawl.
struct CrawlSession {
    domain: String,
    visited: VisitedRegistry,
    fetcher: Arc<dyn PageFetcher>,
    extractor: Arc<dyn LinkExtractor>,
    max_depth: Option<usize>,
    limiter: Option<Semaphore>,
}

impl CrawlSession {
    fn in_scope(&self, url: &Url) -> bool {
        authority(url).is_some_and(|a| a == self.domain)
    }

    fn depth_exhausted(&self, depth: usize) -> bool {
        self.max_depth.is_some_and(|max| depth >= max)
    }

    /// Visit one URL and everything below it.
    ///
    /// `None` means the URL is off-domain or already owned by another task,
    /// and contributes nothing to its parent.
    fn visit(self: Arc<Self>, url: Url, depth: usize) -> BoxFuture<'static, Option<SitemapNode>> {
        async move {
            if !self.in_scope(&url) {
                debug!("Skipping out-of-scope {}", url);
                return None;
            }
            if !self.visited.claim(url.as_str()).await {
                debug!("Already claimed {}", url);
                return None;
            }

            debug!("Crawling {} at depth {}", url, depth);
            let mut node = SitemapNode::new(url.as_str());

            if self.depth_exhausted(depth) {
                debug!("Depth limit reached at {}", url);
                return Some(node);
            }

            let links = match self.fetch(&url).await {
                Some(body) => self.extractor.extract_links(&body, &url),
                None => Vec::new(),
            };

            // Fan out one task per in-domain link, then wait for all of them.
            let handles: Vec<_> = links
                .into_iter()
                .filter(|link| self.in_scope(link))
                .map(|link| {
                    debug!("Queueing {} for crawling", link);
                    tokio::spawn(self.clone().visit(link, depth + 1))
                })
                .collect();

            for result in join_all(handles).await {
                match result {
                    Ok(Some(child)) => node.children.push(child),
                    Ok(None) => {}
                    Err(e) => warn!("Sub-crawl under {} aborted: {}", url, e),
                }
            }

            Some(node)
        }
        .boxed()
    }

    async fn fetch(&self, url: &Url) -> Option<String> {
        let _permit = match &self.limiter {
            Some(limiter) => limiter.acquire().await.ok(),
            None => None,
        };

        match self.fetcher.fetch(url).await {
            FetchOutcome::Success { body, .. } => Some(body),
            FetchOutcome::RetryableFailure { cause } => {
                warn!("Giving up on {}: {}", url, cause);
                None
            }
            FetchOutcome::FatalFailure { cause } => {
                warn!("Abandoning {}: {}", url, cause);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex as StdMutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    /// In-memory site: URL -> HTML. Unknown URLs fail like a 404 would.
    struct StaticSite {
        pages: HashMap<String, String>,
        calls: StdMutex<HashMap<String, usize>>,
        in_flight: AtomicUsize,
        peak_in_flight: AtomicUsize,
        latency: Duration,
    }

    impl StaticSite {
        fn new(pages: &[(&str, &str)]) -> Self {
            Self {
                pages: pages
                    .iter()
                    .map(|(url, html)| (url.to_string(), html.to_string()))
                    .collect(),
                calls: StdMutex::new(HashMap::new()),
                in_flight: AtomicUsize::new(0),
                peak_in_flight: AtomicUsize::new(0),
                latency: Duration::ZERO,
            }
        }

        fn with_latency(mut self, latency: Duration) -> Self {
            self.latency = latency;
            self
        }

        fn calls(&self) -> HashMap<String, usize> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl PageFetcher for StaticSite {
        async fn fetch(&self, url: &Url) -> FetchOutcome {
            *self
                .calls
                .lock()
                .unwrap()
                .entry(url.to_string())
                .or_insert(0) += 1;

            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak_in_flight.fetch_max(now, Ordering::SeqCst);
            tokio::time::sleep(self.latency).await;
            self.in_flight.fetch_sub(1, Ordering::SeqCst);

            match self.pages.get(url.as_str()) {
                Some(body) => FetchOutcome::Success {
                    status_code: 200,
                    body: body.clone(),
                },
                None => FetchOutcome::RetryableFailure {
                    cause: ScanError::BadStatus {
                        url: url.to_string(),
                        status: 404,
                    },
                },
            }
        }
    }

    #[tokio::test]
    async fn test_builds_nested_tree() {
        let site = Arc::new(StaticSite::new(&[
            (
                "http://example.com/",
                r#"<a href="/page1">1</a><a href="/page2">2</a>"#,
            ),
            ("http://example.com/page1", r#"<a href="/page3">3</a>"#),
            ("http://example.com/page2", "<p>leaf</p>"),
            ("http://example.com/page3", "<p>leaf</p>"),
        ]));

        let crawler = Crawler::with_fetcher(site.clone());
        let result = crawler.crawl("http://example.com").await.unwrap();

        assert_eq!(result.domain, "example.com");
        assert_eq!(
            result.root,
            SitemapNode::with_children(
                "http://example.com/",
                vec![
                    SitemapNode::with_children(
                        "http://example.com/page1",
                        vec![SitemapNode::new("http://example.com/page3")],
                    ),
                    SitemapNode::new("http://example.com/page2"),
                ],
            )
        );
        assert_eq!(
            result.render(),
            "example.com\n- /\n  - /page1\n    - /page3\n  - /page2\n"
        );
    }

    #[tokio::test]
    async fn test_never_fetches_other_domains() {
        let site = Arc::new(StaticSite::new(&[
            (
                "http://example.com/",
                r#"<a href="http://other.com/">x</a>
                   <a href="http://example.com:8080/">other port</a>
                   <a href="http://sub.example.com/">subdomain</a>
                   <a href="/inside">in</a>"#,
            ),
            ("http://example.com/inside", ""),
        ]));

        let result = Crawler::with_fetcher(site.clone())
            .crawl("http://example.com/")
            .await
            .unwrap();

        let calls = site.calls();
        assert_eq!(calls.len(), 2, "fetched: {:?}", calls);
        assert!(calls.contains_key("http://example.com/"));
        assert!(calls.contains_key("http://example.com/inside"));
        assert_eq!(result.page_count(), 2);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_each_url_fetched_once_despite_cycles() {
        let site = Arc::new(
            StaticSite::new(&[
                (
                    "http://example.com/",
                    r#"<a href="/a">a</a><a href="/b">b</a><a href="/">self</a>"#,
                ),
                (
                    "http://example.com/a",
                    r#"<a href="/">home</a><a href="/b">b</a><a href="/c">c</a>"#,
                ),
                (
                    "http://example.com/b",
                    r#"<a href="/">home</a><a href="/a">a</a><a href="/c">c</a>"#,
                ),
                ("http://example.com/c", r#"<a href="/a">a</a><a href="/b">b</a>"#),
            ])
            .with_latency(Duration::from_millis(5)),
        );

        let result = Crawler::with_fetcher(site.clone())
            .crawl("http://example.com/")
            .await
            .unwrap();

        let calls = site.calls();
        assert_eq!(calls.len(), 4);
        assert!(calls.values().all(|&n| n == 1), "calls: {:?}", calls);

        // Whoever claimed /c first owns it; it appears exactly once in the tree.
        assert_eq!(result.page_count(), 4);
        let rendered = result.render();
        assert_eq!(rendered.matches("- /c\n").count(), 1);
    }

    #[tokio::test]
    async fn test_failed_page_becomes_leaf() {
        let site = Arc::new(StaticSite::new(&[(
            "http://example.com/",
            r#"<a href="/missing">gone</a><a href="/ok">ok</a>"#,
        )]));

        let result = Crawler::with_fetcher(site.clone())
            .crawl("http://example.com/")
            .await
            .unwrap();

        let missing = result.root.child("http://example.com/missing").unwrap();
        assert!(missing.is_leaf());
        assert!(result.root.child("http://example.com/ok").unwrap().is_leaf());
        assert_eq!(result.render(), "example.com\n- /\n  - /missing\n  - /ok\n");
    }

    #[tokio::test]
    async fn test_unreachable_seed_still_renders() {
        let site = Arc::new(StaticSite::new(&[]));
        let result = Crawler::with_fetcher(site)
            .crawl("http://example.com/")
            .await
            .unwrap();

        assert!(result.root.is_leaf());
        assert_eq!(result.render(), "example.com\n- /\n");
    }

    #[tokio::test]
    async fn test_invalid_seed_is_rejected() {
        let crawler = Crawler::with_fetcher(Arc::new(StaticSite::new(&[])));

        assert!(matches!(
            crawler.crawl("not a url").await,
            Err(ScanError::InvalidUrl(_))
        ));
        assert!(matches!(
            crawler.crawl("mailto:someone@example.com").await,
            Err(ScanError::InvalidUrl(_))
        ));
    }

    #[tokio::test]
    async fn test_sessions_do_not_share_visited_state() {
        let site = Arc::new(StaticSite::new(&[
            ("http://example.com/", r#"<a href="/a">a</a>"#),
            ("http://example.com/a", ""),
        ]));
        let crawler = Crawler::with_fetcher(site.clone());

        let first = crawler.crawl("http://example.com/").await.unwrap();
        let second = crawler.crawl("http://example.com/").await.unwrap();

        assert_eq!(first, second);
        assert_eq!(site.calls().get("http://example.com/a"), Some(&2));
    }

    #[tokio::test]
    async fn test_max_depth_lists_but_does_not_fetch() {
        let site = Arc::new(StaticSite::new(&[
            ("http://example.com/", r#"<a href="/one">1</a>"#),
            ("http://example.com/one", r#"<a href="/two">2</a>"#),
            ("http://example.com/two", ""),
        ]));

        let result = Crawler::with_fetcher(site.clone())
            .with_max_depth(1)
            .crawl("http://example.com/")
            .await
            .unwrap();

        assert_eq!(result.render(), "example.com\n- /\n  - /one\n");
        assert!(!site.calls().contains_key("http://example.com/one"));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_max_concurrency_bounds_fetches() {
        let mut pages = vec![(
            "http://example.com/".to_string(),
            (0..12)
                .map(|i| format!(r#"<a href="/p{}">p</a>"#, i))
                .collect::<String>(),
        )];
        for i in 0..12 {
            pages.push((format!("http://example.com/p{}", i), String::new()));
        }
        let pages: Vec<(&str, &str)> = pages
            .iter()
            .map(|(u, b)| (u.as_str(), b.as_str()))
            .collect();

        let site = Arc::new(StaticSite::new(&pages).with_latency(Duration::from_millis(20)));

        let result = Crawler::with_fetcher(site.clone())
            .with_max_concurrency(3)
            .crawl("http://example.com/")
            .await
            .unwrap();

        assert_eq!(result.page_count(), 13);
        assert!(site.peak_in_flight.load(Ordering::SeqCst) <= 3);
    }

    #[tokio::test]
    async fn test_huge_concurrency_limit_is_clamped() {
        let site = Arc::new(StaticSite::new(&[
            ("http://example.com/", r#"<a href="/one">one</a>"#),
            ("http://example.com/one", ""),
        ]));

        let crawler = Crawler::with_fetcher(site.clone()).with_max_concurrency(usize::MAX);
        assert_eq!(crawler.max_concurrency, Some(Semaphore::MAX_PERMITS));

        let result = crawler.crawl("http://example.com/").await.unwrap();
        assert_eq!(result.render(), "example.com\n- /\n  - /one\n");
    }
}
