pub mod crawler;
pub mod error;
pub mod extractor;
pub mod fetcher;
pub mod registry;
pub mod sitemap;

pub use crawler::Crawler;
pub use error::ScanError;
pub use extractor::{HtmlLinkExtractor, LinkExtractor};
pub use fetcher::{FetchOutcome, FetchPolicy, HttpFetcher, PageFetcher};
pub use registry::VisitedRegistry;
pub use sitemap::{CrawlResult, SitemapNode};
