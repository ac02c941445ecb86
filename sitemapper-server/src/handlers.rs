use crate::AppState;
use crate::error::{Result, ServerError};
use axum::extract::{Query, State};
use serde::Deserialize;
use tracing::info;

#[derive(Debug, Deserialize)]
pub struct CrawlParams {
    pub url: Option<String>,
}

/// `GET /crawl?url=...` - crawl the URL's domain and return the rendered sitemap.
pub async fn crawl(
    State(state): State<AppState>,
    Query(params): Query<CrawlParams>,
) -> Result<String> {
    let url = params
        .url
        .map(|url| url.trim().to_string())
        .filter(|url| !url.is_empty())
        .ok_or(ServerError::MissingUrl)?;

    info!("Received crawl request for {}", url);
    let result = state.crawler.crawl(&url).await?;
    info!(
        "Crawl of {} completed with {} pages",
        result.domain,
        result.page_count()
    );

    Ok(result.render())
}

pub async fn health() -> &'static str {
    "Healthy"
}

pub async fn ready() -> &'static str {
    "Ready"
}
