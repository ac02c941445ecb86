use scraper::{Html, Selector};
use std::collections::HashSet;
use std::sync::LazyLock;
use tracing::debug;
use url::Url;

static LINK_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("a[href]").expect("static selector is valid")
});

/// Pulls outgoing links out of a fetched page.
pub trait LinkExtractor: Send + Sync {
    /// Absolute URLs linked from `body`, resolved against `base`.
    ///
    /// Malformed or unusable hrefs are skipped silently. Each URL appears at
    /// most once, in document order.
    fn extract_links(&self, body: &str, base: &Url) -> Vec<Url>;
}

/// [`LinkExtractor`] reading `<a href>` elements from HTML.
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlLinkExtractor;

impl LinkExtractor for HtmlLinkExtractor {
    fn extract_links(&self, body: &str, base: &Url) -> Vec<Url> {
        let document = Html::parse_document(body);
        let mut seen = HashSet::new();
        let mut links = Vec::new();

        for element in document.select(&LINK_SELECTOR) {
            if let Some(href) = element.value().attr("href")
                && let Some(absolute_url) = resolve_url(base, href)
                && seen.insert(absolute_url.to_string())
            {
                links.push(absolute_url);
            }
        }

        debug!("Found {} links on {}", links.len(), base);
        links
    }
}

/// Resolve `href` against `base`, dropping the fragment.
///
/// Returns `None` for hrefs that do not point at an http(s) page.
pub fn resolve_url(base: &Url, href: &str) -> Option<Url> {
    let href = href.trim();
    if href.is_empty()
        || href.starts_with('#')
        || href.starts_with("javascript:")
        || href.starts_with("mailto:")
        || href.starts_with("tel:")
        || href.starts_with("data:")
    {
        return None;
    }

    let mut resolved = base.join(href).ok()?;
    if !matches!(resolved.scheme(), "http" | "https") {
        return None;
    }
    resolved.set_fragment(None);

    Some(resolved)
}

/// Authority (host plus any non-default port) used as the crawl's domain identity.
pub fn authority(url: &Url) -> Option<String> {
    let host = url.host_str()?;
    Some(match url.port() {
        Some(port) => format!("{}:{}", host, port),
        None => host.to_string(),
    })
}
