use anyhow::{Context, Result};
use colored::Colorize;
use reqwest::Client;
use std::io::{self, Write};
use url::Url;

/// What the crawl server answered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CrawlReply {
    /// 200 with the rendered sitemap.
    Sitemap(String),
    /// Any other status, with the server's explanation.
    Failed { status: u16, body: String },
}

/// Parse a single line as a URL, trying to add http:// if needed
pub fn parse_url_line(line: &str) -> Option<String> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }

    // Try to parse as-is
    if let Ok(url) = Url::parse(line)
        && url.has_host()
    {
        return Some(line.to_string());
    }

    // Try adding http://
    let with_scheme = format!("http://{}", line);
    if let Ok(url) = Url::parse(&with_scheme)
        && url.has_host()
        && !line.contains(char::is_whitespace)
    {
        return Some(with_scheme);
    }

    None
}

/// What to send as the `url` query parameter for a typed line.
///
/// Adds `http://` where that yields a URL; anything else goes to the server
/// as typed so the server decides how to reject it.
pub fn crawl_target(line: &str) -> String {
    parse_url_line(line).unwrap_or_else(|| line.trim().to_string())
}

/// `{server}/crawl?url={target}`
pub fn crawl_endpoint(server: &str, target: &str) -> Result<Url> {
    let base = Url::parse(server).with_context(|| format!("Invalid server address '{}'", server))?;
    let mut endpoint = base
        .join("crawl")
        .with_context(|| format!("Cannot build crawl endpoint from '{}'", server))?;
    endpoint.query_pairs_mut().append_pair("url", target);
    Ok(endpoint)
}

/// Ask the server to crawl `target` and wait for the sitemap.
pub async fn request_sitemap(client: &Client, server: &str, target: &str) -> Result<CrawlReply> {
    let endpoint = crawl_endpoint(server, target)?;
    let response = client
        .get(endpoint)
        .send()
        .await
        .with_context(|| format!("Failed to reach crawl server at {}", server))?;

    let status = response.status();
    let body = response
        .text()
        .await
        .context("Failed to read crawl server response")?;

    if status == reqwest::StatusCode::OK {
        Ok(CrawlReply::Sitemap(body.trim().to_string()))
    } else {
        Ok(CrawlReply::Failed {
            status: status.as_u16(),
            body,
        })
    }
}

/// Plain-text rendering of a reply, as printed to the terminal.
pub fn format_reply(reply: &CrawlReply) -> String {
    match reply {
        CrawlReply::Sitemap(sitemap) => sitemap.clone(),
        CrawlReply::Failed { status, body } => format!("Error: {}\n{}", status, body),
    }
}

/// [`format_reply`] with the error header highlighted.
pub fn styled_reply(reply: &CrawlReply) -> String {
    let text = format_reply(reply);
    match reply {
        CrawlReply::Sitemap(_) => text,
        CrawlReply::Failed { .. } => match text.split_once('\n') {
            Some((header, body)) => format!("{}\n{}", header.red().bold(), body),
            None => text.red().bold().to_string(),
        },
    }
}

pub fn print_reply(reply: &CrawlReply) {
    println!("{}", styled_reply(reply));
}

pub fn prompt_for_url() -> Result<String> {
    print!("{} ", "Enter the URL to crawl:".bright_cyan().bold());
    io::stdout().flush()?;

    let mut response = String::new();
    io::stdin()
        .read_line(&mut response)
        .context("Failed to read URL from stdin")?;
    Ok(response.trim().to_string())
}
