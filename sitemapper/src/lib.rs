// Include handlers module directly from handlers.rs
#[path = "handlers.rs"]
pub mod handlers;

// Re-export commonly used handler functions for convenience
pub use handlers::{
    CrawlReply, crawl_endpoint, crawl_target, format_reply, parse_url_line, request_sitemap,
    styled_reply,
};
