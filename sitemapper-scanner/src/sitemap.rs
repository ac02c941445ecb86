use url::Url;

/// One crawled URL and the in-domain pages it led to.
///
/// Children are kept in the order their sub-crawls were spawned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SitemapNode {
    pub url: String,
    pub children: Vec<SitemapNode>,
}

impl SitemapNode {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            children: Vec::new(),
        }
    }

    pub fn with_children(url: impl Into<String>, children: Vec<SitemapNode>) -> Self {
        Self {
            url: url.into(),
            children,
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Look up a direct child by URL.
    pub fn child(&self, url: &str) -> Option<&SitemapNode> {
        self.children.iter().find(|child| child.url == url)
    }

    /// Number of nodes in this subtree, including this one.
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(SitemapNode::node_count).sum::<usize>()
    }
}

/// Root of a finished crawl, together with the domain it was scoped to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlResult {
    pub domain: String,
    pub root: SitemapNode,
}

impl CrawlResult {
    pub fn render(&self) -> String {
        render(&self.domain, &self.root)
    }

    pub fn page_count(&self) -> usize {
        self.root.node_count()
    }
}

/// Extract the path component from a URL
pub fn extract_url_path(url: &str) -> String {
    Url::parse(url)
        .ok()
        .map(|u| {
            let path = u.path().to_string();
            if path.is_empty() { "/".to_string() } else { path }
        })
        .unwrap_or_else(|| url.to_string())
}

/// Render a sitemap tree as an indented listing.
///
/// ```text
/// example.com
/// - /
///   - /page1
///     - /page3
///   - /page2
/// ```
pub fn render(domain: &str, root: &SitemapNode) -> String {
    let mut out = String::new();
    out.push_str(domain);
    out.push('\n');
    render_node(root, 0, &mut out);
    out
}

fn render_node(node: &SitemapNode, depth: usize, out: &mut String) {
    out.push_str(&"  ".repeat(depth));
    out.push_str("- ");
    out.push_str(&extract_url_path(&node.url));
    out.push('\n');

    for child in &node.children {
        render_node(child, depth + 1, out);
    }
}
