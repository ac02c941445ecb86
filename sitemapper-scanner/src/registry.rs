use std::collections::HashSet;
use tokio::sync::Mutex;

/// Set of URLs claimed during one crawl session.
///
/// A URL can be claimed once; whoever claims it owns building its subtree.
/// The set only grows and is dropped together with the session.
#[derive(Debug, Default)]
pub struct VisitedRegistry {
    visited: Mutex<HashSet<String>>,
}

impl VisitedRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Atomically check-and-insert `url`.
    ///
    /// Returns `true` if the caller is the first to claim it, `false` if it
    /// was already claimed by someone else.
    pub async fn claim(&self, url: &str) -> bool {
        let mut visited = self.visited.lock().await;
        if visited.contains(url) {
            false
        } else {
            visited.insert(url.to_string())
        }
    }

    pub async fn len(&self) -> usize {
        self.visited.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.visited.lock().await.is_empty()
    }
}
