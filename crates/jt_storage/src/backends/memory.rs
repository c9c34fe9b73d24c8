use std::collections::HashSet;

use async_trait::async_trait;
use jt_core::{Result, SeenStore};
use tokio::sync::RwLock;

/// In-memory seen set. Nothing survives the process; useful for tests and
/// one-off dry runs.
#[derive(Debug, Default)]
pub struct MemorySeen {
    links: RwLock<HashSet<String>>,
}

impl MemorySeen {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SeenStore for MemorySeen {
    async fn contains(&self, link: &str) -> Result<bool> {
        Ok(self.links.read().await.contains(link))
    }

    async fn insert(&self, link: &str) -> Result<()> {
        self.links.write().await.insert(link.to_string());
        Ok(())
    }

    async fn len(&self) -> Result<usize> {
        Ok(self.links.read().await.len())
    }

    async fn flush(&self) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_seen() {
        let store = MemorySeen::new();
        assert!(!store.contains("https://example.com/1").await.unwrap());

        store.insert("https://example.com/1").await.unwrap();
        assert!(store.contains("https://example.com/1").await.unwrap());
        assert_eq!(store.len().await.unwrap(), 1);

        // Inserting twice keeps the set a set.
        store.insert("https://example.com/1").await.unwrap();
        assert_eq!(store.len().await.unwrap(), 1);

        store.flush().await.unwrap();
    }
}
