use std::collections::HashSet;
use std::io::ErrorKind;
use std::path::PathBuf;

use async_trait::async_trait;
use jt_core::{Result, SeenStore};
use tokio::sync::RwLock;

/// Seen set persisted as a flat JSON array of links.
///
/// The file is read once when the store is opened and rewritten in full on
/// `flush`. A missing file is an empty set. Writes go through a temp file
/// and a rename so an interrupted run never truncates the cache.
#[derive(Debug)]
pub struct JsonSeenCache {
    path: PathBuf,
    links: RwLock<HashSet<String>>,
}

impl JsonSeenCache {
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let links = match std::fs::read(&path) {
            Ok(bytes) => {
                let list: Vec<String> = serde_json::from_slice(&bytes)?;
                list.into_iter().collect()
            }
            Err(e) if e.kind() == ErrorKind::NotFound => HashSet::new(),
            Err(e) => return Err(e.into()),
        };

        tracing::debug!("📂 Loaded {} seen links from {}", links.len(), path.display());
        Ok(Self {
            path,
            links: RwLock::new(links),
        })
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }
}

#[async_trait]
impl SeenStore for JsonSeenCache {
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
        let links = self.links.read().await;
        // Sorted output keeps the file stable across runs.
        let mut list: Vec<&String> = links.iter().collect();
        list.sort();

        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, serde_json::to_vec_pretty(&list)?)?;
        std::fs::rename(&tmp, &self.path)?;

        tracing::debug!("💾 Flushed {} seen links to {}", list.len(), self.path.display());
        Ok(())
    }
}
