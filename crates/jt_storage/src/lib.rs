use std::sync::Arc;

use jt_core::{Error, Result, SeenStore};

pub mod backends;

pub use backends::json::JsonSeenCache;
pub use backends::memory::MemorySeen;

#[cfg(feature = "sqlite")]
pub use backends::sqlite::SqliteSeen;

/// Open a seen-link store from a spec string.
///
/// Accepted forms: `memory`, `json:<path>`, `sqlite:<path>`.
pub async fn create_store(spec: &str) -> Result<Arc<dyn SeenStore>> {
    match spec.split_once(':') {
        None if spec == "memory" => Ok(Arc::new(MemorySeen::new())),
        Some(("json", path)) => Ok(Arc::new(JsonSeenCache::open(path).await?)),
        Some(("sqlite", path)) => open_sqlite(path).await,
        _ => Err(Error::Storage(format!(
            "unknown store spec: {} (expected memory, json:<path> or sqlite:<path>)",
            spec
        ))),
    }
}

#[cfg(feature = "sqlite")]
async fn open_sqlite(path: &str) -> Result<Arc<dyn SeenStore>> {
    Ok(Arc::new(backends::sqlite::SqliteSeen::open(path).await?))
}

#[cfg(not(feature = "sqlite"))]
async fn open_sqlite(_path: &str) -> Result<Arc<dyn SeenStore>> {
    Err(Error::Storage(
        "sqlite backend not enabled (build with --features sqlite)".to_string(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_store_memory() {
        let store = create_store("memory").await.unwrap();
        store.insert("https://example.com/a").await.unwrap();
        assert!(store.contains("https://example.com/a").await.unwrap());
    }

    #[tokio::test]
    async fn test_create_store_json() {
        let dir = tempfile::tempdir().unwrap();
        let spec = format!("json:{}", dir.path().join("seen.json").display());
        let store = create_store(&spec).await.unwrap();
        assert_eq!(store.len().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_create_store_unknown() {
        assert!(create_store("redis:whatever").await.is_err());
        assert!(create_store("bogus").await.is_err());
    }
}
