use std::str::FromStr;

use async_trait::async_trait;
use jt_core::{Error, Result, SeenStore};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool};
use sqlx::Row;

const MIGRATIONS: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS seen_links (
        link TEXT PRIMARY KEY,
        seen_at TEXT NOT NULL
    )
    "#,
    // Add future migrations here
];

/// Seen set backed by a SQLite database. Unlike the JSON cache this writes
/// through on every insert, so `flush` is a no-op.
pub struct SqliteSeen {
    pool: SqlitePool,
}

impl SqliteSeen {
    pub async fn open(path: &str) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(&format!("sqlite:{}", path))
            .map_err(|e| Error::Storage(format!("invalid sqlite path {}: {}", path, e)))?
            .create_if_missing(true);

        let pool = SqlitePool::connect_with(options)
            .await
            .map_err(|e| Error::Storage(format!("failed to open {}: {}", path, e)))?;

        for (i, migration) in MIGRATIONS.iter().enumerate() {
            sqlx::query(migration)
                .execute(&pool)
                .await
                .map_err(|e| Error::Storage(format!("migration {} failed: {}", i, e)))?;
        }

        Ok(Self { pool })
    }
}

#[async_trait]
impl SeenStore for SqliteSeen {
    async fn contains(&self, link: &str) -> Result<bool> {
        let row = sqlx::query("SELECT 1 FROM seen_links WHERE link = ?")
            .bind(link)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| Error::Storage(format!("lookup failed: {}", e)))?;
        Ok(row.is_some())
    }

    async fn insert(&self, link: &str) -> Result<()> {
        sqlx::query("INSERT OR IGNORE INTO seen_links (link, seen_at) VALUES (?, ?)")
            .bind(link)
            .bind(chrono::Utc::now().to_rfc3339())
            .execute(&self.pool)
            .await
            .map_err(|e| Error::Storage(format!("insert failed: {}", e)))?;
        Ok(())
    }

    async fn len(&self) -> Result<usize> {
        let row = sqlx::query("SELECT COUNT(*) AS n FROM seen_links")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| Error::Storage(format!("count failed: {}", e)))?;
        let n: i64 = row.get("n");
        Ok(n as usize)
    }

    async fn flush(&self) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_sqlite_seen() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("seen.db");
        let store = SqliteSeen::open(path.to_str().unwrap()).await.unwrap();

        assert!(!store.contains("https://example.com/1").await.unwrap());
        store.insert("https://example.com/1").await.unwrap();
        store.insert("https://example.com/1").await.unwrap();
        assert!(store.contains("https://example.com/1").await.unwrap());
        assert_eq!(store.len().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_sqlite_survives_reopen() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("seen.db");

        {
            let store = SqliteSeen::open(path.to_str().unwrap()).await.unwrap();
            store.insert("https://example.com/kept").await.unwrap();
        }

        let store = SqliteSeen::open(path.to_str().unwrap()).await.unwrap();
        assert!(store.contains("https://example.com/kept").await.unwrap());
    }
}
