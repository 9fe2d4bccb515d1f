//! SQLite persistence layer for Conferia.
//!
//! This crate is the single source of truth for SQL. All interfaces (CLI,
//! tests) go through [`ConferiaDb`], which implements the
//! `conferia_core::MaterialStore` trait.
//!
//! # Usage
//!
//! ```rust,ignore
//! use conferia_db::ConferiaDb;
//!
//! let db = ConferiaDb::open("~/.conferia/conferia.sqlite3").await?;
//! let materials = db.list_materials(&Default::default()).await?;
//! ```

mod conferences;
mod materials;
mod schema;
mod sectors;
mod store;

pub use conferia_core::{ConferiaError, Result};

use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};
use std::path::Path;
use tracing::info;

/// SQLite database for all Conferia operations.
///
/// Do not use raw sqlx elsewhere; add a typed method here instead.
#[derive(Clone)]
pub struct ConferiaDb {
    pool: SqlitePool,
}

impl ConferiaDb {
    /// Open or create a database at the given path.
    ///
    /// Creates all tables and seeds the sector directory on first use.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let url = format!("sqlite:{}?mode=rwc", path.display());

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect(&url)
            .await?;

        let db = Self { pool };
        db.ensure_schema().await?;

        info!(path = %path.display(), "Database opened");

        Ok(db)
    }

    /// Open an existing database (fails if not exists).
    pub async fn open_existing(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ConferiaError::not_found(format!(
                "Database not found: {}",
                path.display()
            )));
        }

        let url = format!("sqlite:{}?mode=rw", path.display());

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect(&url)
            .await?;

        Ok(Self { pool })
    }

    /// Get the underlying pool (escape hatch; prefer the typed methods).
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Close the database connection.
    pub async fn close(self) {
        self.pool.close().await;
    }
}

// Timestamp utilities
impl ConferiaDb {
    /// Current time as milliseconds since Unix epoch.
    pub fn now_millis() -> i64 {
        chrono::Utc::now().timestamp_millis()
    }

    /// Convert milliseconds to DateTime.
    pub fn millis_to_datetime(millis: i64) -> chrono::DateTime<chrono::Utc> {
        chrono::DateTime::from_timestamp_millis(millis).unwrap_or_else(chrono::Utc::now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_open_creates_database() {
        let tmp = TempDir::new().unwrap();
        let db_path = tmp.path().join("test.db");

        let db = ConferiaDb::open(&db_path).await.unwrap();
        assert!(db_path.exists());

        db.close().await;
    }

    #[tokio::test]
    async fn test_open_existing_fails_if_not_exists() {
        let tmp = TempDir::new().unwrap();
        let db_path = tmp.path().join("nonexistent.db");

        let result = ConferiaDb::open_existing(&db_path).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_open_seeds_sectors() {
        let tmp = TempDir::new().unwrap();
        let db = ConferiaDb::open(tmp.path().join("test.db")).await.unwrap();
        let sectors = db.list_sectors().await.unwrap();
        assert!(sectors.iter().any(|s| s.name == "TI"));
        db.close().await;
    }
}
