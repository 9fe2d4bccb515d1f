//! Database schema creation for all Conferia tables.
//!
//! All CREATE TABLE statements live here - single source of truth.

use crate::ConferiaDb;
use conferia_core::Result;
use tracing::info;

impl ConferiaDb {
    /// Ensure all tables exist and the sector directory is seeded.
    pub(crate) async fn ensure_schema(&self) -> Result<()> {
        // Enable WAL mode for better concurrent access
        sqlx::query("PRAGMA journal_mode=WAL")
            .execute(&self.pool)
            .await?;
        sqlx::query("PRAGMA synchronous=NORMAL")
            .execute(&self.pool)
            .await?;
        sqlx::query("PRAGMA foreign_keys=ON")
            .execute(&self.pool)
            .await?;

        self.create_material_tables().await?;
        self.create_sector_tables().await?;
        self.seed_sectors_if_empty().await?;

        info!("Database schema verified");
        Ok(())
    }

    /// Materials and their append-only conference history.
    async fn create_material_tables(&self) -> Result<()> {
        sqlx::query(
            r#"CREATE TABLE IF NOT EXISTS materials (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                asset_tag TEXT NOT NULL UNIQUE,
                sector TEXT NOT NULL,
                room TEXT NOT NULL,
                responsible TEXT NOT NULL,
                notes TEXT,
                qr_token TEXT NOT NULL UNIQUE,
                status TEXT NOT NULL DEFAULT 'not_checked',
                last_scanned_at INTEGER,
                last_found_sector TEXT,
                last_found_room TEXT,
                created_at INTEGER NOT NULL,
                updated_at INTEGER NOT NULL
            )"#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"CREATE TABLE IF NOT EXISTS conferences (
                id TEXT PRIMARY KEY,
                material_id TEXT NOT NULL REFERENCES materials(id) ON DELETE CASCADE,
                found_sector TEXT NOT NULL,
                found_room TEXT NOT NULL,
                was_correct INTEGER NOT NULL,
                scanned_at INTEGER NOT NULL
            )"#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_materials_asset_tag ON materials(asset_tag)")
            .execute(&self.pool)
            .await?;
        sqlx::query("CREATE INDEX IF NOT EXISTS idx_materials_qr_token ON materials(qr_token)")
            .execute(&self.pool)
            .await?;
        sqlx::query("CREATE INDEX IF NOT EXISTS idx_materials_status ON materials(status)")
            .execute(&self.pool)
            .await?;
        sqlx::query("CREATE INDEX IF NOT EXISTS idx_materials_sector ON materials(sector)")
            .execute(&self.pool)
            .await?;
        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_conferences_material ON conferences(material_id, scanned_at DESC)",
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Static sector/room reference data.
    async fn create_sector_tables(&self) -> Result<()> {
        sqlx::query(
            r#"CREATE TABLE IF NOT EXISTS sectors (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL UNIQUE,
                position INTEGER NOT NULL
            )"#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"CREATE TABLE IF NOT EXISTS rooms (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                sector_id TEXT NOT NULL REFERENCES sectors(id) ON DELETE CASCADE,
                name TEXT NOT NULL,
                position INTEGER NOT NULL,
                UNIQUE(sector_id, name)
            )"#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_rooms_sector ON rooms(sector_id, position)")
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
