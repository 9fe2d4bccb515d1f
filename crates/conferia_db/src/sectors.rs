//! Sector directory operations (static reference data).

use crate::ConferiaDb;
use conferia_core::{Result, Sector, SectorDirectory};
use conferia_ids::SectorId;
use sqlx::Row;
use tracing::info;

impl ConferiaDb {
    /// Seed the sector directory on a fresh database.
    pub(crate) async fn seed_sectors_if_empty(&self) -> Result<()> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM sectors")
            .fetch_one(&self.pool)
            .await?;
        if count > 0 {
            return Ok(());
        }

        let seed = SectorDirectory::default_seed();
        for (pos, sector) in seed.sectors().iter().enumerate() {
            self.insert_sector(sector, pos as i64).await?;
        }
        info!(sectors = seed.sectors().len(), "Sector directory seeded");
        Ok(())
    }

    async fn insert_sector(&self, sector: &Sector, position: i64) -> Result<()> {
        sqlx::query("INSERT INTO sectors (id, name, position) VALUES (?, ?, ?)")
            .bind(sector.id.as_str())
            .bind(&sector.name)
            .bind(position)
            .execute(&self.pool)
            .await?;

        for (pos, room) in sector.rooms.iter().enumerate() {
            sqlx::query("INSERT INTO rooms (sector_id, name, position) VALUES (?, ?, ?)")
                .bind(sector.id.as_str())
                .bind(room)
                .bind(pos as i64)
                .execute(&self.pool)
                .await?;
        }
        Ok(())
    }

    /// List all sectors with their rooms, in seed order.
    pub async fn list_sectors(&self) -> Result<Vec<Sector>> {
        let sector_rows = sqlx::query("SELECT id, name FROM sectors ORDER BY position")
            .fetch_all(&self.pool)
            .await?;

        let mut sectors = Vec::with_capacity(sector_rows.len());
        for row in &sector_rows {
            let id: String = row.get("id");
            let rooms: Vec<String> = sqlx::query_scalar(
                "SELECT name FROM rooms WHERE sector_id = ? ORDER BY position",
            )
            .bind(&id)
            .fetch_all(&self.pool)
            .await?;

            sectors.push(Sector {
                id: SectorId::parse(&id)
                    .map_err(|e| conferia_core::ConferiaError::storage(e))?,
                name: row.get("name"),
                rooms,
            });
        }
        Ok(sectors)
    }
}
