//! Conference history operations and dashboard statistics.

use crate::ConferiaDb;
use conferia_core::{Conference, ConferiaError, DashboardStats, MaterialStatus, Result};
use conferia_ids::{ConferenceId, MaterialId};
use sqlx::Row;

impl ConferiaDb {
    /// Append a conference record and move its material to `new_status`.
    ///
    /// One transaction: the history row and the cached latest-conference
    /// columns on the material can never disagree.
    pub async fn record_conference(
        &self,
        conference: &Conference,
        new_status: MaterialStatus,
    ) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        let updated = sqlx::query(
            r#"
            UPDATE materials SET
                status = ?,
                last_scanned_at = ?,
                last_found_sector = ?,
                last_found_room = ?,
                updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(new_status.as_str())
        .bind(conference.scanned_at.timestamp_millis())
        .bind(&conference.found_sector)
        .bind(&conference.found_room)
        .bind(conference.scanned_at.timestamp_millis())
        .bind(conference.material_id.as_str())
        .execute(&mut *tx)
        .await?;

        if updated.rows_affected() == 0 {
            return Err(ConferiaError::not_found(format!(
                "Material {}",
                conference.material_id
            )));
        }

        sqlx::query(
            r#"
            INSERT INTO conferences (id, material_id, found_sector, found_room, was_correct, scanned_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(conference.id.as_str())
        .bind(conference.material_id.as_str())
        .bind(&conference.found_sector)
        .bind(&conference.found_room)
        .bind(conference.was_correct)
        .bind(conference.scanned_at.timestamp_millis())
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(())
    }

    /// Conference history for one material, newest first.
    pub async fn list_conferences(&self, material_id: &MaterialId) -> Result<Vec<Conference>> {
        let rows = sqlx::query(
            r#"
            SELECT id, material_id, found_sector, found_room, was_correct, scanned_at
            FROM conferences
            WHERE material_id = ?
            ORDER BY scanned_at DESC, rowid DESC
            "#,
        )
        .bind(material_id.as_str())
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| {
                let id: String = row.get("id");
                let material_id: String = row.get("material_id");
                Ok(Conference {
                    id: ConferenceId::parse(&id).map_err(ConferiaError::storage)?,
                    material_id: MaterialId::parse(&material_id)
                        .map_err(ConferiaError::storage)?,
                    found_sector: row.get("found_sector"),
                    found_room: row.get("found_room"),
                    was_correct: row.get("was_correct"),
                    scanned_at: Self::millis_to_datetime(row.get("scanned_at")),
                })
            })
            .collect()
    }

    /// Aggregate counts for the dashboard.
    pub async fn stats(&self) -> Result<DashboardStats> {
        let row = sqlx::query(
            r#"
            SELECT
                COUNT(*) as total_materials,
                SUM(CASE WHEN status = 'checked_correct' THEN 1 ELSE 0 END) as checked_correct,
                SUM(CASE WHEN status = 'checked_other_location' THEN 1 ELSE 0 END) as checked_other_location,
                SUM(CASE WHEN status = 'not_checked' THEN 1 ELSE 0 END) as not_checked,
                (SELECT COUNT(DISTINCT sector) FROM materials) as sectors_in_use
            FROM materials
            "#,
        )
        .fetch_one(&self.pool)
        .await?;

        let stats = DashboardStats {
            total_materials: row.get::<i64, _>("total_materials") as u64,
            checked_correct: row.get::<Option<i64>, _>("checked_correct").unwrap_or(0) as u64,
            checked_other_location: row
                .get::<Option<i64>, _>("checked_other_location")
                .unwrap_or(0) as u64,
            not_checked: row.get::<Option<i64>, _>("not_checked").unwrap_or(0) as u64,
            sectors_in_use: row.get::<i64, _>("sectors_in_use") as u64,
            conference_rate: 0.0,
        };
        Ok(stats.with_rate())
    }
}
