//! Material CRUD operations.

use crate::ConferiaDb;
use conferia_core::{
    ConferenceOutcome, ConferiaError, Material, MaterialFilter, MaterialStatus, Result,
};
use conferia_ids::{MaterialId, QrToken};
use sqlx::{QueryBuilder, Row, Sqlite};

const MATERIAL_COLUMNS: &str = "id, name, asset_tag, sector, room, responsible, notes, qr_token, \
     status, last_scanned_at, last_found_sector, last_found_room, created_at, updated_at";

impl ConferiaDb {
    /// Insert a freshly created material.
    pub async fn insert_material(&self, material: &Material) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO materials (
                id, name, asset_tag, sector, room, responsible, notes, qr_token,
                status, last_scanned_at, last_found_sector, last_found_room,
                created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(material.id.as_str())
        .bind(&material.name)
        .bind(&material.asset_tag)
        .bind(&material.sector)
        .bind(&material.room)
        .bind(&material.responsible)
        .bind(&material.notes)
        .bind(material.qr_token.as_str())
        .bind(material.status.as_str())
        .bind(
            material
                .last_conference
                .as_ref()
                .map(|c| c.scanned_at.timestamp_millis()),
        )
        .bind(
            material
                .last_conference
                .as_ref()
                .map(|c| c.found_sector.as_str()),
        )
        .bind(
            material
                .last_conference
                .as_ref()
                .map(|c| c.found_room.as_str()),
        )
        .bind(material.created_at.timestamp_millis())
        .bind(material.updated_at.timestamp_millis())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Get a material by ID.
    pub async fn get_material(&self, id: &MaterialId) -> Result<Option<Material>> {
        let sql = format!("SELECT {MATERIAL_COLUMNS} FROM materials WHERE id = ?");
        let row = sqlx::query(&sql)
            .bind(id.as_str())
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => Ok(Some(row_to_material(&row)?)),
            None => Ok(None),
        }
    }

    /// Get a material by its QR token (scan lookup path).
    pub async fn get_material_by_qr(&self, token: &QrToken) -> Result<Option<Material>> {
        let sql = format!("SELECT {MATERIAL_COLUMNS} FROM materials WHERE qr_token = ?");
        let row = sqlx::query(&sql)
            .bind(token.as_str())
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => Ok(Some(row_to_material(&row)?)),
            None => Ok(None),
        }
    }

    pub async fn asset_tag_exists(
        &self,
        tag: &str,
        exclude: Option<&MaterialId>,
    ) -> Result<bool> {
        let count: i64 = match exclude {
            Some(id) => {
                sqlx::query_scalar(
                    "SELECT COUNT(*) FROM materials WHERE asset_tag = ? AND id != ?",
                )
                .bind(tag)
                .bind(id.as_str())
                .fetch_one(&self.pool)
                .await?
            }
            None => {
                sqlx::query_scalar("SELECT COUNT(*) FROM materials WHERE asset_tag = ?")
                    .bind(tag)
                    .fetch_one(&self.pool)
                    .await?
            }
        };
        Ok(count > 0)
    }

    pub async fn qr_token_exists(&self, token: &QrToken) -> Result<bool> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM materials WHERE qr_token = ?")
            .bind(token.as_str())
            .fetch_one(&self.pool)
            .await?;
        Ok(count > 0)
    }

    /// Persist an updated material (editable fields only; identity, token and
    /// conference columns are written by insert/record_conference).
    pub async fn save_material(&self, material: &Material) -> Result<()> {
        let result = sqlx::query(
            r#"
            UPDATE materials SET
                name = ?,
                asset_tag = ?,
                sector = ?,
                room = ?,
                responsible = ?,
                notes = ?,
                updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&material.name)
        .bind(&material.asset_tag)
        .bind(&material.sector)
        .bind(&material.room)
        .bind(&material.responsible)
        .bind(&material.notes)
        .bind(material.updated_at.timestamp_millis())
        .bind(material.id.as_str())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(ConferiaError::not_found(format!(
                "Material {}",
                material.id
            )));
        }
        Ok(())
    }

    /// Delete a material and its conference history.
    pub async fn delete_material(&self, id: &MaterialId) -> Result<bool> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM conferences WHERE material_id = ?")
            .bind(id.as_str())
            .execute(&mut *tx)
            .await?;

        let result = sqlx::query("DELETE FROM materials WHERE id = ?")
            .bind(id.as_str())
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(result.rows_affected() > 0)
    }

    /// List materials with optional filters, ordered by name.
    pub async fn list_materials(&self, filter: &MaterialFilter) -> Result<Vec<Material>> {
        let mut builder: QueryBuilder<Sqlite> = QueryBuilder::new(format!(
            "SELECT {MATERIAL_COLUMNS} FROM materials WHERE 1=1"
        ));

        if let Some(ref search) = filter.search {
            let needle = format!("%{}%", search);
            builder.push(" AND (name LIKE ");
            builder.push_bind(needle.clone());
            builder.push(" OR asset_tag LIKE ");
            builder.push_bind(needle.clone());
            builder.push(" OR responsible LIKE ");
            builder.push_bind(needle);
            builder.push(")");
        }
        if let Some(status) = filter.status {
            builder.push(" AND status = ");
            builder.push_bind(status.as_str());
        }
        if let Some(ref sector) = filter.sector {
            builder.push(" AND sector = ");
            builder.push_bind(sector.clone());
        }
        if let Some(ref room) = filter.room {
            builder.push(" AND room = ");
            builder.push_bind(room.clone());
        }

        builder.push(" ORDER BY name, asset_tag");

        if let Some(limit) = filter.limit {
            builder.push(" LIMIT ");
            builder.push_bind(limit as i64);
        }
        if let Some(offset) = filter.offset {
            if filter.limit.is_none() {
                builder.push(" LIMIT -1");
            }
            builder.push(" OFFSET ");
            builder.push_bind(offset as i64);
        }

        let rows = builder.build().fetch_all(&self.pool).await?;
        rows.iter().map(row_to_material).collect()
    }
}

pub(crate) fn row_to_material(row: &sqlx::sqlite::SqliteRow) -> Result<Material> {
    let status_str: String = row.get("status");
    let status = MaterialStatus::parse(&status_str).ok_or_else(|| {
        ConferiaError::storage(format!("Unknown material status: {status_str}"))
    })?;

    let id: String = row.get("id");
    let qr_token: String = row.get("qr_token");
    let last_scanned_at: Option<i64> = row.get("last_scanned_at");

    let last_conference = match last_scanned_at {
        Some(millis) => Some(ConferenceOutcome {
            scanned_at: ConferiaDb::millis_to_datetime(millis),
            found_sector: row
                .get::<Option<String>, _>("last_found_sector")
                .unwrap_or_default(),
            found_room: row
                .get::<Option<String>, _>("last_found_room")
                .unwrap_or_default(),
        }),
        None => None,
    };

    Ok(Material {
        id: MaterialId::parse(&id).map_err(ConferiaError::storage)?,
        name: row.get("name"),
        asset_tag: row.get("asset_tag"),
        sector: row.get("sector"),
        room: row.get("room"),
        responsible: row.get("responsible"),
        notes: row.get("notes"),
        qr_token: QrToken::parse(&qr_token).map_err(ConferiaError::storage)?,
        status,
        last_conference,
        created_at: ConferiaDb::millis_to_datetime(row.get("created_at")),
        updated_at: ConferiaDb::millis_to_datetime(row.get("updated_at")),
    })
}
