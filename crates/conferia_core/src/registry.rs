//! Material registry: CRUD over materials on top of an injected store.

use crate::directory::SectorDirectory;
use crate::error::{ConferiaError, Result};
use crate::store::MaterialStore;
use crate::types::{
    Conference, DashboardStats, Material, MaterialFilter, MaterialPatch, MaterialStatus,
    NewMaterial, Role,
};
use crate::validate::{validate_new_material, validate_patch};
use chrono::Utc;
use conferia_ids::{MaterialId, QrToken};
use std::sync::Arc;
use tracing::info;

/// Attempts before giving up on QR token generation. Collisions on a 64-bit
/// token space are astronomically unlikely; the loop exists so a collision is
/// handled instead of silently producing a duplicate.
const MAX_QR_ATTEMPTS: usize = 5;

/// CRUD entry point. All writes validate first; nothing reaches the store on
/// a validation failure.
#[derive(Clone)]
pub struct MaterialRegistry {
    store: Arc<dyn MaterialStore>,
}

impl MaterialRegistry {
    pub fn new(store: Arc<dyn MaterialStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<dyn MaterialStore> {
        &self.store
    }

    /// Sector/Room directory as persisted in the store.
    pub async fn directory(&self) -> Result<SectorDirectory> {
        Ok(SectorDirectory::new(self.store.list_sectors().await?))
    }

    /// Register a new material. Generates id and QR token, starts at
    /// `not_checked` with no conference history.
    pub async fn create(&self, req: NewMaterial) -> Result<Material> {
        let req = validate_new_material(&req)?;
        self.directory()
            .await?
            .validate_pair(&req.sector, &req.room)?;

        if self.store.asset_tag_exists(&req.asset_tag, None).await? {
            return Err(ConferiaError::conflict(format!(
                "Asset tag {} is already registered",
                req.asset_tag
            )));
        }

        let id = MaterialId::new();
        let qr_token = self.fresh_qr_token(&id, &req.name).await?;

        let now = Utc::now();
        let material = Material {
            id,
            name: req.name,
            asset_tag: req.asset_tag,
            sector: req.sector,
            room: req.room,
            responsible: req.responsible,
            notes: req.notes,
            qr_token,
            status: MaterialStatus::NotChecked,
            last_conference: None,
            created_at: now,
            updated_at: now,
        };
        self.store.insert_material(&material).await?;
        info!(id = %material.id, asset_tag = %material.asset_tag, "Material registered");
        Ok(material)
    }

    async fn fresh_qr_token(&self, id: &MaterialId, name: &str) -> Result<QrToken> {
        for _ in 0..MAX_QR_ATTEMPTS {
            let token = QrToken::generate(id, name);
            if !self.store.qr_token_exists(&token).await? {
                return Ok(token);
            }
        }
        Err(ConferiaError::conflict(
            "Could not generate a unique QR token",
        ))
    }

    pub async fn get(&self, id: &MaterialId) -> Result<Material> {
        self.store
            .get_material(id)
            .await?
            .ok_or_else(|| ConferiaError::not_found(format!("Material {id}")))
    }

    pub async fn get_by_qr(&self, token: &QrToken) -> Result<Material> {
        self.store
            .get_material_by_qr(token)
            .await?
            .ok_or_else(|| ConferiaError::not_found(format!("No material with QR token {token}")))
    }

    pub async fn list(&self, filter: &MaterialFilter) -> Result<Vec<Material>> {
        self.store.list_materials(filter).await
    }

    /// Partial update. Expected location changes are validated against the
    /// directory as a pair; asset tag changes re-check uniqueness.
    pub async fn update(&self, id: &MaterialId, patch: MaterialPatch) -> Result<Material> {
        let patch = validate_patch(&patch)?;
        let mut material = self.get(id).await?;

        if patch.sector.is_some() || patch.room.is_some() {
            let sector = patch.sector.as_deref().unwrap_or(&material.sector);
            let room = patch.room.as_deref().unwrap_or(&material.room);
            self.directory().await?.validate_pair(sector, room)?;
        }

        if let Some(ref tag) = patch.asset_tag {
            if tag != &material.asset_tag && self.store.asset_tag_exists(tag, Some(id)).await? {
                return Err(ConferiaError::conflict(format!(
                    "Asset tag {tag} is already registered"
                )));
            }
        }

        if let Some(name) = patch.name {
            material.name = name;
        }
        if let Some(asset_tag) = patch.asset_tag {
            material.asset_tag = asset_tag;
        }
        if let Some(sector) = patch.sector {
            material.sector = sector;
        }
        if let Some(room) = patch.room {
            material.room = room;
        }
        if let Some(responsible) = patch.responsible {
            material.responsible = responsible;
        }
        if let Some(notes) = patch.notes {
            material.notes = notes;
        }
        material.updated_at = Utc::now();

        self.store.save_material(&material).await?;
        info!(id = %material.id, "Material updated");
        Ok(material)
    }

    /// Remove a material and its history. Admin-only.
    pub async fn delete(&self, id: &MaterialId, actor: Role) -> Result<()> {
        if actor != Role::Admin {
            return Err(ConferiaError::unauthorized(
                "Only administrators can delete materials",
            ));
        }
        if !self.store.delete_material(id).await? {
            return Err(ConferiaError::not_found(format!("Material {id}")));
        }
        info!(id = %id, "Material deleted");
        Ok(())
    }

    /// Conference history, newest first. Not-found if the material is absent.
    pub async fn history(&self, id: &MaterialId) -> Result<Vec<Conference>> {
        self.get(id).await?;
        self.store.list_conferences(id).await
    }

    pub async fn stats(&self) -> Result<DashboardStats> {
        self.store.stats().await
    }
}
