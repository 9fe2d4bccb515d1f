//! In-memory `MaterialStore`, the direct descendant of the legacy client-side
//! registry. Used by unit tests and as a reference implementation of the
//! store contract.

use crate::directory::SectorDirectory;
use crate::error::{ConferiaError, Result};
use crate::store::MaterialStore;
use crate::types::{
    Conference, ConferenceOutcome, DashboardStats, Material, MaterialFilter, MaterialStatus,
    Sector,
};
use async_trait::async_trait;
use conferia_ids::{MaterialId, QrToken};
use std::collections::HashMap;
use std::sync::Mutex;

#[derive(Default)]
struct Inner {
    materials: HashMap<MaterialId, Material>,
    conferences: Vec<Conference>,
    sectors: Vec<Sector>,
}

/// Mutex-guarded map store. Last write wins, matching the domain's tolerance
/// for human-reconciled consistency.
pub struct InMemoryStore {
    inner: Mutex<Inner>,
}

impl InMemoryStore {
    /// Empty store with the default sector seed.
    pub fn new() -> Self {
        Self::with_sectors(SectorDirectory::default_seed().sectors().to_vec())
    }

    pub fn with_sectors(sectors: Vec<Sector>) -> Self {
        Self {
            inner: Mutex::new(Inner {
                sectors,
                ..Default::default()
            }),
        }
    }

    fn matches(filter: &MaterialFilter, material: &Material) -> bool {
        if let Some(ref status) = filter.status {
            if material.status != *status {
                return false;
            }
        }
        if let Some(ref sector) = filter.sector {
            if &material.sector != sector {
                return false;
            }
        }
        if let Some(ref room) = filter.room {
            if &material.room != room {
                return false;
            }
        }
        if let Some(ref search) = filter.search {
            let needle = search.to_lowercase();
            let hit = material.name.to_lowercase().contains(&needle)
                || material.asset_tag.to_lowercase().contains(&needle)
                || material.responsible.to_lowercase().contains(&needle);
            if !hit {
                return false;
            }
        }
        true
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MaterialStore for InMemoryStore {
    async fn insert_material(&self, material: &Material) -> Result<()> {
        let mut inner = self.inner.lock().expect("store lock poisoned");
        inner
            .materials
            .insert(material.id.clone(), material.clone());
        Ok(())
    }

    async fn get_material(&self, id: &MaterialId) -> Result<Option<Material>> {
        let inner = self.inner.lock().expect("store lock poisoned");
        Ok(inner.materials.get(id).cloned())
    }

    async fn get_material_by_qr(&self, token: &QrToken) -> Result<Option<Material>> {
        let inner = self.inner.lock().expect("store lock poisoned");
        Ok(inner
            .materials
            .values()
            .find(|m| &m.qr_token == token)
            .cloned())
    }

    async fn asset_tag_exists(&self, tag: &str, exclude: Option<&MaterialId>) -> Result<bool> {
        let inner = self.inner.lock().expect("store lock poisoned");
        Ok(inner
            .materials
            .values()
            .any(|m| m.asset_tag == tag && Some(&m.id) != exclude))
    }

    async fn qr_token_exists(&self, token: &QrToken) -> Result<bool> {
        let inner = self.inner.lock().expect("store lock poisoned");
        Ok(inner.materials.values().any(|m| &m.qr_token == token))
    }

    async fn save_material(&self, material: &Material) -> Result<()> {
        let mut inner = self.inner.lock().expect("store lock poisoned");
        if !inner.materials.contains_key(&material.id) {
            return Err(ConferiaError::not_found(format!(
                "Material {}",
                material.id
            )));
        }
        inner
            .materials
            .insert(material.id.clone(), material.clone());
        Ok(())
    }

    async fn delete_material(&self, id: &MaterialId) -> Result<bool> {
        let mut inner = self.inner.lock().expect("store lock poisoned");
        let removed = inner.materials.remove(id).is_some();
        if removed {
            inner.conferences.retain(|c| &c.material_id != id);
        }
        Ok(removed)
    }

    async fn list_materials(&self, filter: &MaterialFilter) -> Result<Vec<Material>> {
        let inner = self.inner.lock().expect("store lock poisoned");
        let mut materials: Vec<Material> = inner
            .materials
            .values()
            .filter(|m| Self::matches(filter, m))
            .cloned()
            .collect();
        materials.sort_by(|a, b| a.name.cmp(&b.name).then(a.asset_tag.cmp(&b.asset_tag)));
        let offset = filter.offset.unwrap_or(0);
        let materials: Vec<Material> = materials
            .into_iter()
            .skip(offset)
            .take(filter.limit.unwrap_or(usize::MAX))
            .collect();
        Ok(materials)
    }

    async fn record_conference(
        &self,
        conference: &Conference,
        new_status: MaterialStatus,
    ) -> Result<()> {
        let mut inner = self.inner.lock().expect("store lock poisoned");
        let material = inner
            .materials
            .get_mut(&conference.material_id)
            .ok_or_else(|| {
                ConferiaError::not_found(format!("Material {}", conference.material_id))
            })?;
        material.status = new_status;
        material.last_conference = Some(ConferenceOutcome {
            scanned_at: conference.scanned_at,
            found_sector: conference.found_sector.clone(),
            found_room: conference.found_room.clone(),
        });
        material.updated_at = conference.scanned_at;
        inner.conferences.push(conference.clone());
        Ok(())
    }

    async fn list_conferences(&self, material_id: &MaterialId) -> Result<Vec<Conference>> {
        let inner = self.inner.lock().expect("store lock poisoned");
        // Appended chronologically; ties on scanned_at keep insertion order.
        let mut history: Vec<Conference> = inner
            .conferences
            .iter()
            .rev()
            .filter(|c| &c.material_id == material_id)
            .cloned()
            .collect();
        history.sort_by(|a, b| b.scanned_at.cmp(&a.scanned_at));
        Ok(history)
    }

    async fn list_sectors(&self) -> Result<Vec<Sector>> {
        let inner = self.inner.lock().expect("store lock poisoned");
        Ok(inner.sectors.clone())
    }

    async fn stats(&self) -> Result<DashboardStats> {
        let inner = self.inner.lock().expect("store lock poisoned");
        let mut stats = DashboardStats {
            total_materials: inner.materials.len() as u64,
            ..Default::default()
        };
        let mut sectors: Vec<&str> = Vec::new();
        for material in inner.materials.values() {
            match material.status {
                MaterialStatus::NotChecked => stats.not_checked += 1,
                MaterialStatus::CheckedCorrect => stats.checked_correct += 1,
                MaterialStatus::CheckedOtherLocation => stats.checked_other_location += 1,
            }
            if !sectors.contains(&material.sector.as_str()) {
                sectors.push(material.sector.as_str());
            }
        }
        stats.sectors_in_use = sectors.len() as u64;
        Ok(stats.with_rate())
    }
}
