//! Persistence boundary for the material registry.
//!
//! The engine and registry only ever talk to this trait; backends live in
//! their own crates (`conferia_db` for SQLite) and the in-memory store in
//! [`crate::memory`] backs the unit tests.

use crate::error::Result;
use crate::types::{
    Conference, DashboardStats, Material, MaterialFilter, MaterialStatus, Sector,
};
use async_trait::async_trait;
use conferia_ids::{MaterialId, QrToken};

/// Store operations over the Material shape.
///
/// Implementations must not apply business rules: validation, uniqueness
/// decisions and status transitions are made by the callers, the store only
/// guarantees that each method is atomic.
#[async_trait]
pub trait MaterialStore: Send + Sync {
    async fn insert_material(&self, material: &Material) -> Result<()>;

    async fn get_material(&self, id: &MaterialId) -> Result<Option<Material>>;

    async fn get_material_by_qr(&self, token: &QrToken) -> Result<Option<Material>>;

    /// Whether an asset tag is already taken, optionally ignoring one
    /// material (the one being updated).
    async fn asset_tag_exists(&self, tag: &str, exclude: Option<&MaterialId>) -> Result<bool>;

    async fn qr_token_exists(&self, token: &QrToken) -> Result<bool>;

    /// Persist an updated material. Errors with `NotFound` if the id is
    /// absent.
    async fn save_material(&self, material: &Material) -> Result<()>;

    /// Remove a material and its conference history. Returns `false` if the
    /// id was absent.
    async fn delete_material(&self, id: &MaterialId) -> Result<bool>;

    async fn list_materials(&self, filter: &MaterialFilter) -> Result<Vec<Material>>;

    /// Atomically append a conference record and move its material to
    /// `new_status` with the conference as its latest.
    async fn record_conference(
        &self,
        conference: &Conference,
        new_status: MaterialStatus,
    ) -> Result<()>;

    /// Conference history for one material, newest first.
    async fn list_conferences(&self, material_id: &MaterialId) -> Result<Vec<Conference>>;

    /// Reference sectors, in seed order.
    async fn list_sectors(&self) -> Result<Vec<Sector>>;

    async fn stats(&self) -> Result<DashboardStats>;
}
