//! `MaterialStore` implementation for [`ConferiaDb`].

use crate::ConferiaDb;
use async_trait::async_trait;
use conferia_core::{
    Conference, DashboardStats, Material, MaterialFilter, MaterialStatus, MaterialStore, Result,
    Sector,
};
use conferia_ids::{MaterialId, QrToken};

#[async_trait]
impl MaterialStore for ConferiaDb {
    async fn insert_material(&self, material: &Material) -> Result<()> {
        ConferiaDb::insert_material(self, material).await
    }

    async fn get_material(&self, id: &MaterialId) -> Result<Option<Material>> {
        ConferiaDb::get_material(self, id).await
    }

    async fn get_material_by_qr(&self, token: &QrToken) -> Result<Option<Material>> {
        ConferiaDb::get_material_by_qr(self, token).await
    }

    async fn asset_tag_exists(&self, tag: &str, exclude: Option<&MaterialId>) -> Result<bool> {
        ConferiaDb::asset_tag_exists(self, tag, exclude).await
    }

    async fn qr_token_exists(&self, token: &QrToken) -> Result<bool> {
        ConferiaDb::qr_token_exists(self, token).await
    }

    async fn save_material(&self, material: &Material) -> Result<()> {
        ConferiaDb::save_material(self, material).await
    }

    async fn delete_material(&self, id: &MaterialId) -> Result<bool> {
        ConferiaDb::delete_material(self, id).await
    }

    async fn list_materials(&self, filter: &MaterialFilter) -> Result<Vec<Material>> {
        ConferiaDb::list_materials(self, filter).await
    }

    async fn record_conference(
        &self,
        conference: &Conference,
        new_status: MaterialStatus,
    ) -> Result<()> {
        ConferiaDb::record_conference(self, conference, new_status).await
    }

    async fn list_conferences(&self, material_id: &MaterialId) -> Result<Vec<Conference>> {
        ConferiaDb::list_conferences(self, material_id).await
    }

    async fn list_sectors(&self) -> Result<Vec<Sector>> {
        ConferiaDb::list_sectors(self).await
    }

    async fn stats(&self) -> Result<DashboardStats> {
        ConferiaDb::stats(self).await
    }
}
