//! Reconciliation engine: given a scan, decide whether a material is where it
//! is supposed to be and record the outcome.

use crate::directory::SectorDirectory;
use crate::error::{ConferiaError, Result};
use crate::store::MaterialStore;
use crate::types::{Conference, Material, MaterialStatus};
use crate::validate::normalize;
use chrono::Utc;
use conferia_ids::{ConferenceId, QrToken};
use serde::Serialize;
use std::sync::Arc;
use tracing::info;

/// Result of a processed scan.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanOutcome {
    /// The material after the transition.
    pub material: Material,
    /// The appended conference record.
    pub conference: Conference,
}

impl ScanOutcome {
    pub fn was_correct(&self) -> bool {
        self.conference.was_correct
    }
}

/// Decision rule: a scan is correct only when both sector and room match the
/// expected location. Inputs are assumed normalized.
pub fn location_matches(
    expected_sector: &str,
    expected_room: &str,
    observed_sector: &str,
    observed_room: &str,
) -> bool {
    expected_sector == observed_sector && expected_room == observed_room
}

/// Processes scan events against an injected store.
#[derive(Clone)]
pub struct ReconciliationEngine {
    store: Arc<dyn MaterialStore>,
}

impl ReconciliationEngine {
    pub fn new(store: Arc<dyn MaterialStore>) -> Self {
        Self { store }
    }

    /// Record a conference for the material behind `token`, observed at
    /// `(observed_sector, observed_room)`.
    ///
    /// The observed pair must exist in the Sector/Room directory. An unknown
    /// token is an explicit not-found error, never a silent no-op. The
    /// material's expected location is not changed; only the observed
    /// location and the resulting status are recorded. Repeating the same
    /// scan yields the same final state (last write wins).
    pub async fn scan(
        &self,
        token: &QrToken,
        observed_sector: &str,
        observed_room: &str,
    ) -> Result<ScanOutcome> {
        let observed_sector = normalize(observed_sector);
        let observed_room = normalize(observed_room);
        if observed_sector.is_empty() || observed_room.is_empty() {
            return Err(ConferiaError::validation(
                "Observed sector and room are required",
            ));
        }

        let directory = SectorDirectory::new(self.store.list_sectors().await?);
        directory.validate_pair(&observed_sector, &observed_room)?;

        let mut material = self
            .store
            .get_material_by_qr(token)
            .await?
            .ok_or_else(|| {
                ConferiaError::not_found(format!("No material with QR token {token}"))
            })?;

        let was_correct = location_matches(
            &material.sector,
            &material.room,
            &observed_sector,
            &observed_room,
        );
        let new_status = if was_correct {
            MaterialStatus::CheckedCorrect
        } else {
            MaterialStatus::CheckedOtherLocation
        };

        let conference = Conference {
            id: ConferenceId::new(),
            material_id: material.id.clone(),
            found_sector: observed_sector,
            found_room: observed_room,
            was_correct,
            scanned_at: Utc::now(),
        };
        self.store
            .record_conference(&conference, new_status)
            .await?;

        material.status = new_status;
        material.last_conference = Some(crate::types::ConferenceOutcome {
            scanned_at: conference.scanned_at,
            found_sector: conference.found_sector.clone(),
            found_room: conference.found_room.clone(),
        });
        material.updated_at = conference.scanned_at;

        info!(
            material = %material.id,
            asset_tag = %material.asset_tag,
            correct = was_correct,
            "Conference recorded"
        );
        Ok(ScanOutcome {
            material,
            conference,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::InMemoryStore;
    use crate::registry::MaterialRegistry;
    use crate::types::{NewMaterial, Role};

    fn harness() -> (MaterialRegistry, ReconciliationEngine) {
        let store: Arc<dyn MaterialStore> = Arc::new(InMemoryStore::new());
        (
            MaterialRegistry::new(store.clone()),
            ReconciliationEngine::new(store),
        )
    }

    async fn seeded_material(registry: &MaterialRegistry, sector: &str, room: &str) -> Material {
        registry
            .create(NewMaterial {
                name: "Notebook Dell".into(),
                asset_tag: "BMP-1".into(),
                sector: sector.into(),
                room: room.into(),
                responsible: "Maria Silva".into(),
                notes: None,
            })
            .await
            .unwrap()
    }

    #[test]
    fn decision_rule_requires_both_fields() {
        assert!(location_matches("TI", "Sala Técnica", "TI", "Sala Técnica"));
        assert!(!location_matches("TI", "Sala Técnica", "TI", "Data Center"));
        assert!(!location_matches(
            "TI",
            "Sala Técnica",
            "Administração",
            "Sala Técnica"
        ));
    }

    #[tokio::test]
    async fn scan_at_expected_location_is_correct() {
        let (registry, engine) = harness();
        let material = seeded_material(&registry, "TI", "Escritório TI").await;

        let outcome = engine
            .scan(&material.qr_token, "TI", "Escritório TI")
            .await
            .unwrap();
        assert!(outcome.was_correct());
        assert_eq!(outcome.material.status, MaterialStatus::CheckedCorrect);
        let last = outcome.material.last_conference.unwrap();
        assert_eq!(last.found_sector, "TI");
        assert_eq!(last.found_room, "Escritório TI");
    }

    #[tokio::test]
    async fn scan_elsewhere_is_other_location() {
        let (registry, engine) = harness();
        let material = seeded_material(&registry, "Administração", "Sala 101").await;

        let outcome = engine
            .scan(&material.qr_token, "TI", "Sala Técnica")
            .await
            .unwrap();
        assert!(!outcome.was_correct());
        assert_eq!(
            outcome.material.status,
            MaterialStatus::CheckedOtherLocation
        );
        // expected location untouched
        assert_eq!(outcome.material.sector, "Administração");
        assert_eq!(outcome.material.room, "Sala 101");
    }

    #[tokio::test]
    async fn unknown_token_is_not_found_and_leaves_state_alone() {
        let (registry, engine) = harness();
        let material = seeded_material(&registry, "TI", "Escritório TI").await;

        let ghost = QrToken::parse("00000000deadbeef").unwrap();
        let err = engine.scan(&ghost, "TI", "Escritório TI").await.unwrap_err();
        assert!(matches!(err, ConferiaError::NotFound(_)));

        let unchanged = registry.get(&material.id).await.unwrap();
        assert_eq!(unchanged.status, MaterialStatus::NotChecked);
        assert!(registry.history(&material.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn invalid_pair_is_rejected_before_lookup() {
        let (registry, engine) = harness();
        let material = seeded_material(&registry, "TI", "Escritório TI").await;

        let err = engine
            .scan(&material.qr_token, "TI", "Sala 101")
            .await
            .unwrap_err();
        assert!(matches!(err, ConferiaError::Validation(_)));
        assert!(registry.history(&material.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn repeated_scans_are_idempotent_modulo_timestamp() {
        let (registry, engine) = harness();
        let material = seeded_material(&registry, "TI", "Escritório TI").await;

        let first = engine
            .scan(&material.qr_token, "TI", "Data Center")
            .await
            .unwrap();
        let second = engine
            .scan(&material.qr_token, "TI", "Data Center")
            .await
            .unwrap();
        assert_eq!(first.material.status, second.material.status);
        assert_eq!(
            first.material.last_conference.as_ref().unwrap().found_room,
            second.material.last_conference.as_ref().unwrap().found_room
        );
        // but the history keeps both events
        assert_eq!(registry.history(&material.id).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn scans_can_flip_between_checked_states() {
        let (registry, engine) = harness();
        let material = seeded_material(&registry, "TI", "Escritório TI").await;

        let wrong = engine
            .scan(&material.qr_token, "TI", "Sala Técnica")
            .await
            .unwrap();
        assert_eq!(wrong.material.status, MaterialStatus::CheckedOtherLocation);

        let right = engine
            .scan(&material.qr_token, "TI", "Escritório TI")
            .await
            .unwrap();
        assert_eq!(right.material.status, MaterialStatus::CheckedCorrect);
    }

    #[tokio::test]
    async fn history_is_newest_first() {
        let (registry, engine) = harness();
        let material = seeded_material(&registry, "TI", "Escritório TI").await;

        engine
            .scan(&material.qr_token, "TI", "Sala Técnica")
            .await
            .unwrap();
        engine
            .scan(&material.qr_token, "TI", "Escritório TI")
            .await
            .unwrap();

        let history = registry.history(&material.id).await.unwrap();
        assert_eq!(history.len(), 2);
        assert!(history[0].scanned_at >= history[1].scanned_at);
        assert!(history[0].was_correct);
        assert!(!history[1].was_correct);
    }

    #[tokio::test]
    async fn deleting_material_cascades_history() {
        let (registry, engine) = harness();
        let material = seeded_material(&registry, "TI", "Escritório TI").await;
        engine
            .scan(&material.qr_token, "TI", "Escritório TI")
            .await
            .unwrap();

        registry.delete(&material.id, Role::Admin).await.unwrap();
        let err = registry.history(&material.id).await.unwrap_err();
        assert!(matches!(err, ConferiaError::NotFound(_)));
    }
}
