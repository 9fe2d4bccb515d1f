//! End-to-end registry + engine flow against the SQLite store.

use conferia_core::{
    ConferiaError, MaterialFilter, MaterialPatch, MaterialRegistry, MaterialStatus, MaterialStore,
    NewMaterial, QrToken, ReconciliationEngine, Role,
};
use conferia_db::ConferiaDb;
use std::sync::Arc;
use tempfile::TempDir;

async fn open_store(tmp: &TempDir) -> Arc<dyn MaterialStore> {
    let db = ConferiaDb::open(tmp.path().join("conferia.sqlite3"))
        .await
        .expect("open db");
    Arc::new(db)
}

fn new_material(tag: &str, sector: &str, room: &str) -> NewMaterial {
    NewMaterial {
        name: format!("Notebook {tag}"),
        asset_tag: tag.to_string(),
        sector: sector.to_string(),
        room: room.to_string(),
        responsible: "Maria Silva".to_string(),
        notes: Some("lacre ok".to_string()),
    }
}

#[tokio::test]
async fn create_and_fetch_roundtrip() {
    let tmp = TempDir::new().unwrap();
    let registry = MaterialRegistry::new(open_store(&tmp).await);

    let created = registry
        .create(new_material("BMP-100", "TI", "Escritório TI"))
        .await
        .unwrap();
    assert_eq!(created.status, MaterialStatus::NotChecked);

    let fetched = registry.get(&created.id).await.unwrap();
    assert_eq!(fetched.asset_tag, "BMP-100");
    assert_eq!(fetched.qr_token, created.qr_token);
    assert_eq!(fetched.notes.as_deref(), Some("lacre ok"));
    assert!(fetched.last_conference.is_none());

    let by_qr = registry.get_by_qr(&created.qr_token).await.unwrap();
    assert_eq!(by_qr.id, created.id);
}

#[tokio::test]
async fn duplicate_asset_tag_rejected() {
    let tmp = TempDir::new().unwrap();
    let registry = MaterialRegistry::new(open_store(&tmp).await);

    registry
        .create(new_material("BMP-100", "TI", "Escritório TI"))
        .await
        .unwrap();
    let err = registry
        .create(new_material("BMP-100", "TI", "Sala Técnica"))
        .await
        .unwrap_err();
    assert!(matches!(err, ConferiaError::Conflict(_)));
}

#[tokio::test]
async fn scan_correct_and_wrong_location() {
    let tmp = TempDir::new().unwrap();
    let store = open_store(&tmp).await;
    let registry = MaterialRegistry::new(store.clone());
    let engine = ReconciliationEngine::new(store);

    let material = registry
        .create(new_material("BMP-100", "Administração", "Sala 101"))
        .await
        .unwrap();

    let wrong = engine
        .scan(&material.qr_token, "TI", "Sala Técnica")
        .await
        .unwrap();
    assert!(!wrong.was_correct());
    assert_eq!(wrong.material.status, MaterialStatus::CheckedOtherLocation);
    // expected location untouched by the scan
    assert_eq!(wrong.material.sector, "Administração");

    let right = engine
        .scan(&material.qr_token, "Administração", "Sala 101")
        .await
        .unwrap();
    assert!(right.was_correct());

    let history = registry.history(&material.id).await.unwrap();
    assert_eq!(history.len(), 2);
    assert!(history[0].was_correct);
    assert!(!history[1].was_correct);

    let stored = registry.get(&material.id).await.unwrap();
    assert_eq!(stored.status, MaterialStatus::CheckedCorrect);
    let last = stored.last_conference.unwrap();
    assert_eq!(last.found_sector, "Administração");
    assert_eq!(last.found_room, "Sala 101");
}

#[tokio::test]
async fn unknown_token_reports_not_found() {
    let tmp = TempDir::new().unwrap();
    let store = open_store(&tmp).await;
    let engine = ReconciliationEngine::new(store.clone());

    let ghost = QrToken::parse("00000000deadbeef").unwrap();
    let err = engine.scan(&ghost, "TI", "Sala Técnica").await.unwrap_err();
    assert!(matches!(err, ConferiaError::NotFound(_)));
}

#[tokio::test]
async fn update_persists_and_preserves_immutable_fields() {
    let tmp = TempDir::new().unwrap();
    let registry = MaterialRegistry::new(open_store(&tmp).await);

    let material = registry
        .create(new_material("BMP-100", "TI", "Escritório TI"))
        .await
        .unwrap();

    let updated = registry
        .update(
            &material.id,
            MaterialPatch {
                responsible: Some("João Souza".into()),
                sector: Some("Almoxarifado".into()),
                room: Some("Depósito 1".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.responsible, "João Souza");
    assert_eq!(updated.qr_token, material.qr_token);
    assert_eq!(updated.created_at, material.created_at);

    let reread = registry.get(&material.id).await.unwrap();
    assert_eq!(reread.sector, "Almoxarifado");
    assert_eq!(reread.room, "Depósito 1");
}

#[tokio::test]
async fn list_filters_and_paginates() {
    let tmp = TempDir::new().unwrap();
    let store = open_store(&tmp).await;
    let registry = MaterialRegistry::new(store.clone());
    let engine = ReconciliationEngine::new(store);

    for (i, room) in ["Escritório TI", "Sala Técnica", "Data Center"]
        .iter()
        .enumerate()
    {
        registry
            .create(new_material(&format!("BMP-{i}"), "TI", room))
            .await
            .unwrap();
    }
    let target = registry
        .list(&MaterialFilter {
            search: Some("BMP-1".into()),
            ..Default::default()
        })
        .await
        .unwrap()
        .remove(0);
    engine
        .scan(&target.qr_token, "TI", "Sala Técnica")
        .await
        .unwrap();

    let checked = registry
        .list(&MaterialFilter {
            status: Some(MaterialStatus::CheckedCorrect),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(checked.len(), 1);
    assert_eq!(checked[0].asset_tag, "BMP-1");

    let page = registry
        .list(&MaterialFilter {
            limit: Some(2),
            offset: Some(1),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(page.len(), 2);
}

#[tokio::test]
async fn operator_delete_denied_admin_delete_cascades() {
    let tmp = TempDir::new().unwrap();
    let store = open_store(&tmp).await;
    let registry = MaterialRegistry::new(store.clone());
    let engine = ReconciliationEngine::new(store.clone());

    let material = registry
        .create(new_material("BMP-100", "TI", "Escritório TI"))
        .await
        .unwrap();
    engine
        .scan(&material.qr_token, "TI", "Escritório TI")
        .await
        .unwrap();

    let err = registry
        .delete(&material.id, Role::Operator)
        .await
        .unwrap_err();
    assert!(matches!(err, ConferiaError::Unauthorized(_)));
    assert!(registry.get(&material.id).await.is_ok());

    registry.delete(&material.id, Role::Admin).await.unwrap();
    assert!(registry.get(&material.id).await.is_err());
    let orphaned = store.list_conferences(&material.id).await.unwrap();
    assert!(orphaned.is_empty());
}

#[tokio::test]
async fn stats_match_registry_state() {
    let tmp = TempDir::new().unwrap();
    let store = open_store(&tmp).await;
    let registry = MaterialRegistry::new(store.clone());
    let engine = ReconciliationEngine::new(store);

    let a = registry
        .create(new_material("BMP-1", "TI", "Escritório TI"))
        .await
        .unwrap();
    let b = registry
        .create(new_material("BMP-2", "Administração", "Sala 101"))
        .await
        .unwrap();
    registry
        .create(new_material("BMP-3", "Administração", "Sala 102"))
        .await
        .unwrap();

    engine.scan(&a.qr_token, "TI", "Escritório TI").await.unwrap();
    engine.scan(&b.qr_token, "TI", "Sala Técnica").await.unwrap();

    let stats = registry.stats().await.unwrap();
    assert_eq!(stats.total_materials, 3);
    assert_eq!(stats.checked_correct, 1);
    assert_eq!(stats.checked_other_location, 1);
    assert_eq!(stats.not_checked, 1);
    assert_eq!(stats.sectors_in_use, 2);
    assert_eq!(stats.conference_rate, 66.67);
}

#[tokio::test]
async fn state_survives_reopen() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("conferia.sqlite3");

    let created = {
        let db = ConferiaDb::open(&path).await.unwrap();
        let registry = MaterialRegistry::new(Arc::new(db) as Arc<dyn MaterialStore>);
        registry
            .create(new_material("BMP-100", "TI", "Escritório TI"))
            .await
            .unwrap()
    };

    let db = ConferiaDb::open_existing(&path).await.unwrap();
    let registry = MaterialRegistry::new(Arc::new(db) as Arc<dyn MaterialStore>);
    let reread = registry.get(&created.id).await.unwrap();
    assert_eq!(reread.asset_tag, "BMP-100");
    assert_eq!(reread.qr_token, created.qr_token);
}
