//! Shared command context: one open store, registry and engine per process.

use anyhow::Context;
use conferia_core::{MaterialRegistry, MaterialStore, ReconciliationEngine};
use conferia_db::ConferiaDb;
use std::path::Path;
use std::sync::Arc;

pub struct CliContext {
    pub registry: MaterialRegistry,
    pub engine: ReconciliationEngine,
}

impl CliContext {
    /// Open the database (creating it on first use) and wire up the registry
    /// and engine.
    pub async fn open(db_override: Option<&Path>) -> anyhow::Result<Self> {
        let db_path = db_override
            .map(|p| p.to_path_buf())
            .unwrap_or_else(conferia_logging::default_db_path);

        tracing::debug!(path = %db_path.display(), "Opening database");
        let db = ConferiaDb::open(&db_path)
            .await
            .with_context(|| format!("Failed to open database: {}", db_path.display()))?;
        let store: Arc<dyn MaterialStore> = Arc::new(db);

        Ok(Self {
            registry: MaterialRegistry::new(store.clone()),
            engine: ReconciliationEngine::new(store),
        })
    }
}
