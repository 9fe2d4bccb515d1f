//! Conferia core: domain model and reconciliation engine for the material
//! control system.
//!
//! Materials are registered with an expected location (sector + room) and an
//! opaque QR token. Scanning the token at an observed location appends a
//! conference record and classifies the material as found at its expected
//! location or somewhere else.
//!
//! Storage is behind the [`MaterialStore`] trait; `conferia_db` provides the
//! SQLite backend, [`memory::InMemoryStore`] backs unit tests.

mod directory;
mod engine;
mod error;
mod registry;
mod store;
mod types;

pub mod memory;
pub mod validate;

pub use directory::SectorDirectory;
pub use engine::{location_matches, ReconciliationEngine, ScanOutcome};
pub use error::{ConferiaError, Result};
pub use registry::MaterialRegistry;
pub use store::MaterialStore;
pub use types::*;

pub use conferia_ids::{ConferenceId, IdParseError, MaterialId, QrToken, SectorId};
