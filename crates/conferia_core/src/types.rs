//! Unified types for all Conferia entities.
//!
//! These types are the single source of truth. All interfaces (CLI, store
//! backends, tests) should use these types.

use chrono::{DateTime, Utc};
use conferia_ids::{ConferenceId, MaterialId, QrToken, SectorId};
use serde::{Deserialize, Serialize};

// ============================================================================
// Material
// ============================================================================

/// Conference status of a material.
///
/// Every scan re-evaluates the status; a material never goes back to
/// `NotChecked` once it has been scanned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaterialStatus {
    /// Never scanned since creation.
    NotChecked,
    /// Last scan found it at its expected location.
    CheckedCorrect,
    /// Last scan found it somewhere else.
    CheckedOtherLocation,
}

impl MaterialStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotChecked => "not_checked",
            Self::CheckedCorrect => "checked_correct",
            Self::CheckedOtherLocation => "checked_other_location",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "not_checked" => Some(Self::NotChecked),
            "checked_correct" => Some(Self::CheckedCorrect),
            "checked_other_location" => Some(Self::CheckedOtherLocation),
            _ => None,
        }
    }
}

impl std::fmt::Display for MaterialStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A tracked physical asset.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Material {
    /// Unique identifier.
    pub id: MaterialId,
    /// Human-readable description.
    pub name: String,
    /// External identifier ("BMP" code); unique, immutable after creation.
    pub asset_tag: String,
    /// Expected sector. Not changed by scans.
    pub sector: String,
    /// Expected room within the sector. Not changed by scans.
    pub room: String,
    /// Owner name.
    pub responsible: String,
    /// Free-text notes.
    pub notes: Option<String>,
    /// Opaque token encoded in the printed QR code; unique, immutable.
    pub qr_token: QrToken,
    /// Derived from the newest conference record.
    pub status: MaterialStatus,
    /// Newest conference record, if any.
    pub last_conference: Option<ConferenceOutcome>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Where a material was found on its most recent scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConferenceOutcome {
    pub scanned_at: DateTime<Utc>,
    pub found_sector: String,
    pub found_room: String,
}

/// One entry in a material's append-only conference history.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Conference {
    pub id: ConferenceId,
    pub material_id: MaterialId,
    pub found_sector: String,
    pub found_room: String,
    /// Whether the found location matched the expected location at scan time.
    pub was_correct: bool,
    pub scanned_at: DateTime<Utc>,
}

// ============================================================================
// Requests
// ============================================================================

/// Fully-typed creation request, validated at the boundary.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewMaterial {
    pub name: String,
    pub asset_tag: String,
    pub sector: String,
    pub room: String,
    pub responsible: String,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Partial update. `None` fields are left untouched.
///
/// `id`, `qr_token`, `created_at`, `status` and the conference history are
/// only ever mutated by `create` and `scan`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaterialPatch {
    pub name: Option<String>,
    pub asset_tag: Option<String>,
    pub sector: Option<String>,
    pub room: Option<String>,
    pub responsible: Option<String>,
    /// `Some(None)` clears the notes; `None` leaves them alone.
    pub notes: Option<Option<String>>,
}

impl MaterialPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.asset_tag.is_none()
            && self.sector.is_none()
            && self.room.is_none()
            && self.responsible.is_none()
            && self.notes.is_none()
    }
}

/// Filter for listing materials.
#[derive(Debug, Clone, Default)]
pub struct MaterialFilter {
    /// Substring match over name, asset tag and responsible.
    pub search: Option<String>,
    pub status: Option<MaterialStatus>,
    pub sector: Option<String>,
    pub room: Option<String>,
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}

// ============================================================================
// Sectors
// ============================================================================

/// A sector and the rooms inside it. Static reference data.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sector {
    pub id: SectorId,
    pub name: String,
    /// Ordered room names; a room belongs to exactly one sector.
    pub rooms: Vec<String>,
}

// ============================================================================
// Actors
// ============================================================================

/// Role of the operator invoking an operation.
///
/// Authentication itself is an external collaborator; only the role reaches
/// this layer, and only delete checks it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Operator,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Operator => "operator",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "admin" => Some(Self::Admin),
            // "operador" kept for data imported from the legacy system
            "operator" | "operador" => Some(Self::Operator),
            _ => None,
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// Statistics
// ============================================================================

/// Aggregate counts for the dashboard.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_materials: u64,
    pub checked_correct: u64,
    pub checked_other_location: u64,
    pub not_checked: u64,
    /// Distinct sectors currently holding at least one material.
    pub sectors_in_use: u64,
    /// Percentage of materials scanned at least once, rounded to 2 decimals.
    pub conference_rate: f64,
}

impl DashboardStats {
    /// Compute the conference rate from the counters.
    pub fn with_rate(mut self) -> Self {
        let checked = self.checked_correct + self.checked_other_location;
        self.conference_rate = if self.total_materials == 0 {
            0.0
        } else {
            (checked as f64 / self.total_materials as f64 * 10_000.0).round() / 100.0
        };
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_roundtrip() {
        for status in [
            MaterialStatus::NotChecked,
            MaterialStatus::CheckedCorrect,
            MaterialStatus::CheckedOtherLocation,
        ] {
            let s = status.as_str();
            let parsed = MaterialStatus::parse(s).unwrap();
            assert_eq!(status, parsed);
        }
    }

    #[test]
    fn role_parse_accepts_legacy_spelling() {
        assert_eq!(Role::parse("operador"), Some(Role::Operator));
        assert_eq!(Role::parse("ADMIN"), Some(Role::Admin));
        assert_eq!(Role::parse("root"), None);
    }

    #[test]
    fn conference_rate_rounding() {
        let stats = DashboardStats {
            total_materials: 3,
            checked_correct: 1,
            checked_other_location: 0,
            not_checked: 2,
            sectors_in_use: 1,
            conference_rate: 0.0,
        }
        .with_rate();
        assert_eq!(stats.conference_rate, 33.33);
    }

    #[test]
    fn conference_rate_empty_registry() {
        let stats = DashboardStats::default().with_rate();
        assert_eq!(stats.conference_rate, 0.0);
    }
}
