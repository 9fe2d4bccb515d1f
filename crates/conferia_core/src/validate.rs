//! Boundary validation for creation and update requests.
//!
//! Rules mirror the intake form: required fields must be non-empty after
//! trimming, name and responsible need at least 3 characters, locations are
//! normalized before they are compared or stored.

use crate::error::{ConferiaError, Result};
use crate::types::{MaterialPatch, NewMaterial};

const MIN_NAME_LEN: usize = 3;
const MIN_RESPONSIBLE_LEN: usize = 3;

/// Trim and collapse internal whitespace runs to single spaces.
///
/// Scan input and stored locations must compare equal regardless of how the
/// operator typed them.
pub fn normalize(value: &str) -> String {
    value.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn require(field: &str, value: &str, min_len: usize) -> Result<String> {
    let normalized = normalize(value);
    if normalized.is_empty() {
        return Err(ConferiaError::validation(format!("{field} is required")));
    }
    if normalized.chars().count() < min_len {
        return Err(ConferiaError::validation(format!(
            "{field} must have at least {min_len} characters"
        )));
    }
    Ok(normalized)
}

/// Validate and normalize a creation request. Returns the cleaned request.
pub fn validate_new_material(req: &NewMaterial) -> Result<NewMaterial> {
    Ok(NewMaterial {
        name: require("name", &req.name, MIN_NAME_LEN)?,
        asset_tag: require("asset_tag", &req.asset_tag, 1)?,
        sector: require("sector", &req.sector, 1)?,
        room: require("room", &req.room, 1)?,
        responsible: require("responsible", &req.responsible, MIN_RESPONSIBLE_LEN)?,
        notes: req
            .notes
            .as_deref()
            .map(normalize)
            .filter(|n| !n.is_empty()),
    })
}

/// Validate and normalize a patch. Empty strings are rejected rather than
/// treated as clears; only `notes` can be cleared, via `Some(None)`.
pub fn validate_patch(patch: &MaterialPatch) -> Result<MaterialPatch> {
    if patch.is_empty() {
        return Err(ConferiaError::validation("No fields to update"));
    }
    Ok(MaterialPatch {
        name: patch
            .name
            .as_deref()
            .map(|v| require("name", v, MIN_NAME_LEN))
            .transpose()?,
        asset_tag: patch
            .asset_tag
            .as_deref()
            .map(|v| require("asset_tag", v, 1))
            .transpose()?,
        sector: patch
            .sector
            .as_deref()
            .map(|v| require("sector", v, 1))
            .transpose()?,
        room: patch
            .room
            .as_deref()
            .map(|v| require("room", v, 1))
            .transpose()?,
        responsible: patch
            .responsible
            .as_deref()
            .map(|v| require("responsible", v, MIN_RESPONSIBLE_LEN))
            .transpose()?,
        notes: patch
            .notes
            .clone()
            .map(|n| n.map(|v| normalize(&v)).filter(|v| !v.is_empty())),
    })
}
