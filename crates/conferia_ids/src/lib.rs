//! Shared identifier wrappers for Conferia.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use uuid::Uuid;

/// Error returned when parsing an identifier or token fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdParseError {
    message: String,
}

impl IdParseError {
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for IdParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for IdParseError {}

macro_rules! define_uuid_id {
    ($name:ident, $label:expr) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn new() -> Self {
                Self(Uuid::new_v4().to_string())
            }

            pub fn parse(value: &str) -> Result<Self, IdParseError> {
                Uuid::parse_str(value)
                    .map_err(|e| IdParseError::new(format!("Invalid {}: {}", $label, e)))?;
                Ok(Self(value.to_string()))
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl std::str::FromStr for $name {
            type Err = IdParseError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::parse(s)
            }
        }
    };
}

define_uuid_id!(MaterialId, "material ID");
define_uuid_id!(ConferenceId, "conference ID");
define_uuid_id!(SectorId, "sector ID");

/// Number of hex characters in a QR token.
pub const QR_TOKEN_LEN: usize = 16;

/// Opaque token printed inside a material's QR code.
///
/// Distinct from the human-facing asset tag: 16 lowercase hex characters,
/// derived from the material identity at creation time. Scan lookup goes
/// through this token only.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QrToken(String);

impl QrToken {
    /// Derive a token for a freshly created material.
    ///
    /// SHA-256 over id, name and a nanosecond timestamp, truncated to 16 hex
    /// chars. Uniqueness is still checked against the store by the caller;
    /// on collision a new token is derived (the timestamp changes).
    pub fn generate(material_id: &MaterialId, name: &str) -> Self {
        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_nanos())
            .unwrap_or(0);
        let mut hasher = Sha256::new();
        hasher.update(material_id.as_str().as_bytes());
        hasher.update(b"-");
        hasher.update(name.as_bytes());
        hasher.update(b"-");
        hasher.update(nanos.to_le_bytes());
        let digest = hasher.finalize();
        let hex: String = digest
            .iter()
            .take(QR_TOKEN_LEN / 2)
            .map(|b| format!("{:02x}", b))
            .collect();
        Self(hex)
    }

    /// Parse a token decoded from a scanned QR code.
    ///
    /// Accepts uppercase input (some scanners shout) and normalizes to
    /// lowercase.
    pub fn parse(value: &str) -> Result<Self, IdParseError> {
        let normalized = value.trim().to_lowercase();
        if normalized.len() != QR_TOKEN_LEN {
            return Err(IdParseError::new(format!(
                "Invalid QR token: expected {} hex chars, got {}",
                QR_TOKEN_LEN,
                normalized.len()
            )));
        }
        if !normalized.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(IdParseError::new(
                "Invalid QR token: non-hex character".to_string(),
            ));
        }
        Ok(Self(normalized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for QrToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for QrToken {
    type Err = IdParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
