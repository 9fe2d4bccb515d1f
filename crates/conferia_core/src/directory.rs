//! Sector/Room directory: static two-level location reference data.
//!
//! Rooms drive dependent selection in clients and constrain scan/create
//! input. Read-only at runtime; the seed set is written into the store when
//! the database is first created.

use crate::error::{ConferiaError, Result};
use crate::types::Sector;
use conferia_ids::SectorId;

/// Lookup over the known sectors and their rooms.
#[derive(Debug, Clone)]
pub struct SectorDirectory {
    sectors: Vec<Sector>,
}

impl SectorDirectory {
    pub fn new(sectors: Vec<Sector>) -> Self {
        Self { sectors }
    }

    /// Built-in reference data used to seed a fresh database.
    pub fn default_seed() -> Self {
        let seed = [
            ("TI", &["Escritório TI", "Sala Técnica", "Data Center"][..]),
            (
                "Administração",
                &["Sala 101", "Sala 102", "Recepção", "Diretoria"][..],
            ),
            ("Almoxarifado", &["Depósito 1", "Depósito 2"][..]),
            ("Manutenção", &["Oficina", "Ferramentaria"][..]),
        ];
        Self {
            sectors: seed
                .iter()
                .map(|(name, rooms)| Sector {
                    id: SectorId::new(),
                    name: (*name).to_string(),
                    rooms: rooms.iter().map(|r| (*r).to_string()).collect(),
                })
                .collect(),
        }
    }

    pub fn sectors(&self) -> &[Sector] {
        &self.sectors
    }

    pub fn sector_names(&self) -> Vec<&str> {
        self.sectors.iter().map(|s| s.name.as_str()).collect()
    }

    /// Rooms of a sector, `None` if the sector is unknown.
    pub fn rooms_of(&self, sector: &str) -> Option<&[String]> {
        self.sectors
            .iter()
            .find(|s| s.name == sector)
            .map(|s| s.rooms.as_slice())
    }

    pub fn contains_pair(&self, sector: &str, room: &str) -> bool {
        self.rooms_of(sector)
            .map(|rooms| rooms.iter().any(|r| r == room))
            .unwrap_or(false)
    }

    /// Reject a `(sector, room)` pair that is not in the directory.
    pub fn validate_pair(&self, sector: &str, room: &str) -> Result<()> {
        match self.rooms_of(sector) {
            None => Err(ConferiaError::validation(format!(
                "Unknown sector: {sector}"
            ))),
            Some(rooms) if !rooms.iter().any(|r| r == room) => Err(ConferiaError::validation(
                format!("Room {room} is not in sector {sector}"),
            )),
            Some(_) => Ok(()),
        }
    }
}
