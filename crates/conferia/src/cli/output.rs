//! Output formatting utilities for CLI commands.

use chrono::{DateTime, Local, Utc};
use comfy_table::{presets::UTF8_FULL_CONDENSED, ContentArrangement, Table};
use conferia_core::Material;

/// Build a table with the house preset.
pub fn new_table(headers: &[&str]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(headers.to_vec());
    table
}

/// Timestamp in the operator's local time.
pub fn format_time(ts: DateTime<Utc>) -> String {
    ts.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string()
}

/// One-line location summary, "sector / room".
pub fn format_location(sector: &str, room: &str) -> String {
    format!("{sector} / {room}")
}

/// Status column text, with the found location when it differs.
pub fn format_status(material: &Material) -> String {
    match &material.last_conference {
        None => material.status.as_str().to_string(),
        Some(last) if material.status == conferia_core::MaterialStatus::CheckedCorrect => {
            format!("{} ({})", material.status, format_time(last.scanned_at))
        }
        Some(last) => format!(
            "{} (found at {})",
            material.status,
            format_location(&last.found_sector, &last.found_room)
        ),
    }
}

pub fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
