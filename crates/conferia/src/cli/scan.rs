//! Scan command - record a conference for a QR token.

use super::context::CliContext;
use super::output::{format_location, print_json};
use conferia_core::QrToken;

pub async fn run(
    ctx: &CliContext,
    token: &str,
    sector: &str,
    room: &str,
    json: bool,
) -> anyhow::Result<()> {
    let token = QrToken::parse(token)?;
    let outcome = ctx.engine.scan(&token, sector, room).await?;

    if json {
        print_json(&outcome)?;
        return Ok(());
    }

    let material = &outcome.material;
    if outcome.was_correct() {
        println!(
            "OK: {} ({}) is at its expected location {}",
            material.name,
            material.asset_tag,
            format_location(&material.sector, &material.room)
        );
    } else {
        println!(
            "MOVED: {} ({}) expected at {}, found at {}",
            material.name,
            material.asset_tag,
            format_location(&material.sector, &material.room),
            format_location(
                &outcome.conference.found_sector,
                &outcome.conference.found_room
            )
        );
    }
    Ok(())
}
