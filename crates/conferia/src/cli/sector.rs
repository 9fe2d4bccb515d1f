//! Sector command - inspect the sector/room directory.

use super::context::CliContext;
use super::output::{new_table, print_json};
use anyhow::bail;
use clap::Subcommand;

/// Subcommands for the sector directory
#[derive(Subcommand, Debug, Clone)]
pub enum SectorAction {
    /// List all sectors
    List {
        #[arg(long)]
        json: bool,
    },
    /// List the rooms of a sector
    Rooms {
        sector: String,
        #[arg(long)]
        json: bool,
    },
}

pub async fn run(ctx: &CliContext, action: SectorAction) -> anyhow::Result<()> {
    let directory = ctx.registry.directory().await?;

    match action {
        SectorAction::List { json } => {
            if json {
                print_json(&directory.sectors())?;
            } else {
                let mut table = new_table(&["Sector", "Rooms"]);
                for sector in directory.sectors() {
                    table.add_row(vec![sector.name.clone(), sector.rooms.join(", ")]);
                }
                println!("{table}");
            }
            Ok(())
        }
        SectorAction::Rooms { sector, json } => match directory.rooms_of(&sector) {
            Some(rooms) => {
                if json {
                    print_json(&rooms)?;
                } else {
                    for room in rooms {
                        println!("{room}");
                    }
                }
                Ok(())
            }
            None => bail!("Unknown sector: {sector}"),
        },
    }
}
