//! Material command - register, list, edit and remove materials.

use super::context::CliContext;
use super::output::{format_location, format_status, format_time, new_table, print_json};
use anyhow::{anyhow, bail};
use clap::Subcommand;
use conferia_core::{
    Material, MaterialFilter, MaterialId, MaterialPatch, MaterialStatus, NewMaterial, Role,
};

/// Subcommands for material management
#[derive(Subcommand, Debug, Clone)]
pub enum MaterialAction {
    /// Register a new material (prints its QR token)
    Add {
        /// Material description
        name: String,
        /// Asset tag (BMP code), unique
        #[arg(long = "tag")]
        asset_tag: String,
        /// Expected sector
        #[arg(long)]
        sector: String,
        /// Expected room
        #[arg(long)]
        room: String,
        /// Responsible person
        #[arg(long)]
        responsible: String,
        /// Free-text notes
        #[arg(long)]
        notes: Option<String>,
        #[arg(long)]
        json: bool,
    },
    /// List materials
    List {
        /// Substring match over name, asset tag and responsible
        #[arg(long)]
        search: Option<String>,
        /// Filter by status (not_checked, checked_correct, checked_other_location)
        #[arg(long)]
        status: Option<String>,
        #[arg(long)]
        sector: Option<String>,
        #[arg(long)]
        room: Option<String>,
        #[arg(long)]
        limit: Option<usize>,
        #[arg(long)]
        offset: Option<usize>,
        #[arg(long)]
        json: bool,
    },
    /// Show one material (by id or asset tag)
    Show {
        id_or_tag: String,
        /// Include the conference history
        #[arg(long)]
        history: bool,
        #[arg(long)]
        json: bool,
    },
    /// Update editable fields of a material
    Update {
        id_or_tag: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long = "tag")]
        asset_tag: Option<String>,
        #[arg(long)]
        sector: Option<String>,
        #[arg(long)]
        room: Option<String>,
        #[arg(long)]
        responsible: Option<String>,
        #[arg(long)]
        notes: Option<String>,
        /// Remove the notes
        #[arg(long, conflicts_with = "notes")]
        clear_notes: bool,
        #[arg(long)]
        json: bool,
    },
    /// Delete a material and its history (admin only)
    Remove {
        id_or_tag: String,
        /// Role of the operator performing the delete
        #[arg(long, default_value = "admin")]
        role: String,
    },
}

/// Execute the material command
pub async fn run(ctx: &CliContext, action: MaterialAction) -> anyhow::Result<()> {
    match action {
        MaterialAction::Add {
            name,
            asset_tag,
            sector,
            room,
            responsible,
            notes,
            json,
        } => {
            let material = ctx
                .registry
                .create(NewMaterial {
                    name,
                    asset_tag,
                    sector,
                    room,
                    responsible,
                    notes,
                })
                .await?;
            if json {
                print_json(&material)?;
            } else {
                println!("Registered {} ({})", material.name, material.asset_tag);
                println!("QR token: {}", material.qr_token);
            }
            Ok(())
        }
        MaterialAction::List {
            search,
            status,
            sector,
            room,
            limit,
            offset,
            json,
        } => {
            let status = status
                .as_deref()
                .map(|s| {
                    MaterialStatus::parse(s).ok_or_else(|| anyhow!("Unknown status: {s}"))
                })
                .transpose()?;
            let materials = ctx
                .registry
                .list(&MaterialFilter {
                    search,
                    status,
                    sector,
                    room,
                    limit,
                    offset,
                })
                .await?;
            if json {
                print_json(&materials)?;
            } else {
                print_material_table(&materials);
            }
            Ok(())
        }
        MaterialAction::Show {
            id_or_tag,
            history,
            json,
        } => {
            let material = resolve(ctx, &id_or_tag).await?;
            let conferences = if history {
                Some(ctx.registry.history(&material.id).await?)
            } else {
                None
            };
            if json {
                match &conferences {
                    Some(history) => print_json(&serde_json::json!({
                        "material": material,
                        "history": history,
                    }))?,
                    None => print_json(&material)?,
                }
            } else {
                print_material_details(&material);
                if let Some(history) = conferences {
                    print_history(&history);
                }
            }
            Ok(())
        }
        MaterialAction::Update {
            id_or_tag,
            name,
            asset_tag,
            sector,
            room,
            responsible,
            notes,
            clear_notes,
            json,
        } => {
            let material = resolve(ctx, &id_or_tag).await?;
            let patch = MaterialPatch {
                name,
                asset_tag,
                sector,
                room,
                responsible,
                notes: if clear_notes {
                    Some(None)
                } else {
                    notes.map(Some)
                },
            };
            let updated = ctx.registry.update(&material.id, patch).await?;
            if json {
                print_json(&updated)?;
            } else {
                println!("Updated {} ({})", updated.name, updated.asset_tag);
            }
            Ok(())
        }
        MaterialAction::Remove { id_or_tag, role } => {
            let role = Role::parse(&role).ok_or_else(|| anyhow!("Unknown role: {role}"))?;
            let material = resolve(ctx, &id_or_tag).await?;
            ctx.registry.delete(&material.id, role).await?;
            println!("Removed {} ({})", material.name, material.asset_tag);
            Ok(())
        }
    }
}

/// Accepts a material id (UUID) or an asset tag.
async fn resolve(ctx: &CliContext, id_or_tag: &str) -> anyhow::Result<Material> {
    if let Ok(id) = MaterialId::parse(id_or_tag) {
        return Ok(ctx.registry.get(&id).await?);
    }
    let hits = ctx
        .registry
        .list(&MaterialFilter {
            search: Some(id_or_tag.to_string()),
            ..Default::default()
        })
        .await?;
    match hits.into_iter().find(|m| m.asset_tag == id_or_tag) {
        Some(material) => Ok(material),
        None => bail!("No material with id or asset tag {id_or_tag}"),
    }
}

fn print_material_table(materials: &[Material]) {
    if materials.is_empty() {
        println!("No materials found");
        return;
    }
    let mut table = new_table(&["Tag", "Name", "Expected location", "Responsible", "Status"]);
    for m in materials {
        table.add_row(vec![
            m.asset_tag.clone(),
            m.name.clone(),
            format_location(&m.sector, &m.room),
            m.responsible.clone(),
            format_status(m),
        ]);
    }
    println!("{table}");
    println!("{} material(s)", materials.len());
}

fn print_material_details(m: &Material) {
    println!("Id:          {}", m.id);
    println!("Name:        {}", m.name);
    println!("Asset tag:   {}", m.asset_tag);
    println!("Expected:    {}", format_location(&m.sector, &m.room));
    println!("Responsible: {}", m.responsible);
    if let Some(notes) = &m.notes {
        println!("Notes:       {notes}");
    }
    println!("QR token:    {}", m.qr_token);
    println!("Status:      {}", m.status);
    if let Some(last) = &m.last_conference {
        println!(
            "Last seen:   {} at {}",
            format_time(last.scanned_at),
            format_location(&last.found_sector, &last.found_room)
        );
    }
    println!("Created:     {}", format_time(m.created_at));
}

fn print_history(history: &[conferia_core::Conference]) {
    if history.is_empty() {
        println!("\nNo conferences recorded");
        return;
    }
    let mut table = new_table(&["Scanned at", "Found location", "Correct"]);
    for c in history {
        table.add_row(vec![
            format_time(c.scanned_at),
            format_location(&c.found_sector, &c.found_room),
            if c.was_correct { "yes" } else { "no" }.to_string(),
        ]);
    }
    println!("\n{table}");
}
