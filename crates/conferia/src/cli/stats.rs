//! Stats command - dashboard counters.

use super::context::CliContext;
use super::output::print_json;

pub async fn run(ctx: &CliContext, json: bool) -> anyhow::Result<()> {
    let stats = ctx.registry.stats().await?;

    if json {
        print_json(&stats)?;
        return Ok(());
    }

    println!("Materials:        {}", stats.total_materials);
    println!("  correct:        {}", stats.checked_correct);
    println!("  other location: {}", stats.checked_other_location);
    println!("  not checked:    {}", stats.not_checked);
    println!("Sectors in use:   {}", stats.sectors_in_use);
    println!("Conference rate:  {:.2}%", stats.conference_rate);
    Ok(())
}
