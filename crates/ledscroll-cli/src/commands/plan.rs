use std::sync::Arc;

use anyhow::Result;

use ledscroll_core::{
    channel::PrepareSummary,
    scroll::speed::effective_px_per_second,
    scheduler::{prepare_all, refresh_records},
    AppConfig, ChannelMode, Error,
};

use super::{DataOptions, Engine};

/// Prepare every channel once and print what would play
pub async fn run(config: Arc<AppConfig>, options: DataOptions, json: bool) -> Result<()> {
    let engine = Engine::build(&config, &options)?;
    refresh_records(&engine.cache, engine.source.as_ref()).await?;
    let records = engine.cache.records();

    let mut plans: Vec<(ChannelMode, Option<PrepareSummary>)> = Vec::new();
    for (mode, result) in prepare_all(&engine.preparers, &records) {
        match result {
            Ok(summary) => plans.push((mode, Some(summary))),
            Err(Error::EmptyContent) => plans.push((mode, None)),
            Err(e) => return Err(e.into()),
        }
    }

    if json {
        let value: Vec<_> = plans
            .iter()
            .map(|(mode, summary)| serde_json::json!({ "mode": mode, "plan": summary }))
            .collect();
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    println!("{} records, display {}x{}\n", records.len(), config.display.width, config.display.height);
    let delay = config.scroll.scroll_delay;
    for (mode, summary) in &plans {
        let Some(summary) = summary else {
            println!("  {:<9} (no games)", mode.to_string());
            continue;
        };
        let leagues: Vec<String> = summary
            .leagues
            .iter()
            .map(|(league, count)| format!("{} {}", league, count))
            .collect();
        println!(
            "  {:<9} {} games, {} separators, {}px, {:.2}px/frame ({:.0}px/s), {:.1}s",
            mode.to_string(),
            summary.tiles,
            summary.separators,
            summary.total_width,
            summary.velocity_px_per_frame,
            effective_px_per_second(summary.velocity_px_per_frame, delay),
            summary.planned_duration_secs
        );
        println!("            {}", leagues.join(", "));
    }

    Ok(())
}
