use std::path::Path;
use std::sync::Arc;

use anyhow::{anyhow, Result};

use ledscroll_core::AppConfig;

use super::{DataOptions, Engine};

/// Compose one channel's strip and save it as a PNG
pub async fn run(config: Arc<AppConfig>, options: DataOptions, out: &Path) -> Result<()> {
    let engine = Engine::build(&config, &options)?;
    let preparer = engine
        .preparers
        .first()
        .ok_or_else(|| anyhow!("No channels configured"))?;

    let summary = preparer.prepare().await.map_err(|e| {
        anyhow!("Could not prepare the {} channel: {}", preparer.mode(), e)
    })?;
    let prepared = preparer
        .slot()
        .load_full()
        .ok_or_else(|| anyhow!("{} channel has no strip", preparer.mode()))?;

    if let Some(parent) = out.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    prepared.strip.bitmap().save(out)?;

    println!(
        "Wrote {} ({}x{}px, {} games, {} separators)",
        out.display(),
        summary.total_width,
        prepared.strip.display_height(),
        summary.tiles,
        summary.separators
    );
    Ok(())
}
