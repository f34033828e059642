pub mod compose;
pub mod config;
pub mod plan;
pub mod run;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tracing::{info, warn};

use ledscroll_core::{
    channel, separators::SeparatorSet, AppConfig, CardRenderer, ChannelMode, ChannelSettings,
    ContentPreparer, JsonFileSource, ScrollChannel, SharedRecordCache,
};

/// Options shared by every command that touches game data
#[derive(Debug, Clone, Default)]
pub struct DataOptions {
    /// Play only this channel instead of the configured rotation
    pub mode: Option<ChannelMode>,
    /// Record file overriding `[data] path`
    pub data: Option<PathBuf>,
}

/// Both halves of every configured channel, wired to one source and cache
pub struct Engine {
    pub source: Arc<JsonFileSource>,
    pub cache: Arc<SharedRecordCache>,
    pub preparers: Vec<ContentPreparer<JsonFileSource, CardRenderer>>,
    pub channels: Vec<ScrollChannel>,
}

impl Engine {
    pub fn build(config: &AppConfig, options: &DataOptions) -> Result<Self> {
        let data_path = options.data.clone().unwrap_or_else(|| config.data_path());
        info!("Reading games from {}", data_path.display());
        let source = Arc::new(JsonFileSource::new(&data_path));
        let cache = Arc::new(SharedRecordCache::new(Duration::from_secs(
            config.data.warning_cooldown_secs,
        )));

        let renderer = Arc::new(CardRenderer::new(
            config.scroll.game_card_width,
            config.display.height,
            config.scroll.card_padding(),
        ));
        let separators = Arc::new(load_separators(config));
        let settings = ChannelSettings::from_config(config);

        let modes = match options.mode {
            Some(mode) => vec![mode],
            None => config.modes.rotation.clone(),
        };

        let mut preparers = Vec::with_capacity(modes.len());
        let mut channels = Vec::with_capacity(modes.len());
        for mode in modes {
            let (preparer, playback) = channel(
                mode,
                source.clone(),
                renderer.clone(),
                cache.clone(),
                separators.clone(),
                settings.clone(),
            );
            preparers.push(preparer);
            channels.push(playback);
        }

        Ok(Self {
            source,
            cache,
            preparers,
            channels,
        })
    }
}

fn load_separators(config: &AppConfig) -> SeparatorSet {
    if !config.scroll.show_league_separators {
        return SeparatorSet::new();
    }
    let Some(dir) = config.separators_dir() else {
        return SeparatorSet::new();
    };
    match SeparatorSet::load_dir(&dir, config.display.height) {
        Ok(set) => set,
        Err(e) => {
            warn!("Failed to load separator icons from {}: {}", dir.display(), e);
            SeparatorSet::new()
        }
    }
}
