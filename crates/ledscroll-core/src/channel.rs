//! Scroll channels
//!
//! A channel has two halves sharing one strip slot:
//!
//! - [`ContentPreparer`] reads records, renders tiles, composes a strip and
//!   publishes it. It runs on the refresh task.
//! - [`ScrollChannel`] owns the playback clock and presents one frame per
//!   tick. It runs on the display loop and never waits on preparation.
//!
//! Publishing replaces the whole [`PreparedStrip`] in one atomic store, so
//! playback sees either the old strip or the new one. A new strip is picked
//! up when playback is idle or has finished its cycle.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use arc_swap::ArcSwapOption;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::cache::SharedRecordCache;
use crate::config::AppConfig;
use crate::display::DisplayDriver;
use crate::record::{ChannelMode, GameKind, GameRecord};
use crate::render::TileRenderer;
use crate::scroll::{
    compose, duration, FrameRateMonitor, GroupedTile, PlaybackClock, ScrollConfig, ScrollConfigExt,
    ScrollInfo, Strip,
};
use crate::scroll::timing::duration_from_secs;
use crate::separators::SeparatorSet;
use crate::source::DataSource;
use crate::tile::ContentTile;
use crate::{Error, Result};

/// Everything playback needs from one preparation, published as a unit
#[derive(Debug)]
pub struct PreparedStrip {
    pub strip: Arc<Strip>,
    pub velocity_px_per_frame: f64,
    pub planned_duration_secs: f64,
    /// Individual rendered tiles in strip order
    pub items: Vec<ContentTile>,
    pub generation: u64,
    pub prepared_at: DateTime<Utc>,
}

pub type StripSlot = Arc<ArcSwapOption<PreparedStrip>>;

/// Result of one successful preparation
#[derive(Debug, Clone, Serialize)]
pub struct PrepareSummary {
    pub mode: ChannelMode,
    pub tiles: usize,
    pub separators: usize,
    pub total_width: u32,
    pub velocity_px_per_frame: f64,
    pub planned_duration_secs: f64,
    /// Tile count per league
    pub leagues: BTreeMap<String, usize>,
}

/// Per-channel layout and timing parameters
#[derive(Debug, Clone)]
pub struct ChannelSettings {
    pub display_width: u32,
    pub scroll: ScrollConfig,
    pub item_gap: u32,
    pub element_gap: u32,
    pub show_separators: bool,
    /// Records older than this are refetched before preparing
    pub max_record_age: Duration,
    pub log_interval: Duration,
}

impl ChannelSettings {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            display_width: config.display.width,
            scroll: config.scroll.scroll_config(),
            item_gap: config.scroll.item_gap(),
            element_gap: config.scroll.element_gap(),
            show_separators: config.scroll.show_league_separators,
            max_record_age: Duration::from_secs(config.data.refresh_interval_secs),
            log_interval: duration_from_secs(config.scroll.log_interval_secs),
        }
    }
}

/// Create the two halves of a channel for `mode`
pub fn channel<S, R>(
    mode: ChannelMode,
    source: Arc<S>,
    renderer: Arc<R>,
    cache: Arc<SharedRecordCache>,
    separators: Arc<SeparatorSet>,
    settings: ChannelSettings,
) -> (ContentPreparer<S, R>, ScrollChannel)
where
    S: DataSource,
    R: TileRenderer,
{
    let slot: StripSlot = Arc::new(ArcSwapOption::empty());
    let playback = ScrollChannel::new(mode, slot.clone(), &settings);
    let preparer = ContentPreparer {
        mode,
        source,
        renderer,
        cache,
        separators,
        settings,
        slot,
        generation: AtomicU64::new(0),
    };
    (preparer, playback)
}

/// Preparation half of a channel
pub struct ContentPreparer<S, R> {
    mode: ChannelMode,
    source: Arc<S>,
    renderer: Arc<R>,
    cache: Arc<SharedRecordCache>,
    separators: Arc<SeparatorSet>,
    settings: ChannelSettings,
    slot: StripSlot,
    generation: AtomicU64,
}

impl<S: DataSource, R: TileRenderer> ContentPreparer<S, R> {
    pub fn mode(&self) -> ChannelMode {
        self.mode
    }

    pub fn slot(&self) -> &StripSlot {
        &self.slot
    }

    /// Prepare from the shared cache, refreshing it first when stale
    pub async fn prepare(&self) -> Result<PrepareSummary> {
        let records = self
            .cache
            .records_or_refresh(self.source.as_ref(), self.settings.max_record_age)
            .await;
        self.prepare_from(&records)
    }

    /// Build and publish a strip from `records`.
    ///
    /// With no matching records the slot is emptied and
    /// [`Error::EmptyContent`] returned. A composition error leaves the
    /// previously published strip in place.
    pub fn prepare_from(&self, records: &[GameRecord]) -> Result<PrepareSummary> {
        let fallback = self.mode.fallback_kind();
        let selected: Vec<(&GameRecord, GameKind)> = records
            .iter()
            .map(|r| (r, r.kind(fallback)))
            .filter(|(_, kind)| self.mode.accepts(*kind))
            .collect();

        if selected.is_empty() {
            self.cache.warn_no_data(self.mode.key());
            if self.slot.swap(None).is_some() {
                info!("[{}] No games left, strip withdrawn", self.mode);
            }
            return Err(Error::EmptyContent);
        }

        let tiles: Vec<GroupedTile> = selected
            .iter()
            .map(|(record, kind)| {
                GroupedTile::new(record.league.clone(), self.renderer.render_tile(record, *kind))
            })
            .collect();

        let separators = self
            .settings
            .show_separators
            .then(|| self.separators.as_map());
        let strip = compose(
            &tiles,
            self.settings.item_gap,
            self.settings.element_gap,
            separators,
        )?;

        let velocity = self.settings.scroll.velocity();
        let planned = duration::plan_for(
            &self.settings.scroll,
            strip.total_width(),
            self.settings.display_width,
            velocity,
        );

        let mut leagues = BTreeMap::new();
        for tile in &tiles {
            *leagues.entry(tile.group.clone()).or_insert(0) += 1;
        }

        let summary = PrepareSummary {
            mode: self.mode,
            tiles: strip.tile_count(),
            separators: strip.separator_count(),
            total_width: strip.total_width(),
            velocity_px_per_frame: velocity,
            planned_duration_secs: planned,
            leagues,
        };
        info!(
            "[{}] Prepared {} games ({:?}), strip {}px, planned {:.1}s",
            self.mode, summary.tiles, summary.leagues, summary.total_width, planned
        );

        let generation = self.generation.fetch_add(1, Ordering::Relaxed) + 1;
        self.slot.store(Some(Arc::new(PreparedStrip {
            strip: Arc::new(strip),
            velocity_px_per_frame: velocity,
            planned_duration_secs: planned,
            items: tiles.into_iter().map(|t| t.tile).collect(),
            generation,
            prepared_at: Utc::now(),
        })));

        Ok(summary)
    }
}

/// What happened on one display tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    /// A frame went to the display
    Presented,
    /// Nothing prepared; the caller shows its fallback
    NoContent,
    /// The display rejected the frame; playback state was rolled back
    Skipped,
}

/// Playback half of a channel
pub struct ScrollChannel {
    mode: ChannelMode,
    slot: StripSlot,
    clock: PlaybackClock,
    installed: Option<u64>,
    fps: FrameRateMonitor,
    log_interval: Duration,
    last_progress_log: Option<Instant>,
    last_present_warning: Option<Instant>,
    /// Ticks skipped since the last present warning
    skipped_since_warning: u64,
}

impl ScrollChannel {
    fn new(mode: ChannelMode, slot: StripSlot, settings: &ChannelSettings) -> Self {
        Self {
            mode,
            slot,
            clock: PlaybackClock::from_config(settings.display_width, &settings.scroll),
            installed: None,
            fps: FrameRateMonitor::new(mode.key(), settings.log_interval),
            log_interval: settings.log_interval,
            last_progress_log: None,
            last_present_warning: None,
            skipped_since_warning: 0,
        }
    }

    pub fn mode(&self) -> ChannelMode {
        self.mode
    }

    pub fn clock(&self) -> &PlaybackClock {
        &self.clock
    }

    /// Pick up a newly published strip (or its withdrawal) at a cycle boundary
    fn sync_strip(&mut self) {
        if self.clock.has_content() && !self.clock.is_complete() {
            return;
        }
        match self.slot.load_full() {
            Some(prepared) if self.installed != Some(prepared.generation) => {
                self.clock.install(
                    prepared.strip.clone(),
                    prepared.velocity_px_per_frame,
                    prepared.planned_duration_secs,
                );
                self.installed = Some(prepared.generation);
                self.fps.restart();
                self.last_progress_log = None;
                debug!(
                    "[{}] Installed strip #{} ({}px)",
                    self.mode,
                    prepared.generation,
                    prepared.strip.total_width()
                );
            }
            None if self.installed.is_some() => {
                self.clock.clear();
                self.installed = None;
                debug!("[{}] Strip withdrawn", self.mode);
            }
            _ => {}
        }
    }

    /// Advance one tick and present the visible window.
    ///
    /// A present failure restores the pre-tick state, so the same frame is
    /// attempted again on the next tick.
    pub fn display_frame<D: DisplayDriver + ?Sized>(&mut self, driver: &mut D) -> FrameOutcome {
        self.sync_strip();
        if !self.clock.has_content() {
            return FrameOutcome::NoContent;
        }

        let saved = self.clock.snapshot();
        self.clock.advance();
        let Some(frame) = self.clock.visible_window() else {
            return FrameOutcome::NoContent;
        };

        match driver.present(&frame) {
            Ok(()) => {
                self.fps.record_frame();
                self.log_progress();
                FrameOutcome::Presented
            }
            Err(e) => {
                self.clock.restore(saved);
                self.note_present_failure(&e);
                FrameOutcome::Skipped
            }
        }
    }

    /// Warn at most once per log interval while presenting keeps failing
    fn note_present_failure(&mut self, err: &Error) {
        self.skipped_since_warning += 1;
        let now = Instant::now();
        let due = self
            .last_present_warning
            .map_or(true, |t| now.saturating_duration_since(t) >= self.log_interval);
        if due {
            warn!(
                "[{}] Frame not presented, skipped {} tick(s): {}",
                self.mode, self.skipped_since_warning, err
            );
            self.last_present_warning = Some(now);
            self.skipped_since_warning = 0;
        } else {
            debug!("[{}] Frame not presented: {}", self.mode, err);
        }
    }

    fn log_progress(&mut self) {
        let now = Instant::now();
        let due = self
            .last_progress_log
            .map_or(true, |t| now.saturating_duration_since(t) >= self.log_interval);
        if !due {
            return;
        }
        self.last_progress_log = Some(now);
        let info = self.clock.info();
        info!(
            "[{}] Position {:.0}/{}px, elapsed {:.1}s of {:.1}s planned",
            self.mode,
            info.position,
            info.total_width + info.display_width,
            info.elapsed_secs,
            info.planned_duration_secs
        );
    }

    pub fn is_complete(&self) -> bool {
        self.clock.is_complete()
    }

    /// Start the cycle over, picking up any newer strip
    pub fn reset(&mut self) {
        self.clock.reset();
        self.last_progress_log = None;
        let pending = match self.slot.load_full() {
            Some(prepared) => self.installed != Some(prepared.generation),
            None => self.installed.is_some(),
        };
        if pending {
            self.clock.clear();
            self.sync_strip();
        }
    }

    /// Drop the installed and published strip
    pub fn clear(&mut self) {
        self.slot.store(None);
        self.clock.clear();
        self.installed = None;
        self.fps.restart();
        self.last_progress_log = None;
    }

    /// Whether a strip is installed or waiting to be
    pub fn has_content(&self) -> bool {
        self.clock.has_content() || self.slot.load().is_some()
    }

    /// Advisory duration of the installed or waiting strip
    pub fn planned_duration(&self) -> Option<f64> {
        if self.clock.has_content() {
            return Some(self.clock.state().target_duration_seconds);
        }
        self.slot.load_full().map(|p| p.planned_duration_secs)
    }

    pub fn info(&self) -> ScrollInfo {
        self.clock.info()
    }

    pub fn last_fps(&self) -> Option<f64> {
        self.fps.last_fps()
    }

    /// Rendered tiles of the latest published strip
    pub fn content_items(&self) -> Vec<ContentTile> {
        self.slot
            .load_full()
            .map(|p| p.items.clone())
            .unwrap_or_default()
    }
}

/// Plays channels in rotation, moving on when a cycle completes
pub struct ChannelManager {
    channels: Vec<ScrollChannel>,
    current: usize,
    completed_cycles: u64,
}

impl ChannelManager {
    pub fn new(channels: Vec<ScrollChannel>) -> Self {
        Self {
            channels,
            current: 0,
            completed_cycles: 0,
        }
    }

    pub fn current(&self) -> Option<&ScrollChannel> {
        self.channels.get(self.current)
    }

    pub fn current_mode(&self) -> Option<ChannelMode> {
        self.current().map(|c| c.mode())
    }

    pub fn channel(&self, mode: ChannelMode) -> Option<&ScrollChannel> {
        self.channels.iter().find(|c| c.mode() == mode)
    }

    pub fn channel_mut(&mut self, mode: ChannelMode) -> Option<&mut ScrollChannel> {
        self.channels.iter_mut().find(|c| c.mode() == mode)
    }

    pub fn display_frame<D: DisplayDriver + ?Sized>(&mut self, driver: &mut D) -> FrameOutcome {
        let Some(channel) = self.channels.get_mut(self.current) else {
            return FrameOutcome::NoContent;
        };
        let outcome = channel.display_frame(driver);

        if channel.is_complete() {
            self.completed_cycles += 1;
            info!("[{}] Cycle complete", channel.mode());
            channel.reset();
            self.rotate();
        } else if outcome == FrameOutcome::NoContent {
            self.rotate();
        }
        outcome
    }

    /// Move to the next channel that has content, if any
    fn rotate(&mut self) {
        let count = self.channels.len();
        for step in 1..=count {
            let index = (self.current + step) % count;
            if self.channels[index].has_content() {
                if index != self.current {
                    debug!(
                        "Rotating {} -> {}",
                        self.channels[self.current].mode(),
                        self.channels[index].mode()
                    );
                }
                self.current = index;
                return;
            }
        }
    }

    /// Full cycles played across all channels
    pub fn completed_cycles(&self) -> u64 {
        self.completed_cycles
    }

    pub fn has_cached_content(&self) -> bool {
        self.channels.iter().any(|c| c.has_content())
    }

    /// Rendered tiles of every channel, in rotation order
    pub fn all_content_items(&self) -> Vec<ContentTile> {
        self.channels.iter().flat_map(|c| c.content_items()).collect()
    }

    pub fn clear_all(&mut self) {
        for channel in &mut self.channels {
            channel.clear();
        }
        self.current = 0;
    }
}
