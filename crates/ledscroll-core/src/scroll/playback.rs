//! L3 Molecular Layer: Playback clock
//!
//! Moves a viewport across an installed strip one tick at a time.
//!
//! ```text
//! Idle --install--> Running --advance past end--> Complete
//!                      ^                             |
//!                      +-----------reset-------------+
//! any --clear--> Idle
//! ```

use std::sync::Arc;
use std::time::{Duration, Instant};

use image::RgbImage;
use serde::Serialize;

use super::composer::Strip;
use super::config::{ScrollConfig, ScrollConfigExt};
use super::timing::{duration_from_secs, frames_in, progress_at};
use crate::tile::BACKGROUND;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaybackPhase {
    /// No strip installed
    Idle,
    Running,
    /// One full cycle finished; the window stays blank until reset
    Complete,
}

/// How far the viewport moves per `advance()`
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AdvanceMode {
    /// Fixed velocity per tick
    FrameBased,
    /// Velocity scaled by the time since the previous tick, in units of
    /// `delay_seconds`
    TimeBased { delay_seconds: f64 },
}

impl AdvanceMode {
    pub fn from_config(config: &ScrollConfig) -> Self {
        if config.speed_is_frame_based {
            AdvanceMode::FrameBased
        } else {
            AdvanceMode::TimeBased {
                delay_seconds: config.delay_seconds,
            }
        }
    }
}

/// Mutable playback state, owned by the clock
#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackState {
    /// Viewport offset into the strip, in pixels
    pub position: f64,
    pub velocity_px_per_frame: f64,
    /// Advisory duration from the planner
    pub target_duration_seconds: f64,
    pub cycle_start_time: Instant,
    pub frame_count: u64,
    pub complete: bool,
    last_tick: Option<Instant>,
}

impl PlaybackState {
    fn new(velocity: f64, target_duration: f64, now: Instant) -> Self {
        Self {
            position: 0.0,
            velocity_px_per_frame: velocity,
            target_duration_seconds: target_duration,
            cycle_start_time: now,
            frame_count: 0,
            complete: false,
            last_tick: None,
        }
    }

    fn restart(&mut self, now: Instant) {
        self.position = 0.0;
        self.frame_count = 0;
        self.cycle_start_time = now;
        self.complete = false;
        self.last_tick = None;
    }
}

/// Serializable progress summary
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScrollInfo {
    pub phase: PlaybackPhase,
    pub position: f64,
    pub total_width: u32,
    pub display_width: u32,
    pub velocity_px_per_frame: f64,
    pub elapsed_secs: f64,
    pub planned_duration_secs: f64,
    /// Share of the planned duration already spent, 0.0 to 1.0
    pub planned_progress: f64,
    pub frame_count: u64,
    pub complete: bool,
}

/// Scroll playback state machine for one channel
#[derive(Debug, Clone)]
pub struct PlaybackClock {
    strip: Option<Arc<Strip>>,
    display_width: u32,
    mode: AdvanceMode,
    state: PlaybackState,
}

impl PlaybackClock {
    pub fn new(display_width: u32, mode: AdvanceMode) -> Self {
        Self {
            strip: None,
            display_width,
            mode,
            state: PlaybackState::new(0.0, 0.0, Instant::now()),
        }
    }

    pub fn from_config(display_width: u32, config: &ScrollConfig) -> Self {
        let mut clock = Self::new(display_width, AdvanceMode::from_config(config));
        clock.state.velocity_px_per_frame = config.velocity();
        clock
    }

    /// Seed the clock with a new strip and start a fresh cycle
    pub fn install(&mut self, strip: Arc<Strip>, velocity_px_per_frame: f64, target_duration: f64) {
        self.strip = Some(strip);
        self.state = PlaybackState::new(velocity_px_per_frame, target_duration, Instant::now());
    }

    pub fn phase(&self) -> PlaybackPhase {
        match (&self.strip, self.state.complete) {
            (None, _) => PlaybackPhase::Idle,
            (Some(_), false) => PlaybackPhase::Running,
            (Some(_), true) => PlaybackPhase::Complete,
        }
    }

    #[inline]
    pub fn has_content(&self) -> bool {
        self.strip.is_some()
    }

    #[inline]
    pub fn is_complete(&self) -> bool {
        self.strip.is_some() && self.state.complete
    }

    #[inline]
    pub fn position(&self) -> f64 {
        self.state.position
    }

    pub fn state(&self) -> &PlaybackState {
        &self.state
    }

    pub fn strip(&self) -> Option<&Arc<Strip>> {
        self.strip.as_ref()
    }

    pub fn display_width(&self) -> u32 {
        self.display_width
    }

    pub fn mode(&self) -> AdvanceMode {
        self.mode
    }

    /// Position at which the last column has left the display
    pub fn end_position(&self) -> Option<f64> {
        self.strip
            .as_ref()
            .map(|s| s.total_width() as f64 + self.display_width as f64)
    }

    /// Advance one tick. Returns false when there is nothing to advance
    /// (idle or already complete).
    pub fn advance(&mut self) -> bool {
        self.advance_at(Instant::now())
    }

    /// [`advance`](Self::advance) with an explicit clock reading
    pub fn advance_at(&mut self, now: Instant) -> bool {
        let Some(end) = self.end_position() else {
            return false;
        };
        if self.state.complete {
            return false;
        }

        let delta = match self.mode {
            AdvanceMode::FrameBased => self.state.velocity_px_per_frame,
            AdvanceMode::TimeBased { delay_seconds } => {
                let since = self.state.last_tick.unwrap_or(self.state.cycle_start_time);
                let elapsed = now.saturating_duration_since(since);
                self.state.velocity_px_per_frame * frames_in(elapsed, delay_seconds)
            }
        };

        self.state.position += delta.max(0.0);
        self.state.frame_count += 1;
        self.state.last_tick = Some(now);

        if self.state.position >= end {
            self.state.complete = true;
            tracing::debug!(
                frames = self.state.frame_count,
                elapsed_secs = now.saturating_duration_since(self.state.cycle_start_time).as_secs_f64(),
                "Scroll cycle complete"
            );
        }
        true
    }

    /// The part of the strip currently on screen.
    ///
    /// `None` means nothing was ever prepared (or it was cleared); a complete
    /// cycle yields an all-background frame instead.
    pub fn visible_window(&self) -> Option<RgbImage> {
        let strip = self.strip.as_ref()?;
        if self.state.complete {
            return Some(RgbImage::from_pixel(
                self.display_width,
                strip.display_height(),
                BACKGROUND,
            ));
        }
        Some(strip.window(self.state.position.floor() as i64, self.display_width))
    }

    /// Restart the cycle from the beginning, keeping the strip
    pub fn reset(&mut self) {
        self.state.restart(Instant::now());
    }

    /// Drop the strip and return to idle
    pub fn clear(&mut self) {
        self.strip = None;
        self.state.restart(Instant::now());
    }

    /// Copy of the current state, for rolling back a tick
    pub fn snapshot(&self) -> PlaybackState {
        self.state.clone()
    }

    pub fn restore(&mut self, state: PlaybackState) {
        self.state = state;
    }

    pub fn elapsed(&self) -> Duration {
        self.state.cycle_start_time.elapsed()
    }

    pub fn info(&self) -> ScrollInfo {
        let now = Instant::now();
        let elapsed = now.saturating_duration_since(self.state.cycle_start_time);
        let planned = self.state.target_duration_seconds.max(0.0);
        ScrollInfo {
            phase: self.phase(),
            position: self.state.position,
            total_width: self.strip.as_ref().map(|s| s.total_width()).unwrap_or(0),
            display_width: self.display_width,
            velocity_px_per_frame: self.state.velocity_px_per_frame,
            elapsed_secs: elapsed.as_secs_f64(),
            planned_duration_secs: planned,
            planned_progress: progress_at(
                self.state.cycle_start_time,
                duration_from_secs(planned),
                now,
            ),
            frame_count: self.state.frame_count,
            complete: self.state.complete,
        }
    }
}
