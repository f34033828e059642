//! Scroll composition and playback engine
//!
//! Turns a sequence of rendered tiles into one wide strip and plays it back
//! across the display one tick at a time.
//!
//! # Architecture
//!
//! ## L4 Atomic Layer
//! - `speed` - Speed unit resolution (pixels/second vs pixels/frame)
//! - `duration` - Advisory cycle duration planning
//! - `timing` - Time calculation utilities (progress, frame conversion)
//! - `config` - Derived values on the resolved scroll configuration
//!
//! ## L3 Molecular Layer
//! - `composer` - Strip composition from tiles, separators and gaps
//! - `playback` - Playback clock state machine
//! - `fps` - Frame-rate monitor
//!
//! # Usage
//!
//! ```ignore
//! use std::sync::Arc;
//! use ledscroll_core::scroll::{compose, duration, PlaybackClock, ScrollConfigExt};
//!
//! let strip = Arc::new(compose(&tiles, 24, 0, Some(&separators))?);
//! let velocity = config.velocity();
//! let planned = duration::plan_for(&config, strip.total_width(), 128, velocity);
//!
//! let mut clock = PlaybackClock::from_config(128, &config);
//! clock.install(strip, velocity, planned);
//!
//! // once per tick
//! clock.advance();
//! if let Some(frame) = clock.visible_window() {
//!     driver.present(&frame)?;
//! }
//! ```

// L4 Atomic Layer
pub mod config;
pub mod duration;
pub mod speed;
pub mod timing;

// L3 Molecular Layer
pub mod composer;
pub mod fps;
pub mod playback;

// Re-exports for convenient access
pub use composer::{compose, GroupedTile, Strip};
pub use config::{ScrollConfig, ScrollConfigExt};
pub use fps::FrameRateMonitor;
pub use playback::{AdvanceMode, PlaybackClock, PlaybackPhase, PlaybackState, ScrollInfo};
