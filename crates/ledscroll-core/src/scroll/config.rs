//! L4 Atomic Layer: Scroll configuration helpers
//!
//! Re-exports the resolved scroll configuration and adds derived values.

use std::time::Duration;

pub use crate::config::ScrollConfig;

use super::speed::{self, NOMINAL_FPS};
use super::timing::duration_from_secs;

/// Extension trait for ScrollConfig with utility methods
pub trait ScrollConfigExt {
    /// Time between display ticks
    fn tick_duration(&self) -> Duration;

    /// Resolved velocity in pixels per frame
    fn velocity(&self) -> f64;

    /// Effective scroll speed in pixels per second
    fn px_per_second(&self) -> f64;
}

impl ScrollConfigExt for ScrollConfig {
    #[inline]
    fn tick_duration(&self) -> Duration {
        if self.delay_seconds.is_finite() && self.delay_seconds > 0.0 {
            duration_from_secs(self.delay_seconds)
        } else {
            Duration::from_secs_f64(1.0 / NOMINAL_FPS)
        }
    }

    #[inline]
    fn velocity(&self) -> f64 {
        speed::resolve(self.speed_value, self.delay_seconds)
    }

    #[inline]
    fn px_per_second(&self) -> f64 {
        speed::effective_px_per_second(self.velocity(), self.delay_seconds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ScrollConfig::default();
        assert_eq!(config.speed_value, 50.0);
        assert_eq!(config.delay_seconds, 0.01);
        assert!(config.speed_is_frame_based);
        assert_eq!(config.buffer_fraction, 0.2);
    }

    #[test]
    fn test_tick_duration() {
        let config = ScrollConfig {
            delay_seconds: 0.02,
            ..Default::default()
        };
        assert_eq!(config.tick_duration(), Duration::from_millis(20));

        let config = ScrollConfig {
            delay_seconds: 0.0,
            ..Default::default()
        };
        assert_eq!(config.tick_duration(), Duration::from_millis(10));

        let config = ScrollConfig {
            delay_seconds: 1e25,
            ..Default::default()
        };
        assert_eq!(config.tick_duration(), Duration::MAX);
    }

    #[test]
    fn test_velocity_and_rate() {
        let config = ScrollConfig::default();
        assert!((config.velocity() - 0.5).abs() < 1e-9);
        assert!((config.px_per_second() - 50.0).abs() < 1e-9);
    }
}
