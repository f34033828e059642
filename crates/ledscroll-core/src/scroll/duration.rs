//! Advisory cycle duration planning
//!
//! The planned duration tells schedulers roughly how long one content cycle
//! takes so they can decide when to rotate modes. Playback completion is
//! decided by the playback clock, not by this number.

use super::speed::{effective_px_per_second, MIN_PX_PER_FRAME};
use crate::config::ScrollConfig;

/// Seconds needed to scroll `strip_width + display_width` pixels, padded by
/// `buffer_fraction` and clamped into `[min_duration, max_duration]`.
pub fn plan(
    strip_width: u32,
    display_width: u32,
    velocity_px_per_frame: f64,
    delay_seconds: f64,
    min_duration: f64,
    max_duration: f64,
    buffer_fraction: f64,
) -> f64 {
    let distance = strip_width as f64 + display_width as f64;
    let velocity = if velocity_px_per_frame.is_finite() && velocity_px_per_frame > 0.0 {
        velocity_px_per_frame
    } else {
        MIN_PX_PER_FRAME
    };
    let px_per_second = effective_px_per_second(velocity, delay_seconds);

    let raw = (distance / px_per_second) * (1.0 + buffer_fraction);
    clamp_duration(raw, min_duration, max_duration)
}

/// Planned duration for a prepared strip under `config`
pub fn plan_for(
    config: &ScrollConfig,
    strip_width: u32,
    display_width: u32,
    velocity_px_per_frame: f64,
) -> f64 {
    if !config.dynamic_duration {
        return clamp_duration(
            config.fixed_duration,
            config.min_duration,
            config.max_duration,
        );
    }
    plan(
        strip_width,
        display_width,
        velocity_px_per_frame,
        config.delay_seconds,
        config.min_duration,
        config.max_duration,
        config.buffer_fraction,
    )
}

/// Clamp without panicking on NaN or inverted bounds
fn clamp_duration(raw: f64, min_duration: f64, max_duration: f64) -> f64 {
    let mut lo = if min_duration.is_nan() { 0.0 } else { min_duration };
    let mut hi = if max_duration.is_nan() { lo } else { max_duration };
    if lo > hi {
        std::mem::swap(&mut lo, &mut hi);
    }
    let raw = if raw.is_nan() { hi } else { raw };
    raw.max(lo).min(hi)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_min_bound_dominates() {
        // ((152 + 128) / 50) * 1.2 = 6.72s, below the 30s floor
        let d = plan(152, 128, 0.5, 0.01, 30.0, 600.0, 0.2);
        assert_eq!(d, 30.0);
    }

    #[test]
    fn test_unclamped_value() {
        // (1872 + 128) / 50 * 1.0 = 40s
        let d = plan(1872, 128, 0.5, 0.01, 10.0, 600.0, 0.0);
        assert!((d - 40.0).abs() < 1e-9);
    }

    #[test]
    fn test_max_bound() {
        let d = plan(100_000, 128, 0.1, 0.01, 30.0, 300.0, 0.2);
        assert_eq!(d, 300.0);
    }

    #[test]
    fn test_zero_delay_uses_nominal_rate() {
        // 0.5 px/frame at 100fps = 50 px/s; 1000px -> 20s
        let d = plan(872, 128, 0.5, 0.0, 0.0, 600.0, 0.0);
        assert!((d - 20.0).abs() < 1e-9);
    }

    #[test]
    fn test_inverted_bounds() {
        let d = plan(152, 128, 0.5, 0.01, 600.0, 30.0, 0.2);
        assert_eq!(d, 30.0);
    }

    #[test]
    fn test_fixed_duration_when_dynamic_disabled() {
        let config = ScrollConfig {
            dynamic_duration: false,
            fixed_duration: 45.0,
            ..ScrollConfig::default()
        };
        assert_eq!(plan_for(&config, 10_000, 128, 0.5), 45.0);
    }

    proptest! {
        #[test]
        fn prop_clamp_law(
            strip in 0u32..200_000,
            display in 0u32..1024,
            velocity in -10.0f64..10.0,
            delay in -1.0f64..1.0,
            min in 0.0f64..1000.0,
            span in 0.0f64..1000.0,
            buffer in -2.0f64..5.0,
        ) {
            let max = min + span;
            let d = plan(strip, display, velocity, delay, min, max, buffer);
            prop_assert!(min <= d && d <= max, "{} not in [{}, {}]", d, min, max);
        }
    }
}
