//! Scroll speed resolution
//!
//! Configured speeds come in ambiguous units: older configs give pixels per
//! frame (`1`, `2`), newer ones pixels per second (`50`). The resolver picks
//! whichever reading lands inside the usable window. This is a compatibility
//! behavior and should stay until configs carry explicit units.

/// Slowest usable speed in pixels per frame
pub const MIN_PX_PER_FRAME: f64 = 0.1;
/// Fastest usable speed in pixels per frame
pub const MAX_PX_PER_FRAME: f64 = 5.0;
/// Frame rate assumed when the configured delay is unusable
pub const NOMINAL_FPS: f64 = 100.0;

#[inline]
fn in_window(value: f64) -> bool {
    (MIN_PX_PER_FRAME..=MAX_PX_PER_FRAME).contains(&value)
}

/// Resolve a configured speed into pixels per frame.
///
/// 1. `speed_value * delay_seconds` (pixels/second reading) if in window
/// 2. `speed_value` itself (pixels/frame reading) if in window
/// 3. the pixels/second reading clamped into the window
pub fn resolve(speed_value: f64, delay_seconds: f64) -> f64 {
    if !speed_value.is_finite() {
        return MIN_PX_PER_FRAME;
    }

    let candidate = if delay_seconds.is_finite() && delay_seconds > 0.0 {
        speed_value * delay_seconds
    } else {
        speed_value / NOMINAL_FPS
    };

    if in_window(candidate) {
        candidate
    } else if in_window(speed_value) {
        speed_value
    } else {
        candidate.clamp(MIN_PX_PER_FRAME, MAX_PX_PER_FRAME)
    }
}

/// Pixels per second for a per-frame velocity at the given tick delay
pub fn effective_px_per_second(px_per_frame: f64, delay_seconds: f64) -> f64 {
    if delay_seconds.is_finite() && delay_seconds > 0.0 {
        px_per_frame / delay_seconds
    } else {
        px_per_frame * NOMINAL_FPS
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_pixels_per_second_reading() {
        assert!(approx(resolve(50.0, 0.01), 0.5));
    }

    #[test]
    fn test_pixels_per_frame_reading() {
        // 1.0 * 0.03 = 0.03 is too slow, 1.0 itself is usable
        assert!(approx(resolve(1.0, 0.03), 1.0));
    }

    #[test]
    fn test_neither_reading_clamps() {
        // 1000 * 0.01 = 10 (too fast), 1000 not a px/frame value either
        assert!(approx(resolve(1000.0, 0.01), MAX_PX_PER_FRAME));
        // 0.05 * 0.01 is tiny, 0.05 below window too
        assert!(approx(resolve(0.05, 0.01), MIN_PX_PER_FRAME));
    }

    #[test]
    fn test_degenerate_delay() {
        assert!(approx(resolve(50.0, 0.0), 0.5));
        assert!(approx(resolve(50.0, -1.0), 0.5));
        assert!(approx(resolve(0.0, 0.0), MIN_PX_PER_FRAME));
        assert!(approx(resolve(f64::NAN, 0.01), MIN_PX_PER_FRAME));
    }

    #[test]
    fn test_effective_px_per_second() {
        assert!(approx(effective_px_per_second(0.5, 0.01), 50.0));
        assert!(approx(effective_px_per_second(0.5, 0.0), 50.0));
    }

    proptest! {
        #[test]
        fn prop_always_in_window(speed in -1.0e6f64..1.0e6, delay in -1.0f64..1.0) {
            let v = resolve(speed, delay);
            prop_assert!((MIN_PX_PER_FRAME..=MAX_PX_PER_FRAME).contains(&v));
        }
    }
}
