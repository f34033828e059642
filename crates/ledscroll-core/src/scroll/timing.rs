//! L4 Atomic Layer: Time calculation utilities for scroll playback
//!
//! Pure functions converting wall-clock time into frame units and progress.

use std::time::{Duration, Instant};

use super::speed::NOMINAL_FPS;

/// Fraction (0.0 to 1.0) of `duration` elapsed since `start`
#[inline]
pub fn progress(start: Instant, duration: Duration) -> f64 {
    progress_at(start, duration, Instant::now())
}

/// Same as [`progress`] measured at `now`
#[inline]
pub fn progress_at(start: Instant, duration: Duration, now: Instant) -> f64 {
    if duration.is_zero() {
        return 1.0;
    }
    let elapsed = now.saturating_duration_since(start);
    let ratio = elapsed.as_secs_f64() / duration.as_secs_f64();
    ratio.clamp(0.0, 1.0)
}

/// Seconds as a `Duration`, saturating at `Duration::MAX`
///
/// Negative and NaN inputs give `Duration::ZERO`.
#[inline]
pub fn duration_from_secs(secs: f64) -> Duration {
    if secs.is_nan() || secs <= 0.0 {
        return Duration::ZERO;
    }
    Duration::try_from_secs_f64(secs).unwrap_or(Duration::MAX)
}

/// How many ticks of `delay_seconds` fit into `elapsed`
///
/// Falls back to the nominal frame rate for a non-positive delay.
#[inline]
pub fn frames_in(elapsed: Duration, delay_seconds: f64) -> f64 {
    let secs = elapsed.as_secs_f64();
    if delay_seconds.is_finite() && delay_seconds > 0.0 {
        secs / delay_seconds
    } else {
        secs * NOMINAL_FPS
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_zero_duration() {
        let start = Instant::now();
        assert!((progress(start, Duration::ZERO) - 1.0).abs() < 0.001);
    }

    #[test]
    fn test_progress_at() {
        let start = Instant::now();
        let d = Duration::from_secs(10);
        assert!((progress_at(start, d, start + Duration::from_secs(5)) - 0.5).abs() < 1e-9);
        assert_eq!(progress_at(start, d, start + Duration::from_secs(30)), 1.0);
    }

    #[test]
    fn test_duration_from_secs_saturates() {
        assert_eq!(duration_from_secs(1.5), Duration::from_millis(1500));
        assert_eq!(duration_from_secs(1e20), Duration::MAX);
        assert_eq!(duration_from_secs(f64::INFINITY), Duration::MAX);
        assert_eq!(duration_from_secs(f64::NAN), Duration::ZERO);
        assert_eq!(duration_from_secs(-3.0), Duration::ZERO);
    }

    #[test]
    fn test_frames_in() {
        assert!((frames_in(Duration::from_millis(50), 0.01) - 5.0).abs() < 1e-9);
        assert!((frames_in(Duration::from_millis(50), 0.0) - 5.0).abs() < 1e-9);
    }
}
