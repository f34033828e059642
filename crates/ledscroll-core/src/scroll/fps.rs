//! Frame-rate monitor
//!
//! Counts presented frames over a reporting interval and logs the rate when
//! the interval expires. Purely diagnostic; nothing reads it back into
//! playback.

use std::time::{Duration, Instant};

pub const DEFAULT_REPORT_INTERVAL: Duration = Duration::from_secs(5);

#[derive(Debug, Clone)]
pub struct FrameRateMonitor {
    label: String,
    interval: Duration,
    frames: u64,
    window_start: Instant,
    last_fps: Option<f64>,
}

impl FrameRateMonitor {
    pub fn new(label: impl Into<String>, interval: Duration) -> Self {
        Self {
            label: label.into(),
            interval,
            frames: 0,
            window_start: Instant::now(),
            last_fps: None,
        }
    }

    /// Count one frame. Returns the measured rate when an interval closes.
    pub fn record_frame(&mut self) -> Option<f64> {
        self.record_frame_at(Instant::now())
    }

    pub fn record_frame_at(&mut self, now: Instant) -> Option<f64> {
        self.frames += 1;
        let elapsed = now.saturating_duration_since(self.window_start);
        if elapsed < self.interval || elapsed.is_zero() {
            return None;
        }

        let fps = self.frames as f64 / elapsed.as_secs_f64();
        tracing::info!("[{}] FPS: {:.1} ({} frames in {:.1}s)", self.label, fps, self.frames, elapsed.as_secs_f64());

        self.last_fps = Some(fps);
        self.frames = 0;
        self.window_start = now;
        Some(fps)
    }

    /// Rate from the last closed interval
    pub fn last_fps(&self) -> Option<f64> {
        self.last_fps
    }

    /// Frames counted in the interval still open
    pub fn pending_frames(&self) -> u64 {
        self.frames
    }

    pub fn restart(&mut self) {
        self.frames = 0;
        self.window_start = Instant::now();
    }
}

impl Default for FrameRateMonitor {
    fn default() -> Self {
        Self::new("scroll", DEFAULT_REPORT_INTERVAL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reports_on_interval_expiry() {
        let mut monitor = FrameRateMonitor::new("test", Duration::from_secs(5));
        let start = monitor.window_start;

        for i in 1..150 {
            let at = start + Duration::from_millis(i * 33);
            assert_eq!(monitor.record_frame_at(at), None);
        }
        let fps = monitor
            .record_frame_at(start + Duration::from_secs(5))
            .unwrap();
        assert!((fps - 30.0).abs() < 1e-9);
        assert_eq!(monitor.pending_frames(), 0);
        assert_eq!(monitor.last_fps(), Some(fps));
    }

    #[test]
    fn test_counters_reset_after_report() {
        let mut monitor = FrameRateMonitor::new("test", Duration::from_secs(1));
        let start = monitor.window_start;
        monitor.record_frame_at(start + Duration::from_secs(1));
        assert_eq!(monitor.record_frame_at(start + Duration::from_millis(1500)), None);
        assert_eq!(monitor.pending_frames(), 1);
    }
}
