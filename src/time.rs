//! Frame timestamps.
//!
//! The frame loop wants what a browser hands to its animation callback: a
//! monotonically increasing timestamp in milliseconds. [`FrameClock`] produces
//! it from `std::time::Instant`, and also keeps a frame counter and a periodic
//! FPS estimate for logging.
//!
//! # Example
//!
//! ```ignore
//! let mut clock = FrameClock::new();
//!
//! // once per frame:
//! let timestamp_ms = clock.tick();
//! frame_loop.tick(&mut canvas, timestamp_ms);
//! ```

use std::time::{Duration, Instant};

/// Monotonic millisecond clock for the frame loop.
#[derive(Debug)]
pub struct FrameClock {
    /// When the clock was created.
    start: Instant,
    /// Timestamp handed out by the last tick.
    timestamp_ms: f64,
    /// Total frames since start.
    frame_count: u64,
    /// Calculated FPS (updated periodically).
    fps: f32,
    /// Frame count at last FPS update.
    fps_frame_count: u64,
    /// Time of last FPS calculation.
    fps_update_time: Instant,
    /// How often to update FPS calculation.
    fps_update_interval: Duration,
    /// When the current pause began, if paused.
    paused_at: Option<Instant>,
    /// Total time spent paused.
    pause_elapsed: Duration,
}

impl FrameClock {
    /// Create a new clock starting from now.
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            start: now,
            timestamp_ms: 0.0,
            frame_count: 0,
            fps: 0.0,
            fps_frame_count: 0,
            fps_update_time: now,
            fps_update_interval: Duration::from_millis(500),
            paused_at: None,
            pause_elapsed: Duration::ZERO,
        }
    }

    /// Advance to a new frame and return its timestamp in milliseconds.
    ///
    /// While paused the timestamp stands still.
    pub fn tick(&mut self) -> f64 {
        let now = Instant::now();

        if self.paused_at.is_none() {
            let running = now.duration_since(self.start).saturating_sub(self.pause_elapsed);
            // never step backwards, even across pause bookkeeping
            self.timestamp_ms = self.timestamp_ms.max(running.as_secs_f64() * 1000.0);
        }

        self.frame_count += 1;

        let fps_elapsed = now.duration_since(self.fps_update_time);
        if fps_elapsed >= self.fps_update_interval {
            let frames_since = self.frame_count - self.fps_frame_count;
            self.fps = frames_since as f32 / fps_elapsed.as_secs_f32();
            self.fps_frame_count = self.frame_count;
            self.fps_update_time = now;
        }

        self.timestamp_ms
    }

    /// Timestamp of the last tick in milliseconds.
    #[inline]
    pub fn timestamp_ms(&self) -> f64 {
        self.timestamp_ms
    }

    /// Total frames since start.
    #[inline]
    pub fn frame(&self) -> u64 {
        self.frame_count
    }

    /// Calculated frames per second.
    #[inline]
    pub fn fps(&self) -> f32 {
        self.fps
    }

    /// Whether the clock is paused.
    #[inline]
    pub fn is_paused(&self) -> bool {
        self.paused_at.is_some()
    }

    /// Freeze the timestamp.
    pub fn pause(&mut self) {
        if self.paused_at.is_none() {
            self.paused_at = Some(Instant::now());
        }
    }

    /// Resume after pausing. The paused span is excluded from timestamps.
    pub fn resume(&mut self) {
        if let Some(paused_at) = self.paused_at.take() {
            self.pause_elapsed += paused_at.elapsed();
        }
    }

    /// Toggle pause state.
    pub fn toggle_pause(&mut self) {
        if self.is_paused() {
            self.resume();
        } else {
            self.pause();
        }
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_clock_new() {
        let clock = FrameClock::new();
        assert_eq!(clock.frame(), 0);
        assert_eq!(clock.timestamp_ms(), 0.0);
        assert!(!clock.is_paused());
    }

    #[test]
    fn test_tick_is_monotonic() {
        let mut clock = FrameClock::new();
        let first = clock.tick();
        thread::sleep(Duration::from_millis(5));
        let second = clock.tick();
        assert!(second > first);
        assert!(second >= 5.0);
        assert_eq!(clock.frame(), 2);
    }

    #[test]
    fn test_pause_freezes_timestamp() {
        let mut clock = FrameClock::new();
        clock.tick();
        clock.pause();
        let frozen = clock.tick();
        thread::sleep(Duration::from_millis(50));
        assert_eq!(clock.tick(), frozen);

        clock.resume();
        thread::sleep(Duration::from_millis(2));
        let resumed = clock.tick();
        assert!(resumed >= frozen);
        // the 50ms pause is not counted
        assert!(resumed - frozen < 40.0);
    }

    #[test]
    fn test_toggle_pause() {
        let mut clock = FrameClock::new();
        clock.toggle_pause();
        assert!(clock.is_paused());
        clock.toggle_pause();
        assert!(!clock.is_paused());
    }
}
