//! The frame loop.
//!
//! [`FrameLoop`] ties the pieces together: one [`tick`](FrameLoop::tick)
//! integrates every particle against the current pointer and then paints the
//! frame. Where the timestamps come from and where finished frames go is up to
//! a [`FrameHost`]: the window drives ticks from redraw events, while
//! [`FixedStepHost`] replays a simulated 60 Hz display for headless snapshots
//! and tests.
//!
//! The loop runs until its [`CancelToken`] is cancelled or the host runs out
//! of frames. A paused loop keeps running frames but leaves both the particles
//! and the canvas untouched, so the host re-presents the last picture.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::canvas::Canvas;
use crate::config::FieldConfig;
use crate::field::ParticleField;
use crate::integrate::advance_all;
use crate::pointer::PointerCell;
use crate::render::Renderer;

/// Frame interval of a 60 Hz display, in milliseconds.
pub const FRAME_INTERVAL_MS: f64 = 1000.0 / 60.0;

/// Shared stop flag for a running [`FrameLoop`].
///
/// Clones share the same flag, so any thread holding one can stop the loop.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    /// A token that has not been cancelled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask the loop to stop before its next frame.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    /// Whether [`cancel`](Self::cancel) has been called on any clone.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }
}

/// Source of frame timestamps and sink for painted frames.
pub trait FrameHost {
    /// Wait for the next frame and return its timestamp in milliseconds.
    ///
    /// `None` ends the loop.
    fn next_frame(&mut self) -> Option<f64>;

    /// New viewport size, if it changed since the last frame.
    fn poll_resize(&mut self) -> Option<(u32, u32)> {
        None
    }

    /// Show a finished frame.
    fn present(&mut self, canvas: &dyn Canvas);
}

/// Host that replays a fixed number of frames at a constant interval.
#[derive(Debug, Clone)]
pub struct FixedStepHost {
    interval_ms: f64,
    timestamp_ms: f64,
    remaining: u64,
    presented: u64,
}

impl FixedStepHost {
    /// `frames` frames at 60 Hz, starting at timestamp 0.
    pub fn new(frames: u64) -> Self {
        Self::with_interval(frames, FRAME_INTERVAL_MS)
    }

    /// `frames` frames spaced `interval_ms` apart.
    pub fn with_interval(frames: u64, interval_ms: f64) -> Self {
        Self {
            interval_ms,
            timestamp_ms: 0.0,
            remaining: frames,
            presented: 0,
        }
    }

    /// Frames handed to [`present`](FrameHost::present) so far.
    pub fn presented(&self) -> u64 {
        self.presented
    }
}

impl FrameHost for FixedStepHost {
    fn next_frame(&mut self) -> Option<f64> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        let timestamp = self.timestamp_ms;
        self.timestamp_ms += self.interval_ms;
        Some(timestamp)
    }

    fn present(&mut self, _canvas: &dyn Canvas) {
        self.presented += 1;
    }
}

/// Integrates and paints the particle field once per frame.
#[derive(Debug)]
pub struct FrameLoop {
    field: ParticleField,
    renderer: Renderer,
    pointer: PointerCell,
    cancel: CancelToken,
    paused: bool,
    frames: u64,
}

impl FrameLoop {
    /// Build a loop for a `width` x `height` viewport.
    ///
    /// `seed` makes the particle set and all per-frame randomness reproducible.
    pub fn new(width: u32, height: u32, config: FieldConfig, seed: Option<u64>) -> Self {
        Self {
            field: ParticleField::new(width, height, config, seed),
            renderer: Renderer::new(),
            pointer: PointerCell::new(),
            cancel: CancelToken::new(),
            paused: false,
            frames: 0,
        }
    }

    /// Handle to the pointer slot this loop reads each frame.
    pub fn pointer(&self) -> PointerCell {
        self.pointer.clone()
    }

    /// Handle that stops [`run`](Self::run).
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// The particle field.
    pub fn field(&self) -> &ParticleField {
        &self.field
    }

    /// Settings shared by integration and rendering.
    pub fn config(&self) -> &FieldConfig {
        self.field.config()
    }

    /// The renderer, for its frame counters.
    pub fn renderer(&self) -> &Renderer {
        &self.renderer
    }

    /// Frames simulated so far. Paused frames are not counted.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Whether ticks are currently frozen.
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Freeze or unfreeze the simulation.
    pub fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
    }

    /// Run one frame: integrate every particle at `timestamp_ms`, then paint.
    ///
    /// Does nothing while paused.
    pub fn tick<C: Canvas + ?Sized>(&mut self, canvas: &mut C, timestamp_ms: f64) {
        if self.paused {
            return;
        }

        let time_seconds = (timestamp_ms * 0.001) as f32;
        let pointer = self.pointer.get();
        let bounds = self.field.bounds();

        let (particles, rng, config) = self.field.split_mut();
        advance_all(particles, time_seconds, pointer, bounds, config, rng);
        self.renderer.render(canvas, particles, config, timestamp_ms, rng);

        self.frames += 1;
    }

    /// New viewport size: throw the particles away and spawn a fresh set.
    ///
    /// A zero-sized viewport (a minimized window) is ignored.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            log::debug!("Ignoring resize to {}x{}", width, height);
            return;
        }
        self.field.resize(width, height);
    }

    /// Drive frames from `host` until it ends or the loop is cancelled.
    ///
    /// Returns the number of frames run.
    pub fn run<H, C>(&mut self, host: &mut H, canvas: &mut C) -> u64
    where
        H: FrameHost + ?Sized,
        C: Canvas,
    {
        log::info!(
            "Frame loop started with {} particles on {}x{}",
            self.field.len(),
            canvas.width(),
            canvas.height()
        );

        let mut ran = 0;
        while !self.cancel.is_cancelled() {
            let Some(timestamp_ms) = host.next_frame() else {
                break;
            };

            if let Some((width, height)) = host.poll_resize() {
                match canvas.resize(width, height) {
                    Ok(()) => self.resize(width, height),
                    Err(e) => log::debug!("Keeping previous surface: {}", e),
                }
            }

            self.tick(canvas, timestamp_ms);
            host.present(&*canvas);
            ran += 1;
        }

        log::info!(
            "Frame loop stopped after {} frames ({} with grain)",
            ran,
            self.renderer.grain_frames()
        );
        ran
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::PixelCanvas;

    struct CancellingHost {
        token: CancelToken,
        after: u64,
        inner: FixedStepHost,
    }

    impl FrameHost for CancellingHost {
        fn next_frame(&mut self) -> Option<f64> {
            self.inner.next_frame()
        }

        fn present(&mut self, canvas: &dyn Canvas) {
            self.inner.present(canvas);
            if self.inner.presented() == self.after {
                self.token.cancel();
            }
        }
    }

    struct ResizingHost {
        inner: FixedStepHost,
        pending: Option<(u32, u32)>,
    }

    impl FrameHost for ResizingHost {
        fn next_frame(&mut self) -> Option<f64> {
            self.inner.next_frame()
        }

        fn poll_resize(&mut self) -> Option<(u32, u32)> {
            self.pending.take()
        }

        fn present(&mut self, canvas: &dyn Canvas) {
            self.inner.present(canvas);
        }
    }

    #[test]
    fn test_fixed_step_timestamps() {
        let mut host = FixedStepHost::with_interval(3, 10.0);
        assert_eq!(host.next_frame(), Some(0.0));
        assert_eq!(host.next_frame(), Some(10.0));
        assert_eq!(host.next_frame(), Some(20.0));
        assert_eq!(host.next_frame(), None);
    }

    #[test]
    fn test_run_until_host_ends() {
        let mut frame_loop = FrameLoop::new(200, 100, FieldConfig::default(), Some(1));
        let mut canvas = PixelCanvas::new(200, 100).unwrap();
        let mut host = FixedStepHost::new(5);

        assert_eq!(frame_loop.run(&mut host, &mut canvas), 5);
        assert_eq!(host.presented(), 5);
        assert_eq!(frame_loop.frames(), 5);
        assert_eq!(frame_loop.renderer().frames(), 5);
    }

    #[test]
    fn test_cancel_stops_loop() {
        let mut frame_loop = FrameLoop::new(200, 100, FieldConfig::default(), Some(1));
        let mut canvas = PixelCanvas::new(200, 100).unwrap();
        let mut host = CancellingHost {
            token: frame_loop.cancel_token(),
            after: 3,
            inner: FixedStepHost::new(100),
        };

        assert_eq!(frame_loop.run(&mut host, &mut canvas), 3);
        assert!(frame_loop.cancel_token().is_cancelled());
    }

    #[test]
    fn test_cancelled_before_start_runs_nothing() {
        let mut frame_loop = FrameLoop::new(200, 100, FieldConfig::default(), Some(1));
        let mut canvas = PixelCanvas::new(200, 100).unwrap();
        frame_loop.cancel_token().cancel();
        assert_eq!(frame_loop.run(&mut FixedStepHost::new(10), &mut canvas), 0);
    }

    #[test]
    fn test_run_applies_host_resize() {
        let mut frame_loop = FrameLoop::new(1000, 800, FieldConfig::default(), Some(4));
        let mut canvas = PixelCanvas::new(1000, 800).unwrap();
        let mut host = ResizingHost {
            inner: FixedStepHost::new(2),
            pending: Some((500, 400)),
        };

        frame_loop.run(&mut host, &mut canvas);
        assert_eq!(canvas.width(), 500);
        assert_eq!(canvas.height(), 400);
        assert_eq!(frame_loop.field().bounds(), glam::Vec2::new(500.0, 400.0));
        assert_eq!(frame_loop.field().len(), 80);
    }

    #[test]
    fn test_zero_resize_is_ignored() {
        let mut frame_loop = FrameLoop::new(300, 200, FieldConfig::default(), Some(4));
        let before = frame_loop.field().particles().to_vec();
        frame_loop.resize(0, 200);
        assert_eq!(frame_loop.field().particles(), &before[..]);
    }

    #[test]
    fn test_tick_reads_pointer() {
        let config = FieldConfig::default().with_particle_count(1).with_jitter(0.0);
        let mut frame_loop = FrameLoop::new(400, 400, config, Some(2));
        let mut canvas = PixelCanvas::new(400, 400).unwrap();

        let start = frame_loop.field().particles()[0].clone();
        frame_loop.pointer().set(start.position + start.velocity + glam::Vec2::new(5.0, 0.0));
        frame_loop.tick(&mut canvas, 0.0);

        let after = &frame_loop.field().particles()[0];
        // pushed toward -x, on top of the decayed spawn velocity
        assert!(after.velocity.x < start.velocity.x * 0.97);
    }

    #[test]
    fn test_paused_frames_change_nothing() {
        let mut frame_loop = FrameLoop::new(300, 200, FieldConfig::default(), Some(6));
        let mut canvas = PixelCanvas::new(300, 200).unwrap();
        frame_loop.pointer().set(glam::Vec2::new(150.0, 100.0));
        for i in 0..10 {
            frame_loop.tick(&mut canvas, i as f64 * FRAME_INTERVAL_MS);
        }

        frame_loop.set_paused(true);
        let particles = frame_loop.field().particles().to_vec();
        let pixels = canvas.pixels().to_vec();
        let grain_frames = frame_loop.renderer().grain_frames();

        for i in 10..70 {
            frame_loop.tick(&mut canvas, i as f64 * FRAME_INTERVAL_MS);
        }
        assert_eq!(frame_loop.field().particles(), &particles[..]);
        assert_eq!(canvas.pixels(), &pixels[..]);
        assert_eq!(frame_loop.frames(), 10);
        assert_eq!(frame_loop.renderer().frames(), 10);
        assert_eq!(frame_loop.renderer().grain_frames(), grain_frames);

        frame_loop.set_paused(false);
        frame_loop.tick(&mut canvas, 70.0 * FRAME_INTERVAL_MS);
        assert_eq!(frame_loop.frames(), 11);
        assert_ne!(frame_loop.field().particles(), &particles[..]);
    }

    #[test]
    fn test_config_comes_from_field() {
        let config = FieldConfig::default().with_particle_count(7).with_grain(false);
        let frame_loop = FrameLoop::new(100, 100, config.clone(), Some(1));
        assert_eq!(frame_loop.config(), &config);
        assert_eq!(frame_loop.field().len(), 7);
    }
}
