//! Particle rendering.
//!
//! One frame is painted in four passes:
//!
//! 1. clear the canvas
//! 2. per particle: a soft radial glow out to `3 x current_size` and a small
//!    white-hot core
//! 3. constellation lines between every pair of particles closer than the
//!    connection distance, fading out linearly with distance
//! 4. every few frames, a grain pass that adds the same random offset to the
//!    R, G and B channels of each pixel
//!
//! The grain pass rewrites the whole pixel buffer, which makes it by far the
//! most expensive step. [`GrainGate`] limits it to one time window in
//! `grain_every`.

use rand::Rng;

use crate::canvas::{Canvas, BYTES_PER_PIXEL};
use crate::color::{hsla, rgba8, ColorStop};
use crate::config::FieldConfig;
use crate::particle::Particle;

/// Glow radius as a multiple of the particle's current size.
pub const GLOW_SCALE: f32 = 3.0;
/// Core radius as a multiple of the particle's current size.
pub const CORE_SCALE: f32 = 0.5;

/// Opacity of a connection line between two particles `distance` apart.
///
/// `max_opacity` at distance zero, falling linearly to exactly zero at
/// `threshold` and staying zero beyond it.
#[inline]
pub fn connection_opacity(distance: f32, threshold: f32, max_opacity: f32) -> f32 {
    if !(distance < threshold) {
        return 0.0;
    }
    (1.0 - distance / threshold) * max_opacity
}

/// The four gradient stops of a particle's glow.
pub fn glow_stops(particle: &Particle) -> [ColorStop; 4] {
    let a = particle.current_opacity;
    let (h, s) = (particle.hue, particle.saturation);
    [
        ColorStop::new(0.0, hsla(h + 20.0, 100.0, 90.0, a)),
        ColorStop::new(0.3, hsla(h, s, 60.0, a * 0.7)),
        ColorStop::new(0.6, hsla(h, s, 50.0, a * 0.3)),
        ColorStop::new(1.0, hsla(h, s, 50.0, 0.0)),
    ]
}

/// Time-based gate for the grain pass.
///
/// The timeline is cut into windows of `period_ms`; grain runs during every
/// `every`-th window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GrainGate {
    pub period_ms: f64,
    pub every: u32,
}

impl GrainGate {
    /// Gate from the field configuration.
    pub fn from_config(config: &FieldConfig) -> Self {
        Self {
            period_ms: config.grain_period_ms,
            every: config.grain_every,
        }
    }

    /// Whether grain should run for a frame at `timestamp_ms`.
    pub fn is_active(&self, timestamp_ms: f64) -> bool {
        if !(self.period_ms > 0.0) || self.every == 0 || !timestamp_ms.is_finite() {
            return false;
        }
        let window = (timestamp_ms / self.period_ms).floor();
        window.rem_euclid(self.every as f64) == 0.0
    }
}

/// Add film grain to an RGBA8 buffer.
///
/// Each pixel gets one draw from `[-intensity/2, intensity/2)`, added to R, G
/// and B with rounding and clamping. Alpha is left alone.
pub fn apply_grain<R: Rng + ?Sized>(pixels: &mut [u8], intensity: f32, rng: &mut R) {
    if intensity <= 0.0 {
        return;
    }
    for px in pixels.chunks_exact_mut(BYTES_PER_PIXEL) {
        let noise = (rng.gen::<f32>() - 0.5) * intensity;
        for channel in &mut px[..3] {
            *channel = (*channel as f32 + noise).round().clamp(0.0, 255.0) as u8;
        }
    }
}

/// Paints particles, links and grain onto a [`Canvas`].
///
/// The renderer holds no settings of its own; every frame reads the
/// [`FieldConfig`] it is handed.
#[derive(Debug, Clone, Default)]
pub struct Renderer {
    frames: u64,
    grain_frames: u64,
}

impl Renderer {
    /// Create a renderer with zeroed frame counters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Paint one frame.
    ///
    /// `timestamp_ms` only drives the grain gate; `rng` supplies grain noise.
    pub fn render<C, R>(
        &mut self,
        canvas: &mut C,
        particles: &[Particle],
        config: &FieldConfig,
        timestamp_ms: f64,
        rng: &mut R,
    ) where
        C: Canvas + ?Sized,
        R: Rng + ?Sized,
    {
        canvas.clear();

        for particle in particles {
            self.draw_particle(canvas, particle);
        }

        self.draw_connections(canvas, particles, config);

        self.frames += 1;
        if config.grain_enabled && GrainGate::from_config(config).is_active(timestamp_ms) {
            apply_grain(canvas.pixels_mut(), config.grain_intensity, rng);
            self.grain_frames += 1;
        }
    }

    /// Glow and core of one particle.
    pub fn draw_particle<C: Canvas + ?Sized>(&self, canvas: &mut C, particle: &Particle) {
        let size = particle.current_size;
        canvas.fill_radial_gradient(particle.position, size * GLOW_SCALE, &glow_stops(particle));
        canvas.fill_circle(
            particle.position,
            size * CORE_SCALE,
            hsla(particle.hue + 30.0, 100.0, 95.0, particle.current_opacity),
        );
    }

    /// Lines between all close pairs. Each unordered pair is examined once.
    ///
    /// Returns the number of lines drawn.
    pub fn draw_connections<C: Canvas + ?Sized>(
        &self,
        canvas: &mut C,
        particles: &[Particle],
        config: &FieldConfig,
    ) -> usize {
        let threshold = config.connection_distance;
        let threshold_sq = threshold * threshold;
        let mut drawn = 0;

        for (i, a) in particles.iter().enumerate() {
            for b in &particles[i + 1..] {
                let dist_sq = a.position.distance_squared(b.position);
                if dist_sq >= threshold_sq {
                    continue;
                }
                let opacity = connection_opacity(
                    dist_sq.sqrt(),
                    threshold,
                    config.connection_max_opacity,
                );
                canvas.stroke_line(
                    a.position,
                    b.position,
                    config.connection_width,
                    rgba8(config.connection_color, opacity),
                );
                drawn += 1;
            }
        }
        drawn
    }

    /// Frames rendered so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Frames that received the grain pass.
    pub fn grain_frames(&self) -> u64 {
        self.grain_frames
    }
}
