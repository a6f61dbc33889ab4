//! Spawn context for particle initialization.
//!
//! Provides the random helpers a particle needs when it is created, so the
//! particle constructor reads as a list of distributions rather than RNG
//! plumbing.

use glam::Vec2;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use std::f32::consts::TAU;

/// Seed derived from the wall clock.
///
/// Different on every program execution; tests pass explicit seeds instead.
pub fn clock_seed() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(42)
}

/// Build the field RNG from an optional explicit seed.
pub fn make_rng(seed: Option<u64>) -> SmallRng {
    SmallRng::seed_from_u64(seed.unwrap_or_else(clock_seed))
}

/// Context handed to the particle constructor.
///
/// ```ignore
/// let particle = Particle::spawn(&mut SpawnContext::new(bounds, &mut rng), &config);
/// ```
pub struct SpawnContext<'a> {
    /// Viewport size; positions are spawned in `[0, bounds.x) x [0, bounds.y)`.
    pub bounds: Vec2,
    rng: &'a mut SmallRng,
}

impl<'a> SpawnContext<'a> {
    /// Create a spawn context borrowing the field RNG.
    pub fn new(bounds: Vec2, rng: &'a mut SmallRng) -> Self {
        Self { bounds, rng }
    }

    // ========== Random primitives ==========

    /// Random f32 between 0.0 and 1.0.
    #[inline]
    pub fn random(&mut self) -> f32 {
        self.rng.gen()
    }

    /// Random f32 in `[min, max)`. Returns `min` for an empty range.
    #[inline]
    pub fn random_range(&mut self, min: f32, max: f32) -> f32 {
        min + self.random() * (max - min)
    }

    /// Random angle in `[0, 2π)`.
    #[inline]
    pub fn random_angle(&mut self) -> f32 {
        self.random() * TAU
    }

    // ========== Position / velocity helpers ==========

    /// Random point inside the viewport.
    pub fn random_in_bounds(&mut self) -> Vec2 {
        let x = self.random() * self.bounds.x;
        let y = self.random() * self.bounds.y;
        // r * extent can round up to extent itself
        Vec2::new(
            if x < self.bounds.x { x } else { 0.0 },
            if y < self.bounds.y { y } else { 0.0 },
        )
    }

    /// Random velocity with each component in `[-speed/2, speed/2)`.
    pub fn random_velocity(&mut self, speed: f32) -> Vec2 {
        Vec2::new(
            (self.random() - 0.5) * speed,
            (self.random() - 0.5) * speed,
        )
    }
}
