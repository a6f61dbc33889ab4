//! The particle store.
//!
//! [`ParticleField`] owns the live particle set and the viewport bounds it was
//! generated for. The set is never grown or shrunk incrementally: every
//! [`initialize`](ParticleField::initialize) or
//! [`resize`](ParticleField::resize) throws the old set away and spawns a fresh
//! one.

use glam::Vec2;
use rand::rngs::SmallRng;

use crate::config::FieldConfig;
use crate::particle::Particle;
use crate::spawn::{make_rng, SpawnContext};

/// Live particles plus the bounds and RNG that produced them.
#[derive(Debug, Clone)]
pub struct ParticleField {
    particles: Vec<Particle>,
    bounds: Vec2,
    config: FieldConfig,
    rng: SmallRng,
}

impl ParticleField {
    /// Create a field for a `width` x `height` viewport with
    /// `config.particle_count` particles.
    ///
    /// `seed` makes spawning reproducible; `None` seeds from the clock.
    pub fn new(width: u32, height: u32, config: FieldConfig, seed: Option<u64>) -> Self {
        let count = config.particle_count;
        let mut field = Self {
            particles: Vec::new(),
            bounds: Vec2::ZERO,
            config,
            rng: make_rng(seed),
        };
        field.initialize(width, height, count);
        field
    }

    /// Replace the whole particle set with `count` new particles spread over
    /// a `width` x `height` viewport.
    pub fn initialize(&mut self, width: u32, height: u32, count: u32) {
        self.bounds = Vec2::new(width as f32, height as f32);
        self.particles.clear();
        self.particles.reserve(count as usize);

        for _ in 0..count {
            let mut ctx = SpawnContext::new(self.bounds, &mut self.rng);
            self.particles.push(Particle::spawn(&mut ctx, &self.config));
        }

        log::debug!("Spawned {} particles for {}x{}", count, width, height);
    }

    /// Regenerate the configured number of particles for new viewport bounds.
    pub fn resize(&mut self, width: u32, height: u32) {
        log::info!(
            "Viewport resized to {}x{}, regenerating {} particles",
            width,
            height,
            self.config.particle_count
        );
        self.initialize(width, height, self.config.particle_count);
    }

    /// Current particles.
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Mutable access to the particles.
    pub fn particles_mut(&mut self) -> &mut [Particle] {
        &mut self.particles
    }

    /// Particles, RNG and configuration at once, for per-frame passes that
    /// mutate the particles while reading the settings.
    pub fn split_mut(&mut self) -> (&mut [Particle], &mut SmallRng, &FieldConfig) {
        (&mut self.particles, &mut self.rng, &self.config)
    }

    /// Viewport size the particles live in.
    pub fn bounds(&self) -> Vec2 {
        self.bounds
    }

    /// Field configuration.
    pub fn config(&self) -> &FieldConfig {
        &self.config
    }

    /// Number of particles.
    pub fn len(&self) -> usize {
        self.particles.len()
    }

    /// `true` if the field holds no particles.
    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_uses_config_count() {
        let field = ParticleField::new(1000, 800, FieldConfig::default(), Some(1));
        assert_eq!(field.len(), 80);
        assert_eq!(field.bounds(), Vec2::new(1000.0, 800.0));
    }

    #[test]
    fn test_initialize_replaces_not_appends() {
        let mut field = ParticleField::new(1000, 800, FieldConfig::default(), Some(1));
        field.initialize(1000, 800, 10);
        assert_eq!(field.len(), 10);
        field.initialize(1000, 800, 10);
        assert_eq!(field.len(), 10);
    }

    #[test]
    fn test_zero_count() {
        let mut field = ParticleField::new(100, 100, FieldConfig::default(), Some(1));
        field.initialize(100, 100, 0);
        assert!(field.is_empty());
    }

    #[test]
    fn test_zero_viewport_pins_to_origin() {
        let field = ParticleField::new(0, 0, FieldConfig::default(), Some(1));
        assert!(field
            .particles()
            .iter()
            .all(|p| p.position == Vec2::ZERO));
    }

    #[test]
    fn test_resize_regenerates_within_new_bounds() {
        let mut field = ParticleField::new(1000, 800, FieldConfig::default(), Some(9));
        field.resize(500, 400);
        assert_eq!(field.len(), 80);
        for p in field.particles() {
            assert!(p.position.x >= 0.0 && p.position.x < 500.0);
            assert!(p.position.y >= 0.0 && p.position.y < 400.0);
        }
    }

    #[test]
    fn test_seed_reproducible() {
        let a = ParticleField::new(640, 480, FieldConfig::default(), Some(11));
        let b = ParticleField::new(640, 480, FieldConfig::default(), Some(11));
        assert_eq!(a.particles(), b.particles());
    }
}
