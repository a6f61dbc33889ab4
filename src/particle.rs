//! The firefly particle.

use glam::Vec2;
use std::f32::consts::TAU;

use crate::config::FieldConfig;
use crate::spawn::SpawnContext;

/// Lowest base opacity a particle can be created with.
pub const MIN_OPACITY: f32 = 0.4;
/// Hue range (degrees) of the warm orange-to-yellow palette.
pub const HUE_RANGE: (f32, f32) = (20.0, 50.0);
/// Saturation range (percent).
pub const SATURATION_RANGE: (f32, f32) = (80.0, 100.0);
/// Pulse speed range (radians per second).
pub const PULSE_SPEED_RANGE: (f32, f32) = (0.015, 0.045);

/// One glowing point of the field.
///
/// Everything except `position`, `velocity` and the two `current_*` fields is
/// fixed at creation. The `current_*` values are recomputed by every
/// [`advance`](crate::integrate::advance) from the pulse phase.
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub position: Vec2,
    pub velocity: Vec2,
    /// Base radius.
    pub size: f32,
    /// Base opacity in `[0.4, 1.0)`.
    pub opacity: f32,
    pub pulse_speed: f32,
    pub pulse_offset: f32,
    /// Degrees.
    pub hue: f32,
    /// Percent.
    pub saturation: f32,
    pub current_size: f32,
    pub current_opacity: f32,
}

impl Particle {
    /// Create a particle with randomized position, motion, pulse and color.
    pub fn spawn(ctx: &mut SpawnContext<'_>, config: &FieldConfig) -> Self {
        let position = ctx.random_in_bounds();
        let size = ctx.random_range(config.particle_min_size, config.particle_max_size);
        let velocity = ctx.random_velocity(config.particle_speed);
        let opacity = ctx.random_range(MIN_OPACITY, 1.0);
        let pulse_speed = ctx.random_range(PULSE_SPEED_RANGE.0, PULSE_SPEED_RANGE.1);
        let pulse_offset = ctx.random_angle();
        let hue = ctx.random_range(HUE_RANGE.0, HUE_RANGE.1);
        let saturation = ctx.random_range(SATURATION_RANGE.0, SATURATION_RANGE.1);

        let mut particle = Self {
            position,
            velocity,
            size,
            opacity,
            pulse_speed,
            pulse_offset,
            hue,
            saturation,
            current_size: size,
            current_opacity: opacity,
        };
        particle.update_pulse(0.0);
        particle
    }

    /// Pulse value at `time_seconds`, in `[-1, 1]`.
    #[inline]
    pub fn phase(&self, time_seconds: f32) -> f32 {
        (time_seconds * self.pulse_speed + self.pulse_offset).sin()
    }

    /// Recompute `current_size` and `current_opacity` for `time_seconds`.
    ///
    /// Opacity swings between fully off and the base opacity; size between
    /// 70% and 110% of the base size.
    pub fn update_pulse(&mut self, time_seconds: f32) {
        let phase = self.phase(time_seconds);
        self.current_opacity = self.opacity * (phase * 0.5 + 0.5);
        self.current_size = self.size * (phase * 0.2 + 0.9);
    }

    /// A particle at `position` with the given base values and zero velocity.
    ///
    /// Mostly useful for tests and benchmarks that need exact placement.
    pub fn at(position: Vec2, size: f32, opacity: f32) -> Self {
        Self {
            position,
            velocity: Vec2::ZERO,
            size,
            opacity,
            pulse_speed: PULSE_SPEED_RANGE.0,
            pulse_offset: TAU / 4.0,
            hue: HUE_RANGE.0,
            saturation: SATURATION_RANGE.1,
            current_size: size,
            current_opacity: opacity,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spawn::make_rng;

    #[test]
    fn test_spawn_within_configured_bounds() {
        let config = FieldConfig::default();
        let mut rng = make_rng(Some(3));
        let bounds = Vec2::new(1000.0, 800.0);

        for _ in 0..500 {
            let p = Particle::spawn(&mut SpawnContext::new(bounds, &mut rng), &config);
            assert!(p.size >= config.particle_min_size && p.size <= config.particle_max_size);
            assert!(p.opacity >= MIN_OPACITY && p.opacity <= 1.0);
            assert!(p.hue >= 20.0 && p.hue <= 50.0);
            assert!(p.saturation >= 80.0 && p.saturation <= 100.0);
            assert!(p.velocity.x.abs() <= config.particle_speed / 2.0);
            assert!(p.velocity.y.abs() <= config.particle_speed / 2.0);
            assert!(p.pulse_offset >= 0.0 && p.pulse_offset <= TAU);
            assert!(p.position.x >= 0.0 && p.position.x < bounds.x);
            assert!(p.position.y >= 0.0 && p.position.y < bounds.y);
        }
    }

    #[test]
    fn test_pulse_bounds() {
        let mut p = Particle::at(Vec2::ZERO, 10.0, 0.8);
        p.pulse_speed = 0.7;
        for step in 0..2000 {
            p.update_pulse(step as f32 * 0.05);
            assert!(p.current_opacity >= 0.0 && p.current_opacity <= p.opacity + 1e-6);
            assert!(p.current_size >= 0.7 * p.size - 1e-4);
            assert!(p.current_size <= 1.1 * p.size + 1e-4);
        }
    }

    #[test]
    fn test_pulse_peak() {
        // offset of a quarter turn puts the phase at its maximum at t = 0
        let mut p = Particle::at(Vec2::ZERO, 10.0, 0.8);
        p.update_pulse(0.0);
        assert!((p.current_opacity - 0.8).abs() < 1e-5);
        assert!((p.current_size - 11.0).abs() < 1e-4);
    }
}
