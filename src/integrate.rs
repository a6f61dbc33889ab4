//! Per-frame particle integration.
//!
//! [`advance`] moves one particle forward by one frame. The order of the steps
//! matters: position is integrated with the velocity of the *previous* frame,
//! and only afterwards does the velocity pick up this frame's pointer push,
//! friction and jitter. The one-frame lag is what keeps the pointer response
//! smooth.
//!
//! ```text
//! position += velocity
//! pulse     -> current_opacity, current_size
//! wrap      -> [0, width) x [0, height)
//! velocity += pointer push      (only within the radius)
//! velocity *= friction
//! velocity += jitter
//! ```

use glam::Vec2;
use rand::Rng;

use crate::config::FieldConfig;
use crate::particle::Particle;

/// Particle-to-pointer direction assumed when the two coincide.
///
/// Matches `atan2(0, 0) == 0`. The push is its negation, so it goes along `-X`.
const COINCIDENT_TOWARD_POINTER: Vec2 = Vec2::X;

/// Wrap a coordinate onto `[0, extent)`.
///
/// Leaving one edge re-enters from the opposite one. A zero extent pins the
/// coordinate to `0`.
#[inline]
pub fn wrap_coordinate(value: f32, extent: f32) -> f32 {
    if !(extent > 0.0) || !value.is_finite() {
        return 0.0;
    }
    if (0.0..extent).contains(&value) {
        return value;
    }
    let wrapped = value.rem_euclid(extent);
    // rem_euclid of a tiny negative value can round up to `extent`
    if wrapped >= extent {
        0.0
    } else {
        wrapped
    }
}

/// Wrap a position onto the toroidal surface `[0, bounds.x) x [0, bounds.y)`.
#[inline]
pub fn wrap_position(position: Vec2, bounds: Vec2) -> Vec2 {
    Vec2::new(
        wrap_coordinate(position.x, bounds.x),
        wrap_coordinate(position.y, bounds.y),
    )
}

/// Velocity change caused by the pointer repulsion field.
///
/// The push is `(radius - d) / radius * strength`, pointing from the pointer
/// to the particle: full strength on top of the pointer, zero at the radius
/// and beyond. A particle exactly on the pointer gets the full push along a
/// fixed axis, so the result is always finite.
pub fn pointer_force(position: Vec2, pointer: Vec2, radius: f32, strength: f32) -> Vec2 {
    let toward_pointer = pointer - position;
    let distance = toward_pointer.length();
    if !(distance < radius) {
        return Vec2::ZERO;
    }

    let force = (radius - distance) / radius;
    let direction = if distance > 0.0 {
        toward_pointer / distance
    } else {
        COINCIDENT_TOWARD_POINTER
    };
    -direction * force * strength
}

/// Advance one particle by one frame.
///
/// * `time_seconds` - timestamp of the frame, drives the pulse
/// * `pointer` - current pointer position, `None` when no pointer is active
/// * `bounds` - viewport size used for wrapping
pub fn advance<R: Rng + ?Sized>(
    particle: &mut Particle,
    time_seconds: f32,
    pointer: Option<Vec2>,
    bounds: Vec2,
    config: &FieldConfig,
    rng: &mut R,
) {
    particle.position += particle.velocity;

    particle.update_pulse(time_seconds);

    particle.position = wrap_position(particle.position, bounds);

    if let Some(pointer) = pointer {
        particle.velocity += pointer_force(
            particle.position,
            pointer,
            config.mouse_radius,
            config.mouse_influence,
        );
    }

    particle.velocity *= config.friction;

    if config.jitter > 0.0 {
        particle.velocity += Vec2::new(
            (rng.gen::<f32>() - 0.5) * config.jitter,
            (rng.gen::<f32>() - 0.5) * config.jitter,
        );
    }
}

/// Advance every particle of a slice with the same frame inputs.
pub fn advance_all<R: Rng + ?Sized>(
    particles: &mut [Particle],
    time_seconds: f32,
    pointer: Option<Vec2>,
    bounds: Vec2,
    config: &FieldConfig,
    rng: &mut R,
) {
    for particle in particles {
        advance(particle, time_seconds, pointer, bounds, config, rng);
    }
}
