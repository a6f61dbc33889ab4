//! Field configuration.
//!
//! All tunables of the particle field live in [`FieldConfig`]. The defaults
//! reproduce the firefly look: 80 warm particles, 150px links and a pointer
//! that pushes particles away within 150px.
//!
//! # Example
//!
//! ```ignore
//! let config = FieldConfig::default()
//!     .with_particle_count(120)
//!     .with_friction(0.95);
//! config.validate()?;
//! ```
//!
//! Configs can also be loaded from JSON. Missing keys fall back to defaults:
//!
//! ```json
//! { "particle_count": 120, "grain_enabled": false }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Tunables for the particle field, renderer and grain pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldConfig {
    /// Number of particles per viewport epoch.
    pub particle_count: u32,
    /// Smallest base size of a particle.
    pub particle_min_size: f32,
    /// Largest base size of a particle.
    pub particle_max_size: f32,
    /// Scale of the initial velocity, per axis.
    pub particle_speed: f32,

    /// Pairs closer than this are linked.
    pub connection_distance: f32,
    /// Opacity of a link between two coincident particles.
    pub connection_max_opacity: f32,
    /// Stroke width of links.
    pub connection_width: f32,
    /// RGB color of links.
    pub connection_color: [u8; 3],

    /// Pointer repulsion radius.
    pub mouse_radius: f32,
    /// Pointer repulsion strength at zero distance.
    pub mouse_influence: f32,
    /// Velocity multiplier applied every frame.
    pub friction: f32,
    /// Full width of the uniform velocity jitter added every frame.
    pub jitter: f32,

    /// Whether the grain pass runs at all.
    pub grain_enabled: bool,
    /// Full width of the per-pixel noise.
    pub grain_intensity: f32,
    /// Length of one grain gate window in milliseconds.
    pub grain_period_ms: f64,
    /// Grain runs during one window out of this many.
    pub grain_every: u32,

    /// Page color shown behind transparent canvas pixels.
    pub background: [u8; 3],
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            particle_count: 80,
            particle_min_size: 4.0,
            particle_max_size: 10.0,
            particle_speed: 0.4,
            connection_distance: 150.0,
            connection_max_opacity: 0.15,
            connection_width: 0.5,
            connection_color: [255, 69, 0],
            mouse_radius: 150.0,
            mouse_influence: 0.12,
            friction: 0.97,
            jitter: 0.03,
            grain_enabled: true,
            grain_intensity: 8.0,
            grain_period_ms: 50.0,
            grain_every: 3,
            background: [10, 10, 10],
        }
    }
}

impl FieldConfig {
    /// Load a config from a JSON file and validate it.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path.as_ref())?;
        let config = Self::from_json(&text)?;
        log::debug!("Loaded field config from {}", path.as_ref().display());
        Ok(config)
    }

    /// Parse a config from JSON text and validate it.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that every value is inside the range the simulation expects.
    ///
    /// Comparisons are written so that NaN fails them.
    #[allow(clippy::neg_cmp_op_on_partial_ord)]
    pub fn validate(&self) -> Result<(), ConfigError> {
        fn invalid(field: &'static str, reason: impl Into<String>) -> ConfigError {
            ConfigError::Invalid {
                field,
                reason: reason.into(),
            }
        }

        if !(self.particle_min_size > 0.0) {
            return Err(invalid("particle_min_size", "must be positive"));
        }
        if self.particle_max_size < self.particle_min_size {
            return Err(invalid(
                "particle_max_size",
                format!(
                    "{} is smaller than particle_min_size {}",
                    self.particle_max_size, self.particle_min_size
                ),
            ));
        }
        if !(self.particle_speed >= 0.0) {
            return Err(invalid("particle_speed", "must not be negative"));
        }
        if !(self.connection_distance > 0.0) {
            return Err(invalid("connection_distance", "must be positive"));
        }
        if !(0.0..=1.0).contains(&self.connection_max_opacity) {
            return Err(invalid("connection_max_opacity", "must be within [0, 1]"));
        }
        if !(self.connection_width > 0.0) {
            return Err(invalid("connection_width", "must be positive"));
        }
        if !(self.mouse_radius > 0.0) {
            return Err(invalid("mouse_radius", "must be positive"));
        }
        if !(self.mouse_influence >= 0.0) {
            return Err(invalid("mouse_influence", "must not be negative"));
        }
        if !(0.0..=1.0).contains(&self.friction) {
            return Err(invalid("friction", "must be within [0, 1]"));
        }
        if !(self.jitter >= 0.0) {
            return Err(invalid("jitter", "must not be negative"));
        }
        if !(self.grain_intensity >= 0.0) {
            return Err(invalid("grain_intensity", "must not be negative"));
        }
        if !(self.grain_period_ms > 0.0) {
            return Err(invalid("grain_period_ms", "must be positive"));
        }
        if self.grain_every == 0 {
            return Err(invalid("grain_every", "must be at least 1"));
        }
        Ok(())
    }

    /// Set the number of particles.
    pub fn with_particle_count(mut self, count: u32) -> Self {
        self.particle_count = count;
        self
    }

    /// Set the base size range.
    pub fn with_size_range(mut self, min: f32, max: f32) -> Self {
        self.particle_min_size = min;
        self.particle_max_size = max;
        self
    }

    /// Set the initial velocity scale.
    pub fn with_particle_speed(mut self, speed: f32) -> Self {
        self.particle_speed = speed;
        self
    }

    /// Set the link threshold distance.
    pub fn with_connection_distance(mut self, distance: f32) -> Self {
        self.connection_distance = distance;
        self
    }

    /// Set the pointer repulsion radius and strength.
    pub fn with_mouse(mut self, radius: f32, influence: f32) -> Self {
        self.mouse_radius = radius;
        self.mouse_influence = influence;
        self
    }

    /// Set the per-frame velocity multiplier.
    pub fn with_friction(mut self, friction: f32) -> Self {
        self.friction = friction;
        self
    }

    /// Set the per-frame velocity jitter. `0.0` makes integration deterministic.
    pub fn with_jitter(mut self, jitter: f32) -> Self {
        self.jitter = jitter;
        self
    }

    /// Enable or disable the grain pass.
    pub fn with_grain(mut self, enabled: bool) -> Self {
        self.grain_enabled = enabled;
        self
    }
}
