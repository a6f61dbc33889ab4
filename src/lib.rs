//! # Ember - cursor-reactive firefly field
//!
//! A field of glowing, pulsing particles that drift across a 2D canvas, wrap
//! around its edges, get pushed away by the pointer and are joined by faint
//! lines whenever two of them come close. Every few frames a film grain pass
//! adds noise to the whole picture.
//!
//! ## Quick Start
//!
//! ```ignore
//! use ember::prelude::*;
//!
//! let config = FieldConfig::default().with_particle_count(120);
//! let mut canvas = PixelCanvas::new(800, 600)?;
//! let mut frame_loop = FrameLoop::new(800, 600, config, Some(42));
//!
//! frame_loop.pointer().set(Vec2::new(400.0, 300.0));
//! frame_loop.run(&mut FixedStepHost::new(60), &mut canvas);
//! canvas.save_png("field.png")?;
//! ```
//!
//! ## Core Concepts
//!
//! ### Particles
//!
//! Each [`Particle`] has a position, a velocity, a base size and opacity and a
//! pulse. Positions live on a torus: leaving one edge re-enters from the
//! opposite one. The field is regenerated from scratch whenever the viewport
//! changes size.
//!
//! ### Frames
//!
//! One [`FrameLoop::tick`] integrates every particle (see [`integrate`]) and
//! then paints the frame (see [`render`]) onto anything implementing
//! [`Canvas`]. [`PixelCanvas`] is the software canvas used by both the window
//! and headless snapshots.
//!
//! ### Pointer
//!
//! [`PointerCell`] holds the latest pointer position, or nothing when the
//! pointer has left. Input handlers write to it, the frame loop reads it once
//! per frame.
//!
//! ## Hosts
//!
//! [`window::run`] opens a winit window and presents frames through wgpu.
//! [`FixedStepHost`] replays a simulated 60 Hz display without any window,
//! which is what tests and `ember --snapshot` use.

pub mod canvas;
pub mod color;
pub mod config;
pub mod driver;
pub mod error;
pub mod field;
pub mod gpu;
pub mod integrate;
pub mod particle;
pub mod pointer;
pub mod render;
pub mod spawn;
pub mod time;
pub mod window;

pub use canvas::{Canvas, PixelCanvas};
pub use color::{ColorStop, Rgba};
pub use config::FieldConfig;
pub use driver::{CancelToken, FixedStepHost, FrameHost, FrameLoop};
pub use error::{AppError, ConfigError, GpuError, SnapshotError, SurfaceError};
pub use field::ParticleField;
pub use glam::{Vec2, Vec4};
pub use particle::Particle;
pub use pointer::{PointerCell, PointerEvent};
pub use render::Renderer;
pub use spawn::SpawnContext;
pub use time::FrameClock;

/// Convenient re-exports for common usage.
///
/// ```ignore
/// use ember::prelude::*;
/// ```
pub mod prelude {
    pub use crate::canvas::{Canvas, PixelCanvas};
    pub use crate::config::FieldConfig;
    pub use crate::driver::{CancelToken, FixedStepHost, FrameHost, FrameLoop};
    pub use crate::field::ParticleField;
    pub use crate::particle::Particle;
    pub use crate::pointer::{PointerCell, PointerEvent};
    pub use crate::render::Renderer;
    pub use crate::time::FrameClock;
    pub use crate::{Vec2, Vec4};
}
