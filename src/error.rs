//! Error types for ember.
//!
//! The frame loop itself has no failure modes. Everything here happens at
//! construction time: loading configuration, acquiring a drawing surface,
//! and writing snapshots.

use thiserror::Error;

/// Errors that can occur during GPU initialization.
#[derive(Debug, Error)]
pub enum GpuError {
    /// Failed to create a surface for rendering.
    #[error("Failed to create GPU surface: {0}")]
    SurfaceCreation(#[from] wgpu::CreateSurfaceError),
    /// No compatible GPU adapter found.
    #[error("No compatible GPU adapter found. Ensure your system has a GPU with WebGPU/Vulkan/Metal/DX12 support.")]
    NoAdapter,
    /// Failed to create GPU device.
    #[error("Failed to create GPU device: {0}")]
    DeviceCreation(#[from] wgpu::RequestDeviceError),
    /// The surface reported no usable texture formats.
    #[error("Surface is not compatible with the selected adapter")]
    IncompatibleSurface,
}

/// Errors raised when the drawing surface cannot be built.
#[derive(Debug, Error)]
pub enum SurfaceError {
    /// A canvas needs at least one pixel in each direction.
    #[error("Canvas must be at least 1x1 pixels, got {width}x{height}")]
    ZeroSized {
        /// Requested width.
        width: u32,
        /// Requested height.
        height: u32,
    },
    /// The pixel buffer would not fit in memory.
    #[error("Canvas of {width}x{height} pixels is too large")]
    TooLarge {
        /// Requested width.
        width: u32,
        /// Requested height.
        height: u32,
    },
}

/// Errors that can occur while loading or validating a [`FieldConfig`](crate::FieldConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read the config file from disk.
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    /// The file is not valid JSON for a field config.
    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
    /// A value is outside its allowed range.
    #[error("Invalid config value for `{field}`: {reason}")]
    Invalid {
        /// Name of the offending field.
        field: &'static str,
        /// Human readable explanation.
        reason: String,
    },
}

/// Errors that can occur when writing a canvas snapshot.
#[derive(Debug, Error)]
pub enum SnapshotError {
    /// Image encoding or file write failed.
    #[error("Failed to write snapshot: {0}")]
    Image(#[from] image::ImageError),
}

/// Errors that can occur when running the field.
#[derive(Debug, Error)]
pub enum AppError {
    /// Failed to create event loop.
    #[error("Failed to create event loop: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),
    /// Failed to create window.
    #[error("Failed to create window: {0}")]
    Window(#[from] winit::error::OsError),
    /// GPU initialization failed.
    #[error("GPU error: {0}")]
    Gpu(#[from] GpuError),
    /// The drawing surface could not be created.
    #[error("Surface error: {0}")]
    Surface(#[from] SurfaceError),
    /// Configuration could not be loaded.
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
    /// Snapshot could not be written.
    #[error("Snapshot error: {0}")]
    Snapshot(#[from] SnapshotError),
}
