//! Color helpers.
//!
//! Particles are described in HSL (hue in degrees, saturation and lightness in
//! percent) the same way CSS `hsla()` does; the canvas works in straight-alpha
//! RGBA with every channel in `0.0..=1.0`.

use glam::{Vec3, Vec4};

/// Straight (non-premultiplied) RGBA color, channels in `0.0..=1.0`.
pub type Rgba = Vec4;

/// Build an [`Rgba`] from CSS-style `hsla(h, s%, l%, a)` components.
///
/// * `hue` - degrees, wraps outside `0..360`
/// * `saturation` - percent, `0..=100`
/// * `lightness` - percent, `0..=100`
/// * `alpha` - `0.0..=1.0`
pub fn hsla(hue: f32, saturation: f32, lightness: f32, alpha: f32) -> Rgba {
    let rgb = hsl_to_rgb(hue, saturation / 100.0, lightness / 100.0);
    rgb.extend(alpha.clamp(0.0, 1.0))
}

/// Build an [`Rgba`] from 8-bit RGB and a `0.0..=1.0` alpha.
pub fn rgba8(rgb: [u8; 3], alpha: f32) -> Rgba {
    Vec4::new(
        rgb[0] as f32 / 255.0,
        rgb[1] as f32 / 255.0,
        rgb[2] as f32 / 255.0,
        alpha.clamp(0.0, 1.0),
    )
}

/// Convert HSL to RGB.
///
/// `hue` in degrees, `saturation` and `lightness` in `0.0..=1.0`.
pub fn hsl_to_rgb(hue: f32, saturation: f32, lightness: f32) -> Vec3 {
    let s = saturation.clamp(0.0, 1.0);
    let l = lightness.clamp(0.0, 1.0);
    let h = hue.rem_euclid(360.0) / 60.0;

    let c = (1.0 - (2.0 * l - 1.0).abs()) * s;
    let x = c * (1.0 - (h % 2.0 - 1.0).abs());
    let m = l - c / 2.0;

    let (r, g, b) = match h as u32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };

    Vec3::new(r + m, g + m, b + m)
}

/// One stop of a radial gradient.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorStop {
    /// Position along the radius, `0.0` (center) to `1.0` (edge).
    pub offset: f32,
    /// Color at this stop.
    pub color: Rgba,
}

impl ColorStop {
    /// Create a stop at `offset` with `color`.
    pub const fn new(offset: f32, color: Rgba) -> Self {
        Self { offset, color }
    }
}

/// Sample a gradient at `t` (`0.0..=1.0`), interpolating linearly between stops.
///
/// Stops must be sorted by offset. Values outside the first/last stop take the
/// color of that stop.
pub fn sample_gradient(stops: &[ColorStop], t: f32) -> Rgba {
    let Some(first) = stops.first() else {
        return Vec4::ZERO;
    };
    if t <= first.offset {
        return first.color;
    }
    for pair in stops.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        if t <= b.offset {
            let span = b.offset - a.offset;
            if span <= f32::EPSILON {
                return b.color;
            }
            return a.color.lerp(b.color, (t - a.offset) / span);
        }
    }
    stops[stops.len() - 1].color
}
