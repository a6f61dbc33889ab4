//! 2D drawing surface.
//!
//! The renderer paints through the [`Canvas`] trait, which covers exactly the
//! operations it needs: clearing, radial gradient discs, solid discs, line
//! strokes and raw RGBA8 pixel access for the grain pass.
//!
//! [`PixelCanvas`] is the software implementation. It is backed by an
//! [`image::RgbaImage`] with straight alpha and composites source-over through
//! [`image::Pixel::blend`], the same model a browser 2D context uses. Solid
//! discs and link lines go through `imageproc`; the radial gradient fill is
//! rasterized here with a one pixel anti-aliasing ramp.

use glam::Vec2;
use image::{Pixel, Rgba as Rgba8, RgbaImage};
use imageproc::drawing::{draw_antialiased_line_segment_mut, draw_filled_circle_mut, Blend};
use std::path::Path;

use crate::color::{sample_gradient, ColorStop, Rgba};
use crate::error::{SnapshotError, SurfaceError};

/// Bytes per pixel of the RGBA8 buffer.
pub const BYTES_PER_PIXEL: usize = 4;

/// Operations the renderer needs from a drawing surface.
pub trait Canvas {
    /// Width in pixels.
    fn width(&self) -> u32;

    /// Height in pixels.
    fn height(&self) -> u32;

    /// Reset every pixel to fully transparent.
    fn clear(&mut self);

    /// Change the surface size. Contents are discarded.
    fn resize(&mut self, width: u32, height: u32) -> Result<(), SurfaceError>;

    /// Fill a disc with a radial gradient from `center` (offset 0) to `radius` (offset 1).
    fn fill_radial_gradient(&mut self, center: Vec2, radius: f32, stops: &[ColorStop]);

    /// Fill a disc with a solid color.
    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgba);

    /// Stroke a straight line segment.
    fn stroke_line(&mut self, from: Vec2, to: Vec2, width: f32, color: Rgba);

    /// The RGBA8 pixel buffer, row-major.
    fn pixels(&self) -> &[u8];

    /// Mutable access to the RGBA8 pixel buffer for read-modify-write passes.
    fn pixels_mut(&mut self) -> &mut [u8];
}

/// Software RGBA8 canvas.
#[derive(Debug, Clone)]
pub struct PixelCanvas {
    image: RgbaImage,
}

impl PixelCanvas {
    /// Create a transparent canvas.
    ///
    /// Fails if either dimension is zero: the field has nothing to draw on.
    pub fn new(width: u32, height: u32) -> Result<Self, SurfaceError> {
        check_size(width, height)?;
        Ok(Self {
            image: RgbaImage::new(width, height),
        })
    }

    /// Read one pixel as RGBA8. `None` outside the canvas.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        self.image.get_pixel_checked(x, y).map(|p| p.0)
    }

    /// The backing image.
    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    /// Write the canvas to a PNG file.
    pub fn save_png(&self, path: impl AsRef<Path>) -> Result<(), SnapshotError> {
        self.image.save(path.as_ref())?;
        log::info!("Wrote snapshot {}", path.as_ref().display());
        Ok(())
    }

    /// Run an `imageproc` drawing call with source-over blending.
    fn with_blend(&mut self, draw: impl FnOnce(&mut Blend<RgbaImage>)) {
        let mut blend = Blend(std::mem::take(&mut self.image));
        draw(&mut blend);
        self.image = blend.0;
    }
}

/// Reject sizes the canvas cannot hold.
fn check_size(width: u32, height: u32) -> Result<(), SurfaceError> {
    if width == 0 || height == 0 {
        return Err(SurfaceError::ZeroSized { width, height });
    }
    (width as usize)
        .checked_mul(height as usize)
        .and_then(|n| n.checked_mul(BYTES_PER_PIXEL))
        .map(|_| ())
        .ok_or(SurfaceError::TooLarge { width, height })
}

/// Quantize a straight-alpha color, scaling its alpha by `coverage`.
#[inline]
fn to_pixel(color: Rgba, coverage: f32) -> Rgba8<u8> {
    let c = color.clamp(Rgba::ZERO, Rgba::ONE) * 255.0;
    let a = (c.w * coverage.clamp(0.0, 1.0)).round() as u8;
    Rgba8([c.x.round() as u8, c.y.round() as u8, c.z.round() as u8, a])
}

/// Pixel holding `p`, saturating far off-canvas coordinates.
#[inline]
fn to_grid(p: Vec2) -> (i32, i32) {
    (p.x.floor() as i32, p.y.floor() as i32)
}

/// Coverage of a pixel center at `distance` from an edge at `edge`, with a one
/// pixel anti-aliasing ramp.
#[inline]
fn edge_coverage(distance: f32, edge: f32) -> f32 {
    (edge + 0.5 - distance).clamp(0.0, 1.0)
}

impl Canvas for PixelCanvas {
    fn width(&self) -> u32 {
        self.image.width()
    }

    fn height(&self) -> u32 {
        self.image.height()
    }

    fn clear(&mut self) {
        self.image.fill(0);
    }

    fn resize(&mut self, width: u32, height: u32) -> Result<(), SurfaceError> {
        check_size(width, height)?;
        self.image = RgbaImage::new(width, height);
        Ok(())
    }

    fn fill_radial_gradient(&mut self, center: Vec2, radius: f32, stops: &[ColorStop]) {
        if !(radius > 0.0) || stops.is_empty() {
            return;
        }
        let reach = radius + 1.0;
        let x0 = (center.x - reach).floor().max(0.0);
        let y0 = (center.y - reach).floor().max(0.0);
        let x1 = (center.x + reach).ceil().min(self.width() as f32 - 1.0);
        let y1 = (center.y + reach).ceil().min(self.height() as f32 - 1.0);
        if !(x0 <= x1 && y0 <= y1) {
            return;
        }

        for y in y0 as u32..=y1 as u32 {
            for x in x0 as u32..=x1 as u32 {
                let d = Vec2::new(x as f32 + 0.5, y as f32 + 0.5).distance(center);
                let coverage = edge_coverage(d, radius);
                if coverage <= 0.0 {
                    continue;
                }
                let color = sample_gradient(stops, (d / radius).min(1.0));
                self.image.get_pixel_mut(x, y).blend(&to_pixel(color, coverage));
            }
        }
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgba) {
        if !(radius > 0.0) || color.w <= 0.0 {
            return;
        }
        let pixel = to_pixel(color, 1.0);
        let radius = radius.round().max(0.0) as i32;
        self.with_blend(|canvas| draw_filled_circle_mut(canvas, to_grid(center), radius, pixel));
    }

    fn stroke_line(&mut self, from: Vec2, to: Vec2, width: f32, color: Rgba) {
        if !(width > 0.0) || color.w <= 0.0 {
            return;
        }
        // Lines are one pixel wide; hairlines keep their reduced coverage,
        // like a browser does for sub-pixel strokes.
        let thinness = width.min(1.0);
        let line = to_pixel(color, 1.0);
        draw_antialiased_line_segment_mut(
            &mut self.image,
            to_grid(from),
            to_grid(to),
            line,
            |line: Rgba8<u8>, under: Rgba8<u8>, weight: f32| {
                let mut out = under;
                let mut src = line;
                src.0[3] = (line.0[3] as f32 * weight * thinness).round() as u8;
                out.blend(&src);
                out
            },
        );
    }

    fn pixels(&self) -> &[u8] {
        self.image.as_raw()
    }

    fn pixels_mut(&mut self) -> &mut [u8] {
        &mut self.image
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use glam::Vec4;

    const WHITE: Vec4 = Vec4::new(1.0, 1.0, 1.0, 1.0);

    #[test]
    fn test_zero_sized_canvas_fails() {
        assert!(matches!(
            PixelCanvas::new(0, 10),
            Err(SurfaceError::ZeroSized { width: 0, height: 10 })
        ));
    }

    #[test]
    fn test_new_canvas_is_transparent() {
        let canvas = PixelCanvas::new(4, 3).unwrap();
        assert_eq!(canvas.pixels().len(), 4 * 3 * 4);
        assert!(canvas.pixels().iter().all(|&b| b == 0));
    }

    #[test]
    fn test_fill_circle_covers_center_only() {
        let mut canvas = PixelCanvas::new(20, 20).unwrap();
        canvas.fill_circle(Vec2::new(10.0, 10.0), 3.0, WHITE);
        assert_eq!(canvas.pixel(10, 10), Some([255, 255, 255, 255]));
        assert_eq!(canvas.pixel(0, 0), Some([0, 0, 0, 0]));
        assert_eq!(canvas.pixel(19, 10), Some([0, 0, 0, 0]));
    }

    #[test]
    fn test_source_over_keeps_destination_under_translucent_source() {
        let mut canvas = PixelCanvas::new(4, 4).unwrap();
        canvas.fill_circle(Vec2::splat(2.0), 10.0, Vec4::new(1.0, 0.0, 0.0, 1.0));
        canvas.fill_circle(Vec2::splat(2.0), 10.0, Vec4::new(0.0, 0.0, 1.0, 0.5));
        let [r, g, b, a] = canvas.pixel(1, 1).unwrap();
        assert!(a >= 254);
        assert_eq!(g, 0);
        assert!((r as i32 - 128).abs() <= 1);
        assert!((b as i32 - 128).abs() <= 1);
    }

    #[test]
    fn test_gradient_fades_to_edge() {
        let mut canvas = PixelCanvas::new(40, 40).unwrap();
        let stops = [
            ColorStop::new(0.0, WHITE),
            ColorStop::new(1.0, Vec4::new(1.0, 1.0, 1.0, 0.0)),
        ];
        canvas.fill_radial_gradient(Vec2::new(20.0, 20.0), 15.0, &stops);
        let center = canvas.pixel(20, 20).unwrap()[3];
        let middle = canvas.pixel(27, 20).unwrap()[3];
        let outside = canvas.pixel(39, 20).unwrap()[3];
        assert!(center > middle);
        assert!(middle > 0);
        assert_eq!(outside, 0);
    }

    #[test]
    fn test_stroke_line_touches_path() {
        let mut canvas = PixelCanvas::new(30, 10).unwrap();
        canvas.stroke_line(Vec2::new(2.0, 5.0), Vec2::new(28.0, 5.0), 0.5, WHITE);
        // half-width hairline: half coverage on the path, nothing away from it
        let [r, g, b, a] = canvas.pixel(15, 5).unwrap();
        assert_eq!([r, g, b], [255, 255, 255]);
        assert!((127..=128).contains(&a));
        assert_eq!(canvas.pixel(15, 0).unwrap()[3], 0);
    }

    #[test]
    fn test_stroke_line_blends_over_existing_pixels() {
        let mut canvas = PixelCanvas::new(30, 10).unwrap();
        canvas.fill_circle(Vec2::new(15.0, 5.0), 20.0, Vec4::new(0.0, 0.0, 1.0, 1.0));
        canvas.stroke_line(Vec2::new(0.0, 5.0), Vec2::new(29.0, 5.0), 1.0, Vec4::new(1.0, 0.0, 0.0, 0.5));
        let [r, g, b, a] = canvas.pixel(15, 5).unwrap();
        assert!(a >= 254);
        assert_eq!(g, 0);
        assert!((r as i32 - 128).abs() <= 1);
        assert!((b as i32 - 127).abs() <= 1);
    }

    #[test]
    fn test_drawing_off_canvas_is_clipped() {
        let mut canvas = PixelCanvas::new(10, 10).unwrap();
        canvas.fill_circle(Vec2::new(-50.0, -50.0), 5.0, WHITE);
        canvas.stroke_line(Vec2::new(-10.0, -10.0), Vec2::new(-5.0, -1.0), 1.0, WHITE);
        assert!(canvas.pixels().iter().all(|&b| b == 0));
    }

    #[test]
    fn test_clear_and_resize() {
        let mut canvas = PixelCanvas::new(8, 8).unwrap();
        canvas.fill_circle(Vec2::splat(4.0), 3.0, WHITE);
        canvas.clear();
        assert!(canvas.pixels().iter().all(|&b| b == 0));

        canvas.resize(5, 2).unwrap();
        assert_eq!((canvas.width(), canvas.height()), (5, 2));
        assert_eq!(canvas.pixels().len(), 5 * 2 * 4);
        assert!(canvas.resize(0, 2).is_err());
    }

    #[test]
    fn test_save_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("frame.png");
        let mut canvas = PixelCanvas::new(16, 16).unwrap();
        canvas.fill_circle(Vec2::splat(8.0), 4.0, WHITE);
        canvas.save_png(&path).unwrap();

        let loaded = image::open(&path).unwrap().to_rgba8();
        assert_eq!(loaded.dimensions(), (16, 16));
        assert_eq!(loaded.get_pixel(8, 8).0, [255, 255, 255, 255]);
        assert_eq!(&loaded, canvas.image());
    }
}
