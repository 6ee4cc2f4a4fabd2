use egui::{Color32, Pos2, Rect};
use image::imageops::{self, FilterType};
use image::{Rgba, RgbaImage};

use crate::config::SurfaceSettings;
use crate::error::{SurfaceError, SurfaceResult};
use crate::fill::{FillOutcome, FloodFill};
use crate::glyph::{GlyphStamper, TextAnchor};
use crate::history::Snapshot;
use crate::raster;

pub(crate) fn to_rgba(color: Color32) -> Rgba<u8> {
    Rgba(color.to_srgba_unmultiplied())
}

pub(crate) fn from_rgba(pixel: Rgba<u8>) -> Color32 {
    let [r, g, b, a] = pixel.0;
    Color32::from_rgba_unmultiplied(r, g, b, a)
}

/// The rectangular pixel buffer being drawn on.
///
/// The surface exclusively owns its buffer. Tools and the flood fill only
/// reach the pixels through these methods, and history receives detached
/// copies via [`PixelSurface::snapshot`].
#[derive(Debug)]
pub struct PixelSurface {
    image: RgbaImage,
    background: Color32,
    min_dimension: u32,
    /// Bumped on every mutation so hosts know when to re-upload
    revision: u64,
    glyphs: GlyphStamper,
}

impl PixelSurface {
    /// Creates a surface filled with `background`, never smaller than the default floor.
    pub fn new(width: u32, height: u32, background: Color32) -> SurfaceResult<Self> {
        Self::with_floor(width, height, background, SurfaceSettings::DEFAULT_MIN_DIMENSION)
    }

    pub fn from_settings(settings: &SurfaceSettings) -> SurfaceResult<Self> {
        Self::with_floor(
            settings.width,
            settings.height,
            settings.background,
            settings.min_dimension,
        )
    }

    fn with_floor(width: u32, height: u32, background: Color32, min_dimension: u32) -> SurfaceResult<Self> {
        let min_dimension = min_dimension.max(1);
        let width = width.max(min_dimension);
        let height = height.max(min_dimension);
        Ok(Self {
            image: RgbaImage::from_pixel(width, height, to_rgba(background)),
            background,
            min_dimension,
            revision: 0,
            glyphs: GlyphStamper::new()?,
        })
    }

    /// Wraps raw RGBA bytes, e.g. pixels read back from a host canvas.
    pub fn from_rgba_bytes(width: u32, height: u32, bytes: Vec<u8>, background: Color32) -> SurfaceResult<Self> {
        let len = bytes.len();
        let image = RgbaImage::from_raw(width, height, bytes)
            .filter(|image| image.width() > 0 && image.height() > 0)
            .ok_or(SurfaceError::UnreadableBuffer { width, height, len })?;
        Ok(Self {
            image,
            background,
            min_dimension: 1,
            revision: 0,
            glyphs: GlyphStamper::new()?,
        })
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    pub fn background(&self) -> Color32 {
        self.background
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub(crate) fn glyphs(&self) -> &GlyphStamper {
        &self.glyphs
    }

    /// Read-only view of the live pixels
    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    fn touch(&mut self) {
        self.revision = self.revision.wrapping_add(1);
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Color32> {
        (x < self.width() && y < self.height()).then(|| from_rgba(*self.image.get_pixel(x, y)))
    }

    pub fn set_pixel(&mut self, x: u32, y: u32, color: Color32) -> SurfaceResult<()> {
        if x >= self.width() || y >= self.height() {
            return Err(SurfaceError::OutOfBounds { x: x.into(), y: y.into() });
        }
        self.image.put_pixel(x, y, to_rgba(color));
        self.touch();
        Ok(())
    }

    /// Round-capped segment of the given width; a zero-length segment is a dot.
    pub fn draw_segment(&mut self, from: Pos2, to: Pos2, width: f32, color: Color32) {
        raster::fill_capsule(&mut self.image, from, to, width / 2.0, to_rgba(color));
        self.touch();
    }

    /// Same footprint as [`Self::draw_segment`], painted with the background colour.
    pub fn erase_segment(&mut self, from: Pos2, to: Pos2, width: f32) {
        raster::fill_capsule(&mut self.image, from, to, width / 2.0, to_rgba(self.background));
        self.touch();
    }

    pub fn fill_circle(&mut self, center: Pos2, radius: f32, color: Color32) {
        raster::fill_circle(&mut self.image, center, radius, to_rgba(color));
        self.touch();
    }

    pub fn stroke_circle(&mut self, center: Pos2, radius: f32, width: f32, color: Color32) {
        raster::stroke_circle(&mut self.image, center, radius, width, to_rgba(color));
        self.touch();
    }

    /// Fills the axis-aligned box spanned by two corners given in any order.
    pub fn fill_rect(&mut self, corner: Pos2, opposite: Pos2, color: Color32) {
        raster::fill_rect(&mut self.image, Rect::from_two_pos(corner, opposite), to_rgba(color));
        self.touch();
    }

    pub fn stroke_rect(&mut self, corner: Pos2, opposite: Pos2, width: f32, color: Color32) {
        raster::stroke_rect(&mut self.image, Rect::from_two_pos(corner, opposite), width, to_rgba(color));
        self.touch();
    }

    /// Stamps text and returns the number of pixels that received ink.
    pub fn stamp_text(&mut self, text: &str, at: Pos2, px: f32, anchor: TextAnchor, color: Color32) -> usize {
        let inked = self.glyphs.stamp(&mut self.image, text, at, px, anchor, to_rgba(color));
        if inked > 0 {
            self.touch();
        }
        inked
    }

    /// Repaints the 4-connected region of colours similar to the seed's.
    pub fn flood_fill(&mut self, engine: &FloodFill, seed: Pos2, color: Color32) -> SurfaceResult<FillOutcome> {
        let outcome = engine.fill(&mut self.image, seed, color)?;
        if let FillOutcome::Filled { .. } = outcome {
            self.touch();
        }
        Ok(outcome)
    }

    pub fn clear(&mut self) {
        let background = to_rgba(self.background);
        for pixel in self.image.pixels_mut() {
            *pixel = background;
        }
        self.touch();
    }

    /// Reallocates the buffer and rescales the previous content into it.
    ///
    /// The new buffer is filled with the background first so that transparent
    /// pixels never show through after an aspect-ratio change.
    pub fn resize(&mut self, width: u32, height: u32) {
        let width = width.max(self.min_dimension);
        let height = height.max(self.min_dimension);
        if (width, height) == self.dimensions() {
            return;
        }
        log::info!(
            "Resizing surface from {}x{} to {}x{}",
            self.width(),
            self.height(),
            width,
            height
        );
        self.image = self.rescaled(&self.image, width, height);
        self.touch();
    }

    fn rescaled(&self, source: &RgbaImage, width: u32, height: u32) -> RgbaImage {
        let mut target = RgbaImage::from_pixel(width, height, to_rgba(self.background));
        let scaled = imageops::resize(source, width, height, FilterType::Triangle);
        imageops::overlay(&mut target, &scaled, 0, 0);
        target
    }

    /// Detached copy of the current pixels
    pub fn snapshot(&self) -> Snapshot {
        Snapshot::capture(&self.image)
    }

    /// Replaces the pixels with a snapshot, rescaling it if the surface was resized since.
    pub fn restore(&mut self, snapshot: &Snapshot) {
        let source = snapshot.image();
        self.image = if source.dimensions() == self.dimensions() {
            source.clone()
        } else {
            self.rescaled(source, self.width(), self.height())
        };
        self.touch();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::pos2;

    #[test]
    fn test_new_surface_respects_floor() {
        let surface = PixelSurface::new(10, 400, Color32::WHITE).unwrap();
        assert_eq!(surface.dimensions(), (100, 400));
        assert_eq!(surface.pixel(99, 399), Some(Color32::WHITE));
        assert_eq!(surface.pixel(100, 0), None);
    }

    #[test]
    fn test_set_pixel_out_of_bounds() {
        let mut surface = PixelSurface::new(100, 100, Color32::WHITE).unwrap();
        let err = surface.set_pixel(100, 5, Color32::RED).unwrap_err();
        assert!(matches!(err, SurfaceError::OutOfBounds { x: 100, y: 5 }));
        assert_eq!(surface.revision(), 0);
    }

    #[test]
    fn test_from_rgba_bytes_rejects_short_buffer() {
        let err = PixelSurface::from_rgba_bytes(4, 4, vec![0; 10], Color32::WHITE).unwrap_err();
        assert!(matches!(err, SurfaceError::UnreadableBuffer { len: 10, .. }));
    }

    #[test]
    fn test_resize_rescales_content() {
        let mut surface = PixelSurface::new(100, 100, Color32::WHITE).unwrap();
        surface.fill_rect(pos2(0.0, 0.0), pos2(50.0, 100.0), Color32::BLUE);
        surface.resize(200, 100);
        assert_eq!(surface.dimensions(), (200, 100));
        assert_eq!(surface.pixel(20, 50), Some(Color32::BLUE));
        assert_eq!(surface.pixel(180, 50), Some(Color32::WHITE));
    }

    #[test]
    fn test_resize_below_floor_is_clamped() {
        let mut surface = PixelSurface::new(300, 300, Color32::WHITE).unwrap();
        surface.resize(20, 20);
        assert_eq!(surface.dimensions(), (100, 100));
    }

    #[test]
    fn test_erase_paints_background() {
        let mut surface = PixelSurface::new(100, 100, Color32::WHITE).unwrap();
        surface.fill_rect(pos2(0.0, 0.0), pos2(100.0, 100.0), Color32::RED);
        surface.erase_segment(pos2(10.0, 10.0), pos2(40.0, 10.0), 6.0);
        assert_eq!(surface.pixel(25, 10), Some(Color32::WHITE));
        assert_eq!(surface.pixel(25, 30), Some(Color32::RED));
    }

    #[test]
    fn test_restore_rescales_older_snapshot() {
        let mut surface = PixelSurface::new(100, 100, Color32::WHITE).unwrap();
        surface.fill_rect(pos2(0.0, 0.0), pos2(100.0, 100.0), Color32::RED);
        let snapshot = surface.snapshot();
        surface.resize(150, 120);
        surface.clear();
        surface.restore(&snapshot);
        assert_eq!(surface.dimensions(), (150, 120));
        assert_eq!(surface.pixel(75, 60), Some(Color32::RED));
    }
}
