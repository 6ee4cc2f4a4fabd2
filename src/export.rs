//! One-way export of the surface to encoded images.
//!
//! The optional frame is decoration layered over the raw pixels at export
//! time; it never touches the surface or its history.

use std::path::Path;

use egui::{Color32, Rect, pos2};
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::imageops;
use image::{DynamicImage, ExtendedColorType, ImageEncoder, RgbaImage};
use serde::{Deserialize, Serialize};

use crate::error::{SurfaceError, SurfaceResult};
use crate::glyph::{GlyphStamper, TextAnchor};
use crate::raster;
use crate::surface::to_rgba;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ExportFormat {
    /// Lossless
    #[default]
    Png,
    /// Lossy; `quality` in `1..=100`
    Jpeg { quality: u8 },
}

impl ExportFormat {
    pub const DEFAULT_JPEG_QUALITY: u8 = 90;

    pub fn jpeg() -> Self {
        Self::Jpeg { quality: Self::DEFAULT_JPEG_QUALITY }
    }

    pub fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg { .. } => "jpg",
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg { .. } => "image/jpeg",
        }
    }

    pub fn file_name(self) -> String {
        format!("doodle.{}", self.extension())
    }

    /// Toggles between the lossless and lossy formats.
    pub fn cycle(self) -> Self {
        match self {
            Self::Png => Self::jpeg(),
            Self::Jpeg { .. } => Self::Png,
        }
    }

    pub fn from_extension(extension: &str) -> SurfaceResult<Self> {
        match extension.to_ascii_lowercase().as_str() {
            "png" => Ok(Self::Png),
            "jpg" | "jpeg" => Ok(Self::jpeg()),
            other => Err(SurfaceError::UnsupportedCapability(format!(
                "export to .{other} is not supported"
            ))),
        }
    }

    pub fn from_path(path: &Path) -> SurfaceResult<Self> {
        let extension = path.extension().and_then(|e| e.to_str()).unwrap_or_default();
        Self::from_extension(extension)
    }
}

/// Decorative border and caption for shared images
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub border: u32,
    pub outline_width: f32,
    pub color: Color32,
    pub caption: String,
    pub caption_px: f32,
}

impl Frame {
    pub fn new(color: Color32, caption: impl Into<String>) -> Self {
        Self {
            border: 20,
            outline_width: 8.0,
            color,
            caption: caption.into(),
            caption_px: 18.0,
        }
    }
}

/// Copies `image` onto a larger white canvas with an outline and caption.
pub fn framed(image: &RgbaImage, frame: &Frame, glyphs: &GlyphStamper) -> RgbaImage {
    let border = frame.border;
    let width = image.width() + border * 2;
    let height = image.height() + border * 2;
    let mut canvas = RgbaImage::from_pixel(width, height, to_rgba(Color32::WHITE));
    imageops::overlay(&mut canvas, image, border as i64, border as i64);

    let half = border as f32 / 2.0;
    let outline = Rect::from_min_max(pos2(half, half), pos2(width as f32 - half, height as f32 - half));
    raster::stroke_rect(&mut canvas, outline, frame.outline_width, to_rgba(frame.color));

    if !frame.caption.is_empty() {
        let at = pos2(width as f32 / 2.0, height as f32 - half - 5.0);
        glyphs.stamp(
            &mut canvas,
            &frame.caption,
            at,
            frame.caption_px,
            TextAnchor::BaselineCenter,
            to_rgba(frame.color),
        );
    }
    canvas
}

/// An encoded image ready to hand to another application
#[derive(Debug, Clone)]
pub struct SharePayload {
    pub file_name: String,
    pub mime_type: &'static str,
    pub title: String,
    pub text: String,
    pub bytes: Vec<u8>,
    /// The decoded pixels, for hosts that share images rather than files
    pub image: RgbaImage,
}

/// Host facility that passes an exported image on, e.g. a clipboard or share sheet.
pub trait ShareTarget {
    /// `false` when the host has no way to share content of this type.
    fn can_share(&self, mime_type: &str) -> bool;

    fn share(&mut self, payload: &SharePayload) -> SurfaceResult<()>;
}

/// A host without any share facility
#[derive(Debug, Default, Clone, Copy)]
pub struct NoShare;

impl ShareTarget for NoShare {
    fn can_share(&self, _mime_type: &str) -> bool {
        false
    }

    fn share(&mut self, _payload: &SharePayload) -> SurfaceResult<()> {
        Err(SurfaceError::UnsupportedCapability("sharing is not supported on this host".to_owned()))
    }
}

pub fn encode(image: &RgbaImage, format: ExportFormat) -> SurfaceResult<Vec<u8>> {
    let (width, height) = image.dimensions();
    let mut bytes = Vec::new();
    match format {
        ExportFormat::Png => {
            PngEncoder::new(&mut bytes).write_image(image.as_raw(), width, height, ExtendedColorType::Rgba8)?;
        }
        ExportFormat::Jpeg { quality } => {
            let rgb = DynamicImage::ImageRgba8(image.clone()).to_rgb8();
            JpegEncoder::new_with_quality(&mut bytes, quality.clamp(1, 100))
                .write_image(rgb.as_raw(), width, height, ExtendedColorType::Rgb8)?;
        }
    }
    log::info!("Exported {}x{} image as {} ({} bytes)", width, height, format.extension(), bytes.len());
    Ok(bytes)
}
