//! Text and emoji stamping.
//!
//! Glyphs are rasterised with `ab_glyph` from the fonts bundled with egui:
//! Ubuntu Light for text, Noto Emoji as the fallback for anything the text
//! font has no outline for.

use ab_glyph::{Font, FontRef, Glyph, GlyphId, PxScale, ScaleFont, point};
use egui::Pos2;
use image::{Rgba, RgbaImage};

use crate::error::{SurfaceError, SurfaceResult};
use crate::raster::blend_pixel;

/// Where the stamp point sits relative to the laid-out text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAnchor {
    /// Left edge, top of the em box
    TopLeft,
    /// Horizontal and vertical middle
    Center,
    /// Horizontal middle, on the baseline
    BaselineCenter,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Face {
    Text,
    Emoji,
}

struct PlacedGlyph {
    face: Face,
    glyph: Glyph,
}

struct Layout {
    glyphs: Vec<PlacedGlyph>,
    width: f32,
    ascent: f32,
    descent: f32,
}

pub struct GlyphStamper {
    text: FontRef<'static>,
    emoji: FontRef<'static>,
}

impl std::fmt::Debug for GlyphStamper {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GlyphStamper").finish_non_exhaustive()
    }
}

impl GlyphStamper {
    pub fn new() -> SurfaceResult<Self> {
        let text = FontRef::try_from_slice(epaint_default_fonts::UBUNTU_LIGHT)
            .map_err(|_| SurfaceError::FontLoad)?;
        let emoji = FontRef::try_from_slice(epaint_default_fonts::NOTO_EMOJI_REGULAR)
            .map_err(|_| SurfaceError::FontLoad)?;
        Ok(Self { text, emoji })
    }

    fn font(&self, face: Face) -> &FontRef<'static> {
        match face {
            Face::Text => &self.text,
            Face::Emoji => &self.emoji,
        }
    }

    /// Canvas-style font sizes are em sizes; ab_glyph scales by ascent-to-descent height.
    fn em_scale(font: &FontRef<'static>, px: f32) -> PxScale {
        match font.units_per_em() {
            Some(units) if units > 0.0 => PxScale::from(px * font.height_unscaled() / units),
            _ => PxScale::from(px),
        }
    }

    fn pick_face(&self, c: char) -> Option<(Face, GlyphId)> {
        let id = self.text.glyph_id(c);
        if id.0 != 0 {
            return Some((Face::Text, id));
        }
        let id = self.emoji.glyph_id(c);
        (id.0 != 0).then_some((Face::Emoji, id))
    }

    /// Lays `text` out on a baseline at y = 0 starting from x = 0.
    fn layout(&self, text: &str, px: f32) -> Layout {
        let mut glyphs = Vec::new();
        let mut caret = 0.0;
        let mut previous: Option<(Face, GlyphId)> = None;
        let mut ascent: f32 = 0.0;
        let mut descent: f32 = 0.0;

        for c in text.chars() {
            // Variation selectors, joiners and the like have no outline in either face
            let Some((face, id)) = self.pick_face(c) else {
                continue;
            };
            let font = self.font(face);
            let scale = Self::em_scale(font, px);
            let scaled = font.as_scaled(scale);
            if let Some((prev_face, prev_id)) = previous {
                if prev_face == face {
                    caret += scaled.kern(prev_id, id);
                }
            }
            ascent = ascent.max(scaled.ascent());
            descent = descent.min(scaled.descent());
            glyphs.push(PlacedGlyph {
                face,
                glyph: id.with_scale_and_position(scale, point(caret, 0.0)),
            });
            caret += scaled.h_advance(id);
            previous = Some((face, id));
        }

        Layout { glyphs, width: caret, ascent, descent }
    }

    /// Stamps `text` at `at` and returns how many pixels received ink.
    pub fn stamp(
        &self,
        image: &mut RgbaImage,
        text: &str,
        at: Pos2,
        px: f32,
        anchor: TextAnchor,
        color: Rgba<u8>,
    ) -> usize {
        if px <= 0.0 {
            return 0;
        }
        let layout = self.layout(text, px);
        let (origin_x, baseline) = match anchor {
            TextAnchor::TopLeft => (at.x, at.y + layout.ascent),
            TextAnchor::Center => (
                at.x - layout.width / 2.0,
                at.y + (layout.ascent + layout.descent) / 2.0,
            ),
            TextAnchor::BaselineCenter => (at.x - layout.width / 2.0, at.y),
        };

        let mut inked = 0;
        for placed in layout.glyphs {
            let mut glyph = placed.glyph;
            glyph.position = point(glyph.position.x + origin_x, baseline);
            let Some(outlined) = self.font(placed.face).outline_glyph(glyph) else {
                continue;
            };
            let bounds = outlined.px_bounds();
            outlined.draw(|gx, gy, coverage| {
                if coverage > 0.0 {
                    let x = bounds.min.x as i32 + gx as i32;
                    let y = bounds.min.y as i32 + gy as i32;
                    blend_pixel(image, x, y, color, coverage);
                    inked += 1;
                }
            });
        }
        inked
    }
}
