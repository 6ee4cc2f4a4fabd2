//! Pencil, eraser and spray marks.

use std::f32::consts::TAU;

use egui::{Pos2, vec2};
use rand::Rng;

use super::ToolConfig;
use crate::surface::PixelSurface;

/// Extends a pencil path; caps and joins are round.
pub(super) fn pencil_segment(surface: &mut PixelSurface, from: Pos2, to: Pos2, config: &ToolConfig) {
    surface.draw_segment(from, to, config.stroke_size, config.color);
}

/// Eraser footprint is half again as wide as the pencil.
pub(super) fn eraser_segment(surface: &mut PixelSurface, from: Pos2, to: Pos2, config: &ToolConfig) {
    surface.erase_segment(from, to, config.eraser_width());
}

/// Positions and radii of one spray burst around `at`.
///
/// At least ten dots per burst, each with a radius in `[0, size / 3)`, within
/// one and a half stroke sizes of the pointer. Dots too small to cover a pixel
/// centre leave no mark.
pub(super) fn spray_dots(at: Pos2, size: f32, rng: &mut impl Rng) -> Vec<(Pos2, f32)> {
    let count = (size.round() as usize).max(10);
    (0..count)
        .map(|_| {
            let radius = rng.r#gen::<f32>() * (size / 3.0);
            let angle = rng.r#gen::<f32>() * TAU;
            let distance = rng.r#gen::<f32>() * size * 1.5;
            (at + vec2(angle.cos(), angle.sin()) * distance, radius)
        })
        .collect()
}

pub(super) fn spray(surface: &mut PixelSurface, at: Pos2, config: &ToolConfig, rng: &mut impl Rng) {
    for (center, radius) in spray_dots(at, config.stroke_size, rng) {
        surface.fill_circle(center, radius, config.color);
    }
}
