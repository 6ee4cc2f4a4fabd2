use egui::Pos2;

use super::{ShapeKind, ToolConfig, ToolKind};
use crate::surface::PixelSurface;

/// Draws the shape or line spanned by `anchor` and `current`.
///
/// Rectangles are filled before they are stroked so the outline sits on top.
/// A degenerate drag (both points equal) draws nothing.
pub(super) fn draw_shape(
    surface: &mut PixelSurface,
    tool: ToolKind,
    config: &ToolConfig,
    anchor: Pos2,
    current: Pos2,
) {
    if anchor == current {
        return;
    }
    let kind = match tool {
        ToolKind::Line => ShapeKind::Line,
        _ => config.shape_kind,
    };
    let stroke = config.effective_shape_stroke();
    match kind {
        ShapeKind::Line => {
            surface.draw_segment(anchor, current, config.stroke_size, config.color);
        }
        ShapeKind::Rectangle => {
            if config.shape_fill {
                surface.fill_rect(anchor, current, config.color);
            }
            if stroke {
                surface.stroke_rect(anchor, current, config.stroke_size, config.color);
            }
        }
        ShapeKind::Circle => {
            let radius = anchor.distance(current);
            if config.shape_fill {
                surface.fill_circle(anchor, radius, config.color);
            }
            if stroke {
                surface.stroke_circle(anchor, radius, config.stroke_size, config.color);
            }
        }
    }
}
