//! Hard-edged rasterisation of the drawing primitives.
//!
//! Every primitive samples pixel centres, so pixel `(x, y)` is covered when
//! `(x + 0.5, y + 0.5)` lies inside the shape. No anti-aliasing is applied,
//! which keeps the output exact and the flood fill's region boundaries crisp.

use egui::{Pos2, Rect, pos2};
use image::{Rgba, RgbaImage};
use std::ops::Range;

/// Column or row indices whose pixel centres may fall inside `[min, max]`
fn pixel_span(min: f32, max: f32, limit: u32) -> Range<u32> {
    let start = (min - 0.5).floor().max(0.0);
    let end = (max + 0.5).ceil().max(0.0);
    let start = (start as u32).min(limit);
    let end = (end as u32).min(limit);
    start..end
}

fn pixel_center(x: u32, y: u32) -> Pos2 {
    pos2(x as f32 + 0.5, y as f32 + 0.5)
}

/// Paints every pixel in `bounds` whose centre satisfies `covers`.
fn paint_where(
    image: &mut RgbaImage,
    bounds: Rect,
    color: Rgba<u8>,
    covers: impl Fn(Pos2) -> bool,
) -> usize {
    let xs = pixel_span(bounds.min.x, bounds.max.x, image.width());
    let ys = pixel_span(bounds.min.y, bounds.max.y, image.height());
    let mut painted = 0;
    for y in ys {
        for x in xs.clone() {
            if covers(pixel_center(x, y)) {
                image.put_pixel(x, y, color);
                painted += 1;
            }
        }
    }
    painted
}

/// Distance from `p` to the segment `a`-`b`
pub fn segment_distance(p: Pos2, a: Pos2, b: Pos2) -> f32 {
    let ab = b - a;
    let len_sq = ab.length_sq();
    if len_sq <= f32::EPSILON {
        return p.distance(a);
    }
    let t = ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    p.distance(a + ab * t)
}

/// A segment of width `2 * radius` with round caps.
///
/// Consecutive capsules sharing endpoints produce round joins, which is how
/// freehand paths are built up one move event at a time.
pub fn fill_capsule(image: &mut RgbaImage, a: Pos2, b: Pos2, radius: f32, color: Rgba<u8>) -> usize {
    if radius <= 0.0 {
        return 0;
    }
    let bounds = Rect::from_two_pos(a, b).expand(radius);
    paint_where(image, bounds, color, |p| segment_distance(p, a, b) <= radius)
}

pub fn fill_circle(image: &mut RgbaImage, center: Pos2, radius: f32, color: Rgba<u8>) -> usize {
    if radius <= 0.0 {
        return 0;
    }
    let bounds = Rect::from_center_size(center, egui::Vec2::splat(radius * 2.0));
    paint_where(image, bounds, color, |p| p.distance(center) <= radius)
}

/// Ring centred on the circle's circumference, `width` wide
pub fn stroke_circle(image: &mut RgbaImage, center: Pos2, radius: f32, width: f32, color: Rgba<u8>) -> usize {
    if radius <= 0.0 || width <= 0.0 {
        return 0;
    }
    let half = width / 2.0;
    let bounds = Rect::from_center_size(center, egui::Vec2::splat((radius + half) * 2.0));
    paint_where(image, bounds, color, |p| (p.distance(center) - radius).abs() <= half)
}

pub fn fill_rect(image: &mut RgbaImage, rect: Rect, color: Rgba<u8>) -> usize {
    if rect.width() <= 0.0 || rect.height() <= 0.0 {
        return 0;
    }
    paint_where(image, rect, color, |p| rect.contains(p))
}

/// Outline straddling the rectangle's edges, half inside and half outside
pub fn stroke_rect(image: &mut RgbaImage, rect: Rect, width: f32, color: Rgba<u8>) -> usize {
    if width <= 0.0 || (rect.width() <= 0.0 && rect.height() <= 0.0) {
        return 0;
    }
    let half = width / 2.0;
    let outer = rect.expand(half);
    let inner = rect.shrink(half);
    let inner_valid = inner.width() > 0.0 && inner.height() > 0.0;
    paint_where(image, outer, color, |p| {
        outer.contains(p) && !(inner_valid && inner.contains(p))
    })
}

/// Source-over blend of `color` onto one pixel, scaled by `coverage` in `0..=1`
pub fn blend_pixel(image: &mut RgbaImage, x: i32, y: i32, color: Rgba<u8>, coverage: f32) {
    if x < 0 || y < 0 || x as u32 >= image.width() || y as u32 >= image.height() {
        return;
    }
    let alpha = (coverage.clamp(0.0, 1.0) * color[3] as f32 / 255.0).clamp(0.0, 1.0);
    if alpha <= 0.0 {
        return;
    }
    let dst = image.get_pixel_mut(x as u32, y as u32);
    let dst_alpha = dst[3] as f32 / 255.0;
    let out_alpha = alpha + dst_alpha * (1.0 - alpha);
    for channel in 0..3 {
        let src = color[channel] as f32;
        let below = dst[channel] as f32;
        let mixed = (src * alpha + below * dst_alpha * (1.0 - alpha)) / out_alpha.max(f32::EPSILON);
        dst[channel] = mixed.round().clamp(0.0, 255.0) as u8;
    }
    dst[3] = (out_alpha * 255.0).round() as u8;
}

#[cfg(test)]
mod tests {
    use super::*;

    const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);
    const BLUE: Rgba<u8> = Rgba([0, 0, 255, 255]);

    #[test]
    fn test_fill_rect_covers_half_open_pixels() {
        let mut image = RgbaImage::from_pixel(10, 10, WHITE);
        let rect = Rect::from_two_pos(pos2(2.0, 2.0), pos2(8.0, 8.0));
        let painted = fill_rect(&mut image, rect, BLUE);
        assert_eq!(painted, 36);
        assert_eq!(*image.get_pixel(2, 2), BLUE);
        assert_eq!(*image.get_pixel(7, 7), BLUE);
        assert_eq!(*image.get_pixel(8, 8), WHITE);
        assert_eq!(*image.get_pixel(1, 5), WHITE);
    }

    #[test]
    fn test_stroke_rect_leaves_interior() {
        let mut image = RgbaImage::from_pixel(20, 20, WHITE);
        let rect = Rect::from_two_pos(pos2(4.0, 4.0), pos2(16.0, 16.0));
        stroke_rect(&mut image, rect, 2.0, BLUE);
        assert_eq!(*image.get_pixel(4, 10), BLUE);
        assert_eq!(*image.get_pixel(3, 10), BLUE);
        assert_eq!(*image.get_pixel(10, 10), WHITE);
        assert_eq!(*image.get_pixel(1, 1), WHITE);
    }

    #[test]
    fn test_capsule_clips_to_image() {
        let mut image = RgbaImage::from_pixel(10, 10, WHITE);
        let painted = fill_capsule(&mut image, pos2(-5.0, 5.0), pos2(15.0, 5.0), 1.0, BLUE);
        assert_eq!(painted, 20);
        assert_eq!(*image.get_pixel(0, 5), BLUE);
        assert_eq!(*image.get_pixel(9, 4), BLUE);
    }

    #[test]
    fn test_stroke_circle_is_hollow() {
        let mut image = RgbaImage::from_pixel(40, 40, WHITE);
        stroke_circle(&mut image, pos2(20.0, 20.0), 10.0, 2.0, BLUE);
        assert_eq!(*image.get_pixel(20, 20), WHITE);
        assert_eq!(*image.get_pixel(29, 19), BLUE);
    }

    #[test]
    fn test_blend_full_coverage_replaces_color() {
        let mut image = RgbaImage::from_pixel(2, 2, WHITE);
        blend_pixel(&mut image, 0, 0, BLUE, 1.0);
        assert_eq!(*image.get_pixel(0, 0), BLUE);
        blend_pixel(&mut image, 5, 5, BLUE, 1.0);
    }
}
