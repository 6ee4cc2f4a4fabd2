use std::collections::VecDeque;

use egui::{Color32, Pos2};
use image::{Rgba, RgbaImage};

use crate::error::{SurfaceError, SurfaceResult};

/// Largest accepted tolerance value
pub const MAX_TOLERANCE: u8 = 100;

/// Squared Euclidean distance between the RGB channels of two pixels
pub fn color_distance_sq(a: [u8; 3], b: [u8; 3]) -> u32 {
    a.iter()
        .zip(b.iter())
        .map(|(&x, &y)| {
            let d = x as i32 - y as i32;
            (d * d) as u32
        })
        .sum()
}

fn rgb(pixel: &Rgba<u8>) -> [u8; 3] {
    [pixel[0], pixel[1], pixel[2]]
}

/// What a fill did to the buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FillOutcome {
    /// The region was repainted
    Filled { pixels: usize },
    /// The seed colour already matched the target; nothing to record
    Unchanged,
}

/// Bounded, queue-driven region fill.
///
/// Matching is always against the seed's original colour, never the colour
/// of the neighbour that enqueued a pixel, so tolerance cannot drift across
/// the region. The fill runs on a scratch copy and is blitted back only when
/// it completes; an aborted fill leaves the buffer exactly as it was.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FloodFill {
    tolerance: u8,
    iteration_factor: f32,
    iteration_limit: Option<usize>,
}

impl Default for FloodFill {
    fn default() -> Self {
        Self::new(0)
    }
}

impl FloodFill {
    pub const DEFAULT_ITERATION_FACTOR: f32 = 1.5;

    /// `tolerance` is clamped to `0..=100`.
    pub fn new(tolerance: u8) -> Self {
        Self {
            tolerance: tolerance.min(MAX_TOLERANCE),
            iteration_factor: Self::DEFAULT_ITERATION_FACTOR,
            iteration_limit: None,
        }
    }

    /// The cap becomes `factor * width * height`.
    pub fn with_iteration_factor(mut self, factor: f32) -> Self {
        self.iteration_factor = factor.max(0.0);
        self
    }

    /// Overrides the size-derived cap with a fixed one.
    pub fn with_iteration_limit(mut self, limit: usize) -> Self {
        self.iteration_limit = Some(limit);
        self
    }

    pub fn tolerance(&self) -> u8 {
        self.tolerance
    }

    fn tolerance_sq(&self) -> u32 {
        let t = self.tolerance as u32;
        t * t
    }

    fn iteration_cap(&self, width: u32, height: u32) -> usize {
        self.iteration_limit
            .unwrap_or_else(|| (self.iteration_factor as f64 * width as f64 * height as f64) as usize)
    }

    pub fn fill(&self, image: &mut RgbaImage, seed: Pos2, target: Color32) -> SurfaceResult<FillOutcome> {
        let (width, height) = image.dimensions();
        let sx = seed.x.floor() as i64;
        let sy = seed.y.floor() as i64;
        if sx < 0 || sy < 0 || sx >= width as i64 || sy >= height as i64 {
            return Err(SurfaceError::OutOfBounds { x: sx, y: sy });
        }
        let (sx, sy) = (sx as u32, sy as u32);

        let start = rgb(image.get_pixel(sx, sy));
        let [tr, tg, tb, _] = target.to_srgba_unmultiplied();
        let target_rgb = [tr, tg, tb];
        let tolerance_sq = self.tolerance_sq();

        if color_distance_sq(start, target_rgb) <= tolerance_sq {
            log::debug!("Fill seed already matches target colour; nothing to do");
            return Ok(FillOutcome::Unchanged);
        }

        let paint = Rgba([tr, tg, tb, 255]);
        let cap = self.iteration_cap(width, height);
        let index = |x: u32, y: u32| (y as usize) * (width as usize) + x as usize;

        let mut scratch = image.clone();
        let mut visited = vec![false; width as usize * height as usize];
        let mut queue = VecDeque::new();
        queue.push_back((sx, sy));
        visited[index(sx, sy)] = true;

        let mut iterations = 0usize;
        let mut painted = 0usize;
        while let Some((x, y)) = queue.pop_front() {
            iterations += 1;
            if iterations > cap {
                log::warn!("Flood fill exceeded {} iterations; abandoning", cap);
                return Err(SurfaceError::FillBoundExceeded { limit: cap });
            }

            if color_distance_sq(rgb(scratch.get_pixel(x, y)), start) > tolerance_sq {
                continue;
            }
            scratch.put_pixel(x, y, paint);
            painted += 1;

            let neighbors = [
                (x.checked_add(1).filter(|&nx| nx < width), Some(y)),
                (x.checked_sub(1), Some(y)),
                (Some(x), y.checked_add(1).filter(|&ny| ny < height)),
                (Some(x), y.checked_sub(1)),
            ];
            for (nx, ny) in neighbors {
                if let (Some(nx), Some(ny)) = (nx, ny) {
                    let i = index(nx, ny);
                    if !visited[i] {
                        visited[i] = true;
                        queue.push_back((nx, ny));
                    }
                }
            }
        }

        *image = scratch;
        log::debug!("Flood fill painted {} pixels in {} iterations", painted, iterations);
        Ok(FillOutcome::Filled { pixels: painted })
    }
}
