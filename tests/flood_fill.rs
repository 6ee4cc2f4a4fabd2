use doodlepad::error::SurfaceError;
use doodlepad::fill::{FillOutcome, FloodFill};
use egui::{Color32, pos2};
use image::{Rgba, RgbaImage};

const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);
const BLACK: Rgba<u8> = Rgba([0, 0, 0, 255]);
const RED: Rgba<u8> = Rgba([255, 0, 0, 255]);

fn white_buffer() -> RgbaImage {
    RgbaImage::from_pixel(10, 10, WHITE)
}

#[test]
fn test_fill_covers_uniform_buffer() {
    let mut image = white_buffer();
    let outcome = FloodFill::new(10).fill(&mut image, pos2(5.0, 5.0), Color32::RED).unwrap();
    assert_eq!(outcome, FillOutcome::Filled { pixels: 100 });
    assert!(image.pixels().all(|p| *p == RED));
}

#[test]
fn test_fill_stops_at_boundary() {
    let mut image = white_buffer();
    for y in 0..10 {
        image.put_pixel(5, y, BLACK);
    }
    FloodFill::new(10).fill(&mut image, pos2(0.0, 5.0), Color32::RED).unwrap();

    for (x, _, pixel) in image.enumerate_pixels() {
        match x {
            0..5 => assert_eq!(*pixel, RED),
            5 => assert_eq!(*pixel, BLACK),
            _ => assert_eq!(*pixel, WHITE),
        }
    }
}

#[test]
fn test_refill_with_same_colour_is_unchanged() {
    let mut image = white_buffer();
    let engine = FloodFill::new(30);
    engine.fill(&mut image, pos2(1.0, 1.0), Color32::RED).unwrap();
    let filled = image.clone();
    let outcome = engine.fill(&mut image, pos2(1.0, 1.0), Color32::RED).unwrap();
    assert_eq!(outcome, FillOutcome::Unchanged);
    assert_eq!(image, filled);
}

#[test]
fn test_zero_tolerance_only_takes_exact_matches() {
    let mut image = white_buffer();
    image.put_pixel(3, 3, Rgba([254, 255, 255, 255]));
    FloodFill::new(0).fill(&mut image, pos2(0.0, 0.0), Color32::BLUE).unwrap();
    assert_eq!(*image.get_pixel(3, 3), Rgba([254, 255, 255, 255]));
    assert_eq!(*image.get_pixel(4, 3), Rgba([0, 0, 255, 255]));
}

#[test]
fn test_exceeding_iteration_bound_leaves_buffer_untouched() {
    let mut image = white_buffer();
    let before = image.clone();
    let err = FloodFill::new(0)
        .with_iteration_limit(10)
        .fill(&mut image, pos2(5.0, 5.0), Color32::RED)
        .unwrap_err();
    assert!(matches!(err, SurfaceError::FillBoundExceeded { limit: 10 }));
    assert_eq!(image, before);
}

#[test]
fn test_seed_outside_buffer_is_rejected() {
    let mut image = white_buffer();
    let err = FloodFill::new(30).fill(&mut image, pos2(-1.0, 3.0), Color32::RED).unwrap_err();
    assert!(matches!(err, SurfaceError::OutOfBounds { x: -1, y: 3 }));
}
