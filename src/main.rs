#![warn(clippy::all, rust_2018_idioms)]

use doodlepad::{PaintApp, SurfaceSettings};

fn main() -> eframe::Result {
    env_logger::init(); // Log to stderr (if you run with `RUST_LOG=debug`).

    // An optional JSON file with surface settings may be passed as the only argument
    let settings = match std::env::args().nth(1) {
        Some(path) => SurfaceSettings::load(&path).unwrap_or_else(|err| {
            log::warn!("Ignoring settings file {}: {}", path, err);
            SurfaceSettings::default()
        }),
        None => SurfaceSettings::default(),
    };

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([400.0, 300.0]),
        ..Default::default()
    };
    eframe::run_native(
        "Doodlepad",
        native_options,
        Box::new(|cc| Ok(Box::new(PaintApp::new(cc, settings)?))),
    )
}
