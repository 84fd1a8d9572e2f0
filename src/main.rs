mod app;
mod braille;
mod convert;
mod model;
mod vector_map;

use eframe::egui;

fn main() -> eframe::Result<()> {
    env_logger::init();

    // Optional seed: a saved vector map or a box-properties file.
    let initial_path = std::env::args().nth(1);

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 800.0])
            .with_min_inner_size([800.0, 600.0])
            .with_title("Wall map editor"),
        ..Default::default()
    };
    eframe::run_native(
        "wallmap",
        native_options,
        Box::new(|cc| Ok(Box::new(app::EditorApp::new(cc, initial_path)))),
    )
}
