use eframe::egui;

mod annotation;
mod app;
mod catalog;
mod config;
mod error;
mod metadata;
mod persist;

use app::AnnotatorApp;

fn main() {
    env_logger::init();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([900.0, 780.0])
            .with_title("Photo Annotator"),
        ..Default::default()
    };

    eframe::run_native(
        "Photo Annotator",
        options,
        Box::new(|_cc| Ok(Box::new(AnnotatorApp::new()))),
    )
    .expect("Failed to run eframe");
}
