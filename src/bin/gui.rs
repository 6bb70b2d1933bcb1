// src/bin/gui.rs
#![cfg_attr(target_os = "windows", windows_subsystem = "windows")]
use std::path::Path;

use attendance_scrape::{config::{consts::DEFAULT_LOG_FILE, state::GuiState}, gui, logging};
use eframe::egui::ViewportBuilder;

fn main() {
    logging::init(Some(Path::new(DEFAULT_LOG_FILE)), log::LevelFilter::Info, false);

    let size = GuiState::default();
    let options = eframe::NativeOptions {
        viewport: ViewportBuilder::default()
            .with_inner_size([size.window_w as f32, size.window_h as f32])
            .with_title("Attendance Scrape"),
        ..Default::default()
    };

    if let Err(e) = gui::run(options) {
        eprintln!("GUI failed: {}", e);
        std::process::exit(1);
    }
}
