// src/gui/components/export_bar.rs

use eframe::egui;

use crate::gui::{actions, app::App};

pub fn draw(ui: &mut egui::Ui, app: &mut App) {
    let ctx = ui.ctx().clone();
    let has_data = !app.csv_text.is_empty();

    ui.horizontal(|ui| {
        let before = app.state.options.export.copy_to_clipboard;
        ui.checkbox(&mut app.state.options.export.copy_to_clipboard, "Copy on generate");
        if before != app.state.options.export.copy_to_clipboard {
            logf!("UI: copy_to_clipboard → {}", app.state.options.export.copy_to_clipboard);
        }

        if ui.add_enabled(has_data, egui::Button::new("Copy")).clicked() {
            actions::copy(app, &ctx);
        }
    });

    ui.horizontal(|ui| {
        ui.label("Output:");
        ui.add(egui::TextEdit::singleline(&mut app.out_path_text).desired_width(360.0));
        if ui.add_enabled(has_data, egui::Button::new("Export")).clicked() {
            actions::export(app);
        }
    });
}
