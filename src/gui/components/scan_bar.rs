// src/gui/components/scan_bar.rs
//
// Page URL, traffic source, and the generate button.

use eframe::egui;

use crate::{
    capture::WatchState,
    gui::{actions, app::App},
};

pub fn draw(ui: &mut egui::Ui, app: &mut App) {
    let ctx = ui.ctx().clone();

    ui.horizontal(|ui| {
        ui.label("Page URL:");
        ui.add(
            egui::TextEdit::singleline(&mut app.state.gui.page_url)
                .hint_text("https://school.example.com/course/attendance")
                .desired_width(420.0),
        );

        let before = app.state.gui.allow_observation;
        ui.checkbox(&mut app.state.gui.allow_observation, "Allow traffic observation");
        if before != app.state.gui.allow_observation {
            logf!("UI: allow_observation → {}", app.state.gui.allow_observation);
        }
    });

    ui.horizontal(|ui| {
        ui.label("HAR capture:");
        ui.add(
            egui::TextEdit::singleline(&mut app.state.gui.har_path)
                .hint_text("session.har")
                .desired_width(420.0),
        );
        if ui.button("Load traffic").clicked() {
            actions::load_har(app);
        }
    });

    ui.horizontal(|ui| {
        let label = if app.running { "Generating…" } else { "Generate attendance by session" };
        if ui.add_enabled(!app.running, egui::Button::new(label)).clicked() {
            actions::scan(app, &ctx);
        }
        let armed = app.scanner.interceptor().watchers().iter().filter(|w| w.state == WatchState::Armed).count();
        if armed > 0 {
            ui.weak(format!("{armed} watcher(s) armed"));
        }
    });
}
