// src/gui/components/data_table.rs
//
// Draws the last rendered attendance table. Purely a view.

use eframe::egui::{self, RichText, TextWrapMode};
use egui_extras::{Column, TableBuilder};

use crate::gui::app::App;

pub fn draw(ui: &mut egui::Ui, app: &App) {
    let Some(headers) = app.headers.as_ref() else {
        ui.weak("No attendance yet.");
        return;
    };

    ui.style_mut().wrap_mode = Some(TextWrapMode::Extend);

    egui::ScrollArea::horizontal().show(ui, |ui| {
        TableBuilder::new(ui)
            .striped(true)
            .resizable(true)
            .column(Column::auto().at_least(140.0))
            .column(Column::auto().at_least(70.0))
            .columns(Column::auto().at_least(60.0), headers.len().saturating_sub(2))
            .header(22.0, |mut header| {
                for h in headers {
                    header.col(|ui| {
                        ui.label(RichText::new(h).strong());
                    });
                }
            })
            .body(|mut body| {
                for row in &app.rows {
                    body.row(20.0, |mut r| {
                        for i in 0..headers.len() {
                            r.col(|ui| {
                                ui.label(row.get(i).map(String::as_str).unwrap_or(""));
                            });
                        }
                    });
                }
            });
    });

    if app.rows.is_empty() {
        ui.weak("No past sessions.");
    }
}
