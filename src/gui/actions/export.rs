// src/gui/actions/export.rs
use std::path::PathBuf;

use crate::{config, file, gui::app::App};

pub fn export(app: &mut App) {
    if app.csv_text.is_empty() {
        app.status("Nothing to export");
        return;
    }
    let target = PathBuf::from(app.out_path_text.trim());
    match file::write_export(&target, &app.csv_text) {
        Ok(path) => {
            app.status(format!("Exported {}", path.display()));
            app.state.options.export.out_path = Some(target);
            if let Err(e) = config::file::save(&app.config_path, &app.state.options) {
                loge!("Config: save failed: {e}");
            }
        }
        Err(e) => {
            loge!("Export: {} failed: {}", target.display(), e);
            app.status(format!("Export failed: {e}"));
        }
    }
}
