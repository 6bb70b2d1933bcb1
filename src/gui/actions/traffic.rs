// src/gui/actions/traffic.rs
use std::path::Path;

use crate::{capture::har, gui::app::App};

/// Replay a HAR capture into the armed watchers.
pub fn load_har(app: &mut App) {
    let path = app.state.gui.har_path.trim().to_owned();
    if path.is_empty() {
        app.status("Pick a HAR file first");
        return;
    }
    let har = match har::load(Path::new(&path)) {
        Ok(h) => h,
        Err(e) => {
            loge!("Traffic: {e}");
            app.status(format!("Error: {e}"));
            return;
        }
    };

    let events = har.events();
    let obs = app.scanner.observe_all(events.iter());
    let fired: Vec<String> = obs.fired.iter().map(|(o, k)| format!("{k:?} on {o}")).collect();
    logf!("Traffic: {} events from {}, fired {:?}", events.len(), path, fired);

    if fired.is_empty() {
        app.status(format!("Replayed {} request(s); nothing new captured", events.len() / 2));
    } else {
        app.status(format!(
            "Replayed {} request(s); captured {}. Generate again to export.",
            events.len() / 2,
            fired.join(", ")
        ));
    }
}
