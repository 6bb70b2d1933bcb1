// src/gui/app.rs
use std::{
    error::Error,
    path::PathBuf,
    sync::{mpsc, Arc, Mutex},
};

use eframe::egui;

use crate::{
    attendance::{Attendance, FetchError},
    config::{self, state::AppState},
    core::OriginKey,
    csv::{parse_rows, split_header},
    scan::Scanner,
};

pub fn run(options: eframe::NativeOptions) -> Result<(), Box<dyn Error>> {
    let config_path = config::file::default_path();
    let mut state = AppState::default();
    match config::file::load(&config_path) {
        Ok(opts) => state.options = opts,
        Err(e) => loge!("Config: {e}; using defaults"),
    }

    eframe::run_native(
        "Attendance Scrape",
        options,
        Box::new(move |_cc| Ok(Box::new(App::new(state, config_path)))),
    )?;
    Ok(())
}

/// What the fetch worker sends back: the origin it ran for and its result.
pub type FetchResult = (OriginKey, Result<Attendance, FetchError>);

pub struct App {
    // single source of truth (UI thread only)
    pub state: AppState,
    pub config_path: PathBuf,

    // capture state lives as long as the window
    pub scanner: Scanner,

    // output text field UX (we map this <-> ExportOptions)
    pub out_path_text: String,

    // last rendered table
    pub csv_text: String,
    pub headers: Option<Vec<String>>,
    pub rows: Vec<Vec<String>>,

    // status/progress (workers write here)
    pub status: Arc<Mutex<String>>,
    pub running: bool,
    pub pending: Option<mpsc::Receiver<FetchResult>>,
}

impl App {
    pub fn new(state: AppState, config_path: PathBuf) -> Self {
        let scanner = Scanner::new(&state.options.capture);
        let out_path_text = state.options.export.out_path_or_default().to_string_lossy().into_owned();
        logf!("Init: config={}, scope={:?}", config_path.display(), state.options.capture.scope_suffixes);

        Self {
            state,
            config_path,
            scanner,
            out_path_text,
            csv_text: s!(),
            headers: None,
            rows: Vec::new(),
            status: Arc::new(Mutex::new(s!("Idle"))),
            running: false,
            pending: None,
        }
    }

    #[inline]
    pub fn status<T: Into<String>>(&self, msg: T) {
        if let Ok(mut s) = self.status.lock() {
            *s = msg.into();
        }
    }

    pub fn status_text(&self) -> String {
        self.status.lock().map(|s| s.clone()).unwrap_or_default()
    }

    /// Replace the displayed table with freshly rendered CSV.
    pub fn set_table(&mut self, csv_text: String) {
        let (headers, rows) = split_header(parse_rows(&csv_text, ','));
        self.headers = headers;
        self.rows = rows;
        self.csv_text = csv_text;
    }
}

impl eframe::App for App {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        crate::gui::actions::poll(self, ctx);

        egui::TopBottomPanel::bottom("status").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if self.running {
                    ui.add(egui::widgets::Spinner::new());
                }
                ui.label(self.status_text());
            });
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            crate::gui::components::scan_bar::draw(ui, self);

            ui.separator();

            crate::gui::components::export_bar::draw(ui, self);

            ui.separator();

            crate::gui::components::data_table::draw(ui, self);
        });
    }
}
