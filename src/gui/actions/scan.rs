// src/gui/actions/scan.rs
use std::{
    sync::{mpsc, Arc},
    thread,
};

use eframe::egui;

use crate::{
    attendance::{self, AttendanceApi, FetchError, HttpApi},
    capture::{Credentials, StaticGrant},
    core::origin::parse_page_url,
    gui::{app::{App, FetchResult}, progress::GuiProgress},
    progress::Progress,
    scan::{publish, ScanError, ScanPlan},
    sink::{OutputSink, SinkError},
};

/// Display goes to the table; copy goes to the system clipboard.
struct GuiSink {
    ctx: egui::Context,
    clipboard: bool,
    shown: Option<String>,
}

impl OutputSink for GuiSink {
    fn show(&mut self, csv: &str) {
        self.shown = Some(s!(csv));
    }

    fn copy(&mut self, csv: &str) -> Result<(), SinkError> {
        if self.clipboard {
            self.ctx.copy_text(s!(csv));
        }
        Ok(())
    }
}

pub fn scan(app: &mut App, ctx: &egui::Context) {
    if app.running {
        return;
    }
    let page = match parse_page_url(&app.state.gui.page_url) {
        Ok(u) => u,
        Err(e) => {
            app.status(format!("Error: {e}"));
            return;
        }
    };

    let mut grant = StaticGrant(app.state.gui.allow_observation);
    match app.scanner.scan(&page, &mut grant) {
        Ok(ScanPlan::Ready(creds)) => start_fetch(app, ctx, creds),
        Ok(ScanPlan::Capturing { origin, missing, .. }) => {
            app.status(format!(
                "Watching {} for attendance traffic (missing {}). Load a HAR capture, then generate again.",
                origin,
                missing.join(", ")
            ));
        }
        Err(ScanError::PermissionDenied(origin)) => {
            app.status(format!("Permission not granted for {origin}"));
        }
        Err(e) => {
            loge!("Scan: {e}");
            app.status(format!("Error: {e}"));
        }
    }
}

fn start_fetch(app: &mut App, ctx: &egui::Context, creds: Credentials) {
    let api: Arc<dyn AttendanceApi> = match HttpApi::new(&app.state.options.fetch) {
        Ok(api) => Arc::new(api),
        Err(e) => {
            app.status(format!("Error: {e}"));
            return;
        }
    };
    let fetch = app.state.options.fetch.clone();
    let status = app.status.clone();
    let ctx2 = ctx.clone();
    let (tx, rx) = mpsc::channel::<FetchResult>();

    logf!("Scan: fetching attendance for course {}", creds.course_id);
    app.running = true;
    app.pending = Some(rx);
    app.status("Fetching…");

    thread::spawn(move || {
        let origin = creds.origin.clone();
        let mut prog = GuiProgress::new(status, ctx2.clone());
        let res = match tokio::runtime::Builder::new_current_thread().enable_all().build() {
            Ok(rt) => rt.block_on(attendance::run(api, &creds, &fetch, chrono::Utc::now(), Some(&mut prog as &mut dyn Progress))),
            Err(e) => Err(FetchError::Runtime(e.to_string())),
        };
        let _ = tx.send((origin, res));
        ctx2.request_repaint();
    });
}

/// Pick up a finished fetch, if any. Called every frame.
pub fn poll(app: &mut App, ctx: &egui::Context) {
    let received = match app.pending.as_ref().map(|rx| rx.try_recv()) {
        None | Some(Err(mpsc::TryRecvError::Empty)) => return,
        Some(Err(mpsc::TryRecvError::Disconnected)) => None,
        Some(Ok(received)) => Some(received),
    };
    app.pending = None;
    app.running = false;

    let Some((origin, res)) = received else {
        loge!("Scan: fetch worker stopped without a result");
        app.status("Error: fetch worker stopped");
        return;
    };

    match res {
        Ok(att) => {
            let mut out = GuiSink {
                ctx: ctx.clone(),
                clipboard: app.state.options.export.copy_to_clipboard,
                shown: None,
            };
            let report = publish(&origin, &att, &mut out);
            if let Some(shown) = out.shown {
                app.set_table(shown);
            }
            app.status(format!(
                "Ready: {} session(s) × {} student(s), {} not yet ended{}",
                report.sessions,
                report.students,
                report.skipped,
                if report.copied && app.state.options.export.copy_to_clipboard { ", copied to clipboard" } else { "" }
            ));
        }
        Err(e) => {
            loge!("Scan: {e}");
            app.status(format!("Error: {e}"));
        }
    }
}
