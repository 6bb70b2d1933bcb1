// src/scan.rs
//
// The trigger: page URL → origin key → complete record? aggregate : capture.
// One Scanner lives for the whole process and owns all capture state.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use url::Url;

use crate::attendance::{self, Attendance, AttendanceApi, FetchError};
use crate::capture::{
    Capability, CapabilityHost, CapabilityRequest, CredentialRecord, CredentialStore, Credentials,
    Interceptor, Observation, TrafficEvent, WatchHandle, WatchKind,
};
use crate::config::options::{CaptureOptions, FetchOptions};
use crate::core::{derive_origin_key, pattern::PatternError, OriginError, OriginKey};
use crate::csv;
use crate::progress::Progress;
use crate::sink::{self, OutputSink};

#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    #[error("permission to observe traffic on {0} was not granted")]
    PermissionDenied(OriginKey),

    #[error(transparent)]
    Origin(#[from] OriginError),

    #[error(transparent)]
    Pattern(#[from] PatternError),

    #[error(transparent)]
    Fetch(#[from] FetchError),
}

#[derive(Clone, Debug, PartialEq)]
pub enum ScanPlan {
    /// Record complete; aggregation may run.
    Ready(Credentials),
    /// Watchers armed (or already armed); retry once traffic has been seen.
    Capturing { origin: OriginKey, armed: Vec<WatchHandle>, missing: Vec<&'static str> },
}

#[derive(Clone, Debug, PartialEq)]
pub struct Report {
    pub origin: OriginKey,
    pub csv: String,
    pub sessions: usize,
    pub students: usize,
    pub skipped: usize,
    pub copied: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub enum ScanOutcome {
    Exported(Report),
    CaptureStarted { origin: OriginKey, missing: Vec<&'static str> },
}

#[derive(Debug)]
pub struct Scanner {
    store: CredentialStore,
    interceptor: Interceptor,
}

impl Scanner {
    pub fn new(capture: &CaptureOptions) -> Self {
        Self {
            store: CredentialStore::new(),
            interceptor: Interceptor::new(capture.scope_suffixes.clone()),
        }
    }

    pub fn record(&self, origin: &OriginKey) -> Option<&CredentialRecord> {
        self.store.get(origin)
    }

    pub fn interceptor(&self) -> &Interceptor {
        &self.interceptor
    }

    /// Decide for `page`: hand out credentials, or ask for the grant and arm
    /// both watchers.
    pub fn scan(&mut self, page: &Url, caps: &mut dyn CapabilityHost) -> Result<ScanPlan, ScanError> {
        let origin = derive_origin_key(page)?;
        logf!("Scan: page={} origin={}", page, origin);

        let record = self.store.entry(&origin);
        if let Some(creds) = record.credentials(&origin) {
            return Ok(ScanPlan::Ready(creds));
        }
        let missing = record.missing();
        logf!("Scan: record incomplete for {}, missing {:?}", origin, missing);

        let req = CapabilityRequest {
            permissions: vec![Capability::WebRequest],
            origins: vec![s!(origin.as_str())],
        };
        if !caps.request(&req) {
            logw!("Scan: permission denied for {}", origin);
            return Err(ScanError::PermissionDenied(origin));
        }

        let armed = WatchKind::ALL
            .iter()
            .map(|&kind| self.interceptor.arm(&origin, kind))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(ScanPlan::Capturing { origin, armed, missing })
    }

    /// Hand one host event to the watchers.
    pub fn observe(&mut self, event: &TrafficEvent) -> Observation {
        self.interceptor.observe(event, &mut self.store)
    }

    pub fn observe_all<'a, I>(&mut self, events: I) -> Observation
    where
        I: IntoIterator<Item = &'a TrafficEvent>,
    {
        let mut obs = Observation::default();
        for ev in events {
            obs.merge(self.observe(ev));
        }
        obs
    }

    /// Full trigger: scan, and on a complete record aggregate, render and
    /// deliver.
    pub async fn run(
        &mut self,
        page: &Url,
        caps: &mut dyn CapabilityHost,
        api: Arc<dyn AttendanceApi>,
        fetch: &FetchOptions,
        now: DateTime<Utc>,
        sink: &mut dyn OutputSink,
        progress: Option<&mut dyn Progress>,
    ) -> Result<ScanOutcome, ScanError> {
        let creds = match self.scan(page, caps)? {
            ScanPlan::Ready(creds) => creds,
            ScanPlan::Capturing { origin, missing, .. } => {
                return Ok(ScanOutcome::CaptureStarted { origin, missing });
            }
        };
        let report = export(api, &creds, fetch, now, sink, progress).await?;
        Ok(ScanOutcome::Exported(report))
    }
}

/// Aggregate + render + deliver for an already complete record.
pub async fn export(
    api: Arc<dyn AttendanceApi>,
    creds: &Credentials,
    fetch: &FetchOptions,
    now: DateTime<Utc>,
    sink: &mut dyn OutputSink,
    progress: Option<&mut dyn Progress>,
) -> Result<Report, FetchError> {
    let att = attendance::run(api, creds, fetch, now, progress).await?;
    Ok(publish(&creds.origin, &att, sink))
}

/// Render a finished aggregation and hand it to the sink. Shared by every
/// front end so the table and the report always agree.
pub fn publish(origin: &OriginKey, att: &Attendance, sink: &mut dyn OutputSink) -> Report {
    let text = csv::render(&att.sessions, &att.roster);
    let copied = sink::deliver(sink, &text);
    Report {
        origin: origin.clone(),
        csv: text,
        sessions: att.sessions.len(),
        students: att.roster.len(),
        skipped: att.skipped,
        copied,
    }
}
