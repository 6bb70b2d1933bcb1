// src/capture/interceptor.rs
use crate::core::{pattern::PatternError, MatchPattern, OriginKey};
use crate::logging::mask;
use super::host::TrafficEvent;
use super::store::CredentialStore;
use super::watcher::{extract_course, extract_token, WatchHandle, WatchKind, WatchState, Watcher};

/// What one event did to the watchers.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Observation {
    pub fired: Vec<(OriginKey, WatchKind)>,
}

impl Observation {
    pub fn is_empty(&self) -> bool {
        self.fired.is_empty()
    }

    pub fn merge(&mut self, other: Observation) {
        self.fired.extend(other.fired);
    }
}

/// Registry of watchers across origins.
#[derive(Debug)]
pub struct Interceptor {
    watchers: Vec<Watcher>,
    scope_suffixes: Vec<String>,
    next_handle: u64,
}

impl Interceptor {
    pub fn new(scope_suffixes: Vec<String>) -> Self {
        Self { watchers: Vec::new(), scope_suffixes, next_handle: 1 }
    }

    fn find(&self, origin: &OriginKey, kind: WatchKind) -> Option<&Watcher> {
        self.watchers.iter().find(|w| &w.origin == origin && w.kind == kind)
    }

    pub fn state(&self, origin: &OriginKey, kind: WatchKind) -> Option<WatchState> {
        self.find(origin, kind).map(|w| w.state)
    }

    pub fn is_armed(&self, origin: &OriginKey, kind: WatchKind) -> bool {
        self.state(origin, kind) == Some(WatchState::Armed)
    }

    /// Arm `kind` for `origin`. If a watcher already exists (armed or fired)
    /// its handle is returned and nothing changes.
    pub fn arm(&mut self, origin: &OriginKey, kind: WatchKind) -> Result<WatchHandle, PatternError> {
        if let Some(w) = self.find(origin, kind) {
            logd!("Capture: {:?} for {} already {:?}", kind, origin, w.state);
            return Ok(w.handle);
        }

        let scope = origin
            .scope_patterns(&self.scope_suffixes)
            .iter()
            .map(|p| MatchPattern::parse(p))
            .collect::<Result<Vec<_>, _>>()?;

        let handle = WatchHandle(self.next_handle);
        self.next_handle += 1;
        self.watchers.push(Watcher {
            handle,
            origin: origin.clone(),
            kind,
            scope,
            state: WatchState::Armed,
        });
        logf!("Capture: armed {:?} for {}", kind, origin);
        Ok(handle)
    }

    /// Remove an armed watcher. Fired watchers stay, so they cannot be re-armed.
    pub fn disarm(&mut self, handle: WatchHandle) -> bool {
        let before = self.watchers.len();
        self.watchers
            .retain(|w| !(w.handle == handle && w.state == WatchState::Armed));
        before != self.watchers.len()
    }

    /// Feed one host event through every armed watcher in its phase.
    pub fn observe(&mut self, event: &TrafficEvent, store: &mut CredentialStore) -> Observation {
        let mut obs = Observation::default();
        if !event.is_post() {
            return obs;
        }

        for w in self.watchers.iter_mut() {
            if !w.listens_to(event.phase()) || !w.in_scope(event.url()) {
                continue;
            }

            let fired = match (w.kind, event) {
                (WatchKind::CourseId, TrafficEvent::BeforeSend(req)) => match extract_course(req) {
                    Some(found) => {
                        logf!("Capture: found courseId {} for {}", found.course_id, w.origin);
                        let record = store.entry(&w.origin);
                        if !record.set_course(found.course_id, found.data_url, found.referrer_url) {
                            logd!("Capture: courseId for {} already recorded, kept", w.origin);
                        }
                        true
                    }
                    None => false,
                },
                (WatchKind::AuthToken, TrafficEvent::BeforeSendHeaders(req)) => match extract_token(req) {
                    Some(found) => {
                        logf!("Capture: found authToken {} for {}", mask(&found.auth_token), w.origin);
                        let record = store.entry(&w.origin);
                        if !record.set_token(found.auth_token, found.headers) {
                            logd!("Capture: authToken for {} already recorded, kept", w.origin);
                        }
                        true
                    }
                    None => false,
                },
                _ => false,
            };

            if fired {
                w.state = WatchState::Fired;
                obs.fired.push((w.origin.clone(), w.kind));
            }
        }
        obs
    }

    pub fn watchers(&self) -> &[Watcher] {
        &self.watchers
    }
}
