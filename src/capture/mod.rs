// src/capture/mod.rs
//
// Learning the private API's parameters from observed traffic.
//
// The host environment (browser, HAR replay) hands us request events in two
// phases. Per origin key, two one-shot watchers pick out what they need:
//
//   BeforeSend        → course id, data URL, referrer   (CourseId watcher)
//   BeforeSendHeaders → auth token + full header set     (AuthToken watcher)
//
// Both write into the CredentialStore. A record becomes usable only once both
// have fired; which one fires first is up to the traffic.

pub mod har;
pub mod host;
pub mod interceptor;
pub mod store;
pub mod watcher;

pub use host::{Capability, CapabilityHost, CapabilityRequest, Phase, RequestBody, RequestHeaders, StaticGrant, TrafficEvent};
pub use interceptor::{Interceptor, Observation};
pub use store::{CredentialRecord, CredentialStore, Credentials};
pub use watcher::{WatchHandle, WatchKind, WatchState};
