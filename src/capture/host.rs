// src/capture/host.rs
//
// What the host environment provides: a permission prompt, and request
// events in the two phases the watchers care about.

use url::Url;

use crate::core::HttpHeader;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Capability {
    /// Observe outgoing requests.
    WebRequest,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CapabilityRequest {
    pub permissions: Vec<Capability>,
    pub origins: Vec<String>,
}

pub trait CapabilityHost {
    /// Ask for the grant. `false` means the user (or policy) refused.
    fn request(&mut self, req: &CapabilityRequest) -> bool;
}

/// Fixed answer, decided up front by the front end (`--allow`, checkbox).
#[derive(Clone, Copy, Debug)]
pub struct StaticGrant(pub bool);

impl CapabilityHost for StaticGrant {
    fn request(&mut self, req: &CapabilityRequest) -> bool {
        logd!("Grant: {:?} for {:?} → {}", req.permissions, req.origins, self.0);
        self.0
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Body visible, headers not yet.
    BeforeSend,
    /// Final outgoing headers visible.
    BeforeSendHeaders,
}

#[derive(Clone, Debug)]
pub struct RequestBody {
    pub url: Url,
    pub method: String,
    pub body: Option<Vec<u8>>,
    /// Origin of the page that issued the request, when known.
    pub initiator: Option<String>,
}

#[derive(Clone, Debug)]
pub struct RequestHeaders {
    pub url: Url,
    pub method: String,
    pub headers: Vec<HttpHeader>,
}

#[derive(Clone, Debug)]
pub enum TrafficEvent {
    BeforeSend(RequestBody),
    BeforeSendHeaders(RequestHeaders),
}

impl TrafficEvent {
    pub fn phase(&self) -> Phase {
        match self {
            TrafficEvent::BeforeSend(_) => Phase::BeforeSend,
            TrafficEvent::BeforeSendHeaders(_) => Phase::BeforeSendHeaders,
        }
    }

    pub fn url(&self) -> &Url {
        match self {
            TrafficEvent::BeforeSend(r) => &r.url,
            TrafficEvent::BeforeSendHeaders(r) => &r.url,
        }
    }

    pub fn method(&self) -> &str {
        match self {
            TrafficEvent::BeforeSend(r) => &r.method,
            TrafficEvent::BeforeSendHeaders(r) => &r.method,
        }
    }

    pub fn is_post(&self) -> bool {
        self.method().eq_ignore_ascii_case("POST")
    }
}
