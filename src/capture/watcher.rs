// src/capture/watcher.rs
//
// One watcher = one datum for one origin. Two states only:
//
//   Armed ──(matching event)──▶ Fired
//
// Fired is terminal for the process lifetime; the extraction functions below
// are pure so they can be tested without a host.

use serde_json::Value;
use url::Url;

use crate::config::consts::{AUTH_TOKEN_HEADER, COURSE_ID_FIELD};
use crate::core::{HttpHeader, MatchPattern, OriginKey, WireId};
use super::host::{Phase, RequestBody, RequestHeaders};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum WatchKind {
    CourseId,
    AuthToken,
}

impl WatchKind {
    pub const ALL: [WatchKind; 2] = [WatchKind::CourseId, WatchKind::AuthToken];

    pub fn phase(self) -> Phase {
        match self {
            WatchKind::CourseId => Phase::BeforeSend,
            WatchKind::AuthToken => Phase::BeforeSendHeaders,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WatchState {
    Armed,
    Fired,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WatchHandle(pub(crate) u64);

#[derive(Clone, Debug)]
pub struct Watcher {
    pub handle: WatchHandle,
    pub origin: OriginKey,
    pub kind: WatchKind,
    pub scope: Vec<MatchPattern>,
    pub state: WatchState,
}

impl Watcher {
    pub fn in_scope(&self, url: &Url) -> bool {
        self.scope.iter().any(|p| p.matches(url))
    }

    pub fn listens_to(&self, phase: Phase) -> bool {
        self.state == WatchState::Armed && self.kind.phase() == phase
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct CourseFound {
    pub course_id: WireId,
    pub data_url: String,
    pub referrer_url: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct TokenFound {
    pub auth_token: String,
    pub headers: Vec<HttpHeader>,
}

/// Drop one trailing `/students` or `/sessions` (optionally with `/`),
/// any letter case. Other URLs come back unchanged.
pub fn strip_data_url(url: &str) -> String {
    let trimmed = url.strip_suffix('/').unwrap_or(url);
    for seg in ["/students", "/sessions"] {
        if trimmed.len() >= seg.len() {
            let cut = trimmed.len() - seg.len();
            if trimmed.is_char_boundary(cut) && trimmed[cut..].eq_ignore_ascii_case(seg) {
                return s!(&trimmed[..cut]);
            }
        }
    }
    s!(url)
}

/// Body-phase extraction. Non-POST, empty, non-JSON or courseId-less bodies
/// yield `None`.
pub fn extract_course(req: &RequestBody) -> Option<CourseFound> {
    if !req.method.eq_ignore_ascii_case("POST") {
        return None;
    }
    let bytes = req.body.as_deref().filter(|b| !b.is_empty())?;
    let parsed: Value = match serde_json::from_slice(bytes) {
        Ok(v) => v,
        Err(e) => {
            logd!("Capture: ignoring non-JSON body for {}: {}", req.url, e);
            return None;
        }
    };
    let course_id = parsed.get(COURSE_ID_FIELD).and_then(WireId::from_value)?;

    let referrer_url = req
        .initiator
        .clone()
        .filter(|i| !i.is_empty() && i != "null")
        .unwrap_or_else(|| req.url.origin().ascii_serialization());

    Some(CourseFound {
        course_id,
        data_url: strip_data_url(req.url.as_str()),
        referrer_url,
    })
}

/// Header-phase extraction: first `authtoken` header with a non-empty value.
pub fn extract_token(req: &RequestHeaders) -> Option<TokenFound> {
    if !req.method.eq_ignore_ascii_case("POST") || req.headers.is_empty() {
        return None;
    }
    let auth_token = req
        .headers
        .iter()
        .find(|h| h.name.trim().eq_ignore_ascii_case(AUTH_TOKEN_HEADER))
        .and_then(|h| h.value.clone())
        .filter(|v| !v.is_empty())?;

    Some(TokenFound { auth_token, headers: req.headers.clone() })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body(method: &str, url: &str, body: &str) -> RequestBody {
        RequestBody {
            url: Url::parse(url).unwrap(),
            method: s!(method),
            body: Some(body.as_bytes().to_vec()),
            initiator: Some(s!("https://app.school.edu")),
        }
    }

    #[test]
    fn strips_known_segments() {
        assert_eq!(strip_data_url("https://a.b/v1/attendance/students"), "https://a.b/v1/attendance");
        assert_eq!(strip_data_url("https://a.b/v1/attendance/Sessions/"), "https://a.b/v1/attendance");
        assert_eq!(strip_data_url("https://a.b/v1/attendance/session"), "https://a.b/v1/attendance/session");
        assert_eq!(strip_data_url("https://a.b/v1/attendance/"), "https://a.b/v1/attendance/");
    }

    #[test]
    fn course_from_post_body() {
        let req = body("POST", "https://api.school.edu/v1/attendance/sessions", r#"{"courseId":4711}"#);
        let found = extract_course(&req).unwrap();
        assert_eq!(found.course_id, WireId::from(4711u64));
        assert_eq!(found.data_url, "https://api.school.edu/v1/attendance");
        assert_eq!(found.referrer_url, "https://app.school.edu");
    }

    #[test]
    fn course_ignores_noise() {
        assert!(extract_course(&body("GET", "https://a.b/x/attendance/s", r#"{"courseId":1}"#)).is_none());
        assert!(extract_course(&body("POST", "https://a.b/x/attendance/s", "courseId=1")).is_none());
        assert!(extract_course(&body("POST", "https://a.b/x/attendance/s", r#"{"meetingId":1}"#)).is_none());
        assert!(extract_course(&body("POST", "https://a.b/x/attendance/s", r#"{"courseId":""}"#)).is_none());
    }

    #[test]
    fn missing_initiator_falls_back_to_request_origin() {
        let mut req = body("POST", "https://api.school.edu/v1/attendance/students", r#"{"courseId":"12"}"#);
        req.initiator = None;
        assert_eq!(extract_course(&req).unwrap().referrer_url, "https://api.school.edu");
    }

    #[test]
    fn token_from_headers_any_case() {
        let req = RequestHeaders {
            url: Url::parse("https://api.school.edu/v1/attendance/sessions").unwrap(),
            method: s!("POST"),
            headers: vec![
                HttpHeader::new("Content-Type", "application/json"),
                HttpHeader::new("AuthToken", "secret-token"),
            ],
        };
        let found = extract_token(&req).unwrap();
        assert_eq!(found.auth_token, "secret-token");
        assert_eq!(found.headers.len(), 2);
    }

    #[test]
    fn token_requires_value() {
        let req = RequestHeaders {
            url: Url::parse("https://api.school.edu/v1/attendance/sessions").unwrap(),
            method: s!("POST"),
            headers: vec![HttpHeader::new("authtoken", "")],
        };
        assert!(extract_token(&req).is_none());
    }
}
