// src/core/net.rs
//
// Replay transport. Captured headers are sent back the way a page script
// could send them: forbidden names dropped, no cookie jar, and the referrer
// trimmed per `strict-origin-when-cross-origin`.

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, REFERER};
use url::Url;

use crate::config::options::FetchOptions;
use super::wire::HttpHeader;

/// Names a page script may not set (Fetch standard "forbidden request-header").
const FORBIDDEN: &[&str] = &[
    "accept-charset",
    "accept-encoding",
    "access-control-request-headers",
    "access-control-request-method",
    "connection",
    "content-length",
    "cookie",
    "cookie2",
    "date",
    "dnt",
    "expect",
    "host",
    "keep-alive",
    "origin",
    "referer",
    "set-cookie",
    "te",
    "trailer",
    "transfer-encoding",
    "upgrade",
    "user-agent",
    "via",
];

pub fn is_forbidden_header(name: &str) -> bool {
    let n = name.trim().to_ascii_lowercase();
    n.starts_with("sec-") || n.starts_with("proxy-") || FORBIDDEN.contains(&n.as_str())
}

/// Captured headers → replayable map. Valueless, forbidden and malformed
/// entries are skipped.
pub fn replay_headers(captured: &[HttpHeader]) -> HeaderMap {
    let mut map = HeaderMap::with_capacity(captured.len());
    for h in captured {
        let Some(value) = h.value.as_deref() else { continue };
        if is_forbidden_header(&h.name) {
            continue;
        }
        match (HeaderName::from_bytes(h.name.trim().as_bytes()), HeaderValue::from_str(value)) {
            (Ok(name), Ok(val)) => {
                map.append(name, val);
            }
            _ => logd!("Net: skipping unreplayable header {:?}", h.name),
        }
    }
    map
}

/// `Referer` for a request to `target` issued from `referrer`.
/// Same origin → full URL; cross origin → origin only; https → http → none.
pub fn referrer_for(referrer: &str, target: &Url) -> Option<String> {
    let mut r = Url::parse(referrer).ok()?;
    if !matches!(r.scheme(), "http" | "https") {
        return None;
    }
    if r.scheme() == "https" && target.scheme() == "http" {
        return None;
    }
    r.set_fragment(None);
    let _ = r.set_username("");
    let _ = r.set_password(None);

    if r.origin() == target.origin() {
        Some(r.into())
    } else {
        Some(join!(&r.origin().ascii_serialization(), "/"))
    }
}

pub fn with_referrer(mut headers: HeaderMap, referrer: &str, target: &Url) -> HeaderMap {
    if let Some(value) = referrer_for(referrer, target).and_then(|r| HeaderValue::from_str(&r).ok()) {
        headers.insert(REFERER, value);
    }
    headers
}

/// Client without a cookie store; only the explicit headers authenticate.
/// Timeouts are enforced by the caller per request, not here.
pub fn build_client(opts: &FetchOptions) -> reqwest::Result<reqwest::Client> {
    reqwest::Client::builder()
        .user_agent(opts.user_agent.as_str())
        .build()
}
