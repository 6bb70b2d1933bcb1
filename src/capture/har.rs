// src/capture/har.rs
//
// HAR (HTTP Archive) replay. Browser dev tools export recorded traffic as
// HAR; each entry becomes a BeforeSend event followed by a BeforeSendHeaders
// event, in file order.

use std::{fs, io, path::{Path, PathBuf}};

use serde::Deserialize;
use url::Url;

use crate::core::HttpHeader;
use super::host::{RequestBody, RequestHeaders, TrafficEvent};

#[derive(Debug, thiserror::Error)]
pub enum HarError {
    #[error("read {path}: {source}")]
    Io { path: PathBuf, source: io::Error },

    #[error("invalid HAR: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Deserialize)]
pub struct Har {
    pub log: HarLog,
}

#[derive(Debug, Deserialize)]
pub struct HarLog {
    #[serde(default)]
    pub entries: Vec<HarEntry>,
}

#[derive(Debug, Deserialize)]
pub struct HarEntry {
    pub request: HarRequest,
    /// Chrome-only extension.
    #[serde(rename = "_initiator", default)]
    pub initiator: Option<HarInitiator>,
}

#[derive(Debug, Deserialize)]
pub struct HarInitiator {
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HarRequest {
    pub method: String,
    pub url: String,
    #[serde(default)]
    pub headers: Vec<HttpHeader>,
    #[serde(default)]
    pub post_data: Option<HarPostData>,
}

#[derive(Debug, Deserialize)]
pub struct HarPostData {
    #[serde(default)]
    pub text: Option<String>,
}

pub fn parse(text: &str) -> Result<Har, HarError> {
    Ok(serde_json::from_str(text)?)
}

pub fn load(path: &Path) -> Result<Har, HarError> {
    let text = fs::read_to_string(path).map_err(|source| HarError::Io { path: path.to_path_buf(), source })?;
    let har = parse(&text)?;
    logf!("HAR: {} entries from {}", har.log.entries.len(), path.display());
    Ok(har)
}

fn header<'a>(headers: &'a [HttpHeader], name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|h| h.name.eq_ignore_ascii_case(name))
        .and_then(|h| h.value.as_deref())
        .filter(|v| !v.is_empty() && *v != "null")
}

fn origin_of(url: &str) -> Option<String> {
    let u = Url::parse(url).ok()?;
    let o = u.origin();
    o.is_tuple().then(|| o.ascii_serialization())
}

impl HarEntry {
    /// Origin of the issuing page: `Origin` header, else the `Referer`'s
    /// origin, else Chrome's initiator URL.
    pub fn initiator_origin(&self) -> Option<String> {
        let hs = &self.request.headers;
        header(hs, "origin")
            .and_then(origin_of)
            .or_else(|| header(hs, "referer").and_then(origin_of))
            .or_else(|| self.initiator.as_ref()?.url.as_deref().and_then(origin_of))
    }

    /// Both phases for this entry. Unparseable URLs yield nothing.
    pub fn events(&self) -> Vec<TrafficEvent> {
        let url = match Url::parse(&self.request.url) {
            Ok(u) => u,
            Err(e) => {
                logd!("HAR: skipping entry with bad URL {:?}: {}", self.request.url, e);
                return Vec::new();
            }
        };
        let body = self
            .request
            .post_data
            .as_ref()
            .and_then(|p| p.text.as_ref())
            .map(|t| t.as_bytes().to_vec());

        vec![
            TrafficEvent::BeforeSend(RequestBody {
                url: url.clone(),
                method: self.request.method.clone(),
                body,
                initiator: self.initiator_origin(),
            }),
            TrafficEvent::BeforeSendHeaders(RequestHeaders {
                url,
                method: self.request.method.clone(),
                headers: self.request.headers.clone(),
            }),
        ]
    }
}

impl Har {
    pub fn events(&self) -> Vec<TrafficEvent> {
        self.log.entries.iter().flat_map(HarEntry::events).collect()
    }
}
