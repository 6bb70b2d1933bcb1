// src/attendance/api.rs
//
// The three private endpoints, behind a trait so the aggregator can run
// against something other than the network.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use url::Url;

use crate::capture::Credentials;
use crate::config::{
    consts::{SESSIONS_ENDPOINT, SESSION_ENDPOINT, STUDENTS_ENDPOINT},
    options::FetchOptions,
};
use crate::core::{net, WireId};
use super::model::{Session, SessionInfo, Student};

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("network error on {endpoint}: {source}")]
    Network {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("HTTP {status} from {endpoint}")]
    Status { endpoint: String, status: u16 },

    #[error("could not decode {endpoint}: {message}")]
    Decode { endpoint: String, message: String },

    #[error("{endpoint} timed out after {secs}s")]
    Timeout { endpoint: String, secs: u64 },

    #[error("bad data URL {0:?}")]
    BadUrl(String),

    #[error("session fetch aborted: {0}")]
    Join(String),

    #[error("async runtime: {0}")]
    Runtime(String),
}

impl FetchError {
    pub fn endpoint(&self) -> Option<&str> {
        match self {
            FetchError::Network { endpoint, .. }
            | FetchError::Status { endpoint, .. }
            | FetchError::Decode { endpoint, .. }
            | FetchError::Timeout { endpoint, .. } => Some(endpoint),
            FetchError::BadUrl(_) | FetchError::Join(_) | FetchError::Runtime(_) => None,
        }
    }
}

#[async_trait]
pub trait AttendanceApi: Send + Sync {
    async fn sessions(&self, creds: &Credentials) -> Result<Vec<Session>, FetchError>;
    async fn students(&self, creds: &Credentials) -> Result<Vec<Student>, FetchError>;
    async fn session_info(&self, creds: &Credentials, meeting_id: &WireId) -> Result<SessionInfo, FetchError>;
}

/// `{data_url}/{endpoint}`, tolerating a trailing slash on the data URL.
pub fn endpoint_url(data_url: &str, endpoint: &str) -> Result<Url, FetchError> {
    let base = data_url.trim_end_matches('/');
    Url::parse(&format!("{base}/{endpoint}")).map_err(|_| FetchError::BadUrl(s!(data_url)))
}

pub fn decode<T: DeserializeOwned>(endpoint: &str, bytes: &[u8]) -> Result<T, FetchError> {
    serde_json::from_slice(bytes).map_err(|e| FetchError::Decode {
        endpoint: s!(endpoint),
        message: e.to_string(),
    })
}

/// reqwest-backed client. One instance per run is enough.
pub struct HttpApi {
    http: reqwest::Client,
}

impl HttpApi {
    pub fn new(opts: &FetchOptions) -> Result<Self, FetchError> {
        let http = net::build_client(opts).map_err(|source| FetchError::Network {
            endpoint: s!("client"),
            source,
        })?;
        Ok(Self { http })
    }

    /// Use a prepared client, e.g. one without system proxies.
    pub fn with_client(http: reqwest::Client) -> Self {
        Self { http }
    }

    async fn post<T: DeserializeOwned>(&self, creds: &Credentials, endpoint: &str, body: Value) -> Result<T, FetchError> {
        let url = endpoint_url(&creds.data_url, endpoint)?;
        let headers = net::with_referrer(net::replay_headers(&creds.headers), &creds.referrer_url, &url);
        let network = |source| FetchError::Network { endpoint: s!(endpoint), source };

        logd!("Fetch: POST {url} {body}");
        let resp = self
            .http
            .post(url)
            .headers(headers)
            .json(&body)
            .send()
            .await
            .map_err(network)?;

        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::Status { endpoint: s!(endpoint), status: status.as_u16() });
        }
        let bytes = resp.bytes().await.map_err(network)?;
        decode(endpoint, &bytes)
    }
}

#[async_trait]
impl AttendanceApi for HttpApi {
    async fn sessions(&self, creds: &Credentials) -> Result<Vec<Session>, FetchError> {
        self.post(creds, SESSIONS_ENDPOINT, json!({ "courseId": creds.course_id.to_body_value() })).await
    }

    async fn students(&self, creds: &Credentials) -> Result<Vec<Student>, FetchError> {
        self.post(creds, STUDENTS_ENDPOINT, json!({ "courseId": creds.course_id.to_body_value() })).await
    }

    async fn session_info(&self, creds: &Credentials, meeting_id: &WireId) -> Result<SessionInfo, FetchError> {
        self.post(creds, SESSION_ENDPOINT, json!({ "meetingId": meeting_id.to_body_value() })).await
    }
}
