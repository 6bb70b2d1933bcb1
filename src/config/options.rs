// src/config/options.rs
use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::consts::*;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppOptions {
    pub capture: CaptureOptions,
    pub fetch: FetchOptions,
    pub export: ExportOptions,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptureOptions {
    /// Path patterns appended to the origin key to scope the watchers.
    pub scope_suffixes: Vec<String>,
}

impl Default for CaptureOptions {
    fn default() -> Self {
        Self {
            scope_suffixes: SCOPE_SUFFIXES.iter().map(|s| s!(*s)).collect(),
        }
    }
}

/// Order of session rows in the rendered table.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RowOrder {
    /// As the per-session fetches finish.
    #[default]
    Completion,
    /// Same order as the session list returned by the API.
    Schedule,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchOptions {
    /// Per-request timeout in seconds. `0` waits forever.
    pub request_timeout_secs: u64,
    pub row_order: RowOrder,
    pub user_agent: String,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            request_timeout_secs: REQUEST_TIMEOUT_SECS,
            row_order: RowOrder::default(),
            user_agent: s!(USER_AGENT),
        }
    }
}

impl FetchOptions {
    pub fn request_timeout(&self) -> Option<Duration> {
        (self.request_timeout_secs > 0).then(|| Duration::from_secs(self.request_timeout_secs))
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportOptions {
    /// Also write the CSV here after a successful run.
    pub out_path: Option<PathBuf>,
    pub copy_to_clipboard: bool,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            out_path: None,
            copy_to_clipboard: true,
        }
    }
}

impl ExportOptions {
    /// Where an explicit export goes when the user has not picked a path.
    pub fn out_path_or_default(&self) -> PathBuf {
        self.out_path
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OUT_DIR).join(DEFAULT_FILE))
    }
}
