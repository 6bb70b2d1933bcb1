// src/capture/store.rs
//
// Origin key → captured request material. Lives as long as the process;
// nothing here touches disk.

use std::collections::HashMap;

use crate::core::{HttpHeader, OriginKey, WireId};

#[derive(Clone, Debug, Default, PartialEq)]
pub struct CredentialRecord {
    pub course_id: Option<WireId>,
    pub auth_token: Option<String>,
    pub data_url: Option<String>,
    pub referrer_url: Option<String>,
    pub headers: Option<Vec<HttpHeader>>,
}

impl CredentialRecord {
    /// Names of the fields still missing or empty.
    pub fn missing(&self) -> Vec<&'static str> {
        let mut out = Vec::new();
        if self.course_id.as_ref().is_none_or(WireId::is_empty) { out.push("courseId"); }
        if self.auth_token.as_deref().is_none_or(str::is_empty) { out.push("authToken"); }
        if self.data_url.as_deref().is_none_or(str::is_empty) { out.push("dataUrl"); }
        if self.referrer_url.as_deref().is_none_or(str::is_empty) { out.push("referrerUrl"); }
        if self.headers.as_ref().is_none_or(Vec::is_empty) { out.push("headers"); }
        out
    }

    pub fn is_complete(&self) -> bool {
        self.missing().is_empty()
    }

    /// Course-side fields. Write-once: returns false (and changes nothing)
    /// if a course id is already recorded.
    pub fn set_course(&mut self, course_id: WireId, data_url: String, referrer_url: String) -> bool {
        if self.course_id.is_some() {
            return false;
        }
        self.course_id = Some(course_id);
        self.data_url = Some(data_url);
        self.referrer_url = Some(referrer_url);
        true
    }

    /// Token-side fields. Write-once, like `set_course`.
    pub fn set_token(&mut self, auth_token: String, headers: Vec<HttpHeader>) -> bool {
        if self.auth_token.is_some() {
            return false;
        }
        self.auth_token = Some(auth_token);
        self.headers = Some(headers);
        true
    }

    /// Owned snapshot for the aggregator. `None` unless every field is set.
    pub fn credentials(&self, origin: &OriginKey) -> Option<Credentials> {
        if !self.is_complete() {
            return None;
        }
        Some(Credentials {
            origin: origin.clone(),
            course_id: self.course_id.clone()?,
            auth_token: self.auth_token.clone()?,
            data_url: self.data_url.clone()?,
            referrer_url: self.referrer_url.clone()?,
            headers: self.headers.clone()?,
        })
    }
}

/// Everything needed to replay an authenticated call. Only ever built from a
/// complete record.
#[derive(Clone, Debug, PartialEq)]
pub struct Credentials {
    pub origin: OriginKey,
    pub course_id: WireId,
    pub auth_token: String,
    pub data_url: String,
    pub referrer_url: String,
    pub headers: Vec<HttpHeader>,
}

#[derive(Debug, Default)]
pub struct CredentialStore {
    by_origin: HashMap<OriginKey, CredentialRecord>,
}

impl CredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, origin: &OriginKey) -> Option<&CredentialRecord> {
        self.by_origin.get(origin)
    }

    /// Record for `origin`, created empty on first use.
    pub fn entry(&mut self, origin: &OriginKey) -> &mut CredentialRecord {
        self.by_origin.entry(origin.clone()).or_default()
    }

    pub fn credentials(&self, origin: &OriginKey) -> Option<Credentials> {
        self.get(origin).and_then(|r| r.credentials(origin))
    }

    pub fn len(&self) -> usize {
        self.by_origin.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_origin.is_empty()
    }
}
