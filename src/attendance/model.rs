// src/attendance/model.rs
//
// Payload shapes of the private API. Only the fields we read are declared;
// everything else in the JSON is ignored.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::core::{
    truthy,
    wire::{loose_flag, loose_text, null_as_default},
    WireId,
};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Meeting {
    pub id: WireId,
    #[serde(default, deserialize_with = "loose_text")]
    pub start_time: String,
    #[serde(default, deserialize_with = "loose_text")]
    pub end_time: String,
}

impl Meeting {
    /// `None` when the API sent something we cannot read as a time.
    pub fn end_instant(&self) -> Option<DateTime<Utc>> {
        parse_instant(&self.end_time)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub meeting: Meeting,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    #[serde(default, deserialize_with = "loose_text")]
    pub first_name: String,
    #[serde(default, deserialize_with = "loose_text")]
    pub last_name: String,
}

impl Student {
    pub fn new(first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        Self { first_name: first_name.into(), last_name: last_name.into() }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    Present,
    Absent,
    Excused,
    /// Neither presence nor absence was set.
    Unknown,
}

impl Outcome {
    pub fn token(self) -> &'static str {
        match self {
            Outcome::Present => "Present",
            Outcome::Absent => "Absent",
            Outcome::Excused => "Excused",
            Outcome::Unknown => "Unknown",
        }
    }
}

/// One student's entry in a session. Presence wins if both are set.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct StudentOutcome {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub presence: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub absence: Option<Value>,
}

impl StudentOutcome {
    pub fn present() -> Self {
        Self { presence: Some(Value::Bool(true)), absence: None }
    }

    pub fn absent(excused: bool) -> Self {
        Self { presence: None, absence: Some(serde_json::json!({ "excused": excused })) }
    }

    pub fn outcome(&self) -> Outcome {
        if self.presence.as_ref().is_some_and(truthy) {
            return Outcome::Present;
        }
        match self.absence.as_ref().filter(|a| truthy(a)) {
            Some(a) if a.get("excused").is_some_and(truthy) => Outcome::Excused,
            Some(_) => Outcome::Absent,
            None => Outcome::Unknown,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionInfo {
    #[serde(default, deserialize_with = "loose_text")]
    pub start_time: String,
    #[serde(default, deserialize_with = "loose_text")]
    pub name: String,
    #[serde(default, deserialize_with = "loose_flag")]
    pub required: Option<bool>,
    /// Positionally aligned with the roster; there is no student key.
    #[serde(default, deserialize_with = "null_as_default")]
    pub students: Vec<StudentOutcome>,
}

/// RFC 3339, or a zone-less date-time / bare date taken as UTC.
pub fn parse_instant(text: &str) -> Option<DateTime<Utc>> {
    let t = text.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(t) {
        return Some(dt.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(t, fmt).ok())
        .or_else(|| NaiveDate::parse_from_str(t, "%Y-%m-%d").ok()?.and_hms_opt(0, 0, 0))
        .map(|n| n.and_utc())
}
