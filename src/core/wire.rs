// src/core/wire.rs
//
// Shapes shared by capture and replay. The observed API has no contract, so
// values are read with JavaScript truthiness and ids stay opaque.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpHeader {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

impl HttpHeader {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self { name: name.into(), value: Some(value.into()) }
    }
}

/// `null`, `false`, `0` and `""` are falsy, like in the browser.
pub fn truthy(v: &Value) -> bool {
    match v {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Opaque course/meeting identifier as observed on the wire.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WireId(Value);

impl WireId {
    /// Accept a truthy scalar; objects and arrays are not ids.
    pub fn from_value(v: &Value) -> Option<Self> {
        match v {
            Value::String(_) | Value::Number(_) if truthy(v) => Some(Self(v.clone())),
            _ => None,
        }
    }

    /// Numeric text goes back out as a JSON number, anything else as a string.
    pub fn to_body_value(&self) -> Value {
        match &self.0 {
            Value::String(s) => match serde_json::from_str::<serde_json::Number>(s.trim()) {
                Ok(n) => Value::Number(n),
                Err(_) => self.0.clone(),
            },
            other => other.clone(),
        }
    }

    pub fn is_empty(&self) -> bool {
        !truthy(&self.0)
    }
}

impl fmt::Display for WireId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            Value::String(s) => f.write_str(s),
            other => write!(f, "{other}"),
        }
    }
}

/// Any JSON value as text: `null` → `""`, scalars by their JSON spelling.
/// For `#[serde(deserialize_with)]` on fields the API fills loosely.
pub fn loose_text<'de, D: Deserializer<'de>>(de: D) -> Result<String, D::Error> {
    Ok(match Option::<Value>::deserialize(de)? {
        None | Some(Value::Null) => s!(),
        Some(Value::String(s)) => s,
        Some(other) => other.to_string(),
    })
}

/// Optional flag read with truthiness; `null` stays unset.
pub fn loose_flag<'de, D: Deserializer<'de>>(de: D) -> Result<Option<bool>, D::Error> {
    Ok(Option::<Value>::deserialize(de)?
        .filter(|v| !v.is_null())
        .map(|v| truthy(&v)))
}

/// `null` in place of a list or object → its default.
pub fn null_as_default<'de, D, T>(de: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(de)?.unwrap_or_default())
}

impl From<&str> for WireId {
    fn from(s: &str) -> Self {
        Self(Value::String(s!(s)))
    }
}

impl From<u64> for WireId {
    fn from(n: u64) -> Self {
        Self(Value::from(n))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn truthiness() {
        assert!(!truthy(&json!(null)));
        assert!(!truthy(&json!(false)));
        assert!(!truthy(&json!(0)));
        assert!(!truthy(&json!("")));
        assert!(truthy(&json!("0")));
        assert!(truthy(&json!({})));
        assert!(truthy(&json!(1.5)));
    }

    #[test]
    fn ids_replay_numeric_text_as_numbers() {
        assert_eq!(WireId::from("4711").to_body_value(), json!(4711));
        assert_eq!(WireId::from("abc-1").to_body_value(), json!("abc-1"));
        assert_eq!(WireId::from(12u64).to_body_value(), json!(12));
    }

    #[derive(Debug, Deserialize)]
    struct Loose {
        #[serde(default, deserialize_with = "loose_text")]
        text: String,
        #[serde(default, deserialize_with = "loose_flag")]
        flag: Option<bool>,
        #[serde(default, deserialize_with = "null_as_default")]
        list: Vec<u8>,
    }

    #[test]
    fn loose_fields_accept_null_and_numbers() {
        let l: Loose = serde_json::from_value(json!({"text": null, "flag": null, "list": null})).unwrap();
        assert_eq!(l.text, "");
        assert_eq!(l.flag, None);
        assert!(l.list.is_empty());

        let l: Loose = serde_json::from_value(json!({"text": 1714550400, "flag": 1})).unwrap();
        assert_eq!(l.text, "1714550400");
        assert_eq!(l.flag, Some(true));

        let l: Loose = serde_json::from_value(json!({})).unwrap();
        assert_eq!(l.text, "");
        assert_eq!(l.flag, None);
    }

    #[test]
    fn ids_reject_falsy_and_compound() {
        assert!(WireId::from_value(&json!("")).is_none());
        assert!(WireId::from_value(&json!(0)).is_none());
        assert!(WireId::from_value(&json!({"id": 1})).is_none());
        assert_eq!(WireId::from_value(&json!(9)).unwrap().to_string(), "9");
    }
}
