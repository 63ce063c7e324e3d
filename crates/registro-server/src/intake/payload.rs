use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PayloadError {
    #[error("malformed JSON body: {0}")]
    Json(#[from] serde_json::Error),

    #[error("JSON body must be an object")]
    NotAnObject,

    #[error("malformed form body: {0}")]
    Form(#[from] serde_urlencoded::de::Error),
}

/// A form submission as received, in submission order. JSON objects,
/// url-encoded and multipart forms all end up here; multi-select fields
/// become arrays.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Submission(Map<String, Value>);

impl Submission {
    pub fn from_json(body: &[u8]) -> Result<Self, PayloadError> {
        match serde_json::from_slice(body)? {
            Value::Object(map) => Ok(Self(map)),
            _ => Err(PayloadError::NotAnObject),
        }
    }

    /// Parses `application/x-www-form-urlencoded`.
    pub fn from_form(body: &[u8]) -> Result<Self, PayloadError> {
        let pairs: Vec<(String, String)> = serde_urlencoded::from_bytes(body)?;
        Ok(Self::from_pairs(pairs))
    }

    /// Builds a submission from form fields in arrival order. Repeated keys
    /// and keys ending in `[]` are collected into arrays under the bare key.
    pub fn from_pairs(pairs: impl IntoIterator<Item = (String, String)>) -> Self {
        let mut map = Map::new();

        for (key, value) in pairs {
            let (key, is_list) = match key.strip_suffix("[]") {
                Some(bare) => (bare.to_owned(), true),
                None => (key, false),
            };

            match map.get_mut(&key) {
                Some(Value::Array(items)) => items.push(Value::String(value)),
                Some(existing) => {
                    let first = existing.take();
                    *existing = Value::Array(vec![first, Value::String(value)]);
                }
                None if is_list => {
                    map.insert(key, Value::Array(vec![Value::String(value)]));
                }
                None => {
                    map.insert(key, Value::String(value));
                }
            }
        }

        Self(map)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Map<String, Value>> for Submission {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

/// Text shown for a submitted value, or `None` when the value carries
/// nothing (null, blank string, empty list).
pub fn display_value(value: &Value) -> Option<String> {
    let text = match value {
        Value::Null => return None,
        Value::String(s) => s.trim().to_owned(),
        Value::Number(n) => n.to_string(),
        Value::Bool(true) => "Sí".to_owned(),
        Value::Bool(false) => "No".to_owned(),
        Value::Array(items) => items
            .iter()
            .filter_map(display_value)
            .collect::<Vec<_>>()
            .join(", "),
        Value::Object(_) => value.to_string(),
    };

    (!text.is_empty()).then_some(text)
}
