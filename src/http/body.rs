//! Request body decoding.
//!
//! # Responsibilities
//! - Decode raw body text into a `Value` tree based on the declared content type
//! - Support `application/json` and `application/x-www-form-urlencoded`
//! - Reject every other content type
//!
//! # Design Decisions
//! - Empty or whitespace-only bodies decode to an empty map regardless of content type
//! - JSON string leaves are HTML-encoded while decoding (output sanitization happens here)
//! - Form values are percent-decoded only; `+` is left as-is
//! - No size limits and no recovery from malformed JSON

use std::collections::BTreeMap;

use serde::Serialize;

/// A decoded body: string keys to values.
pub type BodyMap = BTreeMap<String, Value>;

pub const APPLICATION_JSON: &str = "application/json";
pub const APPLICATION_FORM: &str = "application/x-www-form-urlencoded";

/// A dynamically typed value decoded from a request body.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    String(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    Null,
    List(Vec<Value>),
    Map(BTreeMap<String, Value>),
}

impl Value {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Integers widen to `f64`.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            Value::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Look up a key when this value is a map.
    pub fn get(&self, key: &str) -> Option<&Value> {
        match self {
            Value::Map(map) => map.get(key),
            _ => None,
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

/// Error type for body decoding.
#[derive(Debug, thiserror::Error)]
pub enum BodyError {
    /// The declared content type has no decoder.
    #[error("unsupported content type: {0:?}")]
    UnsupportedContentType(String),

    /// The body was declared as JSON but failed to decode.
    #[error("malformed JSON body: {0}")]
    Json(#[from] serde_json::Error),

    /// Percent-decoding or UTF-8 validation failed.
    #[error("invalid body encoding: {0}")]
    Encoding(String),
}

/// Decode a raw request body according to its content type.
///
/// Media type parameters such as `; charset=utf-8` are ignored and the
/// comparison is case-insensitive.
pub fn parse_body(body: &str, content_type: Option<&str>) -> Result<BodyMap, BodyError> {
    if body.trim().is_empty() {
        return Ok(BodyMap::new());
    }

    let media_type = content_type
        .and_then(|ct| ct.split(';').next())
        .map(|ct| ct.trim().to_ascii_lowercase())
        .unwrap_or_default();

    match media_type.as_str() {
        APPLICATION_JSON => parse_json(body),
        APPLICATION_FORM => parse_form(body),
        _ => Err(BodyError::UnsupportedContentType(
            content_type.unwrap_or_default().to_string(),
        )),
    }
}

fn parse_json(body: &str) -> Result<BodyMap, BodyError> {
    let object: serde_json::Map<String, serde_json::Value> = serde_json::from_str(body)?;
    Ok(object
        .into_iter()
        .map(|(key, value)| (key, convert_json(value)))
        .collect())
}

fn convert_json(value: serde_json::Value) -> Value {
    match value {
        serde_json::Value::String(s) => Value::String(html_encode(&s)),
        serde_json::Value::Number(n) => match n.as_i64() {
            Some(i) => Value::Int(i),
            None => n.as_f64().map(Value::Float).unwrap_or(Value::Null),
        },
        serde_json::Value::Bool(b) => Value::Bool(b),
        serde_json::Value::Null => Value::Null,
        serde_json::Value::Array(items) => Value::List(items.into_iter().map(convert_json).collect()),
        serde_json::Value::Object(map) => Value::Map(
            map.into_iter()
                .map(|(key, value)| (key, convert_json(value)))
                .collect(),
        ),
    }
}

fn parse_form(body: &str) -> Result<BodyMap, BodyError> {
    let mut map = BodyMap::new();

    for pair in body.split('&').filter(|pair| !pair.is_empty()) {
        // Only the first '=' separates key from value
        let (key, value) = match pair.split_once('=') {
            Some((key, value)) => (key, Some(value)),
            None => (pair, None),
        };

        let key = percent_decode(key)?;
        let value = match value {
            Some(v) => Value::String(percent_decode(v)?),
            None => Value::Null,
        };
        map.insert(key, value);
    }

    Ok(map)
}

fn percent_decode(raw: &str) -> Result<String, BodyError> {
    urlencoding::decode(raw)
        .map(|decoded| decoded.into_owned())
        .map_err(|e| BodyError::Encoding(e.to_string()))
}

/// HTML-encode text: markup-significant characters become named entities
/// and the Latin-1 supplement becomes numeric entities.
pub fn html_encode(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            '\u{a0}'..='\u{ff}' => {
                out.push_str("&#");
                out.push_str(&(c as u32).to_string());
                out.push(';');
            }
            _ => out.push(c),
        }
    }
    out
}
