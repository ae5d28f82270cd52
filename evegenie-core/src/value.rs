//! Closed representation of the example values the inferrer accepts.
//!
//! JSON input is decoded into [`ExampleValue`] once, at the input boundary, so the
//! classifier and builders only ever match over the seven accepted kinds.

use indexmap::IndexMap;
use serde_json::{Number, Value};

use crate::error::{GenieError, Result};
use crate::schema::core::DEFAULT_MAX_DEPTH;

#[derive(Debug, Clone, PartialEq)]
pub enum ExampleValue {
    Null,
    Boolean(bool),
    Integer(i64),
    Float(f64),
    String(String),
    Sequence(Vec<ExampleValue>),
    Mapping(IndexMap<String, ExampleValue>),
}

impl ExampleValue {
    /// Name of the runtime kind, used in debug output and error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            ExampleValue::Null => "null",
            ExampleValue::Boolean(_) => "boolean",
            ExampleValue::Integer(_) => "integer",
            ExampleValue::Float(_) => "float",
            ExampleValue::String(_) => "string",
            ExampleValue::Sequence(_) => "sequence",
            ExampleValue::Mapping(_) => "mapping",
        }
    }

    pub fn as_mapping(&self) -> Option<&IndexMap<String, ExampleValue>> {
        match self {
            ExampleValue::Mapping(fields) => Some(fields),
            _ => None,
        }
    }

    /// Decode a JSON value, rejecting anything outside the accepted alphabet.
    pub fn from_json(value: &Value) -> Result<Self> {
        Self::from_json_with_limit(value, DEFAULT_MAX_DEPTH)
    }

    pub fn from_json_with_limit(value: &Value, max_depth: usize) -> Result<Self> {
        decode_at(value, 0, max_depth)
    }
}

/// Decode `value` found `depth` levels below the endpoint document.
pub(crate) fn decode_at(value: &Value, depth: usize, max_depth: usize) -> Result<ExampleValue> {
    if depth > max_depth {
        return Err(GenieError::MaxDepthExceeded {
            depth,
            max: max_depth,
        });
    }

    let decoded = match value {
        Value::Null => ExampleValue::Null,
        Value::Bool(b) => ExampleValue::Boolean(*b),
        Value::Number(n) => decode_number(n)?,
        Value::String(s) => ExampleValue::String(s.clone()),
        Value::Array(items) => ExampleValue::Sequence(
            items
                .iter()
                .map(|item| decode_at(item, depth + 1, max_depth))
                .collect::<Result<Vec<_>>>()?,
        ),
        Value::Object(fields) => ExampleValue::Mapping(
            fields
                .iter()
                .map(|(key, item)| Ok((key.clone(), decode_at(item, depth + 1, max_depth)?)))
                .collect::<Result<IndexMap<_, _>>>()?,
        ),
    };
    Ok(decoded)
}

fn decode_number(n: &Number) -> Result<ExampleValue> {
    if let Some(i) = n.as_i64() {
        Ok(ExampleValue::Integer(i))
    } else if n.is_u64() {
        // Schema integers are signed 64-bit; wider integers are a distinct kind.
        Err(GenieError::TypeClassification(format!(
            "unsigned integer {} outside the signed 64-bit range",
            n
        )))
    } else if let Some(f) = n.as_f64() {
        Ok(ExampleValue::Float(f))
    } else {
        Err(GenieError::TypeClassification(format!("number {}", n)))
    }
}

impl TryFrom<&Value> for ExampleValue {
    type Error = GenieError;

    fn try_from(value: &Value) -> Result<Self> {
        ExampleValue::from_json(value)
    }
}

impl From<bool> for ExampleValue {
    fn from(b: bool) -> Self {
        ExampleValue::Boolean(b)
    }
}

impl From<i64> for ExampleValue {
    fn from(i: i64) -> Self {
        ExampleValue::Integer(i)
    }
}

impl From<f64> for ExampleValue {
    fn from(f: f64) -> Self {
        ExampleValue::Float(f)
    }
}

impl From<&str> for ExampleValue {
    fn from(s: &str) -> Self {
        ExampleValue::String(s.to_string())
    }
}

impl From<String> for ExampleValue {
    fn from(s: String) -> Self {
        ExampleValue::String(s)
    }
}

impl<T: Into<ExampleValue>> From<Vec<T>> for ExampleValue {
    fn from(items: Vec<T>) -> Self {
        ExampleValue::Sequence(items.into_iter().map(Into::into).collect())
    }
}

impl From<IndexMap<String, ExampleValue>> for ExampleValue {
    fn from(fields: IndexMap<String, ExampleValue>) -> Self {
        ExampleValue::Mapping(fields)
    }
}

impl<T: Into<ExampleValue>> From<Option<T>> for ExampleValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(ExampleValue::Null, Into::into)
    }
}
