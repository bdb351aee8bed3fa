use std::collections::HashMap;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;

use crate::record::Record;

/// Canonical, schema-typed value.
///
/// Produced by both pipelines; the variant always matches the kind of the
/// schema it was materialized against (a nullable union yields either
/// `Null` or the non-null variant's value).
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Boolean(bool),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    Bytes(Vec<u8>),
    String(String),
    Fixed(Vec<u8>),
    /// `(index, symbol)` within the reader enum.
    Enum(usize, String),
    Array(Vec<Value>),
    Map(HashMap<String, Value>),
    Record(Record),
}

impl Value {
    pub fn as_record(&self) -> Option<&Record> {
        match self {
            Value::Record(r) => Some(r),
            _ => None,
        }
    }

    /// JSON rendering for display and line-oriented output.
    ///
    /// Bytes and fixed blocks are base64, enums are their symbol.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Value::Null => serde_json::Value::Null,
            Value::Boolean(b) => serde_json::Value::Bool(*b),
            Value::Int(i) => serde_json::json!(i),
            Value::Long(l) => serde_json::json!(l),
            Value::Float(f) => serde_json::json!(f),
            Value::Double(d) => serde_json::json!(d),
            Value::Bytes(b) | Value::Fixed(b) => serde_json::Value::String(STANDARD.encode(b)),
            Value::String(s) | Value::Enum(_, s) => serde_json::Value::String(s.clone()),
            Value::Array(items) => {
                serde_json::Value::Array(items.iter().map(Value::to_json).collect())
            }
            Value::Map(entries) => serde_json::Value::Object(
                entries
                    .iter()
                    .map(|(k, v)| (k.clone(), v.to_json()))
                    .collect(),
            ),
            Value::Record(r) => r.to_json(),
        }
    }
}

impl From<Record> for Value {
    fn from(r: Record) -> Self {
        Value::Record(r)
    }
}
