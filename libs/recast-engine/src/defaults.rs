use std::collections::HashMap;
use std::sync::Arc;

use recast_api::{DecodeError, PrimitiveKind, Record, RecordSchema, Schema, Value};
use serde_json::Value as Json;

/// Materialize a field default written in schema-document (JSON) form.
///
/// Follows the Avro rules: bytes and fixed defaults are strings whose code
/// points are the byte values, record defaults are objects (missing members
/// fall back to the member field's own default), a union default belongs to
/// the union's first variant.
pub fn default_value(json: &Json, schema: &Schema, field: &str) -> Result<Value, DecodeError> {
    let invalid = |detail: String| DecodeError::InvalidDefault {
        field: field.to_string(),
        detail,
    };
    let mismatch = || invalid(format!("{json} is not a valid {schema}"));

    match schema {
        Schema::Null => json.is_null().then_some(Value::Null).ok_or_else(mismatch),
        Schema::Primitive(kind) => match kind {
            PrimitiveKind::Boolean => json.as_bool().map(Value::Boolean).ok_or_else(mismatch),
            PrimitiveKind::Int32 => json
                .as_i64()
                .and_then(|i| i32::try_from(i).ok())
                .map(Value::Int)
                .ok_or_else(mismatch),
            PrimitiveKind::Int64 => json.as_i64().map(Value::Long).ok_or_else(mismatch),
            PrimitiveKind::Float32 => json
                .as_f64()
                .map(|f| Value::Float(f as f32))
                .ok_or_else(mismatch),
            PrimitiveKind::Float64 => json.as_f64().map(Value::Double).ok_or_else(mismatch),
            PrimitiveKind::String => json
                .as_str()
                .map(|s| Value::String(s.to_string()))
                .ok_or_else(mismatch),
            PrimitiveKind::Bytes => {
                let s = json.as_str().ok_or_else(mismatch)?;
                latin1_bytes(s).map(Value::Bytes).ok_or_else(mismatch)
            }
        },
        Schema::Fixed(f) => {
            let s = json.as_str().ok_or_else(mismatch)?;
            let bytes = latin1_bytes(s).ok_or_else(mismatch)?;
            if bytes.len() != f.size {
                return Err(invalid(format!(
                    "fixed default has {} bytes, expected {}",
                    bytes.len(),
                    f.size
                )));
            }
            Ok(Value::Fixed(bytes))
        }
        Schema::Enum(e) => {
            let s = json.as_str().ok_or_else(mismatch)?;
            let idx = e.index_of(s).ok_or_else(mismatch)?;
            Ok(Value::Enum(idx, s.to_string()))
        }
        Schema::Array(items) => {
            let arr = json.as_array().ok_or_else(mismatch)?;
            arr.iter()
                .map(|v| default_value(v, items, field))
                .collect::<Result<Vec<_>, _>>()
                .map(Value::Array)
        }
        Schema::Map(values) => {
            let obj = json.as_object().ok_or_else(mismatch)?;
            obj.iter()
                .map(|(k, v)| Ok((k.clone(), default_value(v, values, field)?)))
                .collect::<Result<HashMap<_, _>, DecodeError>>()
                .map(Value::Map)
        }
        Schema::Record(r) => default_record(json, r, field).map(Value::Record),
        Schema::Union(u) => match u.variants.first() {
            Some(first) => default_value(json, first, field).map_err(|_| mismatch()),
            None => Err(mismatch()),
        },
    }
}

fn default_record(json: &Json, schema: &Arc<RecordSchema>, field: &str) -> Result<Record, DecodeError> {
    let obj = json.as_object().ok_or_else(|| DecodeError::InvalidDefault {
        field: field.to_string(),
        detail: format!("{json} is not a record {}", schema.name),
    })?;
    let mut record = Record::new(schema.clone());
    for f in &schema.fields {
        let member = obj.get(&f.name).or(f.default.as_ref()).ok_or_else(|| {
            DecodeError::InvalidDefault {
                field: field.to_string(),
                detail: format!("record default lacks member '{}'", f.name),
            }
        })?;
        let value = default_value(member, &f.schema, field)?;
        record.put(&f.name, f.position, value)?;
    }
    Ok(record)
}

/// Code points 0..=255 as raw bytes.
fn latin1_bytes(s: &str) -> Option<Vec<u8>> {
    s.chars().map(|c| u8::try_from(u32::from(c)).ok()).collect()
}
