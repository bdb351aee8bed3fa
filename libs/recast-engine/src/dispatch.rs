//! Per-type conversion rules for untyped input.
//!
//! The table is a closed `match` over [`SchemaKind`]; every rule is a plain
//! function, so the table is built at compile time and shared freely across
//! threads.

use std::collections::HashMap;

use recast_api::{ConversionError, Schema, SchemaKind, Value};

use crate::text;

/// Dynamically typed input: a decoded scalar, a text segment, or a split
/// substructure (list / string-keyed mapping).
pub type RawValue = serde_json::Value;

/// Result of a single rule.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Accepted(Value),
    /// The raw value has the wrong shape for this rule.
    Rejected,
}

/// A conversion rule: `(raw value, field name, schema) -> outcome`.
pub type Handler = fn(&RawValue, &str, &Schema) -> Result<Outcome, ConversionError>;

/// Rule for a schema kind. Unions and the bare null type have none.
pub fn handler_for(kind: SchemaKind) -> Option<Handler> {
    let handler: Handler = match kind {
        SchemaKind::String => convert_string,
        SchemaKind::Boolean => convert_boolean,
        SchemaKind::Int32 => convert_int,
        SchemaKind::Int64 => convert_long,
        SchemaKind::Float32 => convert_float,
        SchemaKind::Float64 => convert_double,
        SchemaKind::Bytes => convert_bytes,
        SchemaKind::Fixed => convert_fixed,
        SchemaKind::Enum => convert_enum,
        SchemaKind::Array => convert_array,
        SchemaKind::Map => convert_map,
        SchemaKind::Record => convert_record,
        SchemaKind::Null | SchemaKind::Union => return None,
    };
    Some(handler)
}

/// Coerce `raw` into a value of `schema` for the field `name`.
///
/// Null handling comes first: a `{null, X}` union maps null to
/// [`Value::Null`] and everything else to X's rule; any other schema rejects
/// null outright.
pub fn convert(raw: &RawValue, name: &str, schema: &Schema) -> Result<Value, ConversionError> {
    let target = match schema.nullable_variant() {
        Some(_) if raw.is_null() => return Ok(Value::Null),
        Some(inner) => inner,
        None if raw.is_null() => {
            return Err(ConversionError::NullValue {
                field: name.to_string(),
                schema: schema.clone(),
            });
        }
        None => schema,
    };

    let handler = handler_for(target.kind()).ok_or_else(|| ConversionError::UnhandledType {
        field: name.to_string(),
        schema: target.clone(),
    })?;

    match handler(raw, name, target)? {
        Outcome::Accepted(value) => Ok(value),
        Outcome::Rejected => Err(ConversionError::Rejected {
            value: raw.clone(),
            field: name.to_string(),
            schema: target.clone(),
        }),
    }
}

/// Canonical string form: strings as-is, everything else as JSON text.
fn string_form(raw: &RawValue) -> String {
    match raw {
        RawValue::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn convert_boolean(raw: &RawValue, _: &str, _: &Schema) -> Result<Outcome, ConversionError> {
    Ok(match raw {
        RawValue::Bool(b) => Outcome::Accepted(Value::Boolean(*b)),
        _ => Outcome::Rejected,
    })
}

/// How a numeric rule treats the text around a number string.
#[derive(Clone, Copy)]
enum Padding {
    /// Surrounding whitespace is an error (integers).
    Strict,
    /// Surrounding whitespace is ignored (floating point).
    Trim,
}

/// Numbers narrow or widen like a primitive cast; strings must parse.
fn convert_numeric<T: std::str::FromStr>(
    raw: &RawValue,
    name: &str,
    schema: &Schema,
    padding: Padding,
    from_number: impl Fn(&serde_json::Number) -> T,
    wrap: impl Fn(T) -> Value,
) -> Result<Outcome, ConversionError> {
    match raw {
        RawValue::Number(n) => Ok(Outcome::Accepted(wrap(from_number(n)))),
        RawValue::String(s) => match padding {
            Padding::Strict => s.as_str(),
            Padding::Trim => s.trim(),
        }
        .parse::<T>()
        .map(|v| Outcome::Accepted(wrap(v)))
        .map_err(|_| {
            ConversionError::InvalidNumber {
                value: s.clone(),
                field: name.to_string(),
                schema: schema.clone(),
            }
        }),
        _ => Ok(Outcome::Rejected),
    }
}

fn number_as_i64(n: &serde_json::Number) -> i64 {
    match (n.as_i64(), n.as_u64(), n.as_f64()) {
        (Some(i), _, _) => i,
        (None, Some(u), _) => u as i64,
        (None, None, Some(f)) => f as i64,
        (None, None, None) => 0,
    }
}

fn number_as_f64(n: &serde_json::Number) -> f64 {
    match (n.as_f64(), n.as_i64()) {
        (Some(f), _) => f,
        (None, Some(i)) => i as f64,
        (None, None) => 0.0,
    }
}

fn convert_int(raw: &RawValue, name: &str, schema: &Schema) -> Result<Outcome, ConversionError> {
    convert_numeric(raw, name, schema, Padding::Strict, |n| number_as_i64(n) as i32, Value::Int)
}

fn convert_long(raw: &RawValue, name: &str, schema: &Schema) -> Result<Outcome, ConversionError> {
    convert_numeric(raw, name, schema, Padding::Strict, number_as_i64, Value::Long)
}

fn convert_float(raw: &RawValue, name: &str, schema: &Schema) -> Result<Outcome, ConversionError> {
    convert_numeric(raw, name, schema, Padding::Trim, |n| number_as_f64(n) as f32, Value::Float)
}

fn convert_double(raw: &RawValue, name: &str, schema: &Schema) -> Result<Outcome, ConversionError> {
    convert_numeric(raw, name, schema, Padding::Trim, number_as_f64, Value::Double)
}

fn convert_string(raw: &RawValue, _: &str, _: &Schema) -> Result<Outcome, ConversionError> {
    Ok(Outcome::Accepted(Value::String(string_form(raw))))
}

fn convert_bytes(raw: &RawValue, _: &str, _: &Schema) -> Result<Outcome, ConversionError> {
    Ok(Outcome::Accepted(Value::Bytes(string_form(raw).into_bytes())))
}

/// Truncate or zero-pad on the right to the declared size.
fn convert_fixed(raw: &RawValue, _: &str, schema: &Schema) -> Result<Outcome, ConversionError> {
    let Schema::Fixed(f) = schema else {
        return Ok(Outcome::Rejected);
    };
    let src = string_form(raw).into_bytes();
    let mut dst = vec![0u8; f.size];
    let n = f.size.min(src.len());
    dst[..n].copy_from_slice(&src[..n]);
    Ok(Outcome::Accepted(Value::Fixed(dst)))
}

fn convert_enum(raw: &RawValue, name: &str, schema: &Schema) -> Result<Outcome, ConversionError> {
    let Schema::Enum(e) = schema else {
        return Ok(Outcome::Rejected);
    };
    let symbol = string_form(raw);
    match e.index_of(&symbol) {
        Some(idx) => Ok(Outcome::Accepted(Value::Enum(idx, symbol))),
        None => Err(ConversionError::UnknownSymbol {
            symbol,
            field: name.to_string(),
            schema: schema.clone(),
        }),
    }
}

fn convert_array(raw: &RawValue, name: &str, schema: &Schema) -> Result<Outcome, ConversionError> {
    let (Schema::Array(items), RawValue::Array(values)) = (schema, raw) else {
        return Ok(Outcome::Rejected);
    };
    let out = values
        .iter()
        .map(|v| convert(v, name, items))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Outcome::Accepted(Value::Array(out)))
}

fn convert_map(raw: &RawValue, name: &str, schema: &Schema) -> Result<Outcome, ConversionError> {
    let (Schema::Map(values), RawValue::Object(entries)) = (schema, raw) else {
        return Ok(Outcome::Rejected);
    };
    let out = entries
        .iter()
        .map(|(k, v)| Ok((k.clone(), convert(v, name, values)?)))
        .collect::<Result<HashMap<_, _>, ConversionError>>()?;
    Ok(Outcome::Accepted(Value::Map(out)))
}

/// Nested records arrive flattened: the string form is a full delimited line.
fn convert_record(raw: &RawValue, _: &str, schema: &Schema) -> Result<Outcome, ConversionError> {
    let Schema::Record(r) = schema else {
        return Ok(Outcome::Rejected);
    };
    let line = string_form(raw);
    let record = text::convert_line(Some(line.as_str()), r)?;
    Ok(Outcome::Accepted(Value::Record(record)))
}
