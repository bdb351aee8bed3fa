use std::collections::HashMap;
use std::sync::Arc;

use recast_api::{
    ByteCursor, DecodeError, PrimitiveKind, Record, RecordSchema, Schema, SchemaError, UnionSchema,
    Value,
};

use crate::defaults::default_value;
use crate::resolve::{FieldSource, read_field_order};

/// Decodes records written under one schema into another, compatible one.
///
/// Reading is lenient about the writer's tail: when the byte cursor runs out
/// in the middle of a field, that field keeps its seed and the remaining
/// fields are still attempted. Any other decode error aborts the record.
#[derive(Debug, Clone)]
pub struct DatumReader {
    writer: Arc<RecordSchema>,
    reader: Arc<RecordSchema>,
}

impl DatumReader {
    /// Bind a writer and a reader schema. Both must be records.
    pub fn new(writer: &Schema, reader: &Schema) -> Result<Self, SchemaError> {
        let as_record = |s: &Schema| {
            s.as_record()
                .cloned()
                .ok_or_else(|| SchemaError::Unsupported(format!("expected a record schema, got {s}")))
        };
        Ok(Self {
            writer: as_record(writer)?,
            reader: as_record(reader)?,
        })
    }

    /// Writer and reader are the same schema.
    pub fn for_schema(schema: &Schema) -> Result<Self, SchemaError> {
        Self::new(schema, schema)
    }

    pub fn writer(&self) -> &Arc<RecordSchema> {
        &self.writer
    }

    pub fn reader(&self) -> &Arc<RecordSchema> {
        &self.reader
    }

    /// Decode one record, seeding unset fields from `old` when given.
    pub fn read<C>(&self, old: Option<&Record>, cursor: &mut C) -> Result<Record, DecodeError>
    where
        C: ByteCursor + ?Sized,
    {
        read_record(old, &self.writer, &self.reader, cursor)
    }
}

/// Decode one record of shape `reader` from bytes encoded with `writer`.
pub fn read_record<C>(
    old: Option<&Record>,
    writer: &RecordSchema,
    reader: &Arc<RecordSchema>,
    cursor: &mut C,
) -> Result<Record, DecodeError>
where
    C: ByteCursor + ?Sized,
{
    let mut record = match old {
        Some(old) => Record::seeded(reader.clone(), old),
        None => Record::new(reader.clone()),
    };

    let order = read_field_order(writer, reader);
    for step in &order.fields {
        let field = step.field;
        let seed = match old {
            Some(_) => record.get(&field.name, field.position)?.cloned(),
            None => None,
        };

        let result = match &step.source {
            FieldSource::Written { skip, writer } => skip_values(skip, cursor)
                .and_then(|()| read_value(seed.as_ref(), writer, &field.schema, cursor)),
            FieldSource::Absent => match &field.default {
                Some(default) => default_value(default, &field.schema, &field.name),
                None => {
                    tracing::trace!(record = %reader.name, field = %field.name, "field not written and has no default");
                    continue;
                }
            },
        };

        match result {
            Ok(value) => record.put(&field.name, field.position, value)?,
            Err(e) if e.is_end_of_stream() => {
                // Writer's tail is shorter than the field order: keep the seed
                // and still try the following fields.
                tracing::debug!(record = %reader.name, field = %field.name, error = %e, "stream exhausted, field left at seed");
            }
            Err(e) => return Err(e),
        }
    }

    match skip_values(&order.trailing, cursor) {
        Err(e) if !e.is_end_of_stream() => Err(e),
        _ => Ok(record),
    }
}

fn skip_values<C>(schemas: &[&Schema], cursor: &mut C) -> Result<(), DecodeError>
where
    C: ByteCursor + ?Sized,
{
    for schema in schemas {
        read_value(None, schema, schema, cursor)?;
    }
    Ok(())
}

/// Decode one value encoded as `writer` and materialize it as `reader`.
fn read_value<C>(
    seed: Option<&Value>,
    writer: &Schema,
    reader: &Schema,
    cursor: &mut C,
) -> Result<Value, DecodeError>
where
    C: ByteCursor + ?Sized,
{
    // The writer's branch decides what is on the wire.
    if let Schema::Union(wu) = writer {
        let idx = cursor.read_union_index()?;
        let branch = wu.variants.get(idx).ok_or(DecodeError::IndexOutOfRange {
            what: "union",
            index: idx as i64,
            len: wu.variants.len(),
        })?;
        return read_value(seed, branch, reader, cursor);
    }

    match reader {
        Schema::Union(ru) => {
            let branch = union_branch(writer, ru).ok_or_else(|| DecodeError::mismatch(writer, reader))?;
            read_value(seed, writer, branch, cursor)
        }
        Schema::Null => match writer {
            Schema::Null => Ok(Value::Null),
            _ => Err(DecodeError::mismatch(writer, reader)),
        },
        Schema::Primitive(kind) => read_primitive(writer, *kind, reader, cursor),
        Schema::Fixed(rf) => match writer {
            Schema::Fixed(wf) if wf.size == rf.size => Ok(Value::Fixed(cursor.read_fixed(rf.size)?)),
            _ => Err(DecodeError::mismatch(writer, reader)),
        },
        Schema::Enum(re) => {
            let Schema::Enum(we) = writer else {
                return Err(DecodeError::mismatch(writer, reader));
            };
            let idx = cursor.read_enum()?;
            let symbol = we.symbols.get(idx).ok_or(DecodeError::IndexOutOfRange {
                what: "enum",
                index: idx as i64,
                len: we.symbols.len(),
            })?;
            let resolved = re
                .index_of(symbol)
                .map(|i| (i, symbol.clone()))
                .or_else(|| {
                    let d = re.default.as_ref()?;
                    re.index_of(d).map(|i| (i, d.clone()))
                })
                .ok_or_else(|| DecodeError::Mismatch {
                    writer: format!("symbol {symbol}"),
                    reader: reader.to_string(),
                })?;
            Ok(Value::Enum(resolved.0, resolved.1))
        }
        Schema::Array(ri) => {
            let Schema::Array(wi) = writer else {
                return Err(DecodeError::mismatch(writer, reader));
            };
            let item_len = min_encoded_len(wi);
            let mut items = Vec::new();
            loop {
                let n = cursor.read_block_len(item_len)?;
                if n == 0 {
                    break;
                }
                for _ in 0..n {
                    items.push(read_value(None, wi, ri, cursor)?);
                }
            }
            Ok(Value::Array(items))
        }
        Schema::Map(rv) => {
            let Schema::Map(wv) = writer else {
                return Err(DecodeError::mismatch(writer, reader));
            };
            // key length prefix plus the value
            let entry_len = 1 + min_encoded_len(wv);
            let mut entries = HashMap::new();
            loop {
                let n = cursor.read_block_len(entry_len)?;
                if n == 0 {
                    break;
                }
                for _ in 0..n {
                    let key = cursor.read_string()?;
                    let value = read_value(None, wv, rv, cursor)?;
                    entries.insert(key, value);
                }
            }
            Ok(Value::Map(entries))
        }
        Schema::Record(rr) => {
            let Schema::Record(wr) = writer else {
                return Err(DecodeError::mismatch(writer, reader));
            };
            let old = seed.and_then(Value::as_record);
            Ok(Value::Record(read_record(old, wr, rr, cursor)?))
        }
    }
}

fn read_primitive<C>(
    writer: &Schema,
    kind: PrimitiveKind,
    reader: &Schema,
    cursor: &mut C,
) -> Result<Value, DecodeError>
where
    C: ByteCursor + ?Sized,
{
    use PrimitiveKind::*;

    let Schema::Primitive(wk) = writer else {
        return Err(DecodeError::mismatch(writer, reader));
    };
    let value = match (*wk, kind) {
        (Boolean, Boolean) => Value::Boolean(cursor.read_boolean()?),
        (Int32, Int32) => Value::Int(cursor.read_int()?),
        (Int32, Int64) => Value::Long(i64::from(cursor.read_int()?)),
        (Int32, Float32) => Value::Float(cursor.read_int()? as f32),
        (Int32, Float64) => Value::Double(f64::from(cursor.read_int()?)),
        (Int64, Int64) => Value::Long(cursor.read_long()?),
        (Int64, Float32) => Value::Float(cursor.read_long()? as f32),
        (Int64, Float64) => Value::Double(cursor.read_long()? as f64),
        (Float32, Float32) => Value::Float(cursor.read_float()?),
        (Float32, Float64) => Value::Double(f64::from(cursor.read_float()?)),
        (Float64, Float64) => Value::Double(cursor.read_double()?),
        (String, String) => Value::String(cursor.read_string()?),
        (String, Bytes) => Value::Bytes(cursor.read_string()?.into_bytes()),
        (Bytes, Bytes) => Value::Bytes(cursor.read_bytes()?),
        (Bytes, String) => {
            let offset = cursor.position();
            let raw = cursor.read_bytes()?;
            Value::String(
                std::string::String::from_utf8(raw).map_err(|_| DecodeError::InvalidUtf8 { offset })?,
            )
        }
        _ => return Err(DecodeError::mismatch(writer, reader)),
    };
    Ok(value)
}

/// Fewest bytes one value of `schema` occupies in the binary encoding.
fn min_encoded_len(schema: &Schema) -> usize {
    match schema {
        Schema::Null => 0,
        Schema::Primitive(PrimitiveKind::Float32) => 4,
        Schema::Primitive(PrimitiveKind::Float64) => 8,
        Schema::Primitive(_) => 1,
        Schema::Fixed(f) => f.size,
        Schema::Enum(_) | Schema::Array(_) | Schema::Map(_) | Schema::Union(_) => 1,
        Schema::Record(r) => r.fields.iter().map(|f| min_encoded_len(&f.schema)).sum(),
    }
}

/// Reader union branch for a non-union writer type: an exact match first,
/// then the first branch the writer type promotes to.
fn union_branch<'r>(writer: &Schema, union: &'r UnionSchema) -> Option<&'r Schema> {
    union
        .variants
        .iter()
        .find(|v| same_type(writer, v))
        .or_else(|| union.variants.iter().find(|v| promotes(writer, v)))
}

fn same_type(writer: &Schema, reader: &Schema) -> bool {
    match (writer, reader) {
        (Schema::Record(_), Schema::Record(_))
        | (Schema::Enum(_), Schema::Enum(_))
        | (Schema::Fixed(_), Schema::Fixed(_)) => writer.name() == reader.name(),
        _ => writer.kind() == reader.kind(),
    }
}

fn promotes(writer: &Schema, reader: &Schema) -> bool {
    use PrimitiveKind::*;

    let (Schema::Primitive(w), Schema::Primitive(r)) = (writer, reader) else {
        return false;
    };
    matches!(
        (w, r),
        (Int32, Int64 | Float32 | Float64)
            | (Int64, Float32 | Float64)
            | (Float32, Float64)
            | (String, Bytes)
            | (Bytes, String)
    )
}
