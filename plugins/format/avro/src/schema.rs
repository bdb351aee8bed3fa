use std::collections::HashMap;
use std::sync::Arc;

use apache_avro::Schema as AvroSchema;
use recast_api::{EnumSchema, FixedSchema, RecordSchema, Schema, SchemaError, UnionSchema};

/// Map a parsed Avro schema onto the recast schema tree.
///
/// Logical types collapse onto their underlying encoding (`date` → int,
/// `timestamp-*` → long, `decimal` → its inner type, `uuid` → string,
/// `duration` → fixed(12)). Named types may be referenced after their
/// definition; a record that refers to itself is rejected because the
/// schema tree is acyclic.
pub fn from_avro(schema: &AvroSchema) -> Result<Schema, SchemaError> {
    let mut named = HashMap::new();
    convert(schema, &mut named)
}

fn convert(schema: &AvroSchema, named: &mut HashMap<String, Schema>) -> Result<Schema, SchemaError> {
    let out = match schema {
        AvroSchema::Null => Schema::Null,
        AvroSchema::Boolean => Schema::boolean(),
        AvroSchema::Int | AvroSchema::Date | AvroSchema::TimeMillis => Schema::int32(),
        AvroSchema::Long
        | AvroSchema::TimeMicros
        | AvroSchema::TimestampMillis
        | AvroSchema::TimestampMicros
        | AvroSchema::TimestampNanos
        | AvroSchema::LocalTimestampMillis
        | AvroSchema::LocalTimestampMicros
        | AvroSchema::LocalTimestampNanos => Schema::int64(),
        AvroSchema::Float => Schema::float32(),
        AvroSchema::Double => Schema::float64(),
        AvroSchema::Bytes | AvroSchema::BigDecimal => Schema::bytes(),
        AvroSchema::String | AvroSchema::Uuid => Schema::string(),
        AvroSchema::Decimal(d) => convert(&d.inner, named)?,
        AvroSchema::Duration => Schema::Fixed(FixedSchema {
            name: "duration".to_string(),
            size: 12,
        }),
        AvroSchema::Array(a) => Schema::array(convert(&a.items, named)?),
        AvroSchema::Map(m) => Schema::map(convert(&m.types, named)?),
        AvroSchema::Union(u) => Schema::Union(UnionSchema::new(
            u.variants()
                .iter()
                .map(|v| convert(v, named))
                .collect::<Result<Vec<_>, _>>()?,
        )),
        AvroSchema::Fixed(f) => {
            let fixed = Schema::Fixed(FixedSchema {
                name: f.name.name.clone(),
                size: f.size,
            });
            named.insert(f.name.fullname(None), fixed.clone());
            fixed
        }
        AvroSchema::Enum(e) => {
            let en = Schema::Enum(EnumSchema {
                name: e.name.name.clone(),
                symbols: e.symbols.clone(),
                default: e.default.clone(),
            });
            named.insert(e.name.fullname(None), en.clone());
            en
        }
        AvroSchema::Record(r) => {
            let mut fields = Vec::with_capacity(r.fields.len());
            for f in &r.fields {
                fields.push((f.name.clone(), convert(&f.schema, named)?, f.default.clone()));
            }
            let record = Schema::Record(Arc::new(RecordSchema::new(r.name.name.clone(), fields)?));
            named.insert(r.name.fullname(None), record.clone());
            record
        }
        AvroSchema::Ref { name } => {
            let fullname = name.fullname(None);
            named
                .get(&fullname)
                .cloned()
                .ok_or(SchemaError::UnknownReference(fullname))?
        }
    };
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use recast_api::SchemaKind;

    fn parse(json: &str) -> Schema {
        from_avro(&AvroSchema::parse_str(json).unwrap()).unwrap()
    }

    #[test]
    fn record_with_every_kind() {
        let s = parse(
            r#"{
                "type": "record", "name": "Row", "namespace": "test",
                "fields": [
                    {"name": "s", "type": "string"},
                    {"name": "b", "type": "boolean"},
                    {"name": "i", "type": "int"},
                    {"name": "l", "type": "long", "default": 5},
                    {"name": "f", "type": "float"},
                    {"name": "d", "type": "double"},
                    {"name": "raw", "type": "bytes"},
                    {"name": "fx", "type": {"type": "fixed", "name": "Four", "size": 4}},
                    {"name": "e", "type": {"type": "enum", "name": "Color", "symbols": ["RED", "BLUE"]}},
                    {"name": "a", "type": {"type": "array", "items": "int"}},
                    {"name": "m", "type": {"type": "map", "values": "long"}},
                    {"name": "o", "type": ["null", "string"], "default": null}
                ]
            }"#,
        );
        let r = s.as_record().unwrap();
        assert_eq!(r.name, "Row");
        let kinds: Vec<SchemaKind> = r.fields.iter().map(|f| f.schema.kind()).collect();
        assert_eq!(
            kinds,
            vec![
                SchemaKind::String,
                SchemaKind::Boolean,
                SchemaKind::Int32,
                SchemaKind::Int64,
                SchemaKind::Float32,
                SchemaKind::Float64,
                SchemaKind::Bytes,
                SchemaKind::Fixed,
                SchemaKind::Enum,
                SchemaKind::Array,
                SchemaKind::Map,
                SchemaKind::Union,
            ]
        );
        assert_eq!(r.field("l").unwrap().default, Some(serde_json::json!(5)));
        assert_eq!(r.field("o").unwrap().schema.nullable_variant(), Some(&Schema::string()));
        assert!(matches!(&r.field("fx").unwrap().schema, Schema::Fixed(f) if f.size == 4));
    }

    #[test]
    fn named_references_are_inlined() {
        let s = parse(
            r#"{
                "type": "record", "name": "Pair",
                "fields": [
                    {"name": "a", "type": {"type": "record", "name": "Point",
                        "fields": [{"name": "x", "type": "int"}]}},
                    {"name": "b", "type": "Point"}
                ]
            }"#,
        );
        let r = s.as_record().unwrap();
        assert_eq!(r.fields[0].schema, r.fields[1].schema);
    }

    #[test]
    fn logical_types_use_their_encoding() {
        assert_eq!(parse(r#"{"type": "int", "logicalType": "date"}"#), Schema::int32());
        assert_eq!(
            parse(r#"{"type": "long", "logicalType": "timestamp-millis"}"#),
            Schema::int64()
        );
    }
}
