use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::error::SchemaError;

/// Scalar type kinds understood by both pipelines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    String,
    Boolean,
    Int32,
    Int64,
    Float32,
    Float64,
    Bytes,
}

/// Field-less discriminant of [`Schema`]. Key of the type dispatch table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SchemaKind {
    Null,
    String,
    Boolean,
    Int32,
    Int64,
    Float32,
    Float64,
    Bytes,
    Fixed,
    Enum,
    Array,
    Map,
    Record,
    Union,
}

/// Immutable schema tree.
///
/// Built once (usually by a format plugin from a schema document) and shared
/// read-only between every decode/convert call. Records sit behind `Arc` so
/// cloning a schema never deep-copies nested record definitions.
#[derive(Debug, Clone, PartialEq)]
pub enum Schema {
    /// Only meaningful as a union variant.
    Null,
    Primitive(PrimitiveKind),
    Fixed(FixedSchema),
    Enum(EnumSchema),
    Array(Box<Schema>),
    /// Keys are always strings.
    Map(Box<Schema>),
    Record(Arc<RecordSchema>),
    Union(UnionSchema),
}

impl Schema {
    pub fn kind(&self) -> SchemaKind {
        match self {
            Schema::Null => SchemaKind::Null,
            Schema::Primitive(p) => match p {
                PrimitiveKind::String => SchemaKind::String,
                PrimitiveKind::Boolean => SchemaKind::Boolean,
                PrimitiveKind::Int32 => SchemaKind::Int32,
                PrimitiveKind::Int64 => SchemaKind::Int64,
                PrimitiveKind::Float32 => SchemaKind::Float32,
                PrimitiveKind::Float64 => SchemaKind::Float64,
                PrimitiveKind::Bytes => SchemaKind::Bytes,
            },
            Schema::Fixed(_) => SchemaKind::Fixed,
            Schema::Enum(_) => SchemaKind::Enum,
            Schema::Array(_) => SchemaKind::Array,
            Schema::Map(_) => SchemaKind::Map,
            Schema::Record(_) => SchemaKind::Record,
            Schema::Union(_) => SchemaKind::Union,
        }
    }

    /// Name of a named type (record, enum, fixed).
    pub fn name(&self) -> Option<&str> {
        match self {
            Schema::Record(r) => Some(&r.name),
            Schema::Enum(e) => Some(&e.name),
            Schema::Fixed(f) => Some(&f.name),
            _ => None,
        }
    }

    pub fn as_record(&self) -> Option<&Arc<RecordSchema>> {
        match self {
            Schema::Record(r) => Some(r),
            _ => None,
        }
    }

    /// Non-null variant of a `{null, X}` union, `None` for anything else.
    pub fn nullable_variant(&self) -> Option<&Schema> {
        match self {
            Schema::Union(u) => u.nullable_variant(),
            _ => None,
        }
    }

    pub fn string() -> Self {
        Schema::Primitive(PrimitiveKind::String)
    }

    pub fn boolean() -> Self {
        Schema::Primitive(PrimitiveKind::Boolean)
    }

    pub fn int32() -> Self {
        Schema::Primitive(PrimitiveKind::Int32)
    }

    pub fn int64() -> Self {
        Schema::Primitive(PrimitiveKind::Int64)
    }

    pub fn float32() -> Self {
        Schema::Primitive(PrimitiveKind::Float32)
    }

    pub fn float64() -> Self {
        Schema::Primitive(PrimitiveKind::Float64)
    }

    pub fn bytes() -> Self {
        Schema::Primitive(PrimitiveKind::Bytes)
    }

    pub fn array(items: Schema) -> Self {
        Schema::Array(Box::new(items))
    }

    pub fn map(values: Schema) -> Self {
        Schema::Map(Box::new(values))
    }

    /// `{null, inner}`, the optional-field shape.
    pub fn nullable(inner: Schema) -> Self {
        Schema::Union(UnionSchema::new(vec![Schema::Null, inner]))
    }
}

impl fmt::Display for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Schema::Null => f.write_str("null"),
            Schema::Primitive(p) => match p {
                PrimitiveKind::String => f.write_str("string"),
                PrimitiveKind::Boolean => f.write_str("boolean"),
                PrimitiveKind::Int32 => f.write_str("int"),
                PrimitiveKind::Int64 => f.write_str("long"),
                PrimitiveKind::Float32 => f.write_str("float"),
                PrimitiveKind::Float64 => f.write_str("double"),
                PrimitiveKind::Bytes => f.write_str("bytes"),
            },
            Schema::Fixed(x) => write!(f, "fixed {}({})", x.name, x.size),
            Schema::Enum(e) => write!(f, "enum {}{:?}", e.name, e.symbols),
            Schema::Array(items) => write!(f, "array<{items}>"),
            Schema::Map(values) => write!(f, "map<{values}>"),
            Schema::Record(r) => write!(f, "record {}", r.name),
            Schema::Union(u) => {
                f.write_str("[")?;
                for (i, v) in u.variants.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{v}")?;
                }
                f.write_str("]")
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FixedSchema {
    pub name: String,
    pub size: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnumSchema {
    pub name: String,
    pub symbols: Vec<String>,
    /// Substituted for writer symbols the reader does not know.
    pub default: Option<String>,
}

impl EnumSchema {
    pub fn index_of(&self, symbol: &str) -> Option<usize> {
        self.symbols.iter().position(|s| s == symbol)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct UnionSchema {
    pub variants: Vec<Schema>,
}

impl UnionSchema {
    pub fn new(variants: Vec<Schema>) -> Self {
        Self { variants }
    }

    /// The non-null variant when the union is exactly `{null, X}` (either order).
    pub fn nullable_variant(&self) -> Option<&Schema> {
        match self.variants.as_slice() {
            [Schema::Null, other] | [other, Schema::Null] if !matches!(other, Schema::Null) => {
                Some(other)
            }
            _ => None,
        }
    }
}

/// A single record field.
///
/// `position` is the dense 0-based index matching declaration order.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub name: String,
    pub position: usize,
    pub schema: Schema,
    /// Default value in its schema-document (JSON) form.
    pub default: Option<serde_json::Value>,
}

/// Record definition: named, ordered, uniquely-named fields.
#[derive(Debug, Clone)]
pub struct RecordSchema {
    pub name: String,
    pub fields: Vec<Field>,
    lookup: HashMap<String, usize>,
}

impl RecordSchema {
    /// Build a record definition. Positions are assigned in declaration order.
    pub fn new<I>(name: impl Into<String>, fields: I) -> Result<Self, SchemaError>
    where
        I: IntoIterator<Item = (String, Schema, Option<serde_json::Value>)>,
    {
        let name = name.into();
        let mut lookup = HashMap::new();
        let mut out = Vec::new();
        for (position, (field_name, schema, default)) in fields.into_iter().enumerate() {
            if lookup.insert(field_name.clone(), position).is_some() {
                return Err(SchemaError::DuplicateField {
                    record: name,
                    field: field_name,
                });
            }
            out.push(Field {
                name: field_name,
                position,
                schema,
                default,
            });
        }
        Ok(Self {
            name,
            fields: out,
            lookup,
        })
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        self.lookup.get(name).map(|&i| &self.fields[i])
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl PartialEq for RecordSchema {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.fields == other.fields
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(names: &[&str]) -> Vec<(String, Schema, Option<serde_json::Value>)> {
        names
            .iter()
            .map(|n| (n.to_string(), Schema::string(), None))
            .collect()
    }

    #[test]
    fn positions_follow_declaration_order() {
        let r = RecordSchema::new("r", fields(&["a", "b", "c"])).unwrap();
        let positions: Vec<usize> = r.fields.iter().map(|f| f.position).collect();
        assert_eq!(positions, vec![0, 1, 2]);
        assert_eq!(r.field("c").unwrap().position, 2);
        assert!(r.field("d").is_none());
    }

    #[test]
    fn duplicate_field_names_are_rejected() {
        let err = RecordSchema::new("r", fields(&["a", "a"])).unwrap_err();
        assert!(matches!(err, SchemaError::DuplicateField { ref field, .. } if field == "a"));
    }

    #[test]
    fn nullable_variant_either_order() {
        let u = Schema::nullable(Schema::int32());
        assert_eq!(u.nullable_variant(), Some(&Schema::int32()));

        let flipped = Schema::Union(UnionSchema::new(vec![Schema::string(), Schema::Null]));
        assert_eq!(flipped.nullable_variant(), Some(&Schema::string()));

        let wide = Schema::Union(UnionSchema::new(vec![
            Schema::Null,
            Schema::string(),
            Schema::int32(),
        ]));
        assert!(wide.nullable_variant().is_none());

        let no_null = Schema::Union(UnionSchema::new(vec![Schema::string(), Schema::int32()]));
        assert!(no_null.nullable_variant().is_none());
    }

    #[test]
    fn kind_is_stable_per_variant() {
        assert_eq!(Schema::float64().kind(), SchemaKind::Float64);
        assert_eq!(Schema::array(Schema::int32()).kind(), SchemaKind::Array);
        assert_eq!(Schema::Null.kind(), SchemaKind::Null);
    }
}
