pub mod cursor;
pub mod error;
pub mod record;
pub mod schema;
pub mod value;

pub use cursor::ByteCursor;
pub use error::{ConversionError, DecodeError, RecordError, SchemaError};
pub use record::Record;
pub use schema::{
    EnumSchema, Field, FixedSchema, PrimitiveKind, RecordSchema, Schema, SchemaKind, UnionSchema,
};
pub use value::Value;
