use crate::schema::Schema;

/// Invalid schema definition.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SchemaError {
    #[error("record '{record}' declares field '{field}' more than once")]
    DuplicateField { record: String, field: String },

    #[error("unsupported schema: {0}")]
    Unsupported(String),

    #[error("unknown type reference '{0}'")]
    UnknownReference(String),
}

/// Field access that does not match the record's schema.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RecordError {
    #[error("record '{record}' has no field '{field}'")]
    UnknownField { record: String, field: String },

    #[error("field '{field}' of record '{record}' is at position {expected}, not {actual}")]
    PositionMismatch {
        record: String,
        field: String,
        expected: usize,
        actual: usize,
    },
}

/// Binary decode failure.
///
/// [`DecodeError::EndOfStream`] is the only tolerated condition: the
/// resolving decoder leaves the field at its seed and moves on. Every other
/// variant aborts the record.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DecodeError {
    #[error("unexpected end of stream: needed {needed} bytes at offset {offset}")]
    EndOfStream { needed: usize, offset: usize },

    #[error("malformed input at offset {offset}: {detail}")]
    Malformed { offset: usize, detail: String },

    #[error("invalid UTF-8 string at offset {offset}")]
    InvalidUtf8 { offset: usize },

    #[error("{what} index {index} out of range (have {len})")]
    IndexOutOfRange {
        what: &'static str,
        index: i64,
        len: usize,
    },

    #[error("invalid default for field '{field}': {detail}")]
    InvalidDefault { field: String, detail: String },

    #[error("cannot read writer type {writer} as {reader}")]
    Mismatch { writer: String, reader: String },

    #[error(transparent)]
    Record(#[from] RecordError),
}

impl DecodeError {
    pub fn is_end_of_stream(&self) -> bool {
        matches!(self, DecodeError::EndOfStream { .. })
    }

    pub fn mismatch(writer: &Schema, reader: &Schema) -> Self {
        DecodeError::Mismatch {
            writer: writer.to_string(),
            reader: reader.to_string(),
        }
    }
}

/// A raw value could not be coerced to a field's declared type.
///
/// Always carries the field name and target schema for diagnostics.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConversionError {
    #[error("text to record conversion error for field {field}, {value} for {schema}")]
    Rejected {
        value: serde_json::Value,
        field: String,
        schema: Schema,
    },

    #[error("symbol {symbol} not in enum {schema} (field {field})")]
    UnknownSymbol {
        symbol: String,
        field: String,
        schema: Schema,
    },

    #[error("null value for non-nullable field {field} of type {schema}")]
    NullValue { field: String, schema: Schema },

    #[error("cannot parse {value:?} as {schema} for field {field}")]
    InvalidNumber {
        value: String,
        field: String,
        schema: Schema,
    },

    #[error("text conversion cannot handle type {schema} (field {field})")]
    UnhandledType { field: String, schema: Schema },

    #[error(transparent)]
    Record(#[from] RecordError),
}

impl ConversionError {
    /// Field the failing value was destined for.
    pub fn field(&self) -> Option<&str> {
        match self {
            ConversionError::Rejected { field, .. }
            | ConversionError::UnknownSymbol { field, .. }
            | ConversionError::NullValue { field, .. }
            | ConversionError::InvalidNumber { field, .. }
            | ConversionError::UnhandledType { field, .. } => Some(field),
            ConversionError::Record(_) => None,
        }
    }
}
