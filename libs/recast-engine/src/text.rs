use std::sync::Arc;

use recast_api::{ConversionError, Record, RecordSchema, Schema, SchemaKind};
use serde::Deserialize;

use crate::dispatch::{self, RawValue};

/// Line splitting options.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct TextOptions {
    /// Field separator. No escaping: the separator cannot occur inside a value.
    pub delimiter: char,
    /// Parse segments bound to array/map fields as JSON before conversion.
    pub structured_segments: bool,
}

impl Default for TextOptions {
    fn default() -> Self {
        Self {
            delimiter: '\t',
            structured_segments: false,
        }
    }
}

/// Converts delimited text lines into records, one segment per field.
#[derive(Debug, Clone, Default)]
pub struct TextConverter {
    options: TextOptions,
}

impl TextConverter {
    pub fn new(options: TextOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &TextOptions {
        &self.options
    }

    /// Convert one line.
    ///
    /// An absent or empty line, or one whose segment count differs from the
    /// field count, yields an empty record rather than an error. Any segment
    /// that fails its field's conversion fails the whole line.
    pub fn convert(
        &self,
        text: Option<&str>,
        schema: &Arc<RecordSchema>,
    ) -> Result<Record, ConversionError> {
        let mut record = Record::new(schema.clone());
        let Some(text) = text.filter(|t| !t.is_empty()) else {
            return Ok(record);
        };

        // `split` keeps empty trailing segments.
        let segments: Vec<&str> = text.split(self.options.delimiter).collect();
        if segments.len() != schema.len() {
            tracing::debug!(
                record = %schema.name,
                expected = schema.len(),
                actual = segments.len(),
                "segment count does not match schema, returning empty record"
            );
            return Ok(record);
        }

        for (field, segment) in schema.fields.iter().zip(segments) {
            let raw = self.raw_segment(segment, &field.schema);
            let value = dispatch::convert(&raw, &field.name, &field.schema)?;
            record.put(&field.name, field.position, value)?;
        }
        Ok(record)
    }

    fn raw_segment(&self, segment: &str, schema: &Schema) -> RawValue {
        if self.options.structured_segments {
            let target = schema.nullable_variant().unwrap_or(schema);
            if matches!(target.kind(), SchemaKind::Array | SchemaKind::Map) {
                match serde_json::from_str(segment) {
                    Ok(v) => return v,
                    Err(e) => tracing::trace!(error = %e, "segment is not JSON, converting as text"),
                }
            }
        }
        RawValue::String(segment.to_string())
    }
}

/// Convert a tab-delimited line with default options.
pub fn convert_line(text: Option<&str>, schema: &Arc<RecordSchema>) -> Result<Record, ConversionError> {
    TextConverter::default().convert(text, schema)
}
