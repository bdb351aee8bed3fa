//! Avro format plugin.
//!
//! Supplies the two collaborators the resolving decoder needs from the
//! outside world: schema descriptors parsed from `.avsc` documents and a
//! [`BinaryCursor`] over Avro-encoded bytes.

mod cursor;
mod schema;

use std::path::Path;

use recast_api::{Schema, SchemaError};

pub use cursor::BinaryCursor;
pub use schema::from_avro;

#[derive(Debug, thiserror::Error)]
pub enum AvroError {
    #[error("failed to read schema file '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("failed to parse schema: {0}")]
    Parse(#[from] apache_avro::Error),

    #[error(transparent)]
    Schema(#[from] SchemaError),
}

/// Parse an Avro schema document (JSON) into a schema descriptor.
pub fn parse_schema(json: &str) -> Result<Schema, AvroError> {
    let avro = apache_avro::Schema::parse_str(json)?;
    Ok(from_avro(&avro)?)
}

/// Load and parse an `.avsc` file.
pub fn load_schema(path: impl AsRef<Path>) -> Result<Schema, AvroError> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|source| AvroError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let schema = parse_schema(&content)?;
    tracing::debug!(path = %path.display(), schema = %schema, "loaded avro schema");
    Ok(schema)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_errors_are_reported() {
        assert!(matches!(parse_schema("{not json"), Err(AvroError::Parse(_))));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = load_schema("/definitely/not/here.avsc").unwrap_err();
        assert!(matches!(err, AvroError::Io { .. }));
    }
}
