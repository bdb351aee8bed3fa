use recast_api::{ConversionError, DecodeError, SchemaError};

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("config error: {0}")]
    Config(String),

    #[error("schema error: {0}")]
    Schema(#[from] SchemaError),

    #[error("decode error: {0}")]
    Decode(#[from] DecodeError),

    #[error("conversion error: {0}")]
    Conversion(#[from] ConversionError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl EngineError {
    /// Add context to the error.
    ///
    /// Only message-carrying variants change; typed errors pass through.
    pub fn with_context(self, ctx: impl std::fmt::Display) -> Self {
        match self {
            EngineError::Config(msg) => EngineError::Config(format!("{ctx}: {msg}")),
            other => other,
        }
    }
}
