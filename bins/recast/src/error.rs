#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("{0}")]
    Engine(#[from] recast_engine::EngineError),

    #[error("schema: {0}")]
    Avro(#[from] recast_avro::AvroError),

    #[error("schema '{0}' is not a record")]
    NotARecord(String),

    #[error("{failed} of {total} lines failed to convert")]
    LinesFailed { failed: usize, total: usize },

    #[error("output: {0}")]
    Json(#[from] serde_json::Error),

    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}
