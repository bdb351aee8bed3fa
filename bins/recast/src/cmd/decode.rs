use std::io::{self, Write};

use recast_api::ByteCursor;
use recast_avro::BinaryCursor;
use recast_engine::{DatumReader, EngineError};

use crate::config::DecodeArgs;
use crate::error::CliError;

pub fn run(args: DecodeArgs) -> Result<(), CliError> {
    let writer = recast_avro::load_schema(&args.writer_schema)?;
    let reader = match &args.reader_schema {
        Some(path) => recast_avro::load_schema(path)?,
        None => writer.clone(),
    };
    let datum_reader = DatumReader::new(&writer, &reader).map_err(EngineError::from)?;

    let bytes = std::fs::read(&args.input)?;
    tracing::info!(input = %args.input.display(), bytes = bytes.len(), "decoding datums");

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let mut cursor = BinaryCursor::new(&bytes);
    let mut records = 0usize;
    while !cursor.is_empty() {
        let start = cursor.position();
        let record = datum_reader.read(None, &mut cursor).map_err(EngineError::from)?;
        if cursor.position() == start {
            tracing::warn!(offset = start, "trailing bytes do not form a datum, stopping");
            break;
        }
        serde_json::to_writer(&mut out, &record.to_json())?;
        out.write_all(b"\n")?;
        records += 1;
    }
    out.flush()?;

    tracing::info!(records, "decode finished");
    Ok(())
}
