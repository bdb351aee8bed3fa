use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};

use recast_api::Schema;
use recast_engine::{RecastConfig, TextConverter};

use crate::config::TextArgs;
use crate::error::CliError;

pub fn run(args: TextArgs) -> Result<(), CliError> {
    let config = match &args.config {
        Some(path) => {
            let cfg = RecastConfig::load(path)?;
            tracing::info!(config = %path, "loaded config");
            cfg
        }
        None => RecastConfig::default(),
    };

    let schema = match recast_avro::load_schema(&args.schema)? {
        Schema::Record(r) => r,
        _ => return Err(CliError::NotARecord(args.schema.display().to_string())),
    };
    let converter = TextConverter::new(config.text);

    let input: Box<dyn BufRead> = match &args.input {
        Some(path) => Box::new(BufReader::new(File::open(path)?)),
        None => Box::new(BufReader::new(io::stdin().lock())),
    };
    let stdout = io::stdout();
    let mut out = stdout.lock();

    let mut total = 0;
    let mut failed = 0;
    for (idx, line) in input.lines().enumerate() {
        let line = line?;
        let line = line.strip_suffix('\r').unwrap_or(&line);
        total += 1;
        match converter.convert(Some(line), &schema) {
            Ok(record) => {
                serde_json::to_writer(&mut out, &record.to_json())?;
                out.write_all(b"\n")?;
            }
            Err(e) => {
                failed += 1;
                tracing::warn!(line = idx + 1, error = %e, "line conversion failed");
            }
        }
    }
    out.flush()?;

    tracing::info!(total, failed, "text conversion finished");
    if failed > 0 {
        return Err(CliError::LinesFailed { failed, total });
    }
    Ok(())
}
