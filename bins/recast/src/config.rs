use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "recast", about = "Materialize schema-typed records from text lines or Avro bytes")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Convert delimited text lines into JSON records
    Text(TextArgs),
    /// Decode Avro datums, resolving writer against reader schema
    Decode(DecodeArgs),
}

#[derive(Args, Clone, Debug)]
pub struct TextArgs {
    /// Record schema (.avsc) the line fields map onto
    #[arg(long, env = "RECAST_SCHEMA")]
    pub schema: PathBuf,

    /// Optional TOML config file
    #[arg(long, env = "RECAST_CONFIG")]
    pub config: Option<String>,

    /// Input file; stdin when omitted
    pub input: Option<PathBuf>,
}

#[derive(Args, Clone, Debug)]
pub struct DecodeArgs {
    /// Schema the bytes were written with (.avsc)
    #[arg(long, env = "RECAST_WRITER_SCHEMA")]
    pub writer_schema: PathBuf,

    /// Schema to materialize records as; defaults to the writer schema
    #[arg(long, env = "RECAST_READER_SCHEMA")]
    pub reader_schema: Option<PathBuf>,

    /// File of concatenated binary datums
    pub input: PathBuf,
}
