//! Schema-driven record materialization.
//!
//! Two pipelines share the `recast-api` data model:
//!
//! - [`decoder`]: resolving binary decode. Bytes written under one record
//!   schema are read as another, compatible one, tolerating a writer whose
//!   encoded tail is shorter than the reader expects.
//! - [`text`]: delimited text lines mapped positionally onto a record
//!   schema through the per-type rules in [`dispatch`].

pub mod config;
pub mod decoder;
pub mod defaults;
pub mod dispatch;
pub mod error;
pub mod resolve;
pub mod text;

pub use config::RecastConfig;
pub use decoder::DatumReader;
pub use dispatch::{Outcome, RawValue};
pub use error::EngineError;
pub use text::{TextConverter, TextOptions, convert_line};
