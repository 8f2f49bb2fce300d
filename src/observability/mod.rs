//! OpenTelemetry tracing exported to a local JSON file.
//!
//! ```text
//! tracing macros → tracing-opentelemetry → OpenTelemetry SDK → FileSpanExporter → JSON lines
//! ```
//!
//! Spans cover fetch issuance, settlement and worker handling; worker messages
//! carry their parent context so a page fetch shows up as one trace from the
//! command that caused it to the response that committed it.
//!
//! - Output: `<data_dir>/moviematch-otlp.json`, one OTLP document per batch
//! - Rotation: by size (`trace_max_bytes`), keeping `trace_backups` old files
//! - Level: `RUST_LOG`, else `trace_level`, else `info`
//!
//! The terminal itself is used for the UI, so nothing is logged to stdout.

mod file_writer;
mod init;
mod span_formatter;
mod tracer;

pub use file_writer::RotationPolicy;
pub use init::{init_tracing, TRACE_FILE};
