//! Notice sink adapters.
//!
//! - `RecordingNoticeSink` - Keeps notices in memory
//! - `TracingNoticeSink` - Emits notices as log events

mod recording;
mod tracing_sink;

pub use recording::RecordingNoticeSink;
pub use tracing_sink::TracingNoticeSink;
