//! Line-level extraction for logsift.
//!
//! Two pure entry points:
//!
//! - [`extract_timestamp`]: finds the first timestamp in a line using a fixed
//!   priority table of layouts
//! - [`detect_fields`]: runs the per-platform matcher cascade and returns a
//!   [`ParsedLine`] (degrading to a message-only record when nothing matches)
//!
//! All patterns are compiled once into immutable statics.

mod fields;
pub mod formats;
mod level;
mod timestamp;

pub use fields::ParsedLine;
pub use formats::{CASCADE, LineFormat, detect_fields};
pub use level::LogLevel;
pub use timestamp::{ExtractedTimestamp, TimestampKind, extract_timestamp, find_timestamp};

/// thread/process disambiguation used by the positional bracket layout
pub use formats::assign_thread_process;
