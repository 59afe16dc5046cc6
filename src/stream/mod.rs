//! Push Channel
//!
//! The backend's `/stream` endpoint speaks `text/event-stream`. Every message
//! event means "totals changed"; its payload is never read.
//!
//! - **decoder**: incremental event-stream parser (no I/O, also used by tests)
//! - **client**: reqwest reader and background listener (`client` feature)

mod decoder;

#[cfg(feature = "client")]
mod client;

pub use decoder::{DecodeError, EventStreamDecoder, ServerEvent, DEFAULT_BUFFER_LIMIT};

#[cfg(feature = "client")]
pub use client::{spawn_listener, EventStream, ListenerHandle, StreamError, StreamSignal};
