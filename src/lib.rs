//! WAF log relay - triggered gzip decompress-and-forward for log blobs
//!
//! When a new compressed or uncompressed log blob lands in a watched storage
//! container, the relay decompresses it (if the name carries the ".gz"
//! marker) and forwards the byte stream to a destination sink under a
//! derived ".json" name. One blob per invocation, no retries; the hosting
//! trigger runtime owns redelivery.

pub mod compression;
pub mod config;
pub mod error;
pub mod handler;
pub mod logging;
pub mod sink;

pub use error::{RelayError, Result};
pub use handler::{LogRelayHandler, RelayOutcome};
pub use sink::LogSink;
