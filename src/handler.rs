//! Handler Module
//!
//! `LogRelayHandler` is the single component of the relay: given one newly
//! observed blob it inspects the name, decompresses gzip content, derives
//! the destination name and forwards the bytes to its sink. Every
//! invocation is independent and stateless; failures abort the invocation
//! and the hosting trigger runtime owns retry policy.

use crate::compression::{decompress, decompress_to_writer, derive_output_name, is_compressed_name};
use crate::sink::{destination_path, LogSink};
use crate::Result;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite};
use tracing::{debug, error, info};

/// Outcome of one successful relay invocation
#[derive(Debug, Clone)]
pub struct RelayOutcome {
    /// Final destination path the blob was submitted under
    pub destination_path: String,
    /// Uncompressed byte length of the submitted content
    pub bytes_written: u64,
}

/// Relays one log blob per invocation to a destination sink.
///
/// Holds no mutable state, so one handler may serve any number of
/// concurrent invocations.
pub struct LogRelayHandler<S: LogSink> {
    sink: S,
    root_path: String,
}

impl<S: LogSink> LogRelayHandler<S> {
    /// Create a handler submitting under the given data-lake root segment
    pub fn new(sink: S, root_path: impl Into<String>) -> Self {
        Self {
            sink,
            root_path: root_path.into(),
        }
    }

    /// Access the destination sink (used by tests and embedders)
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Relay one blob, buffering the (decompressed) content in memory.
    ///
    /// Reads `stream` to exhaustion, decompresses it when the name carries
    /// the ".gz" marker, then submits the result to the sink under the
    /// derived destination path. The logged and returned byte length is the
    /// uncompressed size.
    pub async fn handle<R>(&self, name: &str, stream: &mut R) -> Result<RelayOutcome>
    where
        R: AsyncRead + Unpin + ?Sized,
    {
        let mut raw = Vec::new();
        stream.read_to_end(&mut raw).await?;

        let content = if is_compressed_name(name) {
            debug!(name, "Decompressing blob");
            match decompress(&raw) {
                Ok(decompressed) => decompressed,
                Err(e) => {
                    error!(name, reason = %e, "Failed to decompress blob");
                    return Err(e);
                }
            }
        } else {
            raw
        };

        let output_name = derive_output_name(name);
        let path = destination_path(&self.root_path, &output_name);
        let bytes_written = self.sink.submit(&path, content).await?;

        info!(
            name = %output_name,
            size_bytes = bytes_written,
            "Processed blob"
        );

        Ok(RelayOutcome {
            destination_path: path,
            bytes_written,
        })
    }

    /// Relay one blob directly into a pre-bound destination stream.
    ///
    /// Compressed input is streamed through the gzip decoder into `writer`
    /// without full buffering; non-compressed input is copied
    /// byte-for-byte. Returns the number of bytes written to the
    /// destination, counted after decompression.
    pub async fn handle_into<R, W>(&self, name: &str, reader: &mut R, writer: &mut W) -> Result<u64>
    where
        R: AsyncRead + Unpin + ?Sized,
        W: AsyncWrite + Unpin + ?Sized,
    {
        let bytes_written = if is_compressed_name(name) {
            debug!(name, "Decompressing blob into destination stream");
            match decompress_to_writer(reader, writer).await {
                Ok(written) => written,
                Err(e) => {
                    error!(name, reason = %e, "Failed to decompress blob");
                    return Err(e);
                }
            }
        } else {
            tokio::io::copy(reader, writer).await?
        };

        info!(
            name = %derive_output_name(name),
            size_bytes = bytes_written,
            "Processed blob"
        );

        Ok(bytes_written)
    }
}
