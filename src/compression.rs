//! Compression Module
//!
//! Detects gzip-compressed log blobs from their name or extension, derives
//! the uncompressed destination name, and decodes gzip content either fully
//! in memory or chunk-by-chunk into an async writer.

use crate::{RelayError, Result};
use flate2::read::GzDecoder;
use flate2::write::GzDecoder as GzWriteDecoder;
use std::io::{Read, Write};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tracing::debug;

/// Uncompressed blobs are forwarded under this extension
pub const OUTPUT_EXTENSION: &str = ".json";

/// Marker extension for gzip-compressed blobs
pub const GZIP_EXTENSION: &str = ".gz";

/// Chunk size for streaming decompression (32KB)
const DECODE_CHUNK_SIZE: usize = 32 * 1024;

/// Check if a bare extension denotes a gzip blob ("gz", case-insensitive).
/// Empty extensions are never compressed.
pub fn is_compressed_extension(extension: &str) -> bool {
    extension.eq_ignore_ascii_case("gz")
}

/// Check if a blob name denotes a gzip blob (trailing ".gz", case-insensitive
/// extension). Empty names are never compressed.
pub fn is_compressed_name(name: &str) -> bool {
    if name.is_empty() {
        return false;
    }
    is_compressed_extension(&extract_file_extension(name))
}

/// Extract the file extension from a path or blob key
fn extract_file_extension(name: &str) -> String {
    if let Some(last_segment) = name.split('/').next_back() {
        if let Some(dot_pos) = last_segment.rfind('.') {
            return last_segment[dot_pos + 1..].to_lowercase();
        }
    }
    String::new()
}

/// Derive the destination name for a blob.
///
/// For compressed blobs the trailing ".gz" marker is replaced with ".json";
/// any ".gz" occurring mid-name is left alone. Non-compressed names pass
/// through unchanged. Pure function, applied exactly once per invocation.
pub fn derive_output_name(name: &str) -> String {
    if is_compressed_name(name) {
        let stem = &name[..name.len() - GZIP_EXTENSION.len()];
        format!("{}{}", stem, OUTPUT_EXTENSION)
    } else {
        name.to_string()
    }
}

/// Decompress a gzip payload fully in memory
pub fn decompress(compressed: &[u8]) -> Result<Vec<u8>> {
    let mut decoder = GzDecoder::new(compressed);
    let mut decompressed = Vec::new();
    decoder.read_to_end(&mut decompressed).map_err(|e| {
        RelayError::DecompressionError(format!("Failed to decode gzip stream: {}", e))
    })?;
    debug!(
        "Decompressed {} bytes to {} bytes",
        compressed.len(),
        decompressed.len()
    );
    Ok(decompressed)
}

/// Decompress a gzip stream chunk-by-chunk into an async writer.
///
/// Reads the compressed source in fixed-size chunks, feeds each chunk to a
/// gzip decoder and drains the decoded output into `writer` before the next
/// read, so only one chunk of compressed input is buffered at a time.
/// Returns the number of decompressed bytes written.
pub async fn decompress_to_writer<R, W>(reader: &mut R, writer: &mut W) -> Result<u64>
where
    R: AsyncRead + Unpin + ?Sized,
    W: AsyncWrite + Unpin + ?Sized,
{
    let mut decoder = GzWriteDecoder::new(Vec::new());
    let mut chunk = vec![0u8; DECODE_CHUNK_SIZE];
    let mut total_written: u64 = 0;

    loop {
        let n = reader.read(&mut chunk).await?;
        if n == 0 {
            break;
        }

        decoder.write_all(&chunk[..n]).map_err(|e| {
            RelayError::DecompressionError(format!("Failed to decode gzip stream: {}", e))
        })?;

        let decoded = std::mem::take(decoder.get_mut());
        if !decoded.is_empty() {
            writer.write_all(&decoded).await?;
            total_written += decoded.len() as u64;
        }
    }

    let decoded = decoder.finish().map_err(|e| {
        RelayError::DecompressionError(format!("Truncated or corrupt gzip stream: {}", e))
    })?;
    if !decoded.is_empty() {
        writer.write_all(&decoded).await?;
        total_written += decoded.len() as u64;
    }
    writer.flush().await?;

    debug!("Streamed {} decompressed bytes", total_written);
    Ok(total_written)
}
