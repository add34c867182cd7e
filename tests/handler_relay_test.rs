//! End-to-End Relay Tests (buffered mode)
//!
//! Exercises the full relay path for the data-lake destination: compressed
//! blobs are decompressed and renamed, uncompressed blobs pass through
//! unchanged, and decompression failures abort the invocation without
//! submitting anything.

use flate2::write::GzEncoder;
use flate2::Compression;
use std::io::Write;
use waf_log_relay::handler::LogRelayHandler;
use waf_log_relay::sink::{LogSink, MemorySink};
use waf_log_relay::{RelayError, Result};

fn gzip(data: &[u8]) -> Vec<u8> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data).unwrap();
    encoder.finish().unwrap()
}

/// Sink whose destination always rejects the write
struct RejectingSink;

impl LogSink for RejectingSink {
    async fn submit(&self, path: &str, _content: Vec<u8>) -> Result<u64> {
        Err(RelayError::SubmissionError(format!(
            "destination rejected {}",
            path
        )))
    }
}

/// Scenario: "foo.gz" containing gzip-compressed `{"a":1}` lands in the
/// watched container. The relay must write "/mydata/foo.json" holding the
/// decompressed bytes.
#[tokio::test]
async fn test_compressed_blob_is_decompressed_and_renamed() {
    let handler = LogRelayHandler::new(MemorySink::new(), "/mydata/");
    let compressed = gzip(br#"{"a":1}"#);
    let mut stream = compressed.as_slice();

    let outcome = handler.handle("foo.gz", &mut stream).await.unwrap();

    assert_eq!(outcome.destination_path, "/mydata/foo.json");
    assert_eq!(outcome.bytes_written, br#"{"a":1}"#.len() as u64);
    assert_eq!(
        handler.sink().get("/mydata/foo.json").unwrap(),
        br#"{"a":1}"#
    );
}

/// Scenario: uncompressed "bar.json" is forwarded byte-for-byte under its
/// original name.
#[tokio::test]
async fn test_uncompressed_blob_passes_through_unchanged() {
    let handler = LogRelayHandler::new(MemorySink::new(), "/mydata/");
    let mut stream: &[u8] = br#"{"b":2}"#;

    let outcome = handler.handle("bar.json", &mut stream).await.unwrap();

    assert_eq!(outcome.destination_path, "/mydata/bar.json");
    assert_eq!(
        handler.sink().get("/mydata/bar.json").unwrap(),
        br#"{"b":2}"#
    );
}

/// Scenario: "baz.gz" with a corrupted gzip header fails with a
/// DecompressionError and nothing reaches the destination.
#[tokio::test]
async fn test_corrupt_gzip_fails_without_submission() {
    let handler = LogRelayHandler::new(MemorySink::new(), "/mydata/");
    let mut corrupted = gzip(br#"{"c":3}"#);
    corrupted[0] ^= 0xFF; // break the magic bytes
    let mut stream = corrupted.as_slice();

    let result = handler.handle("baz.gz", &mut stream).await;

    match result {
        Err(RelayError::DecompressionError(_)) => {}
        other => panic!("Expected DecompressionError, got: {:?}", other),
    }
    assert!(
        handler.sink().is_empty(),
        "No object should be written on decompression failure"
    );
}

/// A destination write failure is not caught locally: the SubmissionError
/// reaches the caller unchanged and the invocation reports no outcome.
#[tokio::test]
async fn test_submission_failure_propagates_unchanged() {
    let handler = LogRelayHandler::new(RejectingSink, "/mydata/");
    let compressed = gzip(br#"{"a":1}"#);
    let mut stream = compressed.as_slice();

    let result = handler.handle("foo.gz", &mut stream).await;

    match result {
        Err(RelayError::SubmissionError(msg)) => {
            assert_eq!(
                msg, "destination rejected /mydata/foo.json",
                "Error must carry the sink's message unchanged"
            );
        }
        other => panic!("Expected SubmissionError, got: {:?}", other),
    }
}

#[tokio::test]
async fn test_truncated_gzip_fails_without_submission() {
    let handler = LogRelayHandler::new(MemorySink::new(), "/mydata/");
    let mut truncated = gzip(b"a log line long enough to survive truncation");
    truncated.truncate(truncated.len() / 2);
    let mut stream = truncated.as_slice();

    let result = handler.handle("trunc.gz", &mut stream).await;

    assert!(result.is_err(), "Truncated gzip should fail the invocation");
    assert!(handler.sink().is_empty());
}

/// Extension matching is case-insensitive: "FOO.GZ" is decompressed too.
#[tokio::test]
async fn test_uppercase_extension_is_decompressed() {
    let handler = LogRelayHandler::new(MemorySink::new(), "/mydata/");
    let compressed = gzip(b"payload");
    let mut stream = compressed.as_slice();

    let outcome = handler.handle("FOO.GZ", &mut stream).await.unwrap();

    assert_eq!(outcome.destination_path, "/mydata/FOO.json");
    assert_eq!(handler.sink().get("/mydata/FOO.json").unwrap(), b"payload");
}

/// Nested blob keys keep their directory segments in the destination path.
#[tokio::test]
async fn test_nested_key_keeps_directory_segments() {
    let handler = LogRelayHandler::new(MemorySink::new(), "/mydata/");
    let compressed = gzip(b"{}");
    let mut stream = compressed.as_slice();

    let outcome = handler
        .handle("2024/01/15/entry.gz", &mut stream)
        .await
        .unwrap();

    assert_eq!(outcome.destination_path, "/mydata/2024/01/15/entry.json");
}

/// An empty gzip member decompresses to a zero-byte submission.
#[tokio::test]
async fn test_empty_compressed_payload() {
    let handler = LogRelayHandler::new(MemorySink::new(), "/mydata/");
    let compressed = gzip(b"");
    let mut stream = compressed.as_slice();

    let outcome = handler.handle("empty.gz", &mut stream).await.unwrap();

    assert_eq!(outcome.bytes_written, 0);
    assert_eq!(
        handler.sink().get("/mydata/empty.json").unwrap(),
        Vec::<u8>::new()
    );
}

/// Invocations share no state: one handler serving many concurrent blobs
/// produces the same results as serving them one at a time.
#[tokio::test]
async fn test_concurrent_invocations_are_independent() {
    let handler = std::sync::Arc::new(LogRelayHandler::new(MemorySink::new(), "/mydata/"));

    let mut tasks = Vec::new();
    for i in 0..16 {
        let handler = handler.clone();
        tasks.push(tokio::spawn(async move {
            let payload = format!(r#"{{"record":{}}}"#, i);
            let compressed = gzip(payload.as_bytes());
            let mut stream = compressed.as_slice();
            handler
                .handle(&format!("blob-{}.gz", i), &mut stream)
                .await
                .unwrap()
        }));
    }

    for task in tasks {
        task.await.unwrap();
    }

    assert_eq!(handler.sink().len(), 16);
    for i in 0..16 {
        let expected = format!(r#"{{"record":{}}}"#, i);
        assert_eq!(
            handler
                .sink()
                .get(&format!("/mydata/blob-{}.json", i))
                .unwrap(),
            expected.as_bytes()
        );
    }
}
