//! Sink Module
//!
//! The seam between the relay handler and the destination store. A sink
//! accepts one named byte-stream submission per handler invocation; concrete
//! cloud implementations live with the embedder, this module provides the
//! trait, destination-path derivation, and an in-memory implementation.

use crate::Result;
use std::collections::HashMap;
use std::sync::Mutex;

/// Default root segment for data-lake destination paths
pub const DEFAULT_ROOT_PATH: &str = "/mydata/";

/// Destination for relayed log blobs.
///
/// Implementations take ownership of the submitted content; the handler does
/// not touch it again. A failed submission propagates to the caller
/// unchanged, the relay never retries.
pub trait LogSink: Send + Sync {
    /// Submit one blob under the given destination path, returning the
    /// number of bytes accepted.
    fn submit(
        &self,
        path: &str,
        content: Vec<u8>,
    ) -> impl std::future::Future<Output = Result<u64>> + Send;
}

/// Build a data-lake destination path: fixed root segment plus the derived
/// file name, with exactly one separating slash.
pub fn destination_path(root: &str, name: &str) -> String {
    let root = root.strip_suffix('/').unwrap_or(root);
    let name = name.strip_prefix('/').unwrap_or(name);
    format!("{}/{}", root, name)
}

/// Build an object-store destination path for a pre-bound output container:
/// "{container}-uncompressed/{base_name}.json".
pub fn object_store_path(container: &str, base_name: &str) -> String {
    format!("{}-uncompressed/{}.json", container, base_name)
}

/// In-memory sink holding submitted blobs behind a mutex.
///
/// Used by tests and by embedders that buffer submissions before handing
/// them to a cloud client.
#[derive(Default)]
pub struct MemorySink {
    objects: Mutex<HashMap<String, Vec<u8>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the content stored under a destination path
    pub fn get(&self, path: &str) -> Option<Vec<u8>> {
        self.objects.lock().unwrap().get(path).cloned()
    }

    /// Number of objects submitted so far
    pub fn len(&self) -> usize {
        self.objects.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.lock().unwrap().is_empty()
    }

    /// Destination paths of all submitted objects
    pub fn paths(&self) -> Vec<String> {
        self.objects.lock().unwrap().keys().cloned().collect()
    }
}

impl LogSink for MemorySink {
    async fn submit(&self, path: &str, content: Vec<u8>) -> Result<u64> {
        let size = content.len() as u64;
        self.objects
            .lock()
            .unwrap()
            .insert(path.to_string(), content);
        Ok(size)
    }
}
