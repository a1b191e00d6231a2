//! Shared test utilities for the `rewrite` module.

use std::collections::{HashMap, HashSet};
use std::future::Future;
use std::path::PathBuf;
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::Result;
use tokio::sync::Barrier;

use crate::rewrite::{FileStore, HashLookup, RewriteError};

pub(crate) const SOURCE_A: &str = "eab121cdc5ef25b633e50ef0f1919450bb003190";
pub(crate) const TARGET_A: &str = "e38c589deb50a7f95d076afc4fca4c48f8f5747a";
pub(crate) const SOURCE_B: &str = "8710ff29a7a8862d9e040a2f0047f04ed113931a";
pub(crate) const TARGET_B: &str = "72514a40be877b5cad007d145f523e2f700cf7f4";

/// Hash lookup backed by a fixed table.
///
/// Records every requested hash in call order. Individual hashes can be
/// delayed or made to fail, and a barrier can force every lookup to wait
/// until a given number of lookups are in flight.
pub(crate) struct StaticLookup {
    mappings: HashMap<String, String>,
    delays: HashMap<String, u64>,
    errors: HashSet<String>,
    barrier: Option<Barrier>,
    calls: Arc<Mutex<Vec<String>>>,
}

impl StaticLookup {
    /// Creates a lookup knowing `SOURCE_A` and `SOURCE_B`.
    pub(crate) fn fixture() -> Self {
        Self {
            mappings: HashMap::from([
                (SOURCE_A.to_string(), TARGET_A.to_string()),
                (SOURCE_B.to_string(), TARGET_B.to_string()),
            ]),
            delays: HashMap::new(),
            errors: HashSet::new(),
            barrier: None,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Creates a lookup that knows no hashes.
    pub(crate) fn empty() -> Self {
        let mut lookup = Self::fixture();
        lookup.mappings.clear();
        lookup
    }

    pub(crate) fn with_mapping(mut self, source: &str, target: &str) -> Self {
        self.mappings.insert(source.to_string(), target.to_string());
        self
    }

    pub(crate) fn with_delay(mut self, source: &str, millis: u64) -> Self {
        self.delays.insert(source.to_string(), millis);
        self
    }

    pub(crate) fn with_error(mut self, source: &str) -> Self {
        self.errors.insert(source.to_string());
        self
    }

    pub(crate) fn with_barrier(mut self, in_flight: usize) -> Self {
        self.barrier = Some(Barrier::new(in_flight));
        self
    }

    /// Hashes requested so far, in call order.
    pub(crate) fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

impl HashLookup for StaticLookup {
    fn target_hash<'a>(
        &'a self,
        source_hash: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Option<String>>> + Send + 'a>> {
        self.calls.lock().unwrap().push(source_hash.to_string());
        Box::pin(async move {
            if let Some(barrier) = &self.barrier {
                barrier.wait().await;
            }
            if let Some(millis) = self.delays.get(source_hash) {
                tokio::time::sleep(Duration::from_millis(*millis)).await;
            }
            if self.errors.contains(source_hash) {
                anyhow::bail!("lookup failed for {source_hash}");
            }
            Ok(self.mappings.get(source_hash).cloned())
        })
    }
}

/// In-memory file store.
#[derive(Default)]
pub(crate) struct MemoryStore {
    files: Mutex<HashMap<String, String>>,
    read_only: HashSet<String>,
}

impl MemoryStore {
    pub(crate) fn with_file(self, path: &str, content: &str) -> Self {
        self.files
            .lock()
            .unwrap()
            .insert(path.to_string(), content.to_string());
        self
    }

    /// Makes writes to `path` fail.
    pub(crate) fn read_only(mut self, path: &str) -> Self {
        self.read_only.insert(path.to_string());
        self
    }

    pub(crate) fn content(&self, path: &str) -> Option<String> {
        self.files.lock().unwrap().get(path).cloned()
    }
}

impl FileStore for MemoryStore {
    fn read_to_string<'a>(
        &'a self,
        path: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<String, RewriteError>> + Send + 'a>> {
        Box::pin(async move {
            self.content(path).ok_or_else(|| RewriteError::Read {
                path: PathBuf::from(path),
                source: std::io::Error::from(std::io::ErrorKind::NotFound),
            })
        })
    }

    fn write<'a>(
        &'a self,
        path: &'a str,
        content: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<(), RewriteError>> + Send + 'a>> {
        Box::pin(async move {
            if self.read_only.contains(path) {
                return Err(RewriteError::Write {
                    path: PathBuf::from(path),
                    source: std::io::Error::from(std::io::ErrorKind::PermissionDenied),
                });
            }
            self.files
                .lock()
                .unwrap()
                .insert(path.to_string(), content.to_string());
            Ok(())
        })
    }
}
