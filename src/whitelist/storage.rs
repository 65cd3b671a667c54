//! Durable key/value storage contract.
//!
//! Mirrors the flat key/value shape browsers give extensions for local
//! state: JSON values under string keys, absent key distinct from present.
//! Two implementations ship in-tree:
//!
//! - [`MemoryStorage`]: concurrent map, for tests and embedding
//! - [`JsonFileStorage`]: one JSON object per file on disk

use crate::base::error::SweepError;
use dashmap::DashMap;
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use std::{future::Future, pin::Pin, sync::Arc};

/// Alias for the `Future` type returned by storage reads.
pub type Reading = Pin<Box<dyn Future<Output = Result<Option<Value>, SweepError>> + Send>>;

/// Alias for the `Future` type returned by storage writes.
pub type Writing = Pin<Box<dyn Future<Output = Result<(), SweepError>> + Send>>;

/// Trait for durable key/value state.
///
/// # Design Notes
///
/// - A read of an absent key resolves `Ok(None)`; only genuine host/disk
///   failures are errors. There is no retry policy.
/// - Writes replace the value under one key. The contract itself makes no
///   atomicity promise across writers; callers that read-modify-write must
///   serialize themselves (see [`WhitelistStore`](crate::whitelist::store::WhitelistStore)).
pub trait Storage: Send + Sync {
    /// Read the value stored under `key`, if any.
    fn read(&self, key: &str) -> Reading;

    /// Store `value` under `key`, replacing any previous value.
    fn write(&self, key: &str, value: Value) -> Writing;
}

/// Blanket implementation for Arc-wrapped storages.
impl<S: Storage + ?Sized> Storage for Arc<S> {
    fn read(&self, key: &str) -> Reading {
        (**self).read(key)
    }

    fn write(&self, key: &str, value: Value) -> Writing {
        (**self).write(key, value)
    }
}

/// In-memory storage.
///
/// Cheap to clone; clones share the same underlying map.
#[derive(Clone, Default)]
pub struct MemoryStorage {
    entries: Arc<DashMap<String, Value>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage for MemoryStorage {
    fn read(&self, key: &str) -> Reading {
        let value = self.entries.get(key).map(|v| v.value().clone());
        Box::pin(std::future::ready(Ok(value)))
    }

    fn write(&self, key: &str, value: Value) -> Writing {
        self.entries.insert(key.to_string(), value);
        Box::pin(std::future::ready(Ok(())))
    }
}

/// File-backed storage: a single JSON object holding all keys.
///
/// A missing file reads as empty; every write rewrites the whole file.
pub struct JsonFileStorage {
    path: PathBuf,
}

impl JsonFileStorage {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    async fn load(path: &Path) -> Result<Map<String, Value>, SweepError> {
        let raw = match tokio::fs::read_to_string(path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Map::new()),
            Err(e) => return Err(SweepError::storage(format!("read {path:?}: {e}"))),
        };
        serde_json::from_str(&raw).map_err(|e| SweepError::storage(format!("parse {path:?}: {e}")))
    }
}

impl Storage for JsonFileStorage {
    fn read(&self, key: &str) -> Reading {
        let path = self.path.clone();
        let key = key.to_string();
        Box::pin(async move {
            let doc = Self::load(&path).await?;
            Ok(doc.get(&key).cloned())
        })
    }

    fn write(&self, key: &str, value: Value) -> Writing {
        let path = self.path.clone();
        let key = key.to_string();
        Box::pin(async move {
            let mut doc = Self::load(&path).await?;
            doc.insert(key, value);
            let json = serde_json::to_string_pretty(&Value::Object(doc))
                .map_err(|e| SweepError::storage(format!("encode {path:?}: {e}")))?;
            tokio::fs::write(&path, json)
                .await
                .map_err(|e| SweepError::storage(format!("write {path:?}: {e}")))
        })
    }
}
