//! The whitelist store.
//!
//! Single owner of the persisted trust set. Every mutation is a
//! read-modify-write over [`Storage`], serialized behind one async mutex so
//! concurrent single-domain edits never silently overwrite each other.
//! The canonical invariant (no duplicates, ascending lexicographic order)
//! is enforced here and nowhere else.

use crate::base::error::SweepError;
use crate::domain::ParentDomain;
use crate::whitelist::storage::Storage;
use serde_json::Value;
use std::collections::BTreeSet;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Storage key holding the whitelist (JSON array of strings).
pub const WHITELIST_KEY: &str = "whitelist";

/// Storage key holding the startup-sweep preference (JSON bool).
pub const DELETE_ON_STARTUP_KEY: &str = "deleteOnStartup";

/// Result of a membership toggle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToggleOutcome {
    pub whitelist: Vec<ParentDomain>,
    /// Membership state of the toggled domain after the call.
    pub is_whitelisted: bool,
}

/// Persisted ordered set of trusted parent domains.
pub struct WhitelistStore {
    storage: Arc<dyn Storage>,
    write_lock: Mutex<()>,
}

impl WhitelistStore {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self {
            storage,
            write_lock: Mutex::new(()),
        }
    }

    /// Current whitelist; an absent storage key reads as empty.
    pub async fn get(&self) -> Result<Vec<ParentDomain>, SweepError> {
        self.load().await
    }

    /// Replace the whole whitelist from untrusted entry text.
    ///
    /// Each entry is derived to its parent domain; blank entries are dropped
    /// rather than errored. The persisted result is deduped and ascending,
    /// and is returned so callers can render the canonical form.
    pub async fn replace(&self, entries: &[String]) -> Result<Vec<ParentDomain>, SweepError> {
        let _guard = self.write_lock.lock().await;
        let canonical = canonicalize(entries.iter().map(|e| ParentDomain::derive(e.trim())));
        self.persist(&canonical).await?;
        tracing::debug!(count = canonical.len(), "whitelist replaced");
        Ok(canonical)
    }

    /// Insert a domain; a no-op when already present.
    pub async fn add(&self, domain: &ParentDomain) -> Result<Vec<ParentDomain>, SweepError> {
        let _guard = self.write_lock.lock().await;
        let mut list = self.load().await?;
        if !list.contains(domain) {
            list.push(domain.clone());
            let list = canonicalize(list);
            self.persist(&list).await?;
            tracing::debug!(domain = %domain, "whitelist add");
            return Ok(list);
        }
        Ok(list)
    }

    /// Remove a domain; a no-op when absent.
    pub async fn remove(&self, domain: &ParentDomain) -> Result<Vec<ParentDomain>, SweepError> {
        let _guard = self.write_lock.lock().await;
        let mut list = self.load().await?;
        let before = list.len();
        list.retain(|d| d != domain);
        if list.len() != before {
            self.persist(&list).await?;
            tracing::debug!(domain = %domain, "whitelist remove");
        }
        Ok(list)
    }

    /// Invert membership of exactly one domain and report the new state.
    ///
    /// The whole read-modify-write runs under the store's mutex, so a toggle
    /// racing a toggle of a different domain loses neither edit.
    pub async fn toggle(&self, domain: &ParentDomain) -> Result<ToggleOutcome, SweepError> {
        let _guard = self.write_lock.lock().await;
        let mut list = self.load().await?;
        let was_whitelisted = list.contains(domain);
        if was_whitelisted {
            list.retain(|d| d != domain);
        } else {
            list.push(domain.clone());
            list = canonicalize(list);
        }
        self.persist(&list).await?;
        tracing::debug!(domain = %domain, is_whitelisted = !was_whitelisted, "whitelist toggle");
        Ok(ToggleOutcome {
            whitelist: list,
            is_whitelisted: !was_whitelisted,
        })
    }

    /// Whether an executed sweep should run once per browser launch.
    pub async fn delete_on_startup(&self) -> Result<bool, SweepError> {
        let value = self.storage.read(DELETE_ON_STARTUP_KEY).await?;
        Ok(value.and_then(|v| v.as_bool()).unwrap_or(false))
    }

    /// Persist the startup-sweep preference and return it.
    pub async fn set_delete_on_startup(&self, enabled: bool) -> Result<bool, SweepError> {
        let _guard = self.write_lock.lock().await;
        self.storage
            .write(DELETE_ON_STARTUP_KEY, Value::Bool(enabled))
            .await?;
        Ok(enabled)
    }

    async fn load(&self) -> Result<Vec<ParentDomain>, SweepError> {
        let Some(value) = self.storage.read(WHITELIST_KEY).await? else {
            return Ok(Vec::new());
        };
        let entries: Vec<String> = serde_json::from_value(value)
            .map_err(|e| SweepError::storage(format!("malformed whitelist: {e}")))?;
        // Re-derivation is idempotent for values this store wrote, and
        // canonicalizes hand-edited state.
        Ok(canonicalize(
            entries.iter().map(|e| ParentDomain::derive(e.trim())),
        ))
    }

    async fn persist(&self, list: &[ParentDomain]) -> Result<(), SweepError> {
        let value = serde_json::to_value(list)
            .map_err(|e| SweepError::storage(format!("encode whitelist: {e}")))?;
        self.storage.write(WHITELIST_KEY, value).await
    }
}

/// Dedupe, drop empties, sort ascending.
fn canonicalize(entries: impl IntoIterator<Item = ParentDomain>) -> Vec<ParentDomain> {
    entries
        .into_iter()
        .filter(|d| !d.is_empty())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
