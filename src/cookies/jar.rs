//! In-memory cookie jar.
//!
//! A [`CookieHost`] implementation backed by a concurrent map, keyed by the
//! stored cookie domain. Used by the test suite and by embedders that want
//! the retention engine without a real browser behind it.

use crate::base::error::SweepError;
use crate::cookies::host::{CookieHost, Listing, Removing};
use crate::cookies::record::{CookieRecord, RemovalTarget};
use crate::domain::ParentDomain;
use dashmap::DashMap;
use std::sync::Arc;
use url::Url;

/// An in-memory cookie store.
///
/// Cheap to clone; clones share the same underlying jar.
#[derive(Clone)]
pub struct MemoryJar {
    // Store: Map<StoredDomain, List<Cookie>>
    store: Arc<DashMap<String, Vec<CookieRecord>>>,
}

impl Default for MemoryJar {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryJar {
    pub fn new() -> Self {
        Self {
            store: Arc::new(DashMap::new()),
        }
    }

    /// Insert a cookie, replacing any existing one with the same name, path,
    /// and store id under the same stored domain.
    pub fn insert(&self, cookie: CookieRecord) {
        let mut entry = self.store.entry(cookie.domain.clone()).or_default();
        entry.retain(|c| {
            c.name != cookie.name || c.path != cookie.path || c.store_id != cookie.store_id
        });
        entry.push(cookie);
    }

    /// Total cookie count across all domains.
    pub fn total_cookie_count(&self) -> usize {
        self.store.iter().map(|e| e.value().len()).sum()
    }

    fn snapshot(&self) -> Vec<CookieRecord> {
        self.store
            .iter()
            .flat_map(|entry| entry.value().clone())
            .collect()
    }
}

impl CookieHost for MemoryJar {
    fn list_all(&self) -> Listing {
        let cookies = self.snapshot();
        Box::pin(std::future::ready(Ok(cookies)))
    }

    fn list_for_origin(&self, origin: &str) -> Listing {
        let parent = ParentDomain::derive(origin);
        let cookies: Vec<CookieRecord> = self
            .snapshot()
            .into_iter()
            .filter(|c| !parent.is_empty() && c.parent_domain() == parent)
            .collect();
        Box::pin(std::future::ready(Ok(cookies)))
    }

    fn remove(&self, target: RemovalTarget) -> Removing {
        let url = match Url::parse(&target.url) {
            Ok(url) => url,
            Err(e) => {
                let err = SweepError::host(format!("malformed removal url {:?}: {e}", target.url));
                return Box::pin(std::future::ready(Err(err)));
            }
        };
        let host = url.host_str().unwrap_or("").to_string();
        let path = url.path().to_string();

        // Collect matching domain keys first; mutating while iterating a
        // DashMap deadlocks.
        let keys: Vec<String> = self
            .store
            .iter()
            .filter(|entry| {
                entry
                    .key()
                    .trim_start_matches('.')
                    .eq_ignore_ascii_case(&host)
            })
            .map(|entry| entry.key().clone())
            .collect();

        for key in keys {
            if let Some(mut entry) = self.store.get_mut(&key) {
                entry.retain(|c| {
                    c.name != target.name
                        || c.path != path
                        || (!target.store_id.is_empty() && c.store_id != target.store_id)
                });
            }
        }

        // Absent cookies count as removed: deletion is idempotent.
        Box::pin(std::future::ready(Ok(())))
    }
}
