//! Classification and deletion.
//!
//! The retention engine compares the live cookie inventory against the live
//! whitelist (nothing is cached, every request re-derives) and drives
//! deletion with confirmed accounting: a sweep only resolves once the host
//! has acknowledged every removal it issued.

use crate::base::error::SweepError;
use crate::cookies::host::CookieHost;
use crate::cookies::record::{CookieRecord, RemovalTarget};
use crate::domain::{self, ParentDomain};
use crate::whitelist::store::WhitelistStore;
use futures::future::join_all;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

/// A non-whitelisted parent domain and how many cookies it holds.
///
/// Derived fresh per classification; never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainSummary {
    pub domain: ParentDomain,
    pub cookie_count: usize,
}

/// What a reconcile pass did, beyond computing its summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReconcileOutcome {
    /// Classification only; nothing was mutated.
    Simulated,
    /// The whitelist was empty, so deletion was skipped entirely. An empty
    /// whitelist must never read as "nothing is trusted, delete everything".
    SkippedEmptyWhitelist,
    /// Deletion ran; every removal was confirmed or counted as failed.
    Executed { removed: usize, failed: usize },
}

/// Result of a reconcile pass.
///
/// The summary always reports what was (or would be) affected, never what
/// remains.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconcileReport {
    pub summary: Vec<DomainSummary>,
    pub outcome: ReconcileOutcome,
}

/// Result of a per-origin or per-cookie deletion.
///
/// `success` requires every attempted removal to be confirmed; a partial
/// failure is reported with the count that did succeed, never swallowed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeletionOutcome {
    pub success: bool,
    pub removed: usize,
    pub attempted: usize,
}

/// Trust status of an arbitrary URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteStatus {
    pub domain: ParentDomain,
    pub is_whitelisted: bool,
    /// False for internal pages and raw hostnames; no web trust decision
    /// applies to those, so they report as whitelisted.
    pub is_web: bool,
}

/// Classifies the cookie inventory against the whitelist and drives deletion.
pub struct RetentionEngine {
    whitelist: Arc<WhitelistStore>,
    host: Arc<dyn CookieHost>,
}

impl RetentionEngine {
    pub fn new(whitelist: Arc<WhitelistStore>, host: Arc<dyn CookieHost>) -> Self {
        Self { whitelist, host }
    }

    /// Group every non-whitelisted cookie by parent domain.
    ///
    /// Output is ascending by domain with exact per-domain counts; for the
    /// same inventory and whitelist the result is fully determined.
    pub async fn classify(&self) -> Result<Vec<DomainSummary>, SweepError> {
        let (whitelist, cookies) = self.snapshot().await?;
        Ok(group_non_whitelisted(&whitelist, &cookies))
    }

    /// Classify, then optionally delete everything outside the whitelist.
    ///
    /// `execute = false` simulates: classification only, no mutation. With
    /// `execute = true` and a non-empty whitelist, every cookie of every
    /// non-whitelisted domain is removed and each host confirmation awaited
    /// before the report resolves. An empty whitelist skips deletion
    /// entirely and says so in the outcome.
    pub async fn reconcile(&self, execute: bool) -> Result<ReconcileReport, SweepError> {
        let (whitelist, cookies) = self.snapshot().await?;
        let summary = group_non_whitelisted(&whitelist, &cookies);

        if !execute {
            return Ok(ReconcileReport {
                summary,
                outcome: ReconcileOutcome::Simulated,
            });
        }

        if whitelist.is_empty() {
            tracing::info!("skipping deletion: whitelist is empty");
            return Ok(ReconcileReport {
                summary,
                outcome: ReconcileOutcome::SkippedEmptyWhitelist,
            });
        }

        let trusted: BTreeSet<&ParentDomain> = whitelist.iter().collect();
        let doomed: Vec<RemovalTarget> = cookies
            .iter()
            .filter(|c| !trusted.contains(&c.parent_domain()))
            .map(CookieRecord::removal_target)
            .collect();

        let results = join_all(doomed.into_iter().map(|t| self.host.remove(t))).await;
        let removed = results.iter().filter(|r| r.is_ok()).count();
        let failed = results.len() - removed;
        tracing::info!(
            domains = summary.len(),
            removed,
            failed,
            "non-whitelisted cookies deleted"
        );

        Ok(ReconcileReport {
            summary,
            outcome: ReconcileOutcome::Executed { removed, failed },
        })
    }

    /// Remove every cookie grouped under one origin.
    ///
    /// Zero cookies is trivially successful. Success is only reported once
    /// the host has confirmed every removal.
    pub async fn delete_for_origin(&self, origin: &str) -> Result<DeletionOutcome, SweepError> {
        let cookies = self.host.list_for_origin(origin).await?;
        let attempted = cookies.len();

        let results = join_all(
            cookies
                .iter()
                .map(|c| self.host.remove(c.removal_target())),
        )
        .await;
        let removed = results.iter().filter(|r| r.is_ok()).count();

        tracing::debug!(origin, attempted, removed, "per-origin deletion");
        Ok(DeletionOutcome {
            success: removed == attempted,
            removed,
            attempted,
        })
    }

    /// Remove a single named cookie at an origin.
    ///
    /// A cookie that no longer exists still reports success: deletion is
    /// idempotent at this granularity.
    pub async fn delete_one(&self, origin: &str, name: &str) -> Result<DeletionOutcome, SweepError> {
        let confirmed = self
            .host
            .remove(RemovalTarget::at_origin(origin, name))
            .await
            .is_ok();
        Ok(DeletionOutcome {
            success: confirmed,
            removed: usize::from(confirmed),
            attempted: 1,
        })
    }

    /// Every cookie grouped under the URL's parent domain.
    ///
    /// Non-web URLs have no cookie-bearing identity and yield nothing.
    pub async fn cookies_for_site(&self, url: &str) -> Result<Vec<CookieRecord>, SweepError> {
        if !domain::is_web_url(url) {
            return Ok(Vec::new());
        }
        let parent = ParentDomain::derive(url);
        let cookies = self.host.list_all().await?;
        Ok(cookies
            .into_iter()
            .filter(|c| c.parent_domain() == parent)
            .collect())
    }

    /// Trust status for an arbitrary URL.
    pub async fn site_status(&self, url: &str) -> Result<SiteStatus, SweepError> {
        let parent = ParentDomain::derive(url);
        if !domain::is_web_url(url) {
            // No trust decision applies; report as whitelisted so callers
            // never offer to sweep an internal page.
            return Ok(SiteStatus {
                domain: parent,
                is_whitelisted: true,
                is_web: false,
            });
        }
        let whitelist = self.whitelist.get().await?;
        Ok(SiteStatus {
            is_whitelisted: whitelist.contains(&parent),
            domain: parent,
            is_web: true,
        })
    }

    /// One coherent read of the whitelist and the cookie inventory.
    async fn snapshot(&self) -> Result<(Vec<ParentDomain>, Vec<CookieRecord>), SweepError> {
        let whitelist = self.whitelist.get().await?;
        let cookies = self.host.list_all().await?;
        Ok((whitelist, cookies))
    }
}

fn group_non_whitelisted(
    whitelist: &[ParentDomain],
    cookies: &[CookieRecord],
) -> Vec<DomainSummary> {
    let trusted: BTreeSet<&ParentDomain> = whitelist.iter().collect();
    let mut groups: BTreeMap<ParentDomain, usize> = BTreeMap::new();
    for cookie in cookies {
        let parent = cookie.parent_domain();
        if trusted.contains(&parent) {
            continue;
        }
        *groups.entry(parent).or_insert(0) += 1;
    }
    groups
        .into_iter()
        .map(|(domain, cookie_count)| DomainSummary {
            domain,
            cookie_count,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cookies::host::{Listing, Removing};
    use crate::cookies::jar::MemoryJar;
    use crate::whitelist::storage::MemoryStorage;

    fn cookie(name: &str, domain: &str) -> CookieRecord {
        CookieRecord {
            name: name.to_string(),
            value: "v".to_string(),
            domain: domain.to_string(),
            path: "/".to_string(),
            secure: true,
            expiration_time: None,
            store_id: "0".to_string(),
        }
    }

    fn engine_with(jar: MemoryJar) -> (RetentionEngine, Arc<WhitelistStore>) {
        let store = Arc::new(WhitelistStore::new(Arc::new(MemoryStorage::new())));
        let engine = RetentionEngine::new(Arc::clone(&store), Arc::new(jar));
        (engine, store)
    }

    fn seeded_jar() -> MemoryJar {
        let jar = MemoryJar::new();
        jar.insert(cookie("a", "github.com"));
        jar.insert(cookie("b", "github.com"));
        jar.insert(cookie("c", "sub.github.com"));
        jar.insert(cookie("d", "tracker.net"));
        jar.insert(cookie("e", ".tracker.net"));
        jar.insert(cookie("f", "ads.tracker.net"));
        jar
    }

    /// Host double whose removals all fail, wrapping a jar for listings.
    struct BrokenRemovalHost {
        jar: MemoryJar,
    }

    impl CookieHost for BrokenRemovalHost {
        fn list_all(&self) -> Listing {
            self.jar.list_all()
        }

        fn list_for_origin(&self, origin: &str) -> Listing {
            self.jar.list_for_origin(origin)
        }

        fn remove(&self, _target: RemovalTarget) -> Removing {
            Box::pin(std::future::ready(Err(SweepError::host("jar went away"))))
        }
    }

    /// Host double that fails removal of one named cookie only.
    struct FlakyRemovalHost {
        jar: MemoryJar,
        sticky_name: String,
    }

    impl CookieHost for FlakyRemovalHost {
        fn list_all(&self) -> Listing {
            self.jar.list_all()
        }

        fn list_for_origin(&self, origin: &str) -> Listing {
            self.jar.list_for_origin(origin)
        }

        fn remove(&self, target: RemovalTarget) -> Removing {
            if target.name == self.sticky_name {
                return Box::pin(std::future::ready(Err(SweepError::host(
                    "cookie is stuck",
                ))));
            }
            self.jar.remove(target)
        }
    }

    #[tokio::test]
    async fn test_classify_excludes_whitelisted_and_sorts() {
        let (engine, store) = engine_with(seeded_jar());
        store
            .add(&ParentDomain::derive("github.com"))
            .await
            .unwrap();

        let summary = engine.classify().await.unwrap();
        assert_eq!(summary.len(), 1);
        assert_eq!(summary[0].domain.as_str(), "tracker.net");
        assert_eq!(summary[0].cookie_count, 3);
    }

    #[tokio::test]
    async fn test_classify_counts_are_exact_and_ascending() {
        let jar = MemoryJar::new();
        jar.insert(cookie("a", "zebra.org"));
        jar.insert(cookie("b", "alpha.org"));
        jar.insert(cookie("c", "alpha.org"));
        let (engine, _) = engine_with(jar);

        let summary = engine.classify().await.unwrap();
        let as_pairs: Vec<(&str, usize)> = summary
            .iter()
            .map(|s| (s.domain.as_str(), s.cookie_count))
            .collect();
        assert_eq!(as_pairs, vec![("alpha.org", 2), ("zebra.org", 1)]);
    }

    #[tokio::test]
    async fn test_classify_union_covers_every_parent_domain() {
        let (engine, store) = engine_with(seeded_jar());
        store
            .add(&ParentDomain::derive("github.com"))
            .await
            .unwrap();

        let mut covered: BTreeSet<ParentDomain> = engine
            .classify()
            .await
            .unwrap()
            .into_iter()
            .map(|s| s.domain)
            .collect();
        covered.extend(store.get().await.unwrap());

        let seen: BTreeSet<ParentDomain> = seeded_jar()
            .list_all()
            .await
            .unwrap()
            .iter()
            .map(CookieRecord::parent_domain)
            .collect();
        assert!(seen.is_subset(&covered));
    }

    #[tokio::test]
    async fn test_simulate_does_not_mutate() {
        let jar = seeded_jar();
        let (engine, store) = engine_with(jar.clone());
        store
            .add(&ParentDomain::derive("github.com"))
            .await
            .unwrap();

        let report = engine.reconcile(false).await.unwrap();
        assert_eq!(report.outcome, ReconcileOutcome::Simulated);
        assert_eq!(report.summary.len(), 1);
        assert_eq!(jar.total_cookie_count(), 6);
    }

    #[tokio::test]
    async fn test_empty_whitelist_guard_skips_deletion() {
        let jar = seeded_jar();
        let (engine, _) = engine_with(jar.clone());

        let report = engine.reconcile(true).await.unwrap();
        assert_eq!(report.outcome, ReconcileOutcome::SkippedEmptyWhitelist);
        // The summary still reports what classification found.
        assert!(!report.summary.is_empty());
        assert_eq!(report.summary, engine.classify().await.unwrap());
        assert_eq!(jar.total_cookie_count(), 6);
    }

    #[tokio::test]
    async fn test_executed_sweep_deletes_only_non_whitelisted() {
        let jar = seeded_jar();
        let (engine, store) = engine_with(jar.clone());
        store
            .add(&ParentDomain::derive("github.com"))
            .await
            .unwrap();

        let before = engine.classify().await.unwrap();
        let report = engine.reconcile(true).await.unwrap();

        // The report reflects what was removed, not what remains.
        assert_eq!(report.summary, before);
        assert_eq!(
            report.outcome,
            ReconcileOutcome::Executed {
                removed: 3,
                failed: 0
            }
        );

        // All three github.com-family cookies survive.
        assert_eq!(jar.total_cookie_count(), 3);
        let remaining = jar.list_all().await.unwrap();
        assert!(remaining
            .iter()
            .all(|c| c.parent_domain().as_str() == "github.com"));
    }

    #[tokio::test]
    async fn test_executed_sweep_counts_host_failures() {
        let jar = seeded_jar();
        let host = BrokenRemovalHost { jar };
        let store = Arc::new(WhitelistStore::new(Arc::new(MemoryStorage::new())));
        store
            .add(&ParentDomain::derive("github.com"))
            .await
            .unwrap();
        let engine = RetentionEngine::new(store, Arc::new(host));

        let report = engine.reconcile(true).await.unwrap();
        assert_eq!(
            report.outcome,
            ReconcileOutcome::Executed {
                removed: 0,
                failed: 3
            }
        );
    }

    #[tokio::test]
    async fn test_delete_for_origin_confirms_every_removal() {
        let jar = seeded_jar();
        let (engine, _) = engine_with(jar.clone());

        let outcome = engine
            .delete_for_origin("https://tracker.net/")
            .await
            .unwrap();
        assert!(outcome.success);
        assert_eq!(outcome.removed, 3);
        assert_eq!(outcome.attempted, 3);
        assert_eq!(jar.total_cookie_count(), 3);
    }

    #[tokio::test]
    async fn test_delete_for_origin_zero_cookies_is_success() {
        let (engine, _) = engine_with(MemoryJar::new());
        let outcome = engine
            .delete_for_origin("https://nothing.example/")
            .await
            .unwrap();
        assert!(outcome.success);
        assert_eq!(outcome.attempted, 0);
    }

    #[tokio::test]
    async fn test_delete_for_origin_partial_failure_is_reported() {
        let jar = seeded_jar();
        let host = FlakyRemovalHost {
            jar,
            sticky_name: "d".to_string(),
        };
        let store = Arc::new(WhitelistStore::new(Arc::new(MemoryStorage::new())));
        let engine = RetentionEngine::new(store, Arc::new(host));

        let outcome = engine
            .delete_for_origin("https://tracker.net/")
            .await
            .unwrap();
        assert!(!outcome.success);
        assert_eq!(outcome.removed, 2);
        assert_eq!(outcome.attempted, 3);
    }

    #[tokio::test]
    async fn test_delete_one_absent_cookie_is_success() {
        let (engine, _) = engine_with(MemoryJar::new());
        let outcome = engine
            .delete_one("https://example.com/", "ghost")
            .await
            .unwrap();
        assert!(outcome.success);
        assert_eq!(outcome.removed, 1);
    }

    #[tokio::test]
    async fn test_cookies_for_site_filters_by_parent_domain() {
        let (engine, _) = engine_with(seeded_jar());
        let cookies = engine
            .cookies_for_site("https://gist.github.com/x")
            .await
            .unwrap();
        assert_eq!(cookies.len(), 3);

        let none = engine
            .cookies_for_site("chrome://extensions")
            .await
            .unwrap();
        assert!(none.is_empty());
    }

    #[tokio::test]
    async fn test_site_status_reports_trust() {
        let (engine, store) = engine_with(seeded_jar());
        store
            .add(&ParentDomain::derive("github.com"))
            .await
            .unwrap();

        let status = engine
            .site_status("https://sub.github.com/page")
            .await
            .unwrap();
        assert!(status.is_web);
        assert!(status.is_whitelisted);
        assert_eq!(status.domain.as_str(), "github.com");

        let status = engine.site_status("https://tracker.net/").await.unwrap();
        assert!(!status.is_whitelisted);

        // Internal pages carry no trust decision.
        let status = engine.site_status("chrome://extensions").await.unwrap();
        assert!(!status.is_web);
        assert!(status.is_whitelisted);
    }
}
