//! The cookie host contract.
//!
//! This is the seam between the retention core and whatever actually owns
//! the cookie jar: a browser extension bridge, a testing double, or the
//! in-tree [`MemoryJar`](crate::cookies::jar::MemoryJar).

use crate::base::error::SweepError;
use crate::cookies::record::{CookieRecord, RemovalTarget};
use std::{future::Future, pin::Pin, sync::Arc};

/// Alias for the `Future` type returned by listing calls.
pub type Listing = Pin<Box<dyn Future<Output = Result<Vec<CookieRecord>, SweepError>> + Send>>;

/// Alias for the `Future` type returned by removal calls.
pub type Removing = Pin<Box<dyn Future<Output = Result<(), SweepError>> + Send>>;

/// Trait for the external owner of the cookie inventory.
///
/// # Design Notes
///
/// - Listings are best-effort snapshots; there is no transactional guarantee
///   versus concurrent browser activity.
/// - `remove` resolving `Ok` means the host confirmed the cookie is gone,
///   including the case where it was already absent (idempotent deletion).
///   `Err` means the host could not carry the removal out.
/// - Uses `&self` so many requests can be in flight concurrently.
/// - Returns boxed futures for trait object compatibility.
pub trait CookieHost: Send + Sync {
    /// Snapshot every cookie the host currently holds.
    fn list_all(&self) -> Listing;

    /// Snapshot the cookies grouped under the origin's parent domain.
    fn list_for_origin(&self, origin: &str) -> Listing;

    /// Remove a single cookie and confirm it is gone.
    fn remove(&self, target: RemovalTarget) -> Removing;
}

/// Blanket implementation for Arc-wrapped hosts.
impl<H: CookieHost + ?Sized> CookieHost for Arc<H> {
    fn list_all(&self) -> Listing {
        (**self).list_all()
    }

    fn list_for_origin(&self, origin: &str) -> Listing {
        (**self).list_for_origin(origin)
    }

    fn remove(&self, target: RemovalTarget) -> Removing {
        (**self).remove(target)
    }
}
