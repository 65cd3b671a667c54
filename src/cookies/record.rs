use crate::domain::ParentDomain;
use time::OffsetDateTime;

/// One cookie as presented by the host.
///
/// A read-only snapshot row: the core groups and deletes by it but never
/// mutates it. `domain` is kept exactly as stored by the browser, including
/// an optional leading dot marking subdomain scope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CookieRecord {
    pub name: String,
    pub value: String,
    pub domain: String,
    pub path: String,
    pub secure: bool,
    /// Absent means a session cookie.
    pub expiration_time: Option<OffsetDateTime>,
    /// Cookie store / partition identifier, as reported by the host.
    pub store_id: String,
}

impl CookieRecord {
    /// The trust unit this cookie belongs to.
    pub fn parent_domain(&self) -> ParentDomain {
        ParentDomain::derive(&self.domain)
    }

    /// True for cookies that live only for the browsing session.
    pub fn is_session(&self) -> bool {
        self.expiration_time.is_none()
    }

    /// Build the `{url, name, store_id}` triple the host's removal primitive
    /// takes. The URL scheme follows the secure flag and the stored domain
    /// loses its leading dot, since removal addresses a concrete host.
    pub fn removal_target(&self) -> RemovalTarget {
        let scheme = if self.secure { "https" } else { "http" };
        let host = self.domain.trim_start_matches('.');
        RemovalTarget {
            url: format!("{scheme}://{host}{}", self.path),
            name: self.name.clone(),
            store_id: self.store_id.clone(),
        }
    }
}

/// Addressing triple for a single cookie removal.
///
/// An empty `store_id` means "the host's default store".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemovalTarget {
    pub url: String,
    pub name: String,
    pub store_id: String,
}

impl RemovalTarget {
    /// Target a named cookie at an origin URL in the default store.
    pub fn at_origin(origin: impl Into<String>, name: impl Into<String>) -> Self {
        RemovalTarget {
            url: origin.into(),
            name: name.into(),
            store_id: String::new(),
        }
    }
}
