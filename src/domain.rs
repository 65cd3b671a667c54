//! Parent-domain derivation.
//!
//! A [`ParentDomain`] is the canonical trust identity for a site, derived
//! from a URL or a stored cookie domain. Two inputs with the same parent
//! domain are the same trust unit: whitelisting `google.com` covers
//! `mail.google.com` cookies and `.google.com` cookies alike.
//!
//! # Known limitation
//!
//! Derivation keeps the last two dot-labels of a multi-label host. This is
//! not public-suffix-list resolution: `news.bbc.co.uk` derives to `co.uk`,
//! not `bbc.co.uk`. The simplification is deliberate and documented; callers
//! that need eTLD+1 semantics must not rely on this type.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The canonical parent-domain identity of a URL or cookie domain.
///
/// Construct via [`ParentDomain::derive`]; derivation is deterministic,
/// idempotent, pure, and never fails (untrusted input degrades to an
/// empty or as-given identity rather than erroring).
#[derive(Clone, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParentDomain {
    host: Box<str>,
}

impl ParentDomain {
    /// Derive the parent domain for a raw URL, hostname, or cookie domain.
    ///
    /// Steps:
    /// 1. A non-web scheme (`chrome://extensions`) keeps `scheme://authority`
    ///    as its own identity, never grouped with web domains.
    /// 2. Strip a leading `http://`/`https://`.
    /// 3. Truncate at the first `/`.
    /// 4. Strip one leading `.` (cookie domains mark subdomain scope with it).
    /// 5. Keep the last two dot-labels of a longer host.
    ///
    /// Case is preserved as given; empty and single-label inputs (such as
    /// `localhost`) come back unchanged.
    pub fn derive(input: &str) -> Self {
        if let Some((scheme, rest)) = input.split_once("://") {
            if !scheme.eq_ignore_ascii_case("http") && !scheme.eq_ignore_ascii_case("https") {
                let authority = rest.split('/').next().unwrap_or("");
                return Self {
                    host: format!("{scheme}://{authority}").into(),
                };
            }
        }

        let stripped = strip_web_scheme(input);
        let host = stripped.split('/').next().unwrap_or("");
        let host = host.strip_prefix('.').unwrap_or(host);

        let labels: Vec<&str> = host.split('.').collect();
        if labels.len() > 2 {
            Self {
                host: labels[labels.len() - 2..].join(".").into(),
            }
        } else {
            Self { host: host.into() }
        }
    }

    /// View the parent domain as a string slice.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.host
    }

    /// True when derivation produced no identity at all (empty input).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.host.is_empty()
    }
}

impl fmt::Debug for ParentDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.host, f)
    }
}

impl fmt::Display for ParentDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.host, f)
    }
}

/// True for `http://` / `https://` URLs, the only inputs that carry a web
/// trust decision. Everything else (internal pages, raw hostnames without a
/// scheme) is not a web URL.
pub fn is_web_url(input: &str) -> bool {
    let lower = input.get(..8).unwrap_or(input).to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

fn strip_web_scheme(input: &str) -> &str {
    for prefix in ["https://", "http://"] {
        match input.get(..prefix.len()) {
            Some(head) if head.eq_ignore_ascii_case(prefix) => return &input[prefix.len()..],
            _ => {}
        }
    }
    input
}
