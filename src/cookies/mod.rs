//! Cookie records, the host contract, and the in-memory jar.
//!
//! The core never owns the cookie inventory. It sees cookies through the
//! [`CookieHost`](host::CookieHost) contract: best-effort snapshots of what
//! the browser (or an equivalent site-data store) holds right now, plus a
//! confirmed removal primitive. [`MemoryJar`](jar::MemoryJar) is the in-tree
//! host implementation used by tests and embedders without a real browser.

pub mod host;
pub mod jar;
pub mod record;
