//! # cookiesweep
//!
//! A domain-scoped cookie retention engine for Rust.
//!
//! `cookiesweep` lets an embedder designate a set of trusted parent domains
//! (the whitelist) and bulk-remove cookies for every domain outside that set,
//! while leaving trusted domains untouched.
//!
//! ## Features
//!
//! - **Parent-Domain Identity**: deterministic, idempotent normalization of
//!   URLs and cookie domains to a canonical trust unit
//! - **Whitelist Store**: persisted ordered set with serialized mutations
//!   (dedupe + ascending order enforced in one place)
//! - **Retention Engine**: classification, simulated or executed sweeps with
//!   an empty-whitelist safety guard, per-origin and per-cookie deletion
//! - **Race-Safe Accounting**: every removal is confirmed by the host before
//!   a sweep reports success
//! - **Pluggable Hosts**: cookie inventory and durable storage are trait
//!   contracts; an in-memory jar and a JSON-file store ship in-tree
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use cookiesweep::cookies::jar::MemoryJar;
//! use cookiesweep::dispatch::{Command, Sweeper};
//! use cookiesweep::whitelist::storage::MemoryStorage;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() {
//!     let sweeper = Sweeper::new(Arc::new(MemoryStorage::new()), Arc::new(MemoryJar::new()));
//!     let report = sweeper.dispatch(Command::DeleteNonWhitelisted).await.unwrap();
//!     println!("{report:?}");
//! }
//! ```
//!
//! ## Modules
//!
//! - [`base`] - Core error definitions
//! - [`domain`] - Parent-domain derivation
//! - [`whitelist`] - Durable storage contract and the whitelist store
//! - [`cookies`] - Cookie records, the host contract, and the in-memory jar
//! - [`engine`] - Classification and deletion
//! - [`dispatch`] - Command surface for external UI layers
//!
//! ## Safety Guards
//!
//! An empty whitelist is never interpreted as "nothing is trusted": executed
//! sweeps skip deletion entirely in that state and report why, so a fresh
//! install can never wipe the whole jar by accident.

pub mod base;
pub mod cookies;
pub mod dispatch;
pub mod domain;
pub mod engine;
pub mod whitelist;
