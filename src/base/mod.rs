//! Base types and error handling.
//!
//! Provides the crate-wide error type:
//! - [`SweepError`](error::SweepError): host, storage, and request errors

pub mod error;
