use thiserror::Error;

/// Crate-wide error type.
///
/// Only genuine failures are errors. Deliberate no-ops (the empty-whitelist
/// guard) and partial deletion results are reported through the engine's
/// outcome types instead, so callers never have to fish a non-failure out of
/// an `Err`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SweepError {
    /// The cookie host (browser jar or equivalent) could not serve the call.
    #[error("cookie host unavailable: {message}")]
    Host { message: String },

    /// Reading or writing the durable key/value store failed.
    #[error("storage failure: {message}")]
    Storage { message: String },

    /// A required request parameter was missing or blank.
    #[error("invalid request: {message}")]
    InvalidRequest { message: String },
}

impl SweepError {
    /// Create a host error.
    pub fn host(message: impl Into<String>) -> Self {
        SweepError::Host {
            message: message.into(),
        }
    }

    /// Create a storage error.
    pub fn storage(message: impl Into<String>) -> Self {
        SweepError::Storage {
            message: message.into(),
        }
    }

    /// Create an invalid-request error.
    pub fn invalid_request(message: impl Into<String>) -> Self {
        SweepError::InvalidRequest {
            message: message.into(),
        }
    }
}
