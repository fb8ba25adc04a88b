//! Error types for the test run store
//!
//! Every operation returns [`Result<T>`]. Variants are split into two groups:
//!
//! | Group | Variants | Meaning |
//! |-------|----------|---------|
//! | Logical | `InvalidMode`, `RunNotFound`, `RunAlreadyClosed`, `ResultNotFound`, `Decode` | Caller misuse or a lost race, reported as-is |
//! | Infrastructure | `PoolUnavailable`, `Schema`, `Storage`, `Io`, `Internal` | The store itself cannot serve the request |
//!
//! Neither group is retried internally.

use thiserror::Error;

/// All store errors.
#[derive(Debug, Error)]
pub enum Error {
    /// Mode is not one of the known campaign modes
    #[error("mode '{mode}' invalid or not implemented")]
    InvalidMode {
        /// The rejected mode string
        mode: String,
    },

    /// Referenced run does not exist
    #[error("no such test run: {run_id}")]
    RunNotFound {
        /// The run identifier that was looked up
        run_id: String,
    },

    /// Referenced run has already been closed
    #[error("test run already closed: {run_id}")]
    RunAlreadyClosed {
        /// The closed run
        run_id: String,
    },

    /// Referenced result does not exist
    #[error("no such test result: {result_id}")]
    ResultNotFound {
        /// The result identifier that was looked up
        result_id: String,
    },

    /// A stored or supplied blob could not be decoded
    #[error("decode error: {message}")]
    Decode {
        /// Parser message
        message: String,
    },

    /// No pooled connection could be handed out
    #[error("connection pool unavailable: {reason}")]
    PoolUnavailable {
        /// Why the pool refused
        reason: String,
    },

    /// Store exists but does not carry the expected relations
    #[error("schema error: {message}")]
    Schema {
        /// What is missing or wrong
        message: String,
    },

    /// Storage engine error
    #[error("storage error: {message}")]
    Storage {
        /// Engine message
        message: String,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Internal error (bug or worker failure)
    #[error("internal error: {message}")]
    Internal {
        /// Details
        message: String,
    },
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create an InvalidMode error
    pub fn invalid_mode(mode: impl Into<String>) -> Self {
        Error::InvalidMode { mode: mode.into() }
    }

    /// Create a RunNotFound error
    pub fn run_not_found(run_id: impl ToString) -> Self {
        Error::RunNotFound {
            run_id: run_id.to_string(),
        }
    }

    /// Create a RunAlreadyClosed error
    pub fn run_already_closed(run_id: impl ToString) -> Self {
        Error::RunAlreadyClosed {
            run_id: run_id.to_string(),
        }
    }

    /// Create a ResultNotFound error
    pub fn result_not_found(result_id: impl ToString) -> Self {
        Error::ResultNotFound {
            result_id: result_id.to_string(),
        }
    }

    /// Create a Decode error
    pub fn decode(message: impl Into<String>) -> Self {
        Error::Decode {
            message: message.into(),
        }
    }

    /// Create a PoolUnavailable error
    pub fn pool_unavailable(reason: impl Into<String>) -> Self {
        Error::PoolUnavailable {
            reason: reason.into(),
        }
    }

    /// Create a Schema error
    pub fn schema(message: impl Into<String>) -> Self {
        Error::Schema {
            message: message.into(),
        }
    }

    /// Create a Storage error
    pub fn storage(message: impl Into<String>) -> Self {
        Error::Storage {
            message: message.into(),
        }
    }

    /// Create an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Error::Internal {
            message: message.into(),
        }
    }

    /// Check if this is a not-found error (run or result).
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::RunNotFound { .. } | Error::ResultNotFound { .. })
    }

    /// Check if the referenced run was already closed.
    pub fn is_run_closed(&self) -> bool {
        matches!(self, Error::RunAlreadyClosed { .. })
    }

    /// Check if this error comes from the store rather than the caller.
    ///
    /// Infrastructure errors map to a service-unavailable condition at the
    /// orchestration layer.
    pub fn is_infrastructure(&self) -> bool {
        matches!(
            self,
            Error::PoolUnavailable { .. }
                | Error::Schema { .. }
                | Error::Storage { .. }
                | Error::Io(_)
                | Error::Internal { .. }
        )
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::decode(e.to_string())
    }
}
