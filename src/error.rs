//! Error types for testdb.
//!
//! The facade shares the core taxonomy so callers can match on
//! `Error::RunNotFound`, `Error::RunAlreadyClosed` and friends directly.

pub use testdb_core::error::{Error, Result};
