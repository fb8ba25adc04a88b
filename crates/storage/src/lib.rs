//! Storage layer for testdb
//!
//! - [`config`]: store location and pool tuning
//! - [`pool`]: bounded connection pool with transactional units of work
//! - [`schema`]: creation and verification of the persisted relations

#![warn(missing_docs)]

pub mod config;
pub mod pool;
pub mod schema;

pub use config::StoreConfig;
pub use pool::{ConnectionPool, PoolStats};
pub use schema::{ensure_schema, SchemaStatus, RESULT_TABLE, RUN_TABLE};

// Transactions handed to units of work
pub use rusqlite::{OptionalExtension, Transaction};

use testdb_core::Error;

/// Map a storage engine error into the store taxonomy
pub fn storage_error(e: rusqlite::Error) -> Error {
    Error::storage(e.to_string())
}
