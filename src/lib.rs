//! # testdb
//!
//! Persistence core of a protocol conformance test harness.
//!
//! Test executors record *runs* (campaigns) and the *results* produced during
//! them; report generators read results back by id. Neither side talks to the
//! other directly.
//!
//! ## Quick Start
//!
//! ```ignore
//! use testdb::prelude::*;
//!
//! let db = TestDb::open(".wstest.db").await?;
//!
//! let run = db.runs.new_run("fuzzingclient", &json!({"cases": ["*"]})).await?;
//! let id = db.results.save_result(run, &CaseOutcome::new("1.1.1", "OK")).await?;
//! db.runs.close_run(run).await?;
//!
//! // later, in a report generator
//! let result = db.results.get_result::<CaseOutcome>(id).await?;
//! assert_eq!(result.behavior.as_deref(), Some("OK"));
//!
//! db.close().await?;
//! ```
//!
//! ## Guarantees
//!
//! - A result is only ever attached to a run that exists and is open
//! - A run is closed exactly once
//! - Every operation is one transaction; failures leave no partial rows

#![warn(missing_docs)]

mod database;
mod error;

pub mod prelude;

pub use database::{TestDb, TestDbBuilder};
pub use error::{Error, Result};

pub use testdb_core::{
    AttributeSet, CaseOutcome, ResultId, RunId, RunStatus, TestMode, TestResult, TestRun,
    Timestamp,
};
pub use testdb_primitives::{ResultStore, RunIndex};
pub use testdb_storage::{PoolStats, SchemaStatus, StoreConfig};
