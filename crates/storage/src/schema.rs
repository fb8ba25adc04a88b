//! Schema bootstrap
//!
//! Two relations back the store:
//!
//! ```text
//! testrun    { id TEXT PRIMARY KEY, mode TEXT NOT NULL, started TEXT NOT NULL, ended TEXT, spec TEXT NOT NULL }
//! testresult { id TEXT PRIMARY KEY, runId TEXT NOT NULL, result TEXT NOT NULL }
//! ```
//!
//! A store with no tables at all gets both relations created. A store that
//! already has tables is only verified; nothing is altered.

use crate::pool::ConnectionPool;
use crate::storage_error;
use rusqlite::Transaction;
use testdb_core::{Error, Result};
use tracing::info;

/// Relation holding test runs
pub const RUN_TABLE: &str = "testrun";

/// Relation holding test results
pub const RESULT_TABLE: &str = "testresult";

const RUN_COLUMNS: &[&str] = &["id", "mode", "started", "ended", "spec"];
const RESULT_COLUMNS: &[&str] = &["id", "runId", "result"];

const CREATE_SCHEMA: &str = "
    CREATE TABLE testrun (
        id       TEXT  PRIMARY KEY,
        mode     TEXT  NOT NULL,
        started  TEXT  NOT NULL,
        ended    TEXT,
        spec     TEXT  NOT NULL
    );

    CREATE TABLE testresult (
        id       TEXT  PRIMARY KEY,
        runId    TEXT  NOT NULL,
        result   TEXT  NOT NULL
    );
";

/// What `ensure_schema` did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaStatus {
    /// Relations were created in an empty store
    Created,
    /// Existing relations matched
    Verified,
}

/// Create the relations in an empty store, or verify an existing one.
pub async fn ensure_schema(pool: &ConnectionPool) -> Result<SchemaStatus> {
    let path = pool.path().display().to_string();
    let status = pool
        .run_interaction(|txn| {
            if table_count(txn)? == 0 {
                txn.execute_batch(CREATE_SCHEMA).map_err(storage_error)?;
                return Ok(SchemaStatus::Created);
            }
            verify_table(txn, RUN_TABLE, RUN_COLUMNS)?;
            verify_table(txn, RESULT_TABLE, RESULT_COLUMNS)?;
            Ok(SchemaStatus::Verified)
        })
        .await?;
    match status {
        SchemaStatus::Created => info!(path = %path, "created test database"),
        SchemaStatus::Verified => info!(path = %path, "verified test database"),
    }
    Ok(status)
}

fn table_count(txn: &Transaction<'_>) -> Result<i64> {
    txn.query_row(
        "SELECT count(*) FROM sqlite_master WHERE type = 'table'",
        [],
        |row| row.get(0),
    )
    .map_err(storage_error)
}

fn verify_table(txn: &Transaction<'_>, table: &str, expected: &[&str]) -> Result<()> {
    let mut stmt = txn
        .prepare("SELECT name FROM pragma_table_info(?1)")
        .map_err(storage_error)?;
    let columns = stmt
        .query_map([table], |row| row.get::<_, String>(0))
        .map_err(storage_error)?
        .collect::<rusqlite::Result<Vec<_>>>()
        .map_err(storage_error)?;
    if columns.is_empty() {
        return Err(Error::schema(format!("missing relation '{}'", table)));
    }
    for column in expected {
        if !columns.iter().any(|c| c.eq_ignore_ascii_case(column)) {
            return Err(Error::schema(format!(
                "relation '{}' lacks column '{}'",
                table, column
            )));
        }
    }
    Ok(())
}
