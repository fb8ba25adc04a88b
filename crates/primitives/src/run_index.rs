//! Run lifecycle management
//!
//! ## Status Transitions
//!
//! ```text
//! [new_run] --> Open --> [close_run] --> Closed
//! ```
//!
//! - `Closed` is terminal; a second close fails with `RunAlreadyClosed`
//! - The state check and the update of `close_run` share one transaction, so
//!   two racing closes cannot both observe `Open`
//!
//! [`ensure_open`] is the same guard the result store runs before attaching
//! a result.

use crate::row::{optional_text_at, text_at};
use rusqlite::params;
use rusqlite::types::Value as SqlValue;
use serde_json::Value;
use testdb_core::{Error, Result, RunId, TestMode, TestRun, Timestamp};
use testdb_storage::{storage_error, ConnectionPool, OptionalExtension, Transaction};
use tracing::{debug, warn};

/// Run Lifecycle Manager
///
/// Stateless facade over the connection pool; cheap to clone.
#[derive(Debug, Clone)]
pub struct RunIndex {
    pool: ConnectionPool,
}

impl RunIndex {
    /// Create a run index backed by `pool`
    pub fn new(pool: ConnectionPool) -> Self {
        Self { pool }
    }

    /// Start a new run.
    ///
    /// `mode` must name one of the known [`TestMode`]s; otherwise the call
    /// fails with `InvalidMode` before anything is written. `spec` is stored
    /// verbatim.
    pub async fn new_run(&self, mode: &str, spec: &Value) -> Result<RunId> {
        let mode: TestMode = match mode.parse() {
            Ok(mode) => mode,
            Err(e) => {
                warn!(mode, "rejected test run with unknown mode");
                return Err(e);
            }
        };
        let spec = serde_json::to_string(spec)?;
        let run_id = RunId::new();
        let started = Timestamp::now();

        self.pool
            .run_interaction(move |txn| {
                txn.execute(
                    "INSERT INTO testrun (id, mode, started, spec) VALUES (?1, ?2, ?3, ?4)",
                    params![run_id.to_string(), mode.as_str(), started.to_text(), spec],
                )
                .map_err(storage_error)?;
                Ok(())
            })
            .await?;

        debug!(%run_id, %mode, "test run started");
        Ok(run_id)
    }

    /// Close an open run and return the recorded end time.
    ///
    /// # Errors
    ///
    /// - `RunNotFound`: no run with this id
    /// - `RunAlreadyClosed`: the run was closed before
    pub async fn close_run(&self, run_id: RunId) -> Result<Timestamp> {
        let outcome = self
            .pool
            .run_interaction(move |txn| {
                ensure_open(txn, run_id)?;
                let ended = Timestamp::now();
                txn.execute(
                    "UPDATE testrun SET ended = ?1 WHERE id = ?2",
                    params![ended.to_text(), run_id.to_string()],
                )
                .map_err(storage_error)?;
                Ok(ended)
            })
            .await;

        match outcome {
            Ok(ended) => {
                debug!(%run_id, %ended, "test run closed");
                Ok(ended)
            }
            Err(e) => {
                warn!(%run_id, error = %e, "close of test run rejected");
                Err(e)
            }
        }
    }

    /// Look up a single run.
    pub async fn get_run(&self, run_id: RunId) -> Result<Option<TestRun>> {
        let rows = self
            .pool
            .run_query(
                "SELECT id, mode, started, ended, spec FROM testrun WHERE id = ?1",
                vec![SqlValue::Text(run_id.to_string())],
            )
            .await?;

        let Some(row) = rows.first() else {
            return Ok(None);
        };
        Ok(Some(TestRun {
            id: text_at(row, 0, "id")?.parse()?,
            mode: text_at(row, 1, "mode")?.parse()?,
            started: Timestamp::parse(text_at(row, 2, "started")?)?,
            ended: optional_text_at(row, 3, "ended")?
                .map(Timestamp::parse)
                .transpose()?,
            spec: serde_json::from_str(text_at(row, 4, "spec")?)?,
        }))
    }

    /// Check whether a run exists, regardless of status.
    pub async fn exists(&self, run_id: RunId) -> Result<bool> {
        let rows = self
            .pool
            .run_query(
                "SELECT 1 FROM testrun WHERE id = ?1",
                vec![SqlValue::Text(run_id.to_string())],
            )
            .await?;
        Ok(!rows.is_empty())
    }
}

/// Fail unless `run_id` names an open run.
///
/// Must run inside the same transaction as the write it guards.
pub fn ensure_open(txn: &Transaction<'_>, run_id: RunId) -> Result<()> {
    let ended: Option<Option<String>> = txn
        .query_row(
            "SELECT ended FROM testrun WHERE id = ?1",
            [run_id.to_string()],
            |row| row.get(0),
        )
        .optional()
        .map_err(storage_error)?;

    match ended {
        None => Err(Error::run_not_found(run_id)),
        Some(Some(_)) => Err(Error::run_already_closed(run_id)),
        Some(None) => Ok(()),
    }
}
