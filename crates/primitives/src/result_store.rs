//! Result persistence
//!
//! Results are attached to an open run and read back by id. Saving checks the
//! run state and inserts the row inside one transaction, so a result can
//! never land on a run whose close committed first.

use crate::run_index::ensure_open;
use crate::row::text_at;
use rusqlite::params;
use rusqlite::types::Value as SqlValue;
use testdb_core::{AttributeSet, Error, Result, ResultId, RunId, TestResult};
use testdb_storage::{storage_error, ConnectionPool};
use tracing::{debug, warn};

/// Result Store
///
/// Stateless facade over the connection pool; cheap to clone.
#[derive(Debug, Clone)]
pub struct ResultStore {
    pool: ConnectionPool,
}

impl ResultStore {
    /// Create a result store backed by `pool`
    pub fn new(pool: ConnectionPool) -> Self {
        Self { pool }
    }

    /// Attach `result` to an open run.
    ///
    /// # Errors
    ///
    /// - `RunNotFound`: no run with this id
    /// - `RunAlreadyClosed`: the run is closed
    ///
    /// In both cases no row is written.
    pub async fn save_result<E: AttributeSet>(&self, run_id: RunId, result: &E) -> Result<ResultId> {
        let blob = result.encode()?;
        let result_id = ResultId::new();

        let outcome = self
            .pool
            .run_interaction(move |txn| {
                ensure_open(txn, run_id)?;
                txn.execute(
                    "INSERT INTO testresult (id, runId, result) VALUES (?1, ?2, ?3)",
                    params![result_id.to_string(), run_id.to_string(), blob],
                )
                .map_err(storage_error)?;
                Ok(())
            })
            .await;

        match outcome {
            Ok(()) => {
                debug!(%run_id, %result_id, kind = E::KIND, "test result saved");
                Ok(result_id)
            }
            Err(e) => {
                warn!(%run_id, error = %e, "test result rejected");
                Err(e)
            }
        }
    }

    /// Fetch a result and decode its payload into `E`.
    ///
    /// # Errors
    ///
    /// - `ResultNotFound`: no result with this id
    /// - `Decode`: the stored payload is not a valid blob for `E`; the row
    ///   itself is left as is
    pub async fn get_result<E: AttributeSet>(&self, result_id: ResultId) -> Result<TestResult<E>> {
        let rows = self
            .pool
            .run_query(
                "SELECT id, runId, result FROM testresult WHERE id = ?1",
                vec![SqlValue::Text(result_id.to_string())],
            )
            .await?;

        let row = rows
            .first()
            .ok_or_else(|| Error::result_not_found(result_id))?;
        let mut result = E::default();
        result.decode(text_at(row, 2, "result")?)?;

        Ok(TestResult {
            id: text_at(row, 0, "id")?.parse()?,
            run_id: text_at(row, 1, "runId")?.parse()?,
            result,
        })
    }
}
