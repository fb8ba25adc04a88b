//! Main entry point for testdb.
//!
//! This module provides the `TestDb` struct, which owns the connection pool
//! and hands out the run and result primitives.

use crate::error::Result;
use std::path::Path;
use std::time::Duration;
use testdb_primitives::{ResultStore, RunIndex};
use testdb_storage::{ensure_schema, ConnectionPool, PoolStats, SchemaStatus, StoreConfig};
use tracing::{info, warn};

/// The test run / result store.
///
/// Create one per process with [`TestDb::open`] or [`TestDb::builder`] and
/// pass it (or clones of its primitives) to executors and report generators.
///
/// # Example
///
/// ```ignore
/// use testdb::prelude::*;
///
/// let db = TestDb::open("./reports/.wstest.db").await?;
///
/// let run = db.runs.new_run("fuzzingclient", &json!({"cases": ["*"]})).await?;
/// let id = db.results.save_result(run, &CaseOutcome::new("1.1.1", "OK")).await?;
/// db.runs.close_run(run).await?;
///
/// let stored = db.results.get_result::<CaseOutcome>(id).await?;
///
/// db.close().await?;
/// ```
#[derive(Debug)]
pub struct TestDb {
    pool: ConnectionPool,
    schema: SchemaStatus,

    /// Run lifecycle operations
    pub runs: RunIndex,

    /// Result operations
    pub results: ResultStore,
}

impl TestDb {
    /// Open (or create) a store at the given path with default settings.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::builder().path(path).open().await
    }

    /// Open a store from an explicit configuration.
    ///
    /// Creates the relations when the store is new and verifies them
    /// otherwise. On failure the pool is closed before returning.
    pub async fn open_with(config: StoreConfig) -> Result<Self> {
        let pool = ConnectionPool::open(&config)?;
        let schema = match ensure_schema(&pool).await {
            Ok(schema) => schema,
            Err(e) => {
                if let Err(close_err) = pool.close().await {
                    warn!(error = %close_err, "failed to close pool after schema error");
                }
                return Err(e);
            }
        };
        info!(path = %pool.path().display(), ?schema, "test database ready");

        Ok(Self {
            runs: RunIndex::new(pool.clone()),
            results: ResultStore::new(pool.clone()),
            pool,
            schema,
        })
    }

    /// Create a builder for store configuration.
    pub fn builder() -> TestDbBuilder {
        TestDbBuilder::new()
    }

    /// Absolute path of the store file.
    pub fn path(&self) -> &Path {
        self.pool.path()
    }

    /// Whether this open created the relations or found them in place.
    pub fn schema_status(&self) -> SchemaStatus {
        self.schema
    }

    /// Connection pool occupancy.
    pub fn pool_stats(&self) -> PoolStats {
        self.pool.stats()
    }

    /// Drain in-flight work and close every connection.
    ///
    /// Operations issued afterwards fail with `PoolUnavailable`, including
    /// those on primitives cloned out of this handle.
    pub async fn close(&self) -> Result<()> {
        self.pool.close().await
    }
}

/// Builder for store configuration.
///
/// # Example
///
/// ```ignore
/// let db = TestDb::builder()
///     .path("./reports/.wstest.db")
///     .pool_size(8)
///     .open()
///     .await?;
/// ```
#[derive(Debug, Clone, Default)]
pub struct TestDbBuilder {
    config: StoreConfig,
}

impl TestDbBuilder {
    /// Create a builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from defaults overlaid with `WSTEST_DB*` environment variables.
    pub fn from_env() -> Self {
        Self {
            config: StoreConfig::from_env(),
        }
    }

    /// Set the store file path.
    pub fn path(mut self, path: impl AsRef<Path>) -> Self {
        self.config.path = path.as_ref().to_path_buf();
        self
    }

    /// Set the maximum number of pooled connections.
    pub fn pool_size(mut self, size: usize) -> Self {
        self.config.pool_size = size;
        self
    }

    /// Set how long a unit of work waits for a free connection.
    pub fn acquire_timeout(mut self, timeout: Duration) -> Self {
        self.config.acquire_timeout = timeout;
        self
    }

    /// Set how long a connection waits on a locked store.
    pub fn busy_timeout(mut self, timeout: Duration) -> Self {
        self.config.busy_timeout = timeout;
        self
    }

    /// Current configuration
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Open the store.
    pub async fn open(self) -> Result<TestDb> {
        TestDb::open_with(self.config).await
    }
}
