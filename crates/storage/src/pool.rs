//! Bounded connection pool over a single store file
//!
//! The pool is the only component that opens connections to the store.
//! Connections are opened lazily up to `pool_size` and handed back to the
//! idle set when a unit of work finishes.
//!
//! ## Units of work
//!
//! [`ConnectionPool::run_interaction`] executes a closure on a blocking worker
//! thread inside an `IMMEDIATE` transaction. The write lock is taken at
//! `BEGIN`, so a read-then-write unit of work cannot interleave with another
//! writer. Returning `Ok` commits; returning `Err` (or panicking) drops the
//! transaction, which rolls it back.
//!
//! ## Shutdown
//!
//! [`ConnectionPool::close`] refuses new work, waits until every checked-out
//! connection has been handed back, then drops all connections.

use crate::config::StoreConfig;
use crate::storage_error;
use parking_lot::{Condvar, Mutex};
use rusqlite::types::Value as SqlValue;
use rusqlite::{params_from_iter, Connection, Transaction, TransactionBehavior};
use std::ops::{Deref, DerefMut};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};
use testdb_core::{Error, Result};
use tracing::{debug, info};

/// Snapshot of pool occupancy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolStats {
    /// Connections currently open
    pub open: usize,
    /// Open connections waiting in the idle set
    pub idle: usize,
    /// Connections checked out by running units of work
    pub in_use: usize,
    /// Whether `close` has been called
    pub closed: bool,
}

struct PoolShared {
    path: PathBuf,
    max_size: usize,
    acquire_timeout: Duration,
    busy_timeout: Duration,
    state: Mutex<PoolState>,
    cvar: Condvar,
}

struct PoolState {
    idle: Vec<Connection>,
    open: usize,
    closed: bool,
}

/// Connection checked out of the pool; returned on drop
struct PooledConnection {
    conn: Option<Connection>,
    pool: Arc<PoolShared>,
}

impl Deref for PooledConnection {
    type Target = Connection;

    fn deref(&self) -> &Connection {
        self.conn.as_ref().expect("connection already returned")
    }
}

impl DerefMut for PooledConnection {
    fn deref_mut(&mut self) -> &mut Connection {
        self.conn.as_mut().expect("connection already returned")
    }
}

impl Drop for PooledConnection {
    fn drop(&mut self) {
        let Some(conn) = self.conn.take() else {
            return;
        };
        let mut state = self.pool.state.lock();
        if state.closed {
            state.open = state.open.saturating_sub(1);
            drop(state);
            drop(conn);
        } else {
            state.idle.push(conn);
            drop(state);
        }
        self.pool.cvar.notify_all();
    }
}

impl PoolShared {
    fn open_connection(&self) -> rusqlite::Result<Connection> {
        let conn = Connection::open(&self.path)?;
        conn.busy_timeout(self.busy_timeout)?;
        conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get::<_, String>(0))?;
        conn.pragma_update(None, "synchronous", "NORMAL")?;
        Ok(conn)
    }

    fn checkout(self: &Arc<Self>) -> Result<PooledConnection> {
        let deadline = Instant::now() + self.acquire_timeout;
        let mut state = self.state.lock();
        loop {
            if state.closed {
                return Err(Error::pool_unavailable("pool is closed"));
            }
            if let Some(conn) = state.idle.pop() {
                return Ok(PooledConnection {
                    conn: Some(conn),
                    pool: Arc::clone(self),
                });
            }
            if state.open < self.max_size {
                state.open += 1;
                drop(state);
                return match self.open_connection() {
                    Ok(conn) => {
                        debug!(path = %self.path.display(), "opened pooled connection");
                        Ok(PooledConnection {
                            conn: Some(conn),
                            pool: Arc::clone(self),
                        })
                    }
                    Err(e) => {
                        let mut state = self.state.lock();
                        state.open = state.open.saturating_sub(1);
                        drop(state);
                        self.cvar.notify_one();
                        Err(Error::pool_unavailable(format!(
                            "cannot open connection to {}: {}",
                            self.path.display(),
                            e
                        )))
                    }
                };
            }
            let timed_out = self.cvar.wait_until(&mut state, deadline).timed_out();
            if timed_out && state.idle.is_empty() && !state.closed {
                return Err(Error::pool_unavailable(format!(
                    "no connection available after {:?}",
                    self.acquire_timeout
                )));
            }
        }
    }

    fn interact<T>(
        self: &Arc<Self>,
        behavior: TransactionBehavior,
        work: impl FnOnce(&Transaction<'_>) -> Result<T>,
    ) -> Result<T> {
        let mut conn = self.checkout()?;
        let txn = conn
            .transaction_with_behavior(behavior)
            .map_err(storage_error)?;
        let value = work(&txn)?;
        txn.commit().map_err(storage_error)?;
        Ok(value)
    }
}

/// Pool of connections to one store file
///
/// Cheap to clone; clones share the same connections.
#[derive(Clone)]
pub struct ConnectionPool {
    shared: Arc<PoolShared>,
}

impl std::fmt::Debug for ConnectionPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionPool")
            .field("path", &self.shared.path)
            .field("max_size", &self.shared.max_size)
            .finish()
    }
}

impl ConnectionPool {
    /// Create a pool for the store described by `config`.
    ///
    /// Resolves the path to an absolute one and creates missing parent
    /// directories. No connection is opened until the first unit of work.
    pub fn open(config: &StoreConfig) -> Result<Self> {
        if config.pool_size == 0 {
            return Err(Error::pool_unavailable("pool size must be at least 1"));
        }
        let path = config.resolved_path()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        info!(path = %path.display(), pool_size = config.pool_size, "opening connection pool");
        Ok(Self {
            shared: Arc::new(PoolShared {
                path,
                max_size: config.pool_size,
                acquire_timeout: config.acquire_timeout,
                busy_timeout: config.busy_timeout,
                state: Mutex::new(PoolState {
                    idle: Vec::new(),
                    open: 0,
                    closed: false,
                }),
                cvar: Condvar::new(),
            }),
        })
    }

    /// Absolute store path
    pub fn path(&self) -> &Path {
        &self.shared.path
    }

    /// Current occupancy
    pub fn stats(&self) -> PoolStats {
        let state = self.shared.state.lock();
        PoolStats {
            open: state.open,
            idle: state.idle.len(),
            in_use: state.open - state.idle.len(),
            closed: state.closed,
        }
    }

    /// Run `work` atomically against one pooled connection.
    ///
    /// Commits when `work` returns `Ok`, rolls back otherwise. The error
    /// returned by `work` is propagated unchanged.
    pub async fn run_interaction<F, T>(&self, work: F) -> Result<T>
    where
        F: FnOnce(&Transaction<'_>) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let shared = Arc::clone(&self.shared);
        tokio::task::spawn_blocking(move || shared.interact(TransactionBehavior::Immediate, work))
            .await
            .map_err(|e| Error::internal(format!("interaction worker failed: {}", e)))?
    }

    /// Run a single read statement and collect every row.
    pub async fn run_query(
        &self,
        sql: impl Into<String>,
        params: Vec<SqlValue>,
    ) -> Result<Vec<Vec<SqlValue>>> {
        let sql = sql.into();
        let shared = Arc::clone(&self.shared);
        tokio::task::spawn_blocking(move || {
            shared.interact(TransactionBehavior::Deferred, |txn| {
                let mut stmt = txn.prepare(&sql).map_err(storage_error)?;
                let width = stmt.column_count();
                let rows = stmt
                    .query_map(params_from_iter(params.iter()), |row| {
                        (0..width)
                            .map(|i| row.get::<_, SqlValue>(i))
                            .collect::<rusqlite::Result<Vec<_>>>()
                    })
                    .map_err(storage_error)?;
                rows.collect::<rusqlite::Result<Vec<_>>>()
                    .map_err(storage_error)
            })
        })
        .await
        .map_err(|e| Error::internal(format!("query worker failed: {}", e)))?
    }

    /// Refuse new work, wait for in-flight work, and drop all connections.
    ///
    /// Calling `close` more than once is harmless.
    pub async fn close(&self) -> Result<()> {
        let shared = Arc::clone(&self.shared);
        tokio::task::spawn_blocking(move || {
            let mut state = shared.state.lock();
            let already_closed = state.closed;
            state.closed = true;
            let idle = std::mem::take(&mut state.idle);
            state.open = state.open.saturating_sub(idle.len());
            drop(state);
            drop(idle);
            shared.cvar.notify_all();

            let mut state = shared.state.lock();
            while state.open > 0 {
                shared.cvar.wait(&mut state);
            }
            if !already_closed {
                info!(path = %shared.path.display(), "connection pool closed");
            }
        })
        .await
        .map_err(|e| Error::internal(format!("close worker failed: {}", e)))
    }
}
