//! Store configuration
//!
//! Defaults can be overridden programmatically or from the environment:
//!
//! | Variable | Field | Default |
//! |----------|-------|---------|
//! | `WSTEST_DB` | `path` | `.wstest.db` |
//! | `WSTEST_DB_POOL_SIZE` | `pool_size` | 5 |
//! | `WSTEST_DB_ACQUIRE_TIMEOUT_MS` | `acquire_timeout` | 30000 |
//! | `WSTEST_DB_BUSY_TIMEOUT_MS` | `busy_timeout` | 5000 |
//!
//! Unparseable or zero values are ignored.

use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default store file, relative to the working directory
pub const DEFAULT_DB_FILE: &str = ".wstest.db";

/// Default maximum number of pooled connections
pub const DEFAULT_POOL_SIZE: usize = 5;

/// Configuration for opening a store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Store file location
    pub path: PathBuf,
    /// Maximum number of connections the pool opens
    pub pool_size: usize,
    /// How long a unit of work waits for a free connection
    pub acquire_timeout: Duration,
    /// How long a connection waits on a locked store before failing
    pub busy_timeout: Duration,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_DB_FILE),
            pool_size: DEFAULT_POOL_SIZE,
            acquire_timeout: Duration::from_secs(30),
            busy_timeout: Duration::from_secs(5),
        }
    }
}

impl StoreConfig {
    /// Defaults for a store at `path`
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            ..Self::default()
        }
    }

    /// Defaults overlaid with `WSTEST_DB*` environment variables
    pub fn from_env() -> Self {
        Self::default().with_overrides(|key| std::env::var(key).ok())
    }

    fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(path) = lookup("WSTEST_DB").filter(|s| !s.is_empty()) {
            self.path = PathBuf::from(path);
        }
        if let Some(size) = parse_positive(lookup("WSTEST_DB_POOL_SIZE")) {
            self.pool_size = size as usize;
        }
        if let Some(ms) = parse_positive(lookup("WSTEST_DB_ACQUIRE_TIMEOUT_MS")) {
            self.acquire_timeout = Duration::from_millis(ms);
        }
        if let Some(ms) = parse_positive(lookup("WSTEST_DB_BUSY_TIMEOUT_MS")) {
            self.busy_timeout = Duration::from_millis(ms);
        }
        self
    }

    /// Store path made absolute against the current directory
    pub fn resolved_path(&self) -> std::io::Result<PathBuf> {
        if self.path.is_absolute() {
            Ok(self.path.clone())
        } else {
            Ok(std::env::current_dir()?.join(&self.path))
        }
    }
}

fn parse_positive(value: Option<String>) -> Option<u64> {
    value
        .and_then(|s| s.trim().parse::<u64>().ok())
        .filter(|v| *v > 0)
}
