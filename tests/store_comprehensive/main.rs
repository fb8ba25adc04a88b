//! Store Comprehensive Test Suite
//!
//! Tests organized by functionality:
//! - runs: run creation, closure, lookup, modes
//! - results: save/get, referential integrity, custom payload entities
//! - concurrency: racing saves and closes, independent runs
//! - lifecycle: open/reopen/close of the store itself
//! - scenario: an end-to-end fuzzing campaign
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test --test store_comprehensive
//! cargo test --test store_comprehensive concurrency::
//! ```

use tempfile::TempDir;
use testdb::TestDb;

mod lifecycle;
mod results;
mod runs;

// =============================================================================
// SHARED TEST UTILITIES
// =============================================================================

/// A store in its own temporary directory
pub struct TestStore {
    pub db: TestDb,
    pub dir: TempDir,
}

/// Open a fresh store
pub async fn create_store() -> TestStore {
    init_tracing();
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let db = TestDb::builder()
        .path(dir.path().join(".wstest.db"))
        .pool_size(4)
        .open()
        .await
        .expect("Failed to open test store");
    TestStore { db, dir }
}

/// Route store logs through the test harness
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}
