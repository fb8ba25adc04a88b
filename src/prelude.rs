//! Convenient imports for testdb.
//!
//! ```ignore
//! use testdb::prelude::*;
//!
//! let db = TestDb::open(".wstest.db").await?;
//! ```

// Main entry point
pub use crate::database::{TestDb, TestDbBuilder};

// Error handling
pub use crate::error::{Error, Result};

// Records and identifiers
pub use testdb_core::{ResultId, RunId, RunStatus, TestMode, TestResult, TestRun, Timestamp};

// Result payloads
pub use testdb_core::{AttributeSet, CaseOutcome};

// Re-export serde_json for convenience
pub use serde_json::json;
