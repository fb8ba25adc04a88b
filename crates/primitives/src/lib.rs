//! Store primitives for testdb
//!
//! - [`RunIndex`]: run creation, closure and lookup
//! - [`ResultStore`]: attaching results to open runs and reading them back
//!
//! Both are stateless facades over a shared
//! [`ConnectionPool`](testdb_storage::ConnectionPool).

#![warn(missing_docs)]

pub mod result_store;
pub mod run_index;

mod row;

pub use result_store::ResultStore;
pub use run_index::{ensure_open, RunIndex};
