//! Core types for testdb
//!
//! Shared by the storage and primitives crates:
//! - [`types`]: identifiers, timestamps, campaign modes
//! - [`run_types`]: run and result records
//! - [`codec`]: the attribute codec for persisted payloads
//! - [`error`]: the error taxonomy

#![warn(missing_docs)]

pub mod codec;
pub mod error;
pub mod outcome;
pub mod run_types;
pub mod types;

pub use codec::AttributeSet;
pub use error::{Error, Result};
pub use outcome::CaseOutcome;
pub use run_types::{RunStatus, TestResult, TestRun};
pub use types::{ResultId, RunId, TestMode, Timestamp};
