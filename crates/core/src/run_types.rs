//! Test run and test result records
//!
//! ## Run Lifecycle
//!
//! ```text
//! [new_run] --> Open --> [close_run] --> Closed
//! ```
//!
//! `Closed` is terminal: a run is never reopened and never deleted here.
//! Results may only be attached while the run is `Open`.

use crate::types::{ResultId, RunId, TestMode, Timestamp};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

/// Lifecycle status of a test run
///
/// Derived from `ended`: absent means `Open`, present means `Closed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RunStatus {
    /// Run accepts results
    Open,
    /// Run was closed; terminal
    Closed,
}

impl RunStatus {
    /// Check if run still accepts results
    pub fn is_open(&self) -> bool {
        matches!(self, RunStatus::Open)
    }

    /// Check if run is closed
    pub fn is_closed(&self) -> bool {
        matches!(self, RunStatus::Closed)
    }

    /// Get string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            RunStatus::Open => "Open",
            RunStatus::Closed => "Closed",
        }
    }
}

impl std::fmt::Display for RunStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One test campaign
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestRun {
    /// Run ID
    pub id: RunId,
    /// Campaign mode
    pub mode: TestMode,
    /// When the run was created
    pub started: Timestamp,
    /// When the run was closed, if it was
    pub ended: Option<Timestamp>,
    /// Test specification the run was started with, stored verbatim
    pub spec: Value,
}

impl TestRun {
    /// Current lifecycle status
    pub fn status(&self) -> RunStatus {
        if self.ended.is_some() {
            RunStatus::Closed
        } else {
            RunStatus::Open
        }
    }

    /// Wall-clock duration of a closed run
    pub fn duration(&self) -> Option<Duration> {
        self.ended.and_then(|ended| {
            ended
                .as_datetime()
                .signed_duration_since(*self.started.as_datetime())
                .to_std()
                .ok()
        })
    }
}

/// A stored result together with its identity
///
/// `result` is any entity implementing [`AttributeSet`](crate::AttributeSet).
#[derive(Debug, Clone, PartialEq)]
pub struct TestResult<E> {
    /// Result ID
    pub id: ResultId,
    /// Run this result belongs to
    pub run_id: RunId,
    /// Decoded payload
    pub result: E,
}

impl<E> std::ops::Deref for TestResult<E> {
    type Target = E;

    fn deref(&self) -> &E {
        &self.result
    }
}
