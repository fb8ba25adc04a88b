//! Core identifier and time types
//!
//! - [`RunId`]: unique identifier for a test run
//! - [`ResultId`]: unique identifier for a stored test result
//! - [`Timestamp`]: UTC instant with a sortable text form
//! - [`TestMode`]: the fixed set of campaign modes that record results

use crate::error::{Error, Result};
use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Unique identifier for a test run
///
/// Generated once at run creation from a random UUID v4; collisions are not
/// checked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RunId(Uuid);

impl RunId {
    /// Create a new random RunId using UUID v4
    ///
    /// # Examples
    ///
    /// ```
    /// use testdb_core::types::RunId;
    ///
    /// let id1 = RunId::new();
    /// let id2 = RunId::new();
    /// assert_ne!(id1, id2);
    /// ```
    pub fn new() -> Self {
        RunId(Uuid::new_v4())
    }

    /// Get the underlying UUID
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for RunId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for RunId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Uuid::parse_str(s)
            .map(RunId)
            .map_err(|e| Error::decode(format!("invalid run id '{}': {}", s, e)))
    }
}

/// Unique identifier for a stored test result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ResultId(Uuid);

impl ResultId {
    /// Create a new random ResultId using UUID v4
    pub fn new() -> Self {
        ResultId(Uuid::new_v4())
    }

    /// Get the underlying UUID
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for ResultId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ResultId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ResultId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Uuid::parse_str(s)
            .map(ResultId)
            .map_err(|e| Error::decode(format!("invalid result id '{}': {}", s, e)))
    }
}

/// UTC timestamp with millisecond precision
///
/// Persisted as RFC 3339 text (`2024-05-01T12:00:00.123Z`), which sorts
/// lexicographically in time order. Sub-millisecond precision is dropped at
/// construction so the text form round-trips exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Current time
    pub fn now() -> Self {
        Timestamp(Utc::now().trunc_subsecs(3))
    }

    /// Wrap an existing instant
    pub fn from_datetime(dt: DateTime<Utc>) -> Self {
        Timestamp(dt.trunc_subsecs(3))
    }

    /// Parse the persisted text form
    pub fn parse(s: &str) -> Result<Self> {
        DateTime::parse_from_rfc3339(s)
            .map(|dt| Timestamp(dt.with_timezone(&Utc)))
            .map_err(|e| Error::decode(format!("invalid timestamp '{}': {}", s, e)))
    }

    /// Persisted text form
    pub fn to_text(&self) -> String {
        self.0.to_rfc3339_opts(SecondsFormat::Millis, true)
    }

    /// Underlying chrono value
    pub fn as_datetime(&self) -> &DateTime<Utc> {
        &self.0
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_text())
    }
}

/// Campaign mode of a test run
///
/// Only modes whose executors record results into the store are listed.
/// Echo, broadcast, testee and WAMP peer modes never open a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TestMode {
    /// Harness acts as client, fuzzing a server under test
    FuzzingClient,
    /// Harness acts as server, fuzzing clients under test
    FuzzingServer,
    /// WAMP client fuzzing a WAMP router
    FuzzingWampClient,
    /// WAMP router fuzzing WAMP clients
    FuzzingWampServer,
}

impl TestMode {
    /// All known modes
    pub const ALL: [TestMode; 4] = [
        TestMode::FuzzingClient,
        TestMode::FuzzingServer,
        TestMode::FuzzingWampClient,
        TestMode::FuzzingWampServer,
    ];

    /// Get string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            TestMode::FuzzingClient => "fuzzingclient",
            TestMode::FuzzingServer => "fuzzingserver",
            TestMode::FuzzingWampClient => "fuzzingwampclient",
            TestMode::FuzzingWampServer => "fuzzingwampserver",
        }
    }
}

impl fmt::Display for TestMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TestMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        TestMode::ALL
            .iter()
            .copied()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| Error::invalid_mode(s))
    }
}
