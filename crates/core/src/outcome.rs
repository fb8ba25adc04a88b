//! Stock result entity for fuzzing campaigns

use crate::codec::AttributeSet;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Outcome of one fuzzing test case
///
/// All attributes are optional so that partially filled outcomes (e.g. a
/// case that timed out before the closing handshake) still persist.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaseOutcome {
    /// Case identifier, e.g. `"1.1.1"`
    pub case: Option<String>,
    /// Verdict on the data exchange (`OK`, `NON-STRICT`, `FAILED`, ...)
    pub behavior: Option<String>,
    /// Verdict on the closing handshake
    pub behavior_close: Option<String>,
    /// Human-readable case description
    pub description: Option<String>,
    /// Human-readable statement of the expected behavior
    pub expectation: Option<String>,
    /// Expected protocol observations
    pub expected: Option<Value>,
    /// Actually received protocol observations
    pub received: Option<Value>,
    /// Overall pass/fail
    pub passed: Option<bool>,
    /// Case duration in milliseconds
    pub duration: Option<u64>,
}

impl CaseOutcome {
    /// Outcome with case id and behavior set
    pub fn new(case: impl Into<String>, behavior: impl Into<String>) -> Self {
        Self {
            case: Some(case.into()),
            behavior: Some(behavior.into()),
            ..Default::default()
        }
    }
}

impl AttributeSet for CaseOutcome {
    const KIND: &'static str = "CaseOutcome";
    const ATTRIBUTES: &'static [&'static str] = &[
        "case",
        "behavior",
        "behaviorClose",
        "description",
        "expectation",
        "expected",
        "received",
        "passed",
        "duration",
    ];
}
