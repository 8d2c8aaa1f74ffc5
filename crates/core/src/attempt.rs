//! Unlock attempt records.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::types::Timestamp;

/// Request source literal identifying the web dashboard channel.
pub const REQUEST_SOURCE_WEB_PORTAL: &str = "Web Portal";

/// Display name used when the session has no user name.
pub const UNKNOWN_REQUESTER: &str = "Unknown";

/// Ledger-assigned attempt identifier.
///
/// Strictly increasing within one ledger, so ordering by id matches the order
/// in which attempts were recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AttemptId(pub u64);

impl fmt::Display for AttemptId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttemptOutcome {
    Success,
    Failure,
}

/// One resolved request to open the door.
///
/// Attempts are created by [`AccessLedger::record`](crate::ledger::AccessLedger::record)
/// and never modified afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnlockAttempt {
    pub id: AttemptId,
    pub timestamp: Timestamp,
    pub requested_by: String,
    pub request_source: String,
    pub outcome: AttemptOutcome,
    /// Reason surfaced to the user for failed attempts.
    pub reason: Option<String>,
}

impl UnlockAttempt {
    pub fn is_success(&self) -> bool {
        self.outcome == AttemptOutcome::Success
    }
}

/// DTO for recording a new attempt; the ledger assigns the id.
#[derive(Debug, Clone)]
pub struct CreateUnlockAttempt {
    pub timestamp: Timestamp,
    pub requested_by: String,
    pub request_source: String,
    pub outcome: AttemptOutcome,
    pub reason: Option<String>,
}

impl CreateUnlockAttempt {
    pub fn success(requested_by: impl Into<String>, request_source: impl Into<String>) -> Self {
        Self {
            timestamp: chrono::Utc::now(),
            requested_by: requested_by.into(),
            request_source: request_source.into(),
            outcome: AttemptOutcome::Success,
            reason: None,
        }
    }

    pub fn failure(
        requested_by: impl Into<String>,
        request_source: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            timestamp: chrono::Utc::now(),
            requested_by: requested_by.into(),
            request_source: request_source.into(),
            outcome: AttemptOutcome::Failure,
            reason: Some(reason.into()),
        }
    }

    /// Override the timestamp (used when importing or in tests).
    pub fn at(mut self, timestamp: Timestamp) -> Self {
        self.timestamp = timestamp;
        self
    }
}
