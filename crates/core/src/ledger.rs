//! In-memory access-history ledger.
//!
//! [`AccessLedger`] keeps the most recent unlock attempts of a session,
//! newest first, in a bounded ring. Nothing is persisted; a real audit trail
//! lives in the door-control gateway.

use std::collections::VecDeque;

use chrono::{Local, NaiveDate, TimeZone};
use serde::Serialize;

use crate::attempt::{AttemptId, AttemptOutcome, CreateUnlockAttempt, UnlockAttempt};

/// Default number of attempts kept before the oldest are evicted.
pub const DEFAULT_LEDGER_CAPACITY: usize = 500;

/// Same-day counts shown in the "Today's Summary" panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct DailySummary {
    pub successful_unlocks: usize,
    pub failed_attempts: usize,
}

#[derive(Debug)]
pub struct AccessLedger {
    entries: VecDeque<UnlockAttempt>,
    capacity: usize,
    next_id: u64,
}

impl AccessLedger {
    /// Create a ledger holding at most `capacity` attempts (minimum 1).
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity.min(DEFAULT_LEDGER_CAPACITY)),
            capacity,
            next_id: 1,
        }
    }

    /// Record a resolved attempt at the front of the ledger.
    ///
    /// Assigns the next id and evicts the oldest entry when full.
    pub fn record(&mut self, input: CreateUnlockAttempt) -> UnlockAttempt {
        let attempt = UnlockAttempt {
            id: AttemptId(self.next_id),
            timestamp: input.timestamp,
            requested_by: input.requested_by,
            request_source: input.request_source,
            outcome: input.outcome,
            reason: input.reason,
        };
        self.next_id += 1;

        if self.entries.len() == self.capacity {
            self.entries.pop_back();
        }
        self.entries.push_front(attempt.clone());
        attempt
    }

    /// Attempts, most recent first.
    pub fn entries(&self) -> Vec<UnlockAttempt> {
        self.entries.iter().cloned().collect()
    }

    pub fn latest(&self) -> Option<&UnlockAttempt> {
        self.entries.front()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Count attempts with `outcome` whose calendar date in `tz` is `date`.
    pub fn count_on<Tz: TimeZone>(&self, tz: &Tz, date: NaiveDate, outcome: AttemptOutcome) -> usize {
        self.entries
            .iter()
            .filter(|a| a.outcome == outcome)
            .filter(|a| a.timestamp.with_timezone(tz).date_naive() == date)
            .count()
    }

    /// Count today's attempts with `outcome` in the local timezone.
    pub fn count_today(&self, outcome: AttemptOutcome) -> usize {
        let today = Local::now().date_naive();
        self.count_on(&Local, today, outcome)
    }

    pub fn summary_on<Tz: TimeZone>(&self, tz: &Tz, date: NaiveDate) -> DailySummary {
        DailySummary {
            successful_unlocks: self.count_on(tz, date, AttemptOutcome::Success),
            failed_attempts: self.count_on(tz, date, AttemptOutcome::Failure),
        }
    }

    pub fn summary_today(&self) -> DailySummary {
        let today = Local::now().date_naive();
        self.summary_on(&Local, today)
    }
}

impl Default for AccessLedger {
    fn default() -> Self {
        Self::new(DEFAULT_LEDGER_CAPACITY)
    }
}
