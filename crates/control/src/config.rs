use std::time::Duration;

use doorway_core::attempt::REQUEST_SOURCE_WEB_PORTAL;
use doorway_core::ledger::DEFAULT_LEDGER_CAPACITY;

/// Grace period after a successful unlock before the door is assumed locked.
pub const DEFAULT_RELOCK_GRACE: Duration = Duration::from_secs(5);

/// Tunables for an [`UnlockController`](crate::UnlockController).
#[derive(Debug, Clone)]
pub struct ControllerConfig {
    pub relock_grace: Duration,
    /// Channel literal sent as `RequestSource` and stored on attempts.
    pub request_source: String,
    pub ledger_capacity: usize,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            relock_grace: DEFAULT_RELOCK_GRACE,
            request_source: REQUEST_SOURCE_WEB_PORTAL.to_string(),
            ledger_capacity: DEFAULT_LEDGER_CAPACITY,
        }
    }
}
