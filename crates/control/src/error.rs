use doorway_core::attempt::UnlockAttempt;
use doorway_core::error::CoreError;

/// Why an unlock did not open the door.
///
/// None of these are fatal: every variant leaves the controller idle with the
/// door believed locked.
#[derive(Debug, thiserror::Error)]
pub enum UnlockError {
    /// Another request for this door is still in flight; nothing was sent or
    /// recorded.
    #[error("An unlock request is already in progress")]
    InFlight,

    /// No store/entry selected, or the door is offline. Rejected before any
    /// gateway call; nothing recorded.
    #[error("Cannot unlock: {0}")]
    PreconditionMissing(String),

    /// The gateway answered `success: false`.
    #[error("{reason}")]
    GatewayRejected {
        reason: String,
        attempt: UnlockAttempt,
    },

    /// Network, timeout, or non-2xx failure talking to the gateway.
    #[error("{reason}")]
    TransportFailure {
        reason: String,
        attempt: UnlockAttempt,
    },

    /// Session operation failed (e.g. unknown store id).
    #[error(transparent)]
    Session(#[from] CoreError),

    /// The background request task ended without resolving.
    #[error("Unlock task aborted: {0}")]
    Aborted(String),
}

impl UnlockError {
    /// The failure attempt recorded in the ledger, if one was.
    pub fn attempt(&self) -> Option<&UnlockAttempt> {
        match self {
            UnlockError::GatewayRejected { attempt, .. }
            | UnlockError::TransportFailure { attempt, .. } => Some(attempt),
            _ => None,
        }
    }
}
