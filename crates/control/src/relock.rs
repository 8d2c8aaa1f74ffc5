//! One-shot auto-relock timer.
//!
//! A [`RelockTimer`] is owned by the controller state while the door is in
//! its grace window. Dropping or cancelling it stops the pending task, so a
//! superseded timer can never fire.

use std::time::Duration;

use tokio_util::sync::CancellationToken;

use doorway_core::types::Timestamp;

/// Fallback deadline for grace periods too large to represent.
const FAR_FUTURE: Duration = Duration::from_secs(86_400 * 365);

#[derive(Debug)]
pub struct RelockTimer {
    generation: u64,
    until: Timestamp,
    cancel: CancellationToken,
}

impl RelockTimer {
    /// Spawn a task that calls `on_fire(generation)` after `grace`, unless
    /// the timer is cancelled first.
    pub fn arm<F>(generation: u64, grace: Duration, on_fire: F) -> Self
    where
        F: FnOnce(u64) + Send + 'static,
    {
        let cancel = CancellationToken::new();
        let now = chrono::Utc::now();
        let until = chrono::Duration::from_std(grace)
            .ok()
            .and_then(|d| now.checked_add_signed(d))
            .unwrap_or(chrono::DateTime::<chrono::Utc>::MAX_UTC);

        let now_instant = tokio::time::Instant::now();
        let deadline = now_instant
            .checked_add(grace)
            .unwrap_or_else(|| now_instant + FAR_FUTURE);
        let token = cancel.clone();
        tokio::spawn(async move {
            tokio::select! {
                _ = token.cancelled() => {
                    tracing::debug!(generation, "Relock timer superseded");
                }
                _ = tokio::time::sleep_until(deadline) => on_fire(generation),
            }
        });

        Self {
            generation,
            until,
            cancel,
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Wall-clock instant the door is expected to relock.
    pub fn until(&self) -> Timestamp {
        self.until
    }

    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }
}

impl Drop for RelockTimer {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
