//! Unlock state machine for a single door.
//!
//! ```text
//! Idle(locked) --unlock()--> Requesting --success--> Unlocked(until)
//!                                 |                       |
//!                                 +--failure--> Idle      +--grace elapsed--> Idle(locked)
//! ```
//!
//! State lives behind short-held `std::sync::Mutex`es that are never held
//! across an `.await`; the gateway call is the only suspension point.

use std::sync::{Arc, Mutex, MutexGuard, Weak};

use serde::Serialize;

use doorway_core::attempt::{CreateUnlockAttempt, UnlockAttempt};
use doorway_core::door::{Connectivity, DoorStatus};
use doorway_core::ledger::{AccessLedger, DailySummary};
use doorway_core::session::{DoorTarget, SessionContext, StoreIdentity};
use doorway_core::types::Timestamp;
use doorway_events::bus::{event_types, DoorEvent, EventBus};
use doorway_gateway::{DoorGateway, GatewayError, UnlockRequest};
use tokio::sync::broadcast;

use crate::config::ControllerConfig;
use crate::error::UnlockError;
use crate::relock::RelockTimer;

/// Message surfaced after a successful unlock.
pub const UNLOCK_SUCCESS_MESSAGE: &str = "Door unlocked successfully!";

/// Externally observable controller phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum ControllerPhase {
    Idle,
    Requesting,
    Unlocked { until: Timestamp },
}

/// Result of a successful unlock.
#[derive(Debug, Clone, Serialize)]
pub struct UnlockReceipt {
    pub message: String,
    pub attempt: UnlockAttempt,
    /// When the door will be assumed locked again.
    pub relock_at: Timestamp,
}

struct DoorState {
    status: DoorStatus,
    in_flight: bool,
    /// Armed while the door is in its grace window.
    relock: Option<RelockTimer>,
    /// Bumped on every arm; a firing timer only relocks if it is current.
    generation: u64,
}

struct Inner {
    gateway: Arc<dyn DoorGateway>,
    bus: Arc<EventBus>,
    config: ControllerConfig,
    session: Mutex<SessionContext>,
    state: Mutex<DoorState>,
    ledger: Mutex<AccessLedger>,
}

/// Cheaply cloneable handle to one door's unlock state machine.
#[derive(Clone)]
pub struct UnlockController {
    inner: Arc<Inner>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Clears `in_flight` if the request task ends without resolving.
struct InFlightGuard {
    inner: Arc<Inner>,
    armed: bool,
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        if self.armed {
            lock(&self.inner.state).in_flight = false;
            tracing::warn!("Unlock request ended without a result, clearing in-flight flag");
        }
    }
}

impl UnlockController {
    pub fn new(
        gateway: Arc<dyn DoorGateway>,
        session: SessionContext,
        bus: Arc<EventBus>,
        config: ControllerConfig,
    ) -> Self {
        let ledger = AccessLedger::new(config.ledger_capacity);
        Self {
            inner: Arc::new(Inner {
                gateway,
                bus,
                config,
                session: Mutex::new(session),
                state: Mutex::new(DoorState {
                    status: DoorStatus::initial(),
                    in_flight: false,
                    relock: None,
                    generation: 0,
                }),
                ledger: Mutex::new(ledger),
            }),
        }
    }

    /// Issue one unlock request for the selected store's door.
    ///
    /// Rejected immediately with [`UnlockError::InFlight`] while another
    /// request is outstanding. The gateway call runs on its own task, so
    /// dropping this future does not abandon the request: it still resolves
    /// and is recorded.
    pub async fn unlock(&self) -> Result<UnlockReceipt, UnlockError> {
        let (request, target) = self.begin_request()?;

        let inner = Arc::clone(&self.inner);
        let task = tokio::spawn(async move {
            let mut guard = InFlightGuard {
                inner: Arc::clone(&inner),
                armed: true,
            };
            let result = inner.gateway.unlock(&request).await;
            let resolved = inner.resolve(&request, &target, result);
            guard.armed = false;
            resolved
        });

        task.await
            .map_err(|e| UnlockError::Aborted(e.to_string()))?
    }

    /// Current door status snapshot.
    pub fn status(&self) -> DoorStatus {
        lock(&self.inner.state).status.clone()
    }

    pub fn phase(&self) -> ControllerPhase {
        let state = lock(&self.inner.state);
        if state.in_flight {
            return ControllerPhase::Requesting;
        }
        match &state.relock {
            Some(timer) if !state.status.is_locked => ControllerPhase::Unlocked {
                until: timer.until(),
            },
            _ => ControllerPhase::Idle,
        }
    }

    /// Mark the door online or offline after a status refresh.
    pub fn set_connectivity(&self, connectivity: Connectivity) -> DoorStatus {
        let (status, changed) = {
            let mut state = lock(&self.inner.state);
            let changed = state.status.connectivity != connectivity;
            state.status.connectivity = connectivity;
            (state.status.clone(), changed)
        };

        if changed {
            tracing::info!(?connectivity, "Door connectivity changed");
            let mut event = DoorEvent::new(event_types::DOOR_CONNECTIVITY_CHANGED)
                .with_payload(serde_json::json!({ "connectivity": connectivity }));
            if let Ok(target) = lock(&self.inner.session).door_target() {
                event = event.with_door(&target);
            }
            self.inner.bus.publish(event);
        }
        status
    }

    /// Switch to another of the session's stores.
    ///
    /// Refused while a request is in flight. Cancels any pending relock and
    /// resets the door status; the access history is kept for the session.
    pub fn select_store(&self, store_id: &str) -> Result<StoreIdentity, UnlockError> {
        let mut state = lock(&self.inner.state);
        if state.in_flight {
            return Err(UnlockError::InFlight);
        }

        let store = lock(&self.inner.session).select_store(store_id)?.clone();

        state.relock = None;
        state.status = DoorStatus::initial();
        tracing::info!(store_id, tenant_key = %store.tenant_key, entry_id = %store.entry_id, "Store selected");
        Ok(store)
    }

    pub fn session(&self) -> SessionContext {
        lock(&self.inner.session).clone()
    }

    /// Access history, most recent first.
    pub fn history(&self) -> Vec<UnlockAttempt> {
        lock(&self.inner.ledger).entries()
    }

    /// Today's success/failure counts.
    pub fn summary(&self) -> DailySummary {
        lock(&self.inner.ledger).summary_today()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<DoorEvent> {
        self.inner.bus.subscribe()
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.inner.config
    }

    /// Cancel any pending relock timer. The door status is left as is.
    pub fn shutdown(&self) {
        if let Some(timer) = lock(&self.inner.state).relock.take() {
            tracing::info!(generation = timer.generation(), "Cancelling pending relock timer");
        }
    }

    // ---- private helpers ----

    /// Check the guards and enter `Requesting`.
    fn begin_request(&self) -> Result<(UnlockRequest, DoorTarget), UnlockError> {
        let mut state = lock(&self.inner.state);
        if state.in_flight {
            tracing::debug!("Unlock ignored, request already in flight");
            return Err(UnlockError::InFlight);
        }

        let session = lock(&self.inner.session);
        let target = session
            .door_target()
            .map_err(|e| UnlockError::PreconditionMissing(e.to_string()))?;

        if !state.status.connectivity.is_online() {
            return Err(UnlockError::PreconditionMissing(
                "door is offline and cannot be unlocked".to_string(),
            ));
        }

        let request = UnlockRequest::new(
            &target,
            session.requested_by(),
            self.inner.config.request_source.clone(),
        );
        state.in_flight = true;

        tracing::info!(
            tenant_key = %target.tenant_key,
            entry_id = %target.entry_id,
            requested_by = %request.requested_by,
            "Unlock requested",
        );
        Ok((request, target))
    }
}

impl Inner {
    /// Apply a gateway result: record the attempt and move the state machine.
    fn resolve(
        self: &Arc<Self>,
        request: &UnlockRequest,
        target: &DoorTarget,
        result: Result<(), GatewayError>,
    ) -> Result<UnlockReceipt, UnlockError> {
        let mut state = lock(&self.state);
        state.in_flight = false;

        match result {
            Ok(()) => {
                let attempt = lock(&self.ledger).record(CreateUnlockAttempt::success(
                    request.requested_by.clone(),
                    request.request_source.clone(),
                ));

                state.status.mark_unlocked();
                state.generation += 1;
                let generation = state.generation;
                let weak: Weak<Inner> = Arc::downgrade(self);
                // Replacing the previous timer drops and cancels it.
                let timer = RelockTimer::arm(generation, self.config.relock_grace, move |g| {
                    if let Some(inner) = weak.upgrade() {
                        inner.relock(g);
                    }
                });
                let relock_at = timer.until();
                state.relock = Some(timer);
                drop(state);

                tracing::info!(
                    tenant_key = %target.tenant_key,
                    entry_id = %target.entry_id,
                    attempt_id = %attempt.id,
                    generation,
                    "Door unlocked",
                );
                self.bus.publish(
                    DoorEvent::new(event_types::DOOR_UNLOCKED)
                        .with_door(target)
                        .with_actor(request.requested_by.clone())
                        .with_payload(serde_json::json!({
                            "attempt_id": attempt.id,
                            "relock_at": relock_at,
                        })),
                );

                Ok(UnlockReceipt {
                    message: UNLOCK_SUCCESS_MESSAGE.to_string(),
                    attempt,
                    relock_at,
                })
            }
            Err(err) => {
                let reason = err.reason();
                let attempt = lock(&self.ledger).record(CreateUnlockAttempt::failure(
                    request.requested_by.clone(),
                    request.request_source.clone(),
                    reason.clone(),
                ));

                // A failure always resolves to Idle(locked).
                state.relock = None;
                state.status.mark_locked();
                drop(state);

                tracing::warn!(
                    tenant_key = %target.tenant_key,
                    entry_id = %target.entry_id,
                    attempt_id = %attempt.id,
                    error = %err,
                    "Unlock failed",
                );
                self.bus.publish(
                    DoorEvent::new(event_types::DOOR_UNLOCK_FAILED)
                        .with_door(target)
                        .with_actor(request.requested_by.clone())
                        .with_payload(serde_json::json!({
                            "attempt_id": attempt.id,
                            "reason": reason,
                        })),
                );

                if err.is_rejection() {
                    Err(UnlockError::GatewayRejected { reason, attempt })
                } else {
                    Err(UnlockError::TransportFailure { reason, attempt })
                }
            }
        }
    }

    /// Timer callback: relock only if `generation` is still the armed one.
    fn relock(&self, generation: u64) {
        let mut state = lock(&self.state);
        let current = state
            .relock
            .as_ref()
            .is_some_and(|t| t.generation() == generation && !t.is_cancelled());
        if !current {
            tracing::debug!(generation, "Stale relock timer ignored");
            return;
        }

        state.relock = None;
        state.status.mark_locked();
        drop(state);

        tracing::info!(generation, "Grace period elapsed, door assumed locked");
        let mut event = DoorEvent::new(event_types::DOOR_RELOCKED)
            .with_payload(serde_json::json!({ "generation": generation }));
        if let Ok(target) = lock(&self.session).door_target() {
            event = event.with_door(&target);
        }
        self.bus.publish(event);
    }
}
