//! Tracing sink for door events.
//!
//! [`EventLog`] subscribes to the [`EventBus`](crate::bus::EventBus) and
//! writes every received [`DoorEvent`] as a structured log line. It runs as
//! a long-lived background task and exits when the bus is dropped.

use tokio::sync::broadcast;

use crate::bus::{event_types, DoorEvent};

pub struct EventLog;

impl EventLog {
    /// Run the logging loop until the channel closes.
    ///
    /// Returns the number of events written.
    pub async fn run(mut receiver: broadcast::Receiver<DoorEvent>) -> u64 {
        let mut written = 0u64;
        loop {
            match receiver.recv().await {
                Ok(event) => {
                    Self::write(&event);
                    written += 1;
                }
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    tracing::warn!(skipped = n, "Event log lagged, some events were not logged");
                }
                Err(broadcast::error::RecvError::Closed) => {
                    tracing::info!("Event bus closed, event log shutting down");
                    break;
                }
            }
        }
        written
    }

    fn write(event: &DoorEvent) {
        let tenant_key = event.tenant_key.as_deref().unwrap_or("-");
        let entry_id = event.entry_id.as_deref().unwrap_or("-");
        let actor = event.actor.as_deref().unwrap_or("-");

        if event.event_type == event_types::DOOR_UNLOCK_FAILED {
            tracing::warn!(
                event_type = %event.event_type,
                tenant_key,
                entry_id,
                actor,
                payload = %event.payload,
                "Door event",
            );
        } else {
            tracing::info!(
                event_type = %event.event_type,
                tenant_key,
                entry_id,
                actor,
                payload = %event.payload,
                "Door event",
            );
        }
    }
}
