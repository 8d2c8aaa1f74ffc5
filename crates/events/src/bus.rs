//! In-process event bus backed by a `tokio::sync::broadcast` channel.
//!
//! [`EventBus`] is shared via `Arc<EventBus>` between the unlock controller
//! (publisher) and any observers such as the HTTP layer or [`EventLog`](crate::EventLog).

use chrono::{DateTime, Utc};
use doorway_core::session::DoorTarget;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

/// Well-known door event names.
pub mod event_types {
    pub const DOOR_UNLOCKED: &str = "door.unlocked";
    pub const DOOR_UNLOCK_FAILED: &str = "door.unlock_failed";
    pub const DOOR_RELOCKED: &str = "door.relocked";
    pub const DOOR_CONNECTIVITY_CHANGED: &str = "door.connectivity_changed";
}

// ---------------------------------------------------------------------------
// DoorEvent
// ---------------------------------------------------------------------------

/// A state change of one door.
///
/// Constructed via [`DoorEvent::new`] and enriched with
/// [`with_door`](DoorEvent::with_door), [`with_actor`](DoorEvent::with_actor),
/// and [`with_payload`](DoorEvent::with_payload).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DoorEvent {
    /// Dot-separated event name, e.g. `"door.unlocked"`.
    pub event_type: String,
    pub tenant_key: Option<String>,
    pub entry_id: Option<String>,
    /// Display name of the user that triggered the event, if any.
    /// Timer-driven relocks have no actor.
    pub actor: Option<String>,
    /// Free-form JSON payload carrying event-specific data.
    pub payload: serde_json::Value,
    pub timestamp: DateTime<Utc>,
}

impl DoorEvent {
    pub fn new(event_type: impl Into<String>) -> Self {
        Self {
            event_type: event_type.into(),
            tenant_key: None,
            entry_id: None,
            actor: None,
            payload: serde_json::Value::Object(Default::default()),
            timestamp: Utc::now(),
        }
    }

    pub fn with_door(mut self, target: &DoorTarget) -> Self {
        self.tenant_key = Some(target.tenant_key.clone());
        self.entry_id = Some(target.entry_id.clone());
        self
    }

    pub fn with_actor(mut self, actor: impl Into<String>) -> Self {
        self.actor = Some(actor.into());
        self
    }

    pub fn with_payload(mut self, payload: serde_json::Value) -> Self {
        self.payload = payload;
        self
    }
}

// ---------------------------------------------------------------------------
// EventBus
// ---------------------------------------------------------------------------

/// Default buffer capacity for the broadcast channel.
const DEFAULT_CAPACITY: usize = 256;

/// In-process fan-out event bus.
///
/// # Usage
///
/// ```rust
/// use doorway_events::bus::{event_types, DoorEvent, EventBus};
///
/// let bus = EventBus::default();
/// let mut rx = bus.subscribe();
///
/// bus.publish(DoorEvent::new(event_types::DOOR_RELOCKED));
/// ```
pub struct EventBus {
    sender: broadcast::Sender<DoorEvent>,
}

impl EventBus {
    /// Create a bus with a specific channel capacity.
    ///
    /// Slow receivers observe `RecvError::Lagged` once the buffer is full.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish an event to all current subscribers.
    pub fn publish(&self, event: DoorEvent) {
        // A SendError only means there are zero receivers.
        let _ = self.sender.send(event);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<DoorEvent> {
        self.sender.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
