//! Door event bus.
//!
//! - [`EventBus`]: in-process publish/subscribe hub backed by
//!   `tokio::sync::broadcast`.
//! - [`DoorEvent`]: envelope for door state changes (unlocks, failures,
//!   timer-driven relocks, connectivity changes).
//! - [`EventLog`]: background subscriber that writes every event to the
//!   tracing log.

pub mod bus;
pub mod log;

pub use bus::{event_types, DoorEvent, EventBus};
pub use log::EventLog;
