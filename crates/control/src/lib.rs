//! Door unlock controller.
//!
//! [`UnlockController`] mediates at most one in-flight unlock request per
//! door, turns gateway results into door status and access-history updates,
//! and relocks the door locally once the grace period elapses.

pub mod config;
pub mod controller;
pub mod error;
pub mod relock;

pub use config::ControllerConfig;
pub use controller::{ControllerPhase, UnlockController, UnlockReceipt, UNLOCK_SUCCESS_MESSAGE};
pub use error::UnlockError;
