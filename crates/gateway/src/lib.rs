//! Door-control gateway client.
//!
//! Provides the typed request/response shapes of the third-party
//! `POST /api/unlock` endpoint, the [`DoorGateway`] trait the unlock
//! controller depends on, and [`HttpDoorGateway`], its reqwest
//! implementation.

pub mod api;
pub mod messages;

pub use api::{DoorGateway, GatewayError, HttpDoorGateway};
pub use messages::{UnlockRequest, UnlockResponse};
