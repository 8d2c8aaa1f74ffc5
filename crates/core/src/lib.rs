//! Domain types for door access control.
//!
//! This crate has no internal dependencies so it can be shared by the
//! gateway client, the unlock controller, and the HTTP layer alike.

pub mod attempt;
pub mod door;
pub mod error;
pub mod ledger;
pub mod session;
pub mod types;
