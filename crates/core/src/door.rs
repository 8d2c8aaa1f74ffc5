//! Believed physical state of a single door.
//!
//! The lock flag is only as fresh as the last gateway response or the last
//! local relock assumption; nothing here is confirmed by the hardware.

use serde::{Deserialize, Serialize};

/// Label shown for the last access right after a successful unlock.
pub const LAST_ACCESS_JUST_NOW: &str = "Just now";

/// Label used before any access has been observed in this session.
pub const LAST_ACCESS_UNKNOWN: &str = "Unknown";

/// Whether the door controller is reachable through the gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Connectivity {
    Online,
    Offline,
}

impl Connectivity {
    pub fn is_online(self) -> bool {
        matches!(self, Connectivity::Online)
    }
}

/// Snapshot of the door as the controller currently believes it to be.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DoorStatus {
    pub is_locked: bool,
    /// Human-readable relative time, e.g. `"Just now"`.
    pub last_access_label: String,
    pub connectivity: Connectivity,
}

impl DoorStatus {
    /// Initial state on controller construction: locked and online.
    pub fn initial() -> Self {
        Self {
            is_locked: true,
            last_access_label: LAST_ACCESS_UNKNOWN.to_string(),
            connectivity: Connectivity::Online,
        }
    }

    /// Apply a confirmed unlock from the gateway.
    pub fn mark_unlocked(&mut self) {
        self.is_locked = false;
        self.last_access_label = LAST_ACCESS_JUST_NOW.to_string();
    }

    /// Apply the local relock assumption after the grace period.
    pub fn mark_locked(&mut self) {
        self.is_locked = true;
    }
}

impl Default for DoorStatus {
    fn default() -> Self {
        Self::initial()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initial_status_is_locked_and_online() {
        let status = DoorStatus::initial();
        assert!(status.is_locked);
        assert!(status.connectivity.is_online());
        assert_eq!(status.last_access_label, LAST_ACCESS_UNKNOWN);
    }

    #[test]
    fn unlock_then_relock_keeps_last_access_label() {
        let mut status = DoorStatus::initial();
        status.mark_unlocked();
        assert!(!status.is_locked);
        assert_eq!(status.last_access_label, LAST_ACCESS_JUST_NOW);

        status.mark_locked();
        assert!(status.is_locked);
        assert_eq!(status.last_access_label, LAST_ACCESS_JUST_NOW);
    }

    #[test]
    fn connectivity_serializes_lowercase() {
        let json = serde_json::to_value(Connectivity::Offline).unwrap();
        assert_eq!(json, "offline");
        let parsed: Connectivity = serde_json::from_str("\"online\"").unwrap();
        assert_eq!(parsed, Connectivity::Online);
    }
}
