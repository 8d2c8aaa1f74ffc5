//! Session context injected into the unlock controller.
//!
//! Holds the acting user's display name and the store whose door is being
//! controlled. Callers build it explicitly; nothing is read from ambient
//! global state.

use serde::{Deserialize, Serialize};

use crate::attempt::UNKNOWN_REQUESTER;
use crate::error::CoreError;

/// A store the session user may operate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreIdentity {
    pub id: String,
    pub name: String,
    pub tenant_key: String,
    pub entry_id: String,
    pub address: String,
}

/// The validated pair of gateway identifiers needed to address one door.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DoorTarget {
    pub tenant_key: String,
    pub entry_id: String,
}

impl StoreIdentity {
    /// Resolve the gateway identifiers, rejecting empty values.
    pub fn door_target(&self) -> Result<DoorTarget, CoreError> {
        let tenant_key = self.tenant_key.trim();
        let entry_id = self.entry_id.trim();

        if tenant_key.is_empty() {
            return Err(CoreError::Validation(format!(
                "store '{}' has no tenant key",
                self.name
            )));
        }
        if entry_id.is_empty() {
            return Err(CoreError::Validation(format!(
                "store '{}' has no entry id",
                self.name
            )));
        }

        Ok(DoorTarget {
            tenant_key: tenant_key.to_string(),
            entry_id: entry_id.to_string(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionContext {
    user_name: String,
    stores: Vec<StoreIdentity>,
    selected: Option<usize>,
}

impl SessionContext {
    /// Create a session; the first store (if any) starts selected.
    pub fn new(user_name: impl Into<String>, stores: Vec<StoreIdentity>) -> Self {
        let selected = if stores.is_empty() { None } else { Some(0) };
        Self {
            user_name: user_name.into(),
            stores,
            selected,
        }
    }

    /// Display name recorded as `requested_by`; falls back to `"Unknown"`.
    pub fn requested_by(&self) -> &str {
        let name = self.user_name.trim();
        if name.is_empty() {
            UNKNOWN_REQUESTER
        } else {
            name
        }
    }

    pub fn stores(&self) -> &[StoreIdentity] {
        &self.stores
    }

    pub fn selected_store(&self) -> Option<&StoreIdentity> {
        self.selected.and_then(|i| self.stores.get(i))
    }

    /// Select one of the session's stores by id.
    pub fn select_store(&mut self, store_id: &str) -> Result<&StoreIdentity, CoreError> {
        let index = self
            .stores
            .iter()
            .position(|s| s.id == store_id)
            .ok_or_else(|| CoreError::NotFound {
                entity: "store",
                id: store_id.to_string(),
            })?;
        self.selected = Some(index);
        Ok(&self.stores[index])
    }

    /// Gateway identifiers of the selected store.
    pub fn door_target(&self) -> Result<DoorTarget, CoreError> {
        self.selected_store()
            .ok_or_else(|| CoreError::Validation("no store selected".to_string()))?
            .door_target()
    }
}
