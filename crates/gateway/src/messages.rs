//! Wire shapes of the gateway's `POST /api/unlock` endpoint.

use doorway_core::session::DoorTarget;
use serde::{Deserialize, Serialize};

/// Request body sent to the gateway. Field names are PascalCase on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct UnlockRequest {
    pub tenant_key: String,
    pub entry_id: String,
    pub requested_by: String,
    pub request_source: String,
}

impl UnlockRequest {
    pub fn new(
        target: &DoorTarget,
        requested_by: impl Into<String>,
        request_source: impl Into<String>,
    ) -> Self {
        Self {
            tenant_key: target.tenant_key.clone(),
            entry_id: target.entry_id.clone(),
            requested_by: requested_by.into(),
            request_source: request_source.into(),
        }
    }
}

/// Response body returned by the gateway.
///
/// Also parsed from non-2xx bodies, where only `errorMessage` is of interest.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnlockResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(rename = "errorMessage", default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}
