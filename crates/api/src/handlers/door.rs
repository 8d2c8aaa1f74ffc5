//! Handlers for door status, unlock, and access history.

use axum::extract::State;
use axum::Json;
use doorway_control::{ControllerPhase, UnlockReceipt};
use doorway_core::attempt::UnlockAttempt;
use doorway_core::door::{Connectivity, DoorStatus};
use doorway_core::ledger::DailySummary;
use doorway_core::session::StoreIdentity;
use serde::{Deserialize, Serialize};

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Door panel: the selected store plus the believed door state.
#[derive(Debug, Serialize)]
pub struct DoorView {
    pub store: Option<StoreIdentity>,
    pub status: DoorStatus,
    #[serde(flatten)]
    pub phase: ControllerPhase,
    pub relock_grace_secs: u64,
}

#[derive(Debug, Deserialize)]
pub struct ConnectivityUpdate {
    pub connectivity: Connectivity,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /door
pub async fn get_door(State(state): State<AppState>) -> Json<DataResponse<DoorView>> {
    let controller = &state.controller;
    let view = DoorView {
        store: controller.session().selected_store().cloned(),
        status: controller.status(),
        phase: controller.phase(),
        relock_grace_secs: state.config.relock_grace_secs,
    };
    Json(DataResponse { data: view })
}

/// POST /door/unlock
///
/// Forwards one unlock request to the gateway. Failures still record an
/// attempt, which is returned alongside the error.
pub async fn unlock_door(
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<UnlockReceipt>>> {
    let receipt = state.controller.unlock().await?;
    Ok(Json(DataResponse { data: receipt }))
}

/// PUT /door/connectivity
pub async fn set_connectivity(
    State(state): State<AppState>,
    Json(input): Json<ConnectivityUpdate>,
) -> Json<DataResponse<DoorStatus>> {
    let status = state.controller.set_connectivity(input.connectivity);
    Json(DataResponse { data: status })
}

/// GET /door/history
pub async fn list_history(State(state): State<AppState>) -> Json<DataResponse<Vec<UnlockAttempt>>> {
    Json(DataResponse {
        data: state.controller.history(),
    })
}

/// GET /door/summary
pub async fn get_summary(State(state): State<AppState>) -> Json<DataResponse<DailySummary>> {
    Json(DataResponse {
        data: state.controller.summary(),
    })
}
