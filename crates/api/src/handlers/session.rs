//! Handlers for the session's store selection.

use axum::extract::State;
use axum::Json;
use doorway_core::session::{SessionContext, StoreIdentity};
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SelectStoreRequest {
    pub store_id: String,
}

/// GET /session
pub async fn get_session(State(state): State<AppState>) -> Json<DataResponse<SessionContext>> {
    Json(DataResponse {
        data: state.controller.session(),
    })
}

/// PUT /session/store
pub async fn select_store(
    State(state): State<AppState>,
    Json(input): Json<SelectStoreRequest>,
) -> AppResult<Json<DataResponse<StoreIdentity>>> {
    if input.store_id.trim().is_empty() {
        return Err(AppError::BadRequest("store_id is required".to_string()));
    }
    let store = state.controller.select_store(&input.store_id)?;
    Ok(Json(DataResponse { data: store }))
}
