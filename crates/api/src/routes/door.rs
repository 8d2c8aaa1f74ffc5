//! Route definitions for door control.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::door;
use crate::state::AppState;

/// Routes mounted at `/door`.
///
/// ```text
/// GET  /                -> get_door
/// POST /unlock          -> unlock_door
/// PUT  /connectivity    -> set_connectivity
/// GET  /history         -> list_history
/// GET  /summary         -> get_summary
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(door::get_door))
        .route("/unlock", post(door::unlock_door))
        .route("/connectivity", put(door::set_connectivity))
        .route("/history", get(door::list_history))
        .route("/summary", get(door::get_summary))
}
