pub mod door;
pub mod health;
pub mod session;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// ```text
/// /door                        status of the selected store's door
/// /door/unlock                 trigger an unlock (POST)
/// /door/connectivity           mark door online/offline (PUT)
/// /door/history                access history, most recent first
/// /door/summary                today's success/failure counts
///
/// /session                     current user and stores
/// /session/store               select a store (PUT)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/door", door::router())
        .nest("/session", session::router())
}
