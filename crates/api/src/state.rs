use std::sync::Arc;

use doorway_control::UnlockController;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable: every field is behind an `Arc` or is a cloneable handle.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ServerConfig>,
    /// Unlock state machine for the configured door.
    pub controller: UnlockController,
}
