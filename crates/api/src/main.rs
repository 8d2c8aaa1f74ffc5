use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use doorway_api::config::ServerConfig;
use doorway_api::router::build_app_router;
use doorway_api::state::AppState;
use doorway_control::UnlockController;
use doorway_events::{EventBus, EventLog};
use doorway_gateway::HttpDoorGateway;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "doorway_api=debug,doorway_control=debug,doorway_gateway=debug,tower_http=debug"
                    .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(
        host = %config.host,
        port = %config.port,
        gateway = %config.gateway_base_url,
        relock_grace_secs = config.relock_grace_secs,
        store_count = config.stores.len(),
        "Loaded server configuration",
    );

    // --- Gateway client ---
    let gateway = HttpDoorGateway::new(config.gateway_base_url.clone(), config.gateway_timeout())
        .expect("Failed to build gateway HTTP client");

    // --- Event bus ---
    let event_bus = Arc::new(EventBus::default());
    let event_log_handle = tokio::spawn(EventLog::run(event_bus.subscribe()));

    // --- Unlock controller ---
    let session = config.session();
    match session.selected_store() {
        Some(store) => tracing::info!(
            store = %store.name,
            tenant_key = %store.tenant_key,
            entry_id = %store.entry_id,
            "Controlling door",
        ),
        None => tracing::warn!("No store configured, unlock requests will be rejected"),
    }
    let controller = UnlockController::new(
        Arc::new(gateway),
        session,
        Arc::clone(&event_bus),
        config.controller_config(),
    );

    // --- App state ---
    let state = AppState {
        config: Arc::new(config.clone()),
        controller: controller.clone(),
    };
    let app = build_app_router(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    // --- Post-shutdown cleanup ---
    tracing::info!("Server stopped accepting connections, cleaning up");

    controller.shutdown();
    drop(controller);

    // Dropping the last bus handle closes the channel and stops the event log.
    drop(event_bus);
    let _ = tokio::time::timeout(Duration::from_secs(5), event_log_handle).await;

    tracing::info!("Graceful shutdown complete");
}

/// Wait for SIGINT (Ctrl-C) or, on Unix, SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}
