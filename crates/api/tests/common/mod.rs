#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::extract::State;
use axum::http::{Method, Request, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::Router;
use http_body_util::BodyExt;
use tower::ServiceExt;

use doorway_api::config::ServerConfig;
use doorway_api::router::build_app_router;
use doorway_api::state::AppState;
use doorway_control::UnlockController;
use doorway_core::session::StoreIdentity;
use doorway_events::EventBus;
use doorway_gateway::HttpDoorGateway;

// ---------------------------------------------------------------------------
// Stub door-control gateway
// ---------------------------------------------------------------------------

/// How the stub gateway answers `POST /api/unlock`.
#[derive(Clone)]
pub enum GatewayReply {
    Json(StatusCode, serde_json::Value),
    Empty(StatusCode),
}

#[derive(Clone)]
struct StubState {
    reply: GatewayReply,
    calls: Arc<AtomicUsize>,
}

async fn stub_unlock(State(stub): State<StubState>) -> Response {
    stub.calls.fetch_add(1, Ordering::SeqCst);
    match stub.reply {
        GatewayReply::Json(status, body) => (status, axum::Json(body)).into_response(),
        GatewayReply::Empty(status) => status.into_response(),
    }
}

/// A running stub gateway and its call counter.
pub struct StubGateway {
    pub addr: SocketAddr,
    pub calls: Arc<AtomicUsize>,
}

impl StubGateway {
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

pub async fn spawn_gateway(reply: GatewayReply) -> StubGateway {
    let calls = Arc::new(AtomicUsize::new(0));
    let app = Router::new()
        .route("/api/unlock", post(stub_unlock))
        .with_state(StubState {
            reply,
            calls: Arc::clone(&calls),
        });
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    StubGateway { addr, calls }
}

/// A base URL nothing listens on.
pub async fn closed_gateway_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}

// ---------------------------------------------------------------------------
// App construction
// ---------------------------------------------------------------------------

pub fn demo_store() -> StoreIdentity {
    StoreIdentity {
        id: "1".into(),
        name: "Demo Joker Store".into(),
        tenant_key: "demo-joker".into(),
        entry_id: "390250".into(),
        address: "Møterom Tunsberg".into(),
    }
}

pub fn main_store() -> StoreIdentity {
    StoreIdentity {
        id: "2".into(),
        name: "Main Store".into(),
        tenant_key: "main-store".into(),
        entry_id: "entry-002".into(),
        address: "Main Street 123".into(),
    }
}

/// Build a test `ServerConfig` pointing at `gateway_base_url`.
pub fn test_config(gateway_base_url: String, stores: Vec<StoreIdentity>) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        gateway_base_url,
        gateway_timeout_secs: 5,
        relock_grace_secs: 1,
        session_user_name: "Demo Joker Manager".to_string(),
        stores,
    }
}

/// Build the full application router plus a handle to its controller.
pub fn build_test_app(config: ServerConfig) -> (Router, UnlockController) {
    let gateway = HttpDoorGateway::new(config.gateway_base_url.clone(), config.gateway_timeout())
        .expect("gateway client should build");
    let controller = UnlockController::new(
        Arc::new(gateway),
        config.session(),
        Arc::new(EventBus::default()),
        config.controller_config(),
    );
    let state = AppState {
        config: Arc::new(config.clone()),
        controller: controller.clone(),
    };
    (build_app_router(state, &config), controller)
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn send(app: Router, method: Method, uri: &str, body: Option<serde_json::Value>) -> Response {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response {
    send(app, Method::GET, uri, None).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    send(app, Method::POST, uri, Some(body)).await
}

pub async fn put_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    send(app, Method::PUT, uri, Some(body)).await
}

pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Wait slightly longer than the one-second test grace period.
pub async fn wait_past_grace() {
    tokio::time::sleep(Duration::from_millis(1_300)).await;
}
