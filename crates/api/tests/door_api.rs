//! End-to-end tests for the door endpoints against a stub gateway.

mod common;

use axum::http::{Method, StatusCode};
use common::{
    body_json, build_test_app, closed_gateway_url, demo_store, get, main_store, put_json, send,
    spawn_gateway, test_config, wait_past_grace, GatewayReply,
};

async fn unlock(app: axum::Router) -> axum::response::Response {
    send(app, Method::POST, "/api/v1/door/unlock", None).await
}

// ---------------------------------------------------------------------------
// Test: successful unlock, then local relock without another gateway call
// ---------------------------------------------------------------------------

#[tokio::test]
async fn unlock_success_then_relocks_after_grace() {
    let gateway = spawn_gateway(GatewayReply::Json(
        StatusCode::OK,
        serde_json::json!({ "success": true }),
    ))
    .await;
    let (app, _) = build_test_app(test_config(gateway.base_url(), vec![demo_store()]));

    let response = unlock(app.clone()).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["message"], "Door unlocked successfully!");
    assert_eq!(json["data"]["attempt"]["outcome"], "success");
    assert_eq!(json["data"]["attempt"]["requested_by"], "Demo Joker Manager");
    assert_eq!(json["data"]["attempt"]["request_source"], "Web Portal");

    let door = body_json(get(app.clone(), "/api/v1/door").await).await;
    assert_eq!(door["data"]["status"]["is_locked"], false);
    assert_eq!(door["data"]["status"]["last_access_label"], "Just now");
    assert_eq!(door["data"]["phase"], "unlocked");
    assert_eq!(door["data"]["store"]["entry_id"], "390250");

    let history = body_json(get(app.clone(), "/api/v1/door/history").await).await;
    assert_eq!(history["data"].as_array().unwrap().len(), 1);

    wait_past_grace().await;

    let door = body_json(get(app, "/api/v1/door").await).await;
    assert_eq!(door["data"]["status"]["is_locked"], true);
    assert_eq!(door["data"]["phase"], "idle");
    assert_eq!(gateway.calls(), 1);
}

// ---------------------------------------------------------------------------
// Test: HTTP 500 with no body is a generic failure
// ---------------------------------------------------------------------------

#[tokio::test]
async fn gateway_500_records_failure_with_generic_reason() {
    let gateway = spawn_gateway(GatewayReply::Empty(StatusCode::INTERNAL_SERVER_ERROR)).await;
    let (app, _) = build_test_app(test_config(gateway.base_url(), vec![demo_store()]));

    let response = unlock(app.clone()).await;
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let json = body_json(response).await;
    assert_eq!(json["code"], "GATEWAY_UNAVAILABLE");
    assert_eq!(json["error"], "Network error occurred");
    assert_eq!(json["attempt"]["outcome"], "failure");

    let door = body_json(get(app.clone(), "/api/v1/door").await).await;
    assert_eq!(door["data"]["status"]["is_locked"], true);

    let history = body_json(get(app.clone(), "/api/v1/door/history").await).await;
    let entries = history["data"].as_array().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["outcome"], "failure");

    let summary = body_json(get(app, "/api/v1/door/summary").await).await;
    assert_eq!(summary["data"]["failed_attempts"], 1);
    assert_eq!(summary["data"]["successful_unlocks"], 0);
}

// ---------------------------------------------------------------------------
// Test: success:false surfaces the gateway's message
// ---------------------------------------------------------------------------

#[tokio::test]
async fn gateway_rejection_surfaces_error_message() {
    let gateway = spawn_gateway(GatewayReply::Json(
        StatusCode::OK,
        serde_json::json!({ "success": false, "errorMessage": "Entry is disabled" }),
    ))
    .await;
    let (app, _) = build_test_app(test_config(gateway.base_url(), vec![demo_store()]));

    let response = unlock(app.clone()).await;
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let json = body_json(response).await;
    assert_eq!(json["code"], "GATEWAY_REJECTED");
    assert_eq!(json["error"], "Entry is disabled");

    let door = body_json(get(app, "/api/v1/door").await).await;
    assert_eq!(door["data"]["status"]["is_locked"], true);
}

// ---------------------------------------------------------------------------
// Test: connection refused
// ---------------------------------------------------------------------------

#[tokio::test]
async fn unreachable_gateway_is_transport_failure() {
    let (app, controller) =
        build_test_app(test_config(closed_gateway_url().await, vec![demo_store()]));

    let response = unlock(app).await;
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let json = body_json(response).await;
    assert_eq!(json["error"], "Network error occurred");

    assert!(controller.status().is_locked);
    assert_eq!(controller.history().len(), 1);
}

// ---------------------------------------------------------------------------
// Test: preconditions
// ---------------------------------------------------------------------------

#[tokio::test]
async fn offline_door_is_rejected_before_gateway() {
    let gateway = spawn_gateway(GatewayReply::Json(
        StatusCode::OK,
        serde_json::json!({ "success": true }),
    ))
    .await;
    let (app, _) = build_test_app(test_config(gateway.base_url(), vec![demo_store()]));

    put_json(
        app.clone(),
        "/api/v1/door/connectivity",
        serde_json::json!({ "connectivity": "offline" }),
    )
    .await;

    let response = unlock(app.clone()).await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let json = body_json(response).await;
    assert_eq!(json["code"], "PRECONDITION_MISSING");
    assert!(json.get("attempt").is_none());

    assert_eq!(gateway.calls(), 0);
    let history = body_json(get(app, "/api/v1/door/history").await).await;
    assert!(history["data"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn no_store_configured_is_rejected_before_gateway() {
    let gateway = spawn_gateway(GatewayReply::Json(
        StatusCode::OK,
        serde_json::json!({ "success": true }),
    ))
    .await;
    let (app, _) = build_test_app(test_config(gateway.base_url(), vec![]));

    let response = unlock(app.clone()).await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(gateway.calls(), 0);

    let door = body_json(get(app, "/api/v1/door").await).await;
    assert!(door["data"]["store"].is_null());
}

// ---------------------------------------------------------------------------
// Test: store selection
// ---------------------------------------------------------------------------

#[tokio::test]
async fn select_store_switches_door() {
    let gateway = spawn_gateway(GatewayReply::Json(
        StatusCode::OK,
        serde_json::json!({ "success": true }),
    ))
    .await;
    let (app, _) =
        build_test_app(test_config(gateway.base_url(), vec![demo_store(), main_store()]));

    let session = body_json(get(app.clone(), "/api/v1/session").await).await;
    assert_eq!(session["data"]["user_name"], "Demo Joker Manager");
    assert_eq!(session["data"]["stores"].as_array().unwrap().len(), 2);

    let response = put_json(
        app.clone(),
        "/api/v1/session/store",
        serde_json::json!({ "store_id": "2" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["tenant_key"], "main-store");

    let door = body_json(get(app.clone(), "/api/v1/door").await).await;
    assert_eq!(door["data"]["store"]["entry_id"], "entry-002");

    let response = put_json(
        app.clone(),
        "/api/v1/session/store",
        serde_json::json!({ "store_id": "42" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = put_json(app, "/api/v1/session/store", serde_json::json!({ "store_id": " " })).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
