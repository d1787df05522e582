use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    routing::{get, post},
    Json, Router,
};
use std::time::Duration;

use serde::Deserialize;
use serde_json::Value;
use tokio::sync::watch;
use tower::ServiceExt;
use uuid::Uuid;

use orgbook_api::app::extract::ApiJson;
use orgbook_api::app::{apply_middleware, build_app, AppState};
use orgbook_api::config::AppConfig;
use orgbook_core::TenantId;

fn test_state(max_body_bytes: usize) -> (AppState, watch::Sender<bool>) {
    let config = AppConfig {
        tenant_id: TenantId::from_uuid(Uuid::now_v7()),
        bind_addr: "127.0.0.1:0".parse().unwrap(),
        max_body_bytes,
    };
    let (tx, rx) = watch::channel(false);
    (AppState::new(config, rx).unwrap(), tx)
}

async fn send(app: Router, req: Request<Body>) -> (StatusCode, Value) {
    let res = app.oneshot(req).await.unwrap();
    let status = res.status();
    let bytes = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

fn get_req(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_owned()))
        .unwrap()
}

#[derive(Debug, Deserialize)]
struct CreateContact {
    name: String,
}

async fn create_contact(ApiJson(body): ApiJson<CreateContact>) -> Json<Value> {
    Json(serde_json::json!({ "name": body.name }))
}

async fn explode() -> &'static str {
    panic!("handler exploded")
}

async fn stall() -> &'static str {
    tokio::time::sleep(Duration::from_secs(10)).await;
    "too late"
}

fn test_router() -> Router {
    Router::new()
        .route("/contacts", post(create_contact))
        .route("/boom", get(explode))
        .route("/slow", get(stall))
}

#[tokio::test]
async fn panics_become_internal_error_envelopes() {
    let (state, _tx) = test_state(1024);
    let app = apply_middleware(test_router(), &state);

    let (status, body) = send(app, get_req("/boom")).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"]["code"], 500);
    assert_eq!(body["error"]["message"], "internal server error");

    let snap = state.metrics.snapshot();
    assert_eq!(snap.panics_total, 1);
    assert_eq!(snap.responses_5xx, 1);
    assert_eq!(snap.in_flight, 0);
}

#[tokio::test]
async fn valid_json_bodies_reach_the_handler() {
    let (state, _tx) = test_state(1024);
    let app = apply_middleware(test_router(), &state);

    let (status, body) = send(app, post_json("/contacts", r#"{"name":"Ada"}"#)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Ada");
}

#[tokio::test]
async fn json_data_errors_are_invalid_arguments() {
    let (state, _tx) = test_state(1024);
    let app = apply_middleware(test_router(), &state);

    let (status, body) = send(app, post_json("/contacts", "{}")).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let err = &body["error"]["errors"][0];
    assert_eq!(err["reason"], "invalidArgument");
    assert_eq!(err["locationType"], "body");
    assert_eq!(err["location"], "name");
}

#[tokio::test]
async fn json_type_errors_point_at_the_field() {
    let (state, _tx) = test_state(1024);
    let app = apply_middleware(test_router(), &state);

    let (status, body) = send(app, post_json("/contacts", r#"{"name":42}"#)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"]["errors"][0]["location"], "name");
}

#[tokio::test]
async fn abandoned_requests_leave_no_in_flight_residue() {
    let (state, _tx) = test_state(1024);
    let app = apply_middleware(test_router(), &state);

    let outcome = tokio::time::timeout(Duration::from_millis(50), app.oneshot(get_req("/slow"))).await;
    assert!(outcome.is_err(), "slow route should still be running");

    let snap = state.metrics.snapshot();
    assert_eq!(snap.requests_total, 1);
    assert_eq!(snap.in_flight, 0);
    assert_eq!(snap.responses_aborted, 1);
}

#[tokio::test]
async fn metrics_endpoint_serves_prometheus_text() {
    let (state, _tx) = test_state(1024);
    let app = build_app(state.clone());

    let (status, _) = send(app.clone(), get_req("/tenant")).await;
    assert_eq!(status, StatusCode::OK);

    let res = app.oneshot(get_req("/metrics")).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let content_type = res.headers()[header::CONTENT_TYPE].to_str().unwrap().to_owned();
    assert!(content_type.starts_with("text/plain"));

    let bytes = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
    let text = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(text.contains(r#"orgbook_http_responses_total{class="2xx"} 1"#));
    assert!(text.contains("orgbook_http_requests_in_flight 1"));
}

#[tokio::test]
async fn malformed_json_is_a_bad_request() {
    let (state, _tx) = test_state(1024);
    let app = apply_middleware(test_router(), &state);

    let (status, body) = send(app, post_json("/contacts", "{not json")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["errors"][0]["reason"], "invalidArgument");
}

#[tokio::test]
async fn oversized_bodies_are_rejected() {
    let (state, _tx) = test_state(16);
    let app = apply_middleware(test_router(), &state);

    let payload = format!(r#"{{"name":"{}"}}"#, "x".repeat(64));
    let (status, body) = send(app, post_json("/contacts", &payload)).await;
    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(body["error"]["code"], 413);
}

#[tokio::test]
async fn draining_rejects_scoped_routes_but_not_health() {
    let (state, tx) = test_state(1024);
    let app = build_app(state.clone());

    let (status, _) = send(app.clone(), get_req("/tenant")).await;
    assert_eq!(status, StatusCode::OK);

    tx.send(true).unwrap();
    assert!(state.is_draining());

    let (status, body) = send(app.clone(), get_req("/tenant")).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["error"]["code"], 503);

    let (status, body) = send(app.clone(), get_req("/health")).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["status"], "draining");

    let (status, _) = send(app, get_req("/metrics")).await;
    assert_eq!(status, StatusCode::OK);
}
