//! REST API tests driven through the router without binding a socket.

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use serde_json::{Value, json};
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;
use whisker_games::{LogReporter, MovePolicy, SessionManager, router};

fn app() -> Router {
    let manager = SessionManager::with_rng(
        MovePolicy::perfect(),
        Duration::ZERO,
        Arc::new(LogReporter),
        SmallRng::seed_from_u64(42),
    );
    router(manager)
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let request = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => request
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string())),
        None => request.body(Body::empty()),
    }
    .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn create(app: &Router) -> String {
    let (status, body) = send(app, "POST", "/api/sessions", None).await;
    assert_eq!(status, StatusCode::CREATED);
    body["id"].as_str().unwrap().to_string()
}

/// Polls until the background computer turn has landed.
async fn wait_for_player_turn(app: &Router, id: &str) -> Value {
    for _ in 0..200 {
        let (_, body) = send(app, "GET", &format!("/api/sessions/{id}"), None).await;
        if body["state"]["phase"] != "awaiting_computer_move" {
            return body;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    panic!("computer never moved");
}

#[tokio::test]
async fn test_create_and_list() {
    let app = app();
    let id = create(&app).await;

    let (status, body) = send(&app, "GET", "/api/sessions", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([id]));

    let (status, body) = send(&app, "GET", &format!("/api/sessions/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["state"]["phase"], "awaiting_player_move");
    assert_eq!(body["board"], json!([null, null, null, null, null, null, null, null, null]));
    assert_eq!(body["scoreboard"], json!({"player": 0, "computer": 0, "draw": 0}));
}

#[tokio::test]
async fn test_move_then_computer_reply() {
    let app = app();
    let id = create(&app).await;

    let (status, body) = send(
        &app,
        "POST",
        &format!("/api/sessions/{id}/move"),
        Some(json!({"position": 0})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["board"][0], "X");

    let body = wait_for_player_turn(&app, &id).await;
    // Center is the only reply that holds against a corner opening.
    assert_eq!(body["board"][4], "O");
    assert_eq!(body["state"]["phase"], "awaiting_player_move");
}

#[tokio::test]
async fn test_unknown_session_is_404() {
    let app = app();
    let (status, body) = send(&app, "GET", "/api/sessions/missing", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].as_str().unwrap().contains("missing"));

    let (status, _) = send(
        &app,
        "POST",
        "/api/sessions/missing/move",
        Some(json!({"position": 0})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_out_of_range_is_400() {
    let app = app();
    let id = create(&app).await;
    let (status, _) = send(
        &app,
        "POST",
        &format!("/api/sessions/{id}/move"),
        Some(json!({"position": 9})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_malformed_position_is_400_with_error_body() {
    let app = app();
    let id = create(&app).await;
    let uri = format!("/api/sessions/{id}/move");

    for body in [json!({"position": -1}), json!({"position": 1.5}), json!({"cell": 0})] {
        let (status, reply) = send(&app, "POST", &uri, Some(body.clone())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{body}");
        assert!(reply["error"].is_string(), "{body}");
    }

    let (_, view) = send(&app, "GET", &format!("/api/sessions/{id}"), None).await;
    assert!(view["board"].as_array().unwrap().iter().all(Value::is_null));
}

#[tokio::test]
async fn test_occupied_square_is_409() {
    let app = app();
    let id = create(&app).await;
    let uri = format!("/api/sessions/{id}/move");

    send(&app, "POST", &uri, Some(json!({"position": 0}))).await;
    wait_for_player_turn(&app, &id).await;

    let (status, body) = send(&app, "POST", &uri, Some(json!({"position": 0}))).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_reset_clears_board() {
    let app = app();
    let id = create(&app).await;
    send(
        &app,
        "POST",
        &format!("/api/sessions/{id}/move"),
        Some(json!({"position": 4})),
    )
    .await;
    wait_for_player_turn(&app, &id).await;

    let (status, body) = send(&app, "POST", &format!("/api/sessions/{id}/reset"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["state"]["phase"], "awaiting_player_move");
    assert!(body["board"].as_array().unwrap().iter().all(Value::is_null));
    assert!(body["cat"].is_null());
}
