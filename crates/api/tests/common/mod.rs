#![allow(dead_code)]

use axum::body::Body;
use axum::http::{Method, Request};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

use fitstudio_api::config::ServerConfig;
use fitstudio_api::router::build_app_router;
use fitstudio_api::state::AppState;

/// Build a test `ServerConfig` with safe defaults.
///
/// Uses `http://localhost:5173` as CORS origin (matching the dev default),
/// a 30-second request timeout and the default studio zone.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        studio_timezone: chrono_tz::Asia::Kolkata,
    }
}

/// Build the full application router with all middleware layers, using the
/// given database pool.
pub fn build_test_app(pool: PgPool) -> Router {
    let config = test_config();
    let state = AppState::new(pool, config.clone());
    build_app_router(state, &config)
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn send(app: Router, method: Method, uri: &str, body: Option<serde_json::Value>) -> Response {
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

pub async fn delete(app: Router, uri: &str) -> Response {
    send(app, Method::DELETE, uri, None).await
}

/// POST a JSON body and return the `id` of the created record.
pub async fn create(pool: &PgPool, uri: &str, body: serde_json::Value) -> String {
    let response = post_json(build_test_app(pool.clone()), uri, body).await;
    assert_eq!(response.status(), axum::http::StatusCode::CREATED);
    body_json(response).await["id"]
        .as_str()
        .expect("created record has a string id")
        .to_string()
}

pub fn user_body(name: &str, email: &str) -> serde_json::Value {
    serde_json::json!({ "name": name, "email": email })
}

pub fn class_body(instructor: &str, date: &str, time: &str, slots: i32) -> serde_json::Value {
    serde_json::json!({
        "name": "Power Yoga",
        "instructor": instructor,
        "class_date": date,
        "start_time": time,
        "available_slots": slots,
    })
}
