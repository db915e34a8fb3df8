//! HTTP-level integration tests for the `/users` endpoints.

mod common;

use axum::http::StatusCode;
use common::{body_json, create, delete, get, post_json, put_json, user_body};
use sqlx::PgPool;

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_user_returns_201_with_action_body(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = post_json(app, "/api/v1/users", user_body("Priya", "priya@example.com")).await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert!(json["id"].is_string());
    assert_eq!(json["message"], "Successfully created new user record");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_get_user_by_id(pool: PgPool) {
    let id = create(&pool, "/api/v1/users", user_body("Get Me", "get@example.com")).await;

    let response = get(common::build_test_app(pool), &format!("/api/v1/users/{id}")).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["data"]["id"], id);
    assert_eq!(json["data"]["name"], "Get Me");
    assert_eq!(json["data"]["email"], "get@example.com");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_get_nonexistent_user_returns_404(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = get(app, &format!("/api/v1/users/{}", uuid::Uuid::now_v7())).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["code"], "NOT_FOUND");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_malformed_id_returns_400_json(pool: PgPool) {
    for uri in [
        "/api/v1/users/not-a-uuid",
        "/api/v1/classes/not-a-uuid",
        "/api/v1/bookings/not-a-uuid/detail",
    ] {
        let response = get(common::build_test_app(pool.clone()), uri).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{uri}");
        let json = body_json(response).await;
        assert_eq!(json["code"], "BAD_REQUEST", "{uri}");
        assert!(json["error"].is_string(), "{uri}");
    }

    let response = delete(common::build_test_app(pool), "/api/v1/users/42").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "BAD_REQUEST");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_duplicate_email_returns_409(pool: PgPool) {
    create(&pool, "/api/v1/users", user_body("One", "dup@example.com")).await;

    let app = common::build_test_app(pool);
    let response = post_json(app, "/api/v1/users", user_body("Two", "dup@example.com")).await;

    assert_eq!(response.status(), StatusCode::CONFLICT);
    let json = body_json(response).await;
    assert_eq!(json["code"], "ALREADY_EXISTS");
    assert_eq!(json["error"], "A user with this email already exists");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_invalid_email_returns_400(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = post_json(app, "/api/v1/users", user_body("Bad", "not-an-email")).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert_eq!(json["error"], "email: must be a valid email address");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_missing_field_returns_400_json(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = post_json(app, "/api/v1/users", serde_json::json!({"name": "No Email"})).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "BAD_REQUEST");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_update_user(pool: PgPool) {
    let id = create(&pool, "/api/v1/users", user_body("Original", "o@example.com")).await;

    let response = put_json(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/users/{id}"),
        serde_json::json!({"name": "Updated"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["id"], id);
    assert_eq!(json["message"], "Successfully updated user record");

    let response = get(common::build_test_app(pool), &format!("/api/v1/users/{id}")).await;
    let json = body_json(response).await;
    assert_eq!(json["data"]["name"], "Updated");
    assert_eq!(json["data"]["email"], "o@example.com");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_delete_user_then_404(pool: PgPool) {
    let id = create(&pool, "/api/v1/users", user_body("Gone", "gone@example.com")).await;

    let response = delete(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/users/{id}"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await["message"],
        "Successfully deleted user record"
    );

    let response = get(common::build_test_app(pool), &format!("/api/v1/users/{id}")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_list_users_paginates(pool: PgPool) {
    for i in 1..=12 {
        create(
            &pool,
            "/api/v1/users",
            user_body(&format!("User {i}"), &format!("user{i}@example.com")),
        )
        .await;
    }

    let response = get(common::build_test_app(pool.clone()), "/api/v1/users").await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 10);

    let response = get(
        common::build_test_app(pool),
        "/api/v1/users?page=2&limit=10",
    )
    .await;
    let json = body_json(response).await;
    let page = json["data"].as_array().unwrap();
    assert_eq!(page.len(), 2);
    assert_eq!(page[0]["name"], "User 11");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_out_of_range_paging_returns_400(pool: PgPool) {
    for uri in [
        "/api/v1/users?page=0",
        "/api/v1/users?limit=0",
        "/api/v1/users?limit=101",
    ] {
        let response = get(common::build_test_app(pool.clone()), uri).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{uri}");
        assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
    }

    let response = get(common::build_test_app(pool), "/api/v1/users?page=abc").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "BAD_REQUEST");
}
