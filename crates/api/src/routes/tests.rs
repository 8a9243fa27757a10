//! Router tests for paths that are decided before any database access.

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use http_body_util::BodyExt;
use sea_orm::DatabaseConnection;
use serde_json::{Value, json};
use tower::ServiceExt;
use uuid::Uuid;

use kitty_shared::{JwtConfig, JwtService};

use crate::{AppState, VerificationMailer, create_router};

fn jwt() -> JwtService {
    JwtService::new(JwtConfig {
        secret: "router-test-secret".to_string(),
        access_token_ttl_secs: 300,
    })
}

fn app() -> Router {
    let state = AppState::new(
        DatabaseConnection::Disconnected,
        jwt(),
        VerificationMailer::LogOnly,
    );
    create_router(state)
}

fn token(role: &str) -> String {
    jwt().generate_access_token(Uuid::now_v7(), role).unwrap()
}

async fn send(request: Request<Body>) -> (StatusCode, Value) {
    let response = app().oneshot(request).await.unwrap();
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let json = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body).unwrap()
    };
    (status, json)
}

fn json_request(method: &str, uri: &str, bearer: Option<&str>, body: &Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = bearer {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

#[tokio::test]
async fn test_health() {
    let request = Request::get("/api/v1/health").body(Body::empty()).unwrap();

    let (status, body) = send(request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_protected_route_requires_token() {
    let request = Request::get("/api/v1/users/me").body(Body::empty()).unwrap();

    let (status, body) = send(request).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "UNAUTHORIZED");
}

#[tokio::test]
async fn test_malformed_token_is_rejected() {
    let request = Request::get("/api/v1/balance-groups")
        .header(header::AUTHORIZATION, "Bearer not.a.jwt")
        .body(Body::empty())
        .unwrap();

    let (status, _) = send(request).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_token_signed_with_other_secret_is_rejected() {
    let foreign = JwtService::new(JwtConfig::default())
        .generate_access_token(Uuid::now_v7(), "admin")
        .unwrap();
    let request = Request::get("/api/v1/balance-groups")
        .header(header::AUTHORIZATION, format!("Bearer {foreign}"))
        .body(Body::empty())
        .unwrap();

    let (status, _) = send(request).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_token_with_unknown_role_is_rejected() {
    let request = Request::get("/api/v1/users/me")
        .header(header::AUTHORIZATION, format!("Bearer {}", token("owner")))
        .body(Body::empty())
        .unwrap();

    let (status, _) = send(request).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_register_validates_body_first() {
    let body = json!({"email": "not-an-email", "password": "Passw0rd!"});

    let (status, body) = send(json_request("POST", "/api/v1/users", None, &body)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], 400);
    assert_eq!(body["error"], "VALIDATION_ERROR");
    assert!(body["message"].as_str().unwrap().contains("email"));
}

#[tokio::test]
async fn test_malformed_path_id_is_not_found() {
    let request = Request::get("/api/v1/balance-groups/not-a-uuid")
        .header(header::AUTHORIZATION, format!("Bearer {}", token("user")))
        .body(Body::empty())
        .unwrap();

    let (status, body) = send(request).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "NOT_FOUND");
}

#[tokio::test]
async fn test_admin_passes_guard_and_hits_body_validation() {
    let uri = format!("/api/v1/balance-groups/{}", Uuid::now_v7());
    let body = json!({"group_name": "x".repeat(129), "group_member_ids": []});

    let (status, body) = send(json_request("PUT", &uri, Some(&token("admin")), &body)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().contains("group_name"));
}
