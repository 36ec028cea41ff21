//! End-to-end flow through the HTTP routes

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tokengate::api::build_api_routes;
use tokengate::{AppState, CredentialStore, InMemoryUserRepository, TokenAuthority};
use tower::util::ServiceExt; // For oneshot method

const SECRET: &str = "integration-secret";

fn app() -> Router {
    let credentials = Arc::new(CredentialStore::new(
        Arc::new(InMemoryUserRepository::new()),
        4,
    ));
    let tokens = Arc::new(TokenAuthority::new(SECRET, 3600));
    build_api_routes(AppState::new(credentials, tokens))
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body).unwrap()
    };
    (status, value)
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str, authorization: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri(uri);
    if let Some(value) = authorization {
        builder = builder.header(header::AUTHORIZATION, value);
    }
    builder.body(Body::empty()).unwrap()
}

async fn register(app: &Router, username: &str, password: &str) -> (StatusCode, Value) {
    send(
        app,
        post_json("/register", json!({ "username": username, "password": password })),
    )
    .await
}

async fn login(app: &Router, username: &str, password: &str) -> (StatusCode, Value) {
    send(
        app,
        post_json("/login", json!({ "username": username, "password": password })),
    )
    .await
}

#[tokio::test]
async fn test_alice_scenario() {
    let app = app();

    let (status, body) = register(&app, "alice", "secret1").await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "User registered successfully!");

    let (status, body) = login(&app, "alice", "secret1").await;
    assert_eq!(status, StatusCode::OK);
    let token = body["token"].as_str().unwrap().to_string();
    assert_eq!(token.split('.').count(), 3);

    let (status, body) = send(&app, get("/profile", Some(&format!("Bearer {}", token)))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Welcome, alice!");
    assert_eq!(body["user"]["username"], "alice");
    assert_eq!(body["user"]["id"], 1);
    let issued_at = body["user"]["issued_at"].as_i64().unwrap();
    let expires_at = body["user"]["expires_at"].as_i64().unwrap();
    assert_eq!(expires_at - issued_at, 3600);

    let (status, body) = send(&app, get("/profile", None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, json!({ "message": "No token provided" }));

    let (status, body) = send(&app, get("/profile", Some("Bearer garbage"))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body, json!({ "message": "Token is invalid or expired" }));
}

#[tokio::test]
async fn test_duplicate_registration() {
    let app = app();

    let (status, _) = register(&app, "bob", "first").await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = register(&app, "bob", "second").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "message": "User already exists" }));

    // The first password still works, the second never took effect
    assert_eq!(login(&app, "bob", "first").await.0, StatusCode::OK);
    assert_eq!(login(&app, "bob", "second").await.0, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_login_failures() {
    let app = app();
    register(&app, "carol", "right").await;

    let (status, body) = login(&app, "carol", "wrong").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, json!({ "message": "Incorrect password" }));

    let (status, body) = login(&app, "nobody", "anything").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "message": "User not found" }));

    let (status, _) = login(&app, "Carol", "right").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_token_from_other_deployment_is_rejected() {
    let app = app();
    register(&app, "dave", "pw").await;

    let foreign = TokenAuthority::new("not-the-secret", 3600)
        .issue(1, "dave")
        .unwrap();

    let (status, _) = send(&app, get("/profile", Some(&format!("Bearer {}", foreign)))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_expired_token_is_rejected() {
    let app = app();
    let stale = TokenAuthority::new(SECRET, 3600)
        .issue_at(1, "erin", chrono::Utc::now().timestamp() - 3601 - 5)
        .unwrap();

    let (status, _) = send(&app, get("/profile", Some(&format!("Bearer {}", stale)))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_logout_and_public() {
    let app = app();

    let logout = Request::builder()
        .method(Method::POST)
        .uri("/logout")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(&app, logout).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Logged out successfully!");

    let (status, body) = send(&app, get("/public", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["message"],
        "This route is public and accessible to anyone!"
    );
}

#[tokio::test]
async fn test_token_survives_logout() {
    let app = app();
    register(&app, "frank", "pw").await;
    let (_, body) = login(&app, "frank", "pw").await;
    let bearer = format!("Bearer {}", body["token"].as_str().unwrap());

    let logout = Request::builder()
        .method(Method::POST)
        .uri("/logout")
        .header(header::AUTHORIZATION, bearer.as_str())
        .body(Body::empty())
        .unwrap();
    assert_eq!(send(&app, logout).await.0, StatusCode::OK);

    // Nothing server-side to revoke
    assert_eq!(send(&app, get("/profile", Some(&bearer))).await.0, StatusCode::OK);
}

#[tokio::test]
async fn test_ids_follow_registration_order() {
    let app = app();
    register(&app, "u1", "pw").await;
    register(&app, "u2", "pw").await;

    let (_, body) = login(&app, "u2", "pw").await;
    let bearer = format!("Bearer {}", body["token"].as_str().unwrap());

    let (_, profile) = send(&app, get("/profile", Some(&bearer))).await;
    assert_eq!(profile["user"]["id"], 2);
}

#[tokio::test]
async fn test_authorization_header_second_field_is_the_token() {
    let app = app();
    register(&app, "gina", "pw").await;
    let (_, body) = login(&app, "gina", "pw").await;
    let token = body["token"].as_str().unwrap().to_string();

    // Scheme name is not checked
    let (status, _) = send(&app, get("/profile", Some(&format!("Token {}", token)))).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(&app, get("/profile", Some("Basic xyz"))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // Double space leaves the second field empty
    let (status, body) = send(&app, get("/profile", Some("Bearer  garbage"))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, json!({ "message": "No token provided" }));
}
