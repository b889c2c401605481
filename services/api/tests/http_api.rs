//! services/api/tests/http_api.rs
//!
//! End-to-end tests against the application router: registration, login,
//! token-scoped review mutations, and catalog browsing.

use api_lib::adapters::{
    catalog::StaticCatalog, reviews::InMemoryReviewStore, sessions::InMemorySessionBinder,
    tokens::JwtTokenService, users::InMemoryCredentialStore, users::PlainTextVerifier,
};
use api_lib::config::Config;
use api_lib::web::{self, state::AppState};
use book_reviews_core::ports::TokenService;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

const TEST_SECRET: &str = "test-secret";

fn test_app() -> Router {
    let config = Arc::new(Config {
        bind_address: "127.0.0.1:0".parse().unwrap(),
        token_secret: TEST_SECRET.to_string(),
        log_level: tracing::Level::INFO,
    });
    let state = Arc::new(AppState {
        users: Arc::new(InMemoryCredentialStore::new(Arc::new(PlainTextVerifier))),
        tokens: Arc::new(JwtTokenService::new(TEST_SECRET)),
        sessions: Arc::new(InMemorySessionBinder::new()),
        reviews: Arc::new(InMemoryReviewStore::new()),
        catalog: Arc::new(StaticCatalog::seeded()),
        config,
    });
    web::router(state)
}

async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(req).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn register(app: &Router, username: &str, password: &str) -> (StatusCode, Value) {
    send(
        app,
        post_json(
            "/register",
            json!({ "username": username, "password": password }),
        ),
    )
    .await
}

/// Logs in and returns (access_token, session cookie pair).
async fn login(app: &Router, username: &str, password: &str) -> (String, String) {
    let response = app
        .clone()
        .oneshot(post_json(
            "/customer/login",
            json!({ "username": username, "password": password }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .expect("login must set a session cookie")
        .to_string();

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    let token = body["access_token"].as_str().unwrap().to_string();
    (token, cookie)
}

fn upsert_review(isbn: &str, review: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(format!("/customer/review?isbn={}&review={}", isbn, review));
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    builder.body(Body::empty()).unwrap()
}

fn delete_review(isbn: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("DELETE")
        .uri(format!("/customer/auth/review/{}", isbn));
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::empty()).unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

//=========================================================================================
// Registration & Login
//=========================================================================================

#[tokio::test]
async fn registering_the_same_username_twice_conflicts() {
    let app = test_app();
    let (status, _) = register(&app, "alice", "pw1").await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = register(&app, "alice", "pw2").await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["message"], "User already exists");
}

#[tokio::test]
async fn registration_requires_both_fields() {
    let app = test_app();
    let (status, _) = register(&app, "", "pw").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = register(&app, "bob", "").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Username and password are required");
}

#[tokio::test]
async fn login_with_bad_credentials_is_unauthorized() {
    let app = test_app();
    register(&app, "alice", "pw1").await;

    let (status, body) = send(
        &app,
        post_json(
            "/customer/login",
            json!({ "username": "alice", "password": "wrong" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Invalid credentials");
}

//=========================================================================================
// Review Mutations (the gateway)
//=========================================================================================

#[tokio::test]
async fn review_lifecycle_create_update_delete() {
    let app = test_app();
    register(&app, "alice", "pw1").await;
    let (token, cookie) = login(&app, "alice", "pw1").await;

    // First post creates
    let (status, body) = send(&app, upsert_review("1", "good", Some(&token))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "Review added successfully");

    // Second post replaces in place
    let (status, body) = send(&app, upsert_review("1", "great", Some(&token))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Review updated successfully");

    // Exactly one review, with the second text
    let (status, body) = send(&app, get("/review/1")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["reviews"], json!({ "alice": "great" }));

    // Delete through the session-bound token
    let (status, body) = send(&app, delete_review("1", Some(&cookie))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Review deleted successfully");

    // A second delete finds nothing
    let (status, body) = send(&app, delete_review("1", Some(&cookie))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Review not found");

    let (_, body) = send(&app, get("/review/1")).await;
    assert_eq!(body["reviews"], json!({}));
}

#[tokio::test]
async fn upsert_without_a_token_is_forbidden_and_mutates_nothing() {
    let app = test_app();
    let (status, body) = send(&app, upsert_review("1", "sneaky", None)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["message"], "User not logged in");

    let (_, body) = send(&app, get("/review/1")).await;
    assert_eq!(body["reviews"], json!({}));
}

#[tokio::test]
async fn upsert_with_a_foreign_signature_is_forbidden() {
    let app = test_app();
    let forged = JwtTokenService::new("some-other-secret");
    let token = forged.issue("alice").unwrap();

    let (status, body) = send(&app, upsert_review("1", "sneaky", Some(&token))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["message"], "Invalid token. User not authenticated");
}

#[tokio::test]
async fn upsert_checks_the_token_before_the_input() {
    let app = test_app();
    register(&app, "alice", "pw1").await;
    let (token, _) = login(&app, "alice", "pw1").await;

    // Authenticated but missing the review text
    let (status, body) = send(
        &app,
        Request::builder()
            .method("POST")
            .uri("/customer/review?isbn=1")
            .header(header::AUTHORIZATION, format!("Bearer {}", token))
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "ISBN and review are required");

    // Unauthenticated with the same bad input still answers 403
    let (status, _) = send(
        &app,
        Request::builder()
            .method("POST")
            .uri("/customer/review?isbn=1")
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn delete_without_a_bound_session_is_forbidden() {
    let app = test_app();
    register(&app, "alice", "pw1").await;
    let (token, _) = login(&app, "alice", "pw1").await;
    send(&app, upsert_review("1", "good", Some(&token))).await;

    // No cookie at all
    let (status, _) = send(&app, delete_review("1", None)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // A cookie naming a session that never logged in
    let (status, body) = send(&app, delete_review("1", Some("session=stranger"))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["message"], "User not logged in");

    // The review is untouched
    let (_, body) = send(&app, get("/review/1")).await;
    assert_eq!(body["reviews"], json!({ "alice": "good" }));
}

#[tokio::test]
async fn mutations_are_scoped_to_the_acting_username() {
    let app = test_app();
    register(&app, "alice", "pw1").await;
    register(&app, "bob", "pw2").await;
    let (alice_token, _) = login(&app, "alice", "pw1").await;
    let (bob_token, bob_cookie) = login(&app, "bob", "pw2").await;

    send(&app, upsert_review("1", "good", Some(&alice_token))).await;

    // Bob's post for the same isbn creates his own review
    let (status, _) = send(&app, upsert_review("1", "terrible", Some(&bob_token))).await;
    assert_eq!(status, StatusCode::CREATED);

    let (_, body) = send(&app, get("/review/1")).await;
    assert_eq!(body["reviews"], json!({ "alice": "good", "bob": "terrible" }));

    // Bob deletes only his own; Alice's survives
    let (status, _) = send(&app, delete_review("1", Some(&bob_cookie))).await;
    assert_eq!(status, StatusCode::OK);
    let (_, body) = send(&app, get("/review/1")).await;
    assert_eq!(body["reviews"], json!({ "alice": "good" }));
}

//=========================================================================================
// Catalog Browsing
//=========================================================================================

#[tokio::test]
async fn catalog_listing_and_lookups() {
    let app = test_app();

    let (status, body) = send(&app, get("/")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_object().unwrap().len(), 10);
    assert_eq!(body["8"]["title"], "Pride and Prejudice");

    let (status, body) = send(&app, get("/isbn/3")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["author"], "Dante Alighieri");

    let (status, body) = send(&app, get("/isbn/999")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Book not found");

    let (status, body) = send(&app, get("/author/Unknown")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["books"].as_array().unwrap().len(), 2);

    let (status, body) = send(&app, get("/author/Nobody")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "No books found by this author");

    let (status, body) = send(&app, get("/title/Fairy%20tales")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["books"][0]["isbn"], "2");

    let (status, body) = send(&app, get("/title/No%20Such%20Title")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "No books found with this title");

    let (status, body) = send(&app, get("/review/999")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Book not found");
}

#[tokio::test]
async fn book_payloads_reflect_live_reviews() {
    let app = test_app();
    register(&app, "alice", "pw1").await;
    let (token, _) = login(&app, "alice", "pw1").await;
    send(&app, upsert_review("6", "haunting", Some(&token))).await;

    let (_, body) = send(&app, get("/isbn/6")).await;
    assert_eq!(body["reviews"], json!({ "alice": "haunting" }));

    let (_, body) = send(&app, get("/")).await;
    assert_eq!(body["6"]["reviews"]["alice"], "haunting");
}
