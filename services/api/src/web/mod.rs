//! services/api/src/web/mod.rs
//!
//! The HTTP layer: route table, shared response plumbing, and the master
//! OpenAPI definition.

use axum::http::{header, HeaderMap};
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use serde::Serialize;
use std::sync::Arc;
use utoipa::{OpenApi, ToSchema};

pub mod auth;
pub mod catalog;
pub mod reviews;
pub mod state;

use state::AppState;

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    paths(
        auth::register_handler,
        auth::login_handler,
        reviews::upsert_review_handler,
        reviews::delete_review_handler,
        catalog::list_books_handler,
        catalog::book_by_isbn_handler,
        catalog::books_by_author_handler,
        catalog::books_by_title_handler,
        catalog::reviews_by_isbn_handler,
    ),
    components(
        schemas(
            MessageResponse,
            auth::RegisterRequest,
            auth::LoginRequest,
            auth::LoginResponse,
            catalog::BookResponse,
            catalog::BooksResponse,
            catalog::ReviewsResponse,
        )
    ),
    tags(
        (name = "Book Reviews API", description = "Catalog browsing plus authenticated, owner-scoped review mutations.")
    )
)]
pub struct ApiDoc;

//=========================================================================================
// Shared Response Plumbing
//=========================================================================================

/// The `{ "message": ... }` payload every non-data response carries.
#[derive(Serialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

/// Shorthand used by handlers when building status/message pairs.
pub(crate) fn msg(text: &str) -> Json<MessageResponse> {
    Json(MessageResponse {
        message: text.to_string(),
    })
}

/// Pulls the bearer token out of an `Authorization: Bearer <token>` header.
pub(crate) fn bearer_token(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let token = value.strip_prefix("Bearer ").unwrap_or(value).trim();
    if token.is_empty() {
        None
    } else {
        Some(token.to_string())
    }
}

/// Parses the session identifier out of the `Cookie` header.
pub(crate) fn session_cookie(headers: &HeaderMap) -> Option<String> {
    let cookie_header = headers.get(header::COOKIE)?.to_str().ok()?;
    cookie_header
        .split(';')
        .find_map(|c| c.trim().strip_prefix("session="))
        .filter(|sid| !sid.is_empty())
        .map(|sid| sid.to_string())
}

//=========================================================================================
// Route Table
//=========================================================================================

/// Builds the application router. Shared between `bin/api.rs` and the
/// integration tests.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        // Registration and customer login
        .route("/register", post(auth::register_handler))
        .route("/customer/login", post(auth::login_handler))
        // Owner-scoped review mutations
        .route("/customer/review", post(reviews::upsert_review_handler))
        .route(
            "/customer/auth/review/{isbn}",
            delete(reviews::delete_review_handler),
        )
        // Public catalog browsing
        .route("/", get(catalog::list_books_handler))
        .route("/isbn/{isbn}", get(catalog::book_by_isbn_handler))
        .route("/author/{author}", get(catalog::books_by_author_handler))
        .route("/title/{title}", get(catalog::books_by_title_handler))
        .route("/review/{isbn}", get(catalog::reviews_by_isbn_handler))
        .with_state(state)
}
