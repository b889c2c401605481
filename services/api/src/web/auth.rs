//! services/api/src/web/auth.rs
//!
//! Authentication endpoints for user registration and login.

use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use book_reviews_core::ports::PortError;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::error;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::web::state::AppState;
use crate::web::{msg, session_cookie, MessageResponse};

//=========================================================================================
// Request/Response Types
//=========================================================================================

#[derive(Deserialize, ToSchema)]
pub struct RegisterRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Deserialize, ToSchema)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Serialize, ToSchema)]
pub struct LoginResponse {
    pub message: String,
    pub access_token: String,
}

//=========================================================================================
// Handlers
//=========================================================================================

/// POST /register - Create a new user account
#[utoipa::path(
    post,
    path = "/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User registered", body = MessageResponse),
        (status = 400, description = "Missing username or password", body = MessageResponse),
        (status = 409, description = "Username already taken", body = MessageResponse)
    )
)]
pub async fn register_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RegisterRequest>,
) -> Result<impl IntoResponse, (StatusCode, Json<MessageResponse>)> {
    state
        .users
        .register(&req.username, &req.password)
        .await
        .map_err(|e| match e {
            PortError::InvalidInput(_) => (
                StatusCode::BAD_REQUEST,
                msg("Username and password are required"),
            ),
            PortError::Conflict(_) => (StatusCode::CONFLICT, msg("User already exists")),
            other => {
                error!("Failed to register user: {:?}", other);
                (StatusCode::INTERNAL_SERVER_ERROR, msg("Registration failed"))
            }
        })?;

    Ok((
        StatusCode::CREATED,
        msg("User successfully registered. Now you can login"),
    ))
}

/// POST /customer/login - Issue a token and bind it to the caller's session
#[utoipa::path(
    post,
    path = "/customer/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = LoginResponse),
        (status = 401, description = "Invalid credentials", body = MessageResponse)
    )
)]
pub async fn login_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse, (StatusCode, Json<MessageResponse>)> {
    // 1. Validate the credential pair
    let user = state
        .users
        .validate(&req.username, &req.password)
        .await
        .map_err(|e| match e {
            PortError::Unauthenticated => (StatusCode::UNAUTHORIZED, msg("Invalid credentials")),
            other => {
                error!("Failed to validate credentials: {:?}", other);
                (StatusCode::INTERNAL_SERVER_ERROR, msg("Login failed"))
            }
        })?;

    // 2. Issue a fresh token for the user
    let token = state.tokens.issue(&user.username).map_err(|e| {
        error!("Failed to issue token: {:?}", e);
        (StatusCode::INTERNAL_SERVER_ERROR, msg("Login failed"))
    })?;

    // 3. Bind the token to the session, reusing the caller's session id when
    //    one is already present (lazy session creation). Each login
    //    overwrites the previous binding.
    let session_id = session_cookie(&headers).unwrap_or_else(|| Uuid::new_v4().to_string());
    state.sessions.bind(&session_id, &token).await;

    // 4. Hand the session id back as a cookie scoped to the customer routes
    let cookie = format!(
        "session={}; HttpOnly; SameSite=Lax; Path=/customer; Max-Age=3600",
        session_id
    );

    let response = LoginResponse {
        message: "User successfully logged in".to_string(),
        access_token: token,
    };

    Ok((StatusCode::OK, [(header::SET_COOKIE, cookie)], Json(response)))
}
