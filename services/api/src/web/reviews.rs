//! services/api/src/web/reviews.rs
//!
//! The ownership-enforcing mutation gateway. Every review mutation runs the
//! same sequence: extract a credential, verify it through the token service,
//! resolve the acting username from the verified token, and only then touch
//! the review store scoped to that username. A verification failure performs
//! no store mutation.
//!
//! Credential sources are deliberately asymmetric, matching the original
//! service: the upsert route reads the Authorization header, the delete route
//! reads the token bound to the caller's session.

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use book_reviews_core::domain::UpsertOutcome;
use book_reviews_core::ports::PortError;
use serde::Deserialize;
use std::sync::Arc;
use tracing::{error, warn};
use utoipa::IntoParams;

use crate::web::state::AppState;
use crate::web::{bearer_token, msg, session_cookie, MessageResponse};

//=========================================================================================
// Request Types
//=========================================================================================

/// Query parameters for the upsert route. Both are optional at the extractor
/// so the gateway can check the credential before complaining about input.
#[derive(Deserialize, IntoParams)]
pub struct ReviewQuery {
    pub isbn: Option<String>,
    pub review: Option<String>,
}

//=========================================================================================
// Handlers
//=========================================================================================

/// POST /customer/review - Create or replace the caller's review for a book
#[utoipa::path(
    post,
    path = "/customer/review",
    params(ReviewQuery),
    responses(
        (status = 201, description = "Review added", body = MessageResponse),
        (status = 200, description = "Review updated", body = MessageResponse),
        (status = 400, description = "Missing isbn or review", body = MessageResponse),
        (status = 403, description = "Missing or invalid token", body = MessageResponse)
    )
)]
pub async fn upsert_review_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ReviewQuery>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, (StatusCode, Json<MessageResponse>)> {
    // 1. Credential extraction: bearer token from the Authorization header
    let token = bearer_token(&headers)
        .ok_or_else(|| (StatusCode::FORBIDDEN, msg("User not logged in")))?;

    // 2. Token verification - the single choke point for mutations
    let username = state.tokens.verify(&token).map_err(|e| {
        warn!("Rejected review upsert: {}", e);
        (
            StatusCode::FORBIDDEN,
            msg("Invalid token. User not authenticated"),
        )
    })?;

    // 3. Input validation, only after the caller is authenticated
    let (isbn, review) = match (
        params.isbn.filter(|s| !s.is_empty()),
        params.review.filter(|s| !s.is_empty()),
    ) {
        (Some(isbn), Some(review)) => (isbn, review),
        _ => {
            return Err((
                StatusCode::BAD_REQUEST,
                msg("ISBN and review are required"),
            ))
        }
    };

    // 4. Execute, scoped to the username resolved from the token
    let outcome = state
        .reviews
        .upsert(&isbn, &username, &review)
        .await
        .map_err(|e| match e {
            PortError::InvalidInput(_) => (
                StatusCode::BAD_REQUEST,
                msg("ISBN and review are required"),
            ),
            other => {
                error!("Failed to upsert review: {:?}", other);
                (StatusCode::INTERNAL_SERVER_ERROR, msg("Review failed"))
            }
        })?;

    Ok(match outcome {
        UpsertOutcome::Created => (StatusCode::CREATED, msg("Review added successfully")),
        UpsertOutcome::Updated => (StatusCode::OK, msg("Review updated successfully")),
    })
}

/// DELETE /customer/auth/review/{isbn} - Delete the caller's review for a book
#[utoipa::path(
    delete,
    path = "/customer/auth/review/{isbn}",
    params(("isbn" = String, Path, description = "ISBN of the reviewed book")),
    responses(
        (status = 200, description = "Review deleted", body = MessageResponse),
        (status = 403, description = "No session token or invalid token", body = MessageResponse),
        (status = 404, description = "No review by this user for this ISBN", body = MessageResponse)
    )
)]
pub async fn delete_review_handler(
    State(state): State<Arc<AppState>>,
    Path(isbn): Path<String>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, (StatusCode, Json<MessageResponse>)> {
    // 1. Credential extraction: token bound to the caller's session
    let session_id = session_cookie(&headers)
        .ok_or_else(|| (StatusCode::FORBIDDEN, msg("User not logged in")))?;
    let token = state
        .sessions
        .current_token(&session_id)
        .await
        .ok_or_else(|| (StatusCode::FORBIDDEN, msg("User not logged in")))?;

    // 2. Token verification
    let username = state.tokens.verify(&token).map_err(|e| {
        warn!("Rejected review delete: {}", e);
        (
            StatusCode::FORBIDDEN,
            msg("Invalid token. User not authenticated"),
        )
    })?;

    // 3. Execute. A review owned by someone else is indistinguishable from
    //    no review at all.
    state
        .reviews
        .delete(&isbn, &username)
        .await
        .map_err(|e| match e {
            PortError::NotFound(_) => (StatusCode::NOT_FOUND, msg("Review not found")),
            other => {
                error!("Failed to delete review: {:?}", other);
                (StatusCode::INTERNAL_SERVER_ERROR, msg("Delete failed"))
            }
        })?;

    Ok((StatusCode::OK, msg("Review deleted successfully")))
}
