//! crates/book_reviews_core/src/ports.rs
//!
//! Defines the service contracts (traits) for the application's core logic.
//! These traits form the boundary of the hexagonal architecture, allowing the core
//! to be independent of specific external implementations like session stores
//! or token formats.

use async_trait::async_trait;

use crate::domain::{Book, Review, UpsertOutcome, User};

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
/// Every failure a port can produce maps onto exactly one of these variants,
/// and the web layer translates each variant to a response status.
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Already exists: {0}")]
    Conflict(String),
    #[error("Invalid credentials")]
    Unauthenticated,
    #[error("Invalid token")]
    InvalidToken,
    #[error("Token expired")]
    Expired,
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

/// Checks a presented password against the stored secret material.
///
/// The shipped implementation is plain equality, preserving the original
/// service's contract. A hash-based verifier can replace it without touching
/// the credential store or the web layer.
pub trait CredentialVerifier: Send + Sync {
    fn verify(&self, presented: &str, stored: &str) -> bool;
}

#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Creates a new user. Fails with `Conflict` when the username is taken
    /// and `InvalidInput` when either field is empty.
    async fn register(&self, username: &str, password: &str) -> PortResult<User>;

    /// Returns the matching user, or `Unauthenticated` when no
    /// (username, password) pair matches.
    async fn validate(&self, username: &str, password: &str) -> PortResult<User>;
}

/// Issues and verifies the bearer tokens that authenticate review mutations.
///
/// `verify` is the single choke point: every mutation path resolves the acting
/// username through it, never from client-supplied input. Token operations are
/// pure computations with no I/O, so this port is synchronous.
pub trait TokenService: Send + Sync {
    /// Produces a signed token asserting `username`, valid for a fixed window
    /// from issuance.
    fn issue(&self, username: &str) -> PortResult<String>;

    /// Decodes a token back to its username. Fails with `InvalidToken` on a
    /// malformed or badly signed token and `Expired` strictly after the
    /// expiry instant.
    fn verify(&self, token: &str) -> PortResult<String>;
}

/// Associates a server-side session identifier with the current token, for
/// routes that source credentials from the session rather than a header.
#[async_trait]
pub trait SessionBinder: Send + Sync {
    /// Stores `token` under `session_id`, overwriting any prior binding.
    async fn bind(&self, session_id: &str, token: &str);

    /// Returns the bound token, or `None` when the session is unknown or has
    /// never seen a login.
    async fn current_token(&self, session_id: &str) -> Option<String>;
}

#[async_trait]
pub trait ReviewStore: Send + Sync {
    /// Creates or replaces the review for (isbn, username). Fails with
    /// `InvalidInput` when isbn or text is empty.
    async fn upsert(&self, isbn: &str, username: &str, text: &str) -> PortResult<UpsertOutcome>;

    /// Removes the review for exactly (isbn, username); `NotFound` when the
    /// pair has no review. The store is left untouched on failure.
    async fn delete(&self, isbn: &str, username: &str) -> PortResult<()>;

    /// All current reviews for a book, in username order.
    async fn for_isbn(&self, isbn: &str) -> Vec<Review>;
}

/// Read-only lookup over the fixed catalog. External collaborator: this core
/// never writes to it.
#[async_trait]
pub trait CatalogService: Send + Sync {
    async fn list_all(&self) -> Vec<Book>;
    async fn by_isbn(&self, isbn: &str) -> PortResult<Book>;
    async fn by_author(&self, author: &str) -> Vec<Book>;
    async fn by_title(&self, title: &str) -> Vec<Book>;
}
