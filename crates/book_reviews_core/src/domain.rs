//! crates/book_reviews_core/src/domain.rs
//!
//! Defines the pure, core data structures for the application.
//! These structs are independent of any database or serialization format.

/// A registered account. Created on registration, immutable afterwards.
#[derive(Debug, Clone)]
pub struct User {
    pub username: String,
}

/// One entry in the fixed book catalog. The catalog never changes at runtime;
/// the live review view for a book is joined in from the review store.
#[derive(Debug, Clone)]
pub struct Book {
    pub isbn: String,
    pub title: String,
    pub author: String,
}

/// A review, keyed by (isbn, username). At most one per pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Review {
    pub isbn: String,
    pub username: String,
    pub text: String,
}

/// Distinguishes a first-time review post from an in-place replacement,
/// so the web layer can answer 201 vs 200.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    Created,
    Updated,
}
