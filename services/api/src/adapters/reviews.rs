//! services/api/src/adapters/reviews.rs
//!
//! In-memory implementation of the `ReviewStore` port. One lock-guarded map
//! keyed by (isbn, username) enforces the at-most-one-review invariant and
//! keeps the existence-check-then-write of an upsert linearizable.

use async_trait::async_trait;
use book_reviews_core::domain::{Review, UpsertOutcome};
use book_reviews_core::ports::{PortError, PortResult, ReviewStore};
use std::collections::BTreeMap;
use std::sync::RwLock;

/// Key order is (isbn, username) so a book's reviews are contiguous and come
/// out sorted by username.
type ReviewKey = (String, String);

#[derive(Default)]
pub struct InMemoryReviewStore {
    reviews: RwLock<BTreeMap<ReviewKey, String>>,
}

impl InMemoryReviewStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock_err() -> PortError {
        PortError::Unexpected("review store lock poisoned".to_string())
    }
}

#[async_trait]
impl ReviewStore for InMemoryReviewStore {
    async fn upsert(&self, isbn: &str, username: &str, text: &str) -> PortResult<UpsertOutcome> {
        if isbn.is_empty() || text.is_empty() {
            return Err(PortError::InvalidInput(
                "ISBN and review are required".to_string(),
            ));
        }

        let mut reviews = self.reviews.write().map_err(|_| Self::lock_err())?;
        let previous = reviews.insert(
            (isbn.to_string(), username.to_string()),
            text.to_string(),
        );
        Ok(match previous {
            Some(_) => UpsertOutcome::Updated,
            None => UpsertOutcome::Created,
        })
    }

    async fn delete(&self, isbn: &str, username: &str) -> PortResult<()> {
        let mut reviews = self.reviews.write().map_err(|_| Self::lock_err())?;
        reviews
            .remove(&(isbn.to_string(), username.to_string()))
            .ok_or_else(|| PortError::NotFound(format!("review for isbn {}", isbn)))?;
        Ok(())
    }

    async fn for_isbn(&self, isbn: &str) -> Vec<Review> {
        let reviews = match self.reviews.read() {
            Ok(guard) => guard,
            Err(_) => return Vec::new(),
        };
        reviews
            .range((isbn.to_string(), String::new())..)
            .take_while(|((i, _), _)| i == isbn)
            .map(|((i, u), text)| Review {
                isbn: i.clone(),
                username: u.clone(),
                text: text.clone(),
            })
            .collect()
    }
}

//=========================================================================================
// Tests
//=========================================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn second_upsert_overwrites_instead_of_accumulating() {
        let store = InMemoryReviewStore::new();
        assert_eq!(
            store.upsert("123", "alice", "good").await.unwrap(),
            UpsertOutcome::Created
        );
        assert_eq!(
            store.upsert("123", "alice", "great").await.unwrap(),
            UpsertOutcome::Updated
        );

        let reviews = store.for_isbn("123").await;
        assert_eq!(reviews.len(), 1);
        assert_eq!(reviews[0].text, "great");
    }

    #[tokio::test]
    async fn reviews_are_scoped_per_username() {
        let store = InMemoryReviewStore::new();
        store.upsert("123", "alice", "good").await.unwrap();
        // Bob writing to the same isbn creates a second review rather than
        // touching Alice's.
        assert_eq!(
            store.upsert("123", "bob", "meh").await.unwrap(),
            UpsertOutcome::Created
        );
        assert_eq!(store.for_isbn("123").await.len(), 2);
    }

    #[tokio::test]
    async fn delete_of_missing_pair_leaves_store_unchanged() {
        let store = InMemoryReviewStore::new();
        store.upsert("123", "alice", "good").await.unwrap();

        let err = store.delete("123", "bob").await.unwrap_err();
        assert!(matches!(err, PortError::NotFound(_)));
        assert_eq!(store.for_isbn("123").await.len(), 1);

        store.delete("123", "alice").await.unwrap();
        assert!(store.for_isbn("123").await.is_empty());
    }

    #[tokio::test]
    async fn empty_isbn_or_text_is_invalid() {
        let store = InMemoryReviewStore::new();
        assert!(matches!(
            store.upsert("", "alice", "good").await.unwrap_err(),
            PortError::InvalidInput(_)
        ));
        assert!(matches!(
            store.upsert("123", "alice", "").await.unwrap_err(),
            PortError::InvalidInput(_)
        ));
    }
}
