//! services/api/src/adapters/catalog.rs
//!
//! Static implementation of the `CatalogService` port. The catalog is fixed
//! at startup and read-only; the review side of a book lives in the review
//! store, not here.

use async_trait::async_trait;
use book_reviews_core::domain::Book;
use book_reviews_core::ports::{CatalogService, PortError, PortResult};

pub struct StaticCatalog {
    books: Vec<Book>,
}

impl StaticCatalog {
    pub fn new(books: Vec<Book>) -> Self {
        Self { books }
    }

    /// The stock ten-book catalog the service ships with.
    pub fn seeded() -> Self {
        let entries = [
            ("1", "Things Fall Apart", "Chinua Achebe"),
            ("2", "Fairy tales", "Hans Christian Andersen"),
            ("3", "The Divine Comedy", "Dante Alighieri"),
            ("4", "The Epic Of Gilgamesh", "Unknown"),
            ("5", "The Book Of Job", "Unknown"),
            ("6", "The Blind Owl", "Sadegh Hedayat"),
            (
                "7",
                "Molloy, Malone Dies, The Unnamable, the trilogy",
                "Samuel Beckett",
            ),
            ("8", "Pride and Prejudice", "Jane Austen"),
            ("9", "The Human Comedy", "Honore de Balzac"),
            ("10", "The Pilgrim's Progress", "John Bunyan"),
        ];
        Self::new(
            entries
                .into_iter()
                .map(|(isbn, title, author)| Book {
                    isbn: isbn.to_string(),
                    title: title.to_string(),
                    author: author.to_string(),
                })
                .collect(),
        )
    }
}

#[async_trait]
impl CatalogService for StaticCatalog {
    async fn list_all(&self) -> Vec<Book> {
        self.books.clone()
    }

    async fn by_isbn(&self, isbn: &str) -> PortResult<Book> {
        self.books
            .iter()
            .find(|b| b.isbn == isbn)
            .cloned()
            .ok_or_else(|| PortError::NotFound(format!("book {}", isbn)))
    }

    async fn by_author(&self, author: &str) -> Vec<Book> {
        self.books
            .iter()
            .filter(|b| b.author == author)
            .cloned()
            .collect()
    }

    async fn by_title(&self, title: &str) -> Vec<Book> {
        self.books
            .iter()
            .filter(|b| b.title == title)
            .cloned()
            .collect()
    }
}
