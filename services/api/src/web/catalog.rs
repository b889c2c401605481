//! services/api/src/web/catalog.rs
//!
//! Read-only catalog browsing. These handlers join the fixed catalog with the
//! live review store so every book payload reflects current review contents.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use book_reviews_core::domain::Book;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use utoipa::ToSchema;

use crate::web::state::AppState;
use crate::web::{msg, MessageResponse};

//=========================================================================================
// Response Types
//=========================================================================================

/// A catalog entry together with its current reviews (username -> text).
#[derive(Serialize, ToSchema)]
pub struct BookResponse {
    pub isbn: String,
    pub title: String,
    pub author: String,
    pub reviews: BTreeMap<String, String>,
}

#[derive(Serialize, ToSchema)]
pub struct BooksResponse {
    pub books: Vec<BookResponse>,
}

#[derive(Serialize, ToSchema)]
pub struct ReviewsResponse {
    pub reviews: BTreeMap<String, String>,
}

impl BookResponse {
    async fn from_book(book: Book, state: &AppState) -> Self {
        let reviews = state
            .reviews
            .for_isbn(&book.isbn)
            .await
            .into_iter()
            .map(|r| (r.username, r.text))
            .collect();
        Self {
            isbn: book.isbn,
            title: book.title,
            author: book.author,
            reviews,
        }
    }
}

async fn with_reviews(books: Vec<Book>, state: &AppState) -> Vec<BookResponse> {
    let mut out = Vec::with_capacity(books.len());
    for book in books {
        out.push(BookResponse::from_book(book, state).await);
    }
    out
}

//=========================================================================================
// Handlers
//=========================================================================================

/// GET / - The full catalog, keyed by ISBN
#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 200, description = "The full catalog keyed by ISBN")
    )
)]
pub async fn list_books_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let books = state.catalog.list_all().await;
    let mut catalog = BTreeMap::new();
    for book in books {
        let isbn = book.isbn.clone();
        catalog.insert(isbn, BookResponse::from_book(book, &state).await);
    }
    Json(catalog)
}

/// GET /isbn/{isbn} - One book by its ISBN
#[utoipa::path(
    get,
    path = "/isbn/{isbn}",
    params(("isbn" = String, Path, description = "ISBN to look up")),
    responses(
        (status = 200, description = "The matching book", body = BookResponse),
        (status = 404, description = "Unknown ISBN", body = MessageResponse)
    )
)]
pub async fn book_by_isbn_handler(
    State(state): State<Arc<AppState>>,
    Path(isbn): Path<String>,
) -> Result<impl IntoResponse, (StatusCode, Json<MessageResponse>)> {
    let book = state
        .catalog
        .by_isbn(&isbn)
        .await
        .map_err(|_| (StatusCode::NOT_FOUND, msg("Book not found")))?;
    Ok(Json(BookResponse::from_book(book, &state).await))
}

/// GET /author/{author} - All books by an author
#[utoipa::path(
    get,
    path = "/author/{author}",
    params(("author" = String, Path, description = "Author to look up")),
    responses(
        (status = 200, description = "Matching books", body = BooksResponse),
        (status = 404, description = "No books by this author", body = MessageResponse)
    )
)]
pub async fn books_by_author_handler(
    State(state): State<Arc<AppState>>,
    Path(author): Path<String>,
) -> Result<impl IntoResponse, (StatusCode, Json<MessageResponse>)> {
    let books = state.catalog.by_author(&author).await;
    if books.is_empty() {
        return Err((StatusCode::NOT_FOUND, msg("No books found by this author")));
    }
    Ok(Json(BooksResponse {
        books: with_reviews(books, &state).await,
    }))
}

/// GET /title/{title} - All books with a title
#[utoipa::path(
    get,
    path = "/title/{title}",
    params(("title" = String, Path, description = "Title to look up")),
    responses(
        (status = 200, description = "Matching books", body = BooksResponse),
        (status = 404, description = "No books with this title", body = MessageResponse)
    )
)]
pub async fn books_by_title_handler(
    State(state): State<Arc<AppState>>,
    Path(title): Path<String>,
) -> Result<impl IntoResponse, (StatusCode, Json<MessageResponse>)> {
    let books = state.catalog.by_title(&title).await;
    if books.is_empty() {
        return Err((StatusCode::NOT_FOUND, msg("No books found with this title")));
    }
    Ok(Json(BooksResponse {
        books: with_reviews(books, &state).await,
    }))
}

/// GET /review/{isbn} - Current reviews for a book
#[utoipa::path(
    get,
    path = "/review/{isbn}",
    params(("isbn" = String, Path, description = "ISBN to look up")),
    responses(
        (status = 200, description = "Reviews for the book", body = ReviewsResponse),
        (status = 404, description = "Unknown ISBN", body = MessageResponse)
    )
)]
pub async fn reviews_by_isbn_handler(
    State(state): State<Arc<AppState>>,
    Path(isbn): Path<String>,
) -> Result<impl IntoResponse, (StatusCode, Json<MessageResponse>)> {
    // The review view 404s on an unknown book even though mutations never
    // check book existence; that matches the original surface.
    state
        .catalog
        .by_isbn(&isbn)
        .await
        .map_err(|_| (StatusCode::NOT_FOUND, msg("Book not found")))?;

    let reviews = state
        .reviews
        .for_isbn(&isbn)
        .await
        .into_iter()
        .map(|r| (r.username, r.text))
        .collect();
    Ok(Json(ReviewsResponse { reviews }))
}
