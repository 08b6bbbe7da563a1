//! Catalog endpoints

use axum::{
    extract::State,
    http::StatusCode,
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    error::AppResult,
    models::{Book, CreateBook, LibraryData, RemoveBook, SearchQuery, UpdateBook},
};

use super::{ApiPath, ApiQuery, Input};

/// Single book with a status message
#[derive(Serialize, ToSchema)]
pub struct BookResponse {
    /// Status message
    pub message: String,
    pub book: Book,
}

/// Search results
#[derive(Serialize, ToSchema)]
pub struct SearchResponse {
    /// Matching catalog books, in catalog order
    pub books: Vec<Book>,
    /// Number of matches
    pub total: usize,
    /// Set when nothing matched
    pub message: Option<String>,
}

fn book_response(message: &str, book: Book) -> Json<BookResponse> {
    Json(BookResponse {
        message: message.to_string(),
        book,
    })
}

/// Catalog and borrow ledger in one document
#[utoipa::path(
    get,
    path = "/library",
    tag = "books",
    responses(
        (status = 200, description = "Available and borrowed books", body = LibraryData)
    )
)]
pub async fn library_overview(State(state): State<crate::AppState>) -> AppResult<Json<LibraryData>> {
    let data = state.services.catalog.overview().await?;
    Ok(Json(data))
}

/// List books available in the catalog
#[utoipa::path(
    get,
    path = "/books",
    tag = "books",
    responses(
        (status = 200, description = "Catalog books", body = Vec<Book>)
    )
)]
pub async fn list_books(State(state): State<crate::AppState>) -> AppResult<Json<Vec<Book>>> {
    let books = state.services.catalog.list_books().await?;
    Ok(Json(books))
}

/// Get a catalog book by exact title
#[utoipa::path(
    get,
    path = "/books/by-title/{title}",
    tag = "books",
    params(
        ("title" = String, Path, description = "Exact, case-sensitive title")
    ),
    responses(
        (status = 200, description = "Book details", body = Book),
        (status = 404, description = "Book not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_book(
    State(state): State<crate::AppState>,
    ApiPath(title): ApiPath<String>,
) -> AppResult<Json<Book>> {
    let book = state.services.catalog.get_book(&title).await?;
    Ok(Json(book))
}

/// Add a book to the catalog
#[utoipa::path(
    post,
    path = "/books",
    tag = "books",
    request_body = CreateBook,
    responses(
        (status = 201, description = "Book added", body = BookResponse),
        (status = 400, description = "Title or author missing", body = crate::error::ErrorResponse)
    )
)]
pub async fn add_book(
    State(state): State<crate::AppState>,
    Input(data): Input<CreateBook>,
) -> AppResult<(StatusCode, Json<BookResponse>)> {
    let book = state.services.catalog.add_book(data).await?;
    Ok((StatusCode::CREATED, book_response("Book added successfully!", book)))
}

/// Update title and author of a catalog book
#[utoipa::path(
    put,
    path = "/books/by-title/{title}",
    tag = "books",
    params(
        ("title" = String, Path, description = "Current title")
    ),
    request_body = UpdateBook,
    responses(
        (status = 200, description = "Book updated", body = BookResponse),
        (status = 400, description = "Title or author missing", body = crate::error::ErrorResponse),
        (status = 404, description = "Book not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_book(
    State(state): State<crate::AppState>,
    ApiPath(title): ApiPath<String>,
    Input(data): Input<UpdateBook>,
) -> AppResult<Json<BookResponse>> {
    let book = state.services.catalog.update_book(&title, data).await?;
    Ok(book_response("Book updated successfully!", book))
}

/// Remove a catalog book by title
#[utoipa::path(
    delete,
    path = "/books/by-title/{title}",
    tag = "books",
    params(
        ("title" = String, Path, description = "Exact, case-sensitive title")
    ),
    responses(
        (status = 200, description = "Book removed", body = BookResponse),
        (status = 404, description = "Book not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn remove_book(
    State(state): State<crate::AppState>,
    ApiPath(title): ApiPath<String>,
) -> AppResult<Json<BookResponse>> {
    let book = state.services.catalog.remove_book(&title).await?;
    Ok(book_response("Book removed successfully!", book))
}

/// Remove a catalog book, title given in the body
#[utoipa::path(
    post,
    path = "/books/remove",
    tag = "books",
    request_body = RemoveBook,
    responses(
        (status = 200, description = "Book removed", body = BookResponse),
        (status = 404, description = "Book not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn remove_book_by_body(
    State(state): State<crate::AppState>,
    Input(data): Input<RemoveBook>,
) -> AppResult<Json<BookResponse>> {
    let book = state.services.catalog.remove_book(&data.title).await?;
    Ok(book_response("Book removed successfully!", book))
}

/// Search the catalog by title fragment
#[utoipa::path(
    get,
    path = "/books/search",
    tag = "books",
    params(SearchQuery),
    responses(
        (status = 200, description = "Matching books", body = SearchResponse),
        (status = 400, description = "Search title missing", body = crate::error::ErrorResponse)
    )
)]
pub async fn search_books(
    State(state): State<crate::AppState>,
    ApiQuery(query): ApiQuery<SearchQuery>,
) -> AppResult<Json<SearchResponse>> {
    let books = state.services.catalog.search(&query).await?;

    let message = books.is_empty().then(|| "No books found!".to_string());
    Ok(Json(SearchResponse {
        total: books.len(),
        books,
        message,
    }))
}
