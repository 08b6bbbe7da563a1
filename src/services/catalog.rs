//! Catalog management service

use crate::{
    error::{AppError, AppResult},
    models::{Book, CreateBook, LibraryData, Payload, SearchQuery, UpdateBook},
    repository::Repository,
};

pub const BOOK_NOT_FOUND: &str = "Book not found";

#[derive(Clone)]
pub struct CatalogService {
    repository: Repository,
}

impl CatalogService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Whether the library document can be read
    pub async fn storage_ready(&self) -> bool {
        self.repository.library.is_readable().await
    }

    /// Catalog and borrow ledger together
    pub async fn overview(&self) -> AppResult<LibraryData> {
        self.repository.library.load().await
    }

    pub async fn list_books(&self) -> AppResult<Vec<Book>> {
        Ok(self.repository.library.load().await?.books)
    }

    /// First catalog book with exactly this title
    pub async fn get_book(&self, title: &str) -> AppResult<Book> {
        let data = self.repository.library.load().await?;
        data.find_book(title).cloned().ok_or_else(|| {
            tracing::debug!("Catalog lookup missed: {:?}", title);
            AppError::NotFound(BOOK_NOT_FOUND.to_string())
        })
    }

    pub async fn add_book(&self, data: CreateBook) -> AppResult<Book> {
        data.check()?;
        let book = Book::from(data);

        let added = book.clone();
        self.repository
            .library
            .update(move |library| {
                library.add_book(book);
                Ok(())
            })
            .await?;

        tracing::info!("Book added: {:?} by {:?}", added.title, added.author);
        Ok(added)
    }

    /// Replace title and author of the first book titled `title`
    pub async fn update_book(&self, title: &str, data: UpdateBook) -> AppResult<Book> {
        // A missing book wins over an invalid payload
        self.get_book(title).await?;
        data.check()?;

        let replacement = Book::new(data.title, data.author);
        let updated = self
            .repository
            .library
            .update(|library| {
                library
                    .replace_book(title, replacement)
                    .cloned()
                    .ok_or_else(|| AppError::NotFound(BOOK_NOT_FOUND.to_string()))
            })
            .await?;

        tracing::info!("Book {:?} updated to {:?} by {:?}", title, updated.title, updated.author);
        Ok(updated)
    }

    pub async fn remove_book(&self, title: &str) -> AppResult<Book> {
        let removed = self
            .repository
            .library
            .update(|library| {
                library.remove_book(title).ok_or_else(|| {
                    tracing::warn!("Cannot remove unknown book {:?}", title);
                    AppError::NotFound(BOOK_NOT_FOUND.to_string())
                })
            })
            .await?;

        tracing::info!("Book removed: {:?}", removed.title);
        Ok(removed)
    }

    /// Catalog books whose title contains the query, ignoring case
    pub async fn search(&self, query: &SearchQuery) -> AppResult<Vec<Book>> {
        query.check()?;
        let data = self.repository.library.load().await?;
        let found = data.search(&query.title);
        tracing::debug!("Search {:?} matched {} book(s)", query.title, found.len());
        Ok(found)
    }
}
