//! Borrow / return service

use crate::{
    error::{AppError, AppResult},
    models::{Book, BorrowRequest, BorrowedBook, Payload, ReturnRequest},
    repository::Repository,
};

use super::catalog::BOOK_NOT_FOUND;

pub const LOAN_NOT_FOUND: &str = "Borrowed book not found";

#[derive(Clone)]
pub struct LoansService {
    repository: Repository,
}

impl LoansService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Books currently lent out, oldest loan first
    pub async fn list_borrowed(&self) -> AppResult<Vec<BorrowedBook>> {
        Ok(self.repository.library.load().await?.borrowed_books)
    }

    /// Move the first catalog book with the requested title to the ledger
    pub async fn borrow(&self, request: BorrowRequest) -> AppResult<BorrowedBook> {
        request.check()?;

        let entry = self
            .repository
            .library
            .update(|library| {
                library
                    .lend(&request.title, &request.borrower)
                    .cloned()
                    .ok_or_else(|| {
                        tracing::warn!("Cannot lend unknown book {:?}", request.title);
                        AppError::NotFound(BOOK_NOT_FOUND.to_string())
                    })
            })
            .await?;

        tracing::info!("Book {:?} borrowed by {:?}", entry.title, entry.borrower);
        Ok(entry)
    }

    /// Move the first ledger entry with the requested title back to the catalog
    pub async fn return_book(&self, request: ReturnRequest) -> AppResult<Book> {
        request.check()?;

        let book = self
            .repository
            .library
            .update(|library| {
                library.take_back(&request.title).cloned().ok_or_else(|| {
                    tracing::warn!("No loan recorded for {:?}", request.title);
                    AppError::LoanNotFound(LOAN_NOT_FOUND.to_string())
                })
            })
            .await?;

        tracing::info!("Book {:?} returned", book.title);
        Ok(book)
    }
}
