//! Data models for Libris

pub mod book;
pub mod library;
pub mod loan;

use validator::Validate;

use crate::error::{AppError, AppResult};

// Re-export commonly used types
pub use book::{Book, CreateBook, RemoveBook, SearchQuery, UpdateBook};
pub use library::LibraryData;
pub use loan::{BorrowRequest, BorrowedBook, ReturnRequest};

/// Request payload whose rejection is reported with one user-facing message,
/// whichever of its fields failed.
pub trait Payload: Validate {
    const REQUIRED_MESSAGE: &'static str;

    fn check(&self) -> AppResult<()> {
        self.validate().map_err(|errors| {
            tracing::debug!("Rejected payload: {}", errors);
            AppError::Validation(Self::REQUIRED_MESSAGE.to_string())
        })
    }
}
