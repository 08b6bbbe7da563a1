//! Borrow ledger model and related request types

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use super::{book::Book, Payload};

/// Author recorded for ledger entries that were stored without one
pub const UNKNOWN_AUTHOR: &str = "Unknown";

fn unknown_author() -> String {
    UNKNOWN_AUTHOR.to_string()
}

/// A book currently out on loan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct BorrowedBook {
    pub title: String,
    /// Older documents stored only title and borrower
    #[serde(default = "unknown_author")]
    pub author: String,
    pub borrower: String,
}

impl BorrowedBook {
    /// Lend a catalog book to `borrower`
    pub fn lend(book: Book, borrower: impl Into<String>) -> Self {
        Self {
            title: book.title,
            author: book.author,
            borrower: borrower.into(),
        }
    }

    /// Turn the ledger entry back into a catalog book
    pub fn into_book(self) -> Book {
        Book {
            title: self.title,
            author: self.author,
        }
    }
}

/// Borrow request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct BorrowRequest {
    #[serde(default)]
    #[validate(length(min = 1))]
    pub title: String,
    #[serde(default)]
    #[validate(length(min = 1))]
    pub borrower: String,
}

impl Payload for BorrowRequest {
    const REQUIRED_MESSAGE: &'static str = "Title and borrower are required!";
}

/// Return request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ReturnRequest {
    #[serde(default)]
    #[validate(length(min = 1))]
    pub title: String,
}

impl Payload for ReturnRequest {
    const REQUIRED_MESSAGE: &'static str = "Title is required!";
}
