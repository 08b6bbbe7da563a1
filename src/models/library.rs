//! The library document: catalog plus borrow ledger
//!
//! Every mutation works on the first record whose title matches exactly.
//! Duplicated titles are allowed, so repeating an operation may hit another
//! record with the same title.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{book::Book, loan::BorrowedBook};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct LibraryData {
    /// Books available on the shelves
    #[serde(default)]
    pub books: Vec<Book>,
    /// Books currently lent out
    #[serde(default)]
    pub borrowed_books: Vec<BorrowedBook>,
}

impl LibraryData {
    pub fn find_book(&self, title: &str) -> Option<&Book> {
        self.books.iter().find(|book| book.title == title)
    }

    fn book_position(&self, title: &str) -> Option<usize> {
        self.books.iter().position(|book| book.title == title)
    }

    fn borrowed_position(&self, title: &str) -> Option<usize> {
        self.borrowed_books.iter().position(|entry| entry.title == title)
    }

    pub fn add_book(&mut self, book: Book) {
        self.books.push(book);
    }

    /// Replace the first match in place; returns the updated book
    pub fn replace_book(&mut self, title: &str, replacement: Book) -> Option<&Book> {
        let idx = self.book_position(title)?;
        let slot = self.books.get_mut(idx)?;
        *slot = replacement;
        Some(&*slot)
    }

    pub fn remove_book(&mut self, title: &str) -> Option<Book> {
        let idx = self.book_position(title)?;
        Some(self.books.remove(idx))
    }

    /// Catalog books whose title contains `fragment`, ignoring case
    pub fn search(&self, fragment: &str) -> Vec<Book> {
        self.books
            .iter()
            .filter(|book| book.title_contains(fragment))
            .cloned()
            .collect()
    }

    /// Move the first catalog match to the end of the borrow ledger
    pub fn lend(&mut self, title: &str, borrower: &str) -> Option<&BorrowedBook> {
        let book = self.remove_book(title)?;
        self.borrowed_books.push(BorrowedBook::lend(book, borrower));
        self.borrowed_books.last()
    }

    /// Move the first ledger match back to the end of the catalog
    pub fn take_back(&mut self, title: &str) -> Option<&Book> {
        let idx = self.borrowed_position(title)?;
        let entry = self.borrowed_books.remove(idx);
        self.books.push(entry.into_book());
        self.books.last()
    }
}
