//! Repository layer for library persistence

pub mod library;

use std::path::PathBuf;

pub use library::LibraryStore;

/// Main repository struct holding the document store
#[derive(Clone)]
pub struct Repository {
    pub library: LibraryStore,
}

impl Repository {
    /// Create a new repository backed by the JSON document at `data_file`
    pub fn new(data_file: impl Into<PathBuf>) -> Self {
        Self {
            library: LibraryStore::new(data_file),
        }
    }
}
