//! Catalog book model and related request types

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use super::Payload;

/// A book currently available in the catalog.
///
/// The title is the lookup key. It is matched exactly and case-sensitively,
/// and nothing prevents two books from sharing one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Book {
    pub title: String,
    pub author: String,
}

impl Book {
    pub fn new(title: impl Into<String>, author: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            author: author.into(),
        }
    }

    /// Case-insensitive substring match on the title
    pub fn title_contains(&self, needle: &str) -> bool {
        self.title.to_lowercase().contains(&needle.to_lowercase())
    }
}

/// Add book request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateBook {
    #[serde(default)]
    #[validate(length(min = 1))]
    pub title: String,
    #[serde(default)]
    #[validate(length(min = 1))]
    pub author: String,
}

impl Payload for CreateBook {
    const REQUIRED_MESSAGE: &'static str = "Title and author are required!";
}

impl From<CreateBook> for Book {
    fn from(data: CreateBook) -> Self {
        Book::new(data.title, data.author)
    }
}

/// Update book request; both fields replace the stored values
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateBook {
    #[serde(default)]
    #[validate(length(min = 1))]
    pub title: String,
    #[serde(default)]
    #[validate(length(min = 1))]
    pub author: String,
}

impl Payload for UpdateBook {
    const REQUIRED_MESSAGE: &'static str = "Title and author are required!";
}

/// Remove book request (title carried in the body)
#[derive(Debug, Deserialize, ToSchema)]
pub struct RemoveBook {
    #[serde(default)]
    pub title: String,
}

/// Catalog search query
#[derive(Debug, Deserialize, Validate, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SearchQuery {
    /// Case-insensitive fragment of the title
    #[serde(default)]
    #[validate(length(min = 1))]
    pub title: String,
}

impl Payload for SearchQuery {
    const REQUIRED_MESSAGE: &'static str = "Search title is required!";
}
