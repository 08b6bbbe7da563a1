//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{books, health, loans};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Libris API",
        version = "1.0.0",
        description = "Library Catalog REST API",
        license(name = "AGPL-3.0", url = "https://www.gnu.org/licenses/agpl-3.0.html")
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Catalog
        books::library_overview,
        books::list_books,
        books::get_book,
        books::add_book,
        books::update_book,
        books::remove_book,
        books::remove_book_by_body,
        books::search_books,
        // Loans
        loans::list_loans,
        loans::borrow_book,
        loans::return_book,
    ),
    components(
        schemas(
            // Catalog
            crate::models::Book,
            crate::models::CreateBook,
            crate::models::UpdateBook,
            crate::models::RemoveBook,
            crate::models::SearchQuery,
            crate::models::LibraryData,
            books::BookResponse,
            books::SearchResponse,
            // Loans
            crate::models::BorrowedBook,
            crate::models::BorrowRequest,
            crate::models::ReturnRequest,
            loans::LoanResponse,
            loans::ReturnResponse,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "books", description = "Catalog management"),
        (name = "loans", description = "Borrowing and returning books")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
