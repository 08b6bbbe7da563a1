//! Borrow ledger endpoints

use axum::{extract::State, Json};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    error::AppResult,
    models::{Book, BorrowRequest, BorrowedBook, ReturnRequest},
};

use super::Input;

/// Borrow response
#[derive(Serialize, ToSchema)]
pub struct LoanResponse {
    /// Status message
    pub message: String,
    pub loan: BorrowedBook,
}

/// Return response with the book back in the catalog
#[derive(Serialize, ToSchema)]
pub struct ReturnResponse {
    /// Status message
    pub message: String,
    pub book: Book,
}

/// List books currently lent out
#[utoipa::path(
    get,
    path = "/loans",
    tag = "loans",
    responses(
        (status = 200, description = "Borrowed books", body = Vec<BorrowedBook>)
    )
)]
pub async fn list_loans(State(state): State<crate::AppState>) -> AppResult<Json<Vec<BorrowedBook>>> {
    let loans = state.services.loans.list_borrowed().await?;
    Ok(Json(loans))
}

/// Borrow a catalog book
#[utoipa::path(
    post,
    path = "/loans",
    tag = "loans",
    request_body = BorrowRequest,
    responses(
        (status = 200, description = "Book borrowed", body = LoanResponse),
        (status = 400, description = "Title or borrower missing", body = crate::error::ErrorResponse),
        (status = 404, description = "Book not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn borrow_book(
    State(state): State<crate::AppState>,
    Input(request): Input<BorrowRequest>,
) -> AppResult<Json<LoanResponse>> {
    let loan = state.services.loans.borrow(request).await?;

    Ok(Json(LoanResponse {
        message: "Book borrowed successfully!".to_string(),
        loan,
    }))
}

/// Return a borrowed book
#[utoipa::path(
    post,
    path = "/loans/return",
    tag = "loans",
    request_body = ReturnRequest,
    responses(
        (status = 200, description = "Book returned", body = ReturnResponse),
        (status = 400, description = "Title missing", body = crate::error::ErrorResponse),
        (status = 404, description = "Borrowed book not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn return_book(
    State(state): State<crate::AppState>,
    Input(request): Input<ReturnRequest>,
) -> AppResult<Json<ReturnResponse>> {
    let book = state.services.loans.return_book(request).await?;

    Ok(Json(ReturnResponse {
        message: "Book returned successfully!".to_string(),
        book,
    }))
}
