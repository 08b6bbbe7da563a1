//! API handlers for Libris REST endpoints

pub mod books;
pub mod health;
pub mod loans;
pub mod metrics;
pub mod openapi;

use axum::{
    async_trait,
    extract::{FromRequest, FromRequestParts, Request},
    http::header::CONTENT_TYPE,
    middleware,
    routing::{get, post},
    Form, Json, Router,
};
use serde::de::DeserializeOwned;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{error::AppError, AppState};

/// Request body accepted either as JSON or as an HTML form
/// (`application/x-www-form-urlencoded`).
///
/// Body rejections are reported through `AppError` so every error the API
/// returns has the same shape.
pub struct Input<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for Input<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_form = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(|value| value.starts_with("application/x-www-form-urlencoded"))
            .unwrap_or(false);

        if is_form {
            let Form(value) = Form::<T>::from_request(req, state)
                .await
                .map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;
            Ok(Input(value))
        } else {
            let Json(value) = Json::<T>::from_request(req, state)
                .await
                .map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;
            Ok(Input(value))
        }
    }
}

/// Path parameters with rejections reported as `AppError`
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(AppError))]
pub struct ApiPath<T>(pub T);

/// Query string with rejections reported as `AppError`
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(AppError))]
pub struct ApiQuery<T>(pub T);

/// Fallback for unknown paths
pub async fn not_found() -> AppError {
    AppError::PageNotFound("Page not found".to_string())
}

/// Fallback for known paths hit with an unsupported method
pub async fn method_not_allowed() -> AppError {
    AppError::MethodNotAllowed("Method not allowed".to_string())
}

/// Create the application router with all routes
pub fn router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // API v1 routes
    let api_v1 = Router::new()
        // Health check
        .route("/health", get(health::health_check).fallback(method_not_allowed))
        .route("/ready", get(health::readiness_check).fallback(method_not_allowed))
        // Whole library (catalog + ledger)
        .route("/library", get(books::library_overview).fallback(method_not_allowed))
        // Catalog
        .route(
            "/books",
            get(books::list_books)
                .post(books::add_book)
                .fallback(method_not_allowed),
        )
        .route("/books/search", get(books::search_books).fallback(method_not_allowed))
        .route("/books/remove", post(books::remove_book_by_body).fallback(method_not_allowed))
        // Titles are free text, so single-book routes live under their own segment
        .route(
            "/books/by-title/:title",
            get(books::get_book)
                .put(books::update_book)
                .delete(books::remove_book)
                .fallback(method_not_allowed),
        )
        // Borrow ledger
        .route(
            "/loans",
            get(loans::list_loans)
                .post(loans::borrow_book)
                .fallback(method_not_allowed),
        )
        .route("/loans/return", post(loans::return_book).fallback(method_not_allowed))
        .with_state(state.clone());

    let mut app = Router::new()
        .nest("/api/v1", api_v1)
        .merge(openapi::create_openapi_router());

    if state.config.metrics.enabled {
        let exposition = Router::new()
            .route("/metrics", get(metrics::prometheus).fallback(method_not_allowed))
            .with_state(state.metrics.clone());
        app = app.merge(exposition).fallback(not_found).layer(
            middleware::from_fn_with_state(state.metrics.clone(), crate::metrics::track_requests),
        );
    } else {
        app = app.fallback(not_found);
    }

    app.layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
