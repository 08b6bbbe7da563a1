//! API tests driven through the router without a listener

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use libris_server::{api, AppState};
use serde_json::{json, Value};
use tower::ServiceExt;

use crate::common::TestLibrary;

fn app(state: AppState) -> Router {
    api::router(state)
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, body.to_vec())
}

async fn send_json(app: &Router, method: Method, uri: &str, body: Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    let (status, bytes) = send(app, request).await;
    (status, serde_json::from_slice(&bytes).unwrap())
}

async fn send_form(app: &Router, uri: &str, form: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(form.to_string()))
        .unwrap();
    let (status, bytes) = send(app, request).await;
    (status, serde_json::from_slice(&bytes).unwrap())
}

async fn get(app: &Router, uri: &str) -> (StatusCode, Vec<u8>) {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    send(app, request).await
}

async fn get_json(app: &Router, uri: &str) -> (StatusCode, Value) {
    let (status, bytes) = get(app, uri).await;
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn test_library_overview_lists_both_books() {
    let library = TestLibrary::seeded();
    let app = app(library.state());

    let (status, body) = get_json(&app, "/api/v1/library").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["books"][0]["title"], "Test Book 1");
    assert_eq!(body["books"][1]["title"], "Test Book 2");
    assert_eq!(body["borrowed_books"], json!([]));
}

#[tokio::test]
async fn test_add_book() {
    let library = TestLibrary::seeded();
    let app = app(library.state());

    let (status, body) = send_json(
        &app,
        Method::POST,
        "/api/v1/books",
        json!({"title": "New Book", "author": "New Author"}),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "Book added successfully!");
    assert_eq!(body["book"]["title"], "New Book");
    assert_eq!(library.data().books.len(), 3);
}

#[tokio::test]
async fn test_add_book_from_form() {
    let library = TestLibrary::seeded();
    let app = app(library.state());

    let (status, body) = send_form(&app, "/api/v1/books", "title=New+Book&author=New+Author").await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["book"]["author"], "New Author");
    assert_eq!(library.data().books.len(), 3);
}

#[tokio::test]
async fn test_add_book_without_author_is_rejected() {
    let library = TestLibrary::seeded();
    let app = app(library.state());

    let (status, body) =
        send_json(&app, Method::POST, "/api/v1/books", json!({"title": "New Book"})).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Title and author are required!");
    assert_eq!(body["error"], "BadValue");
    assert_eq!(library.data().books.len(), 2);
}

#[tokio::test]
async fn test_malformed_json_is_a_bad_request() {
    let library = TestLibrary::seeded();
    let app = app(library.state());

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/v1/books")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{\"title\": "))
        .unwrap();
    let (status, bytes) = send(&app, request).await;
    let body: Value = serde_json::from_slice(&bytes).unwrap();

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "BadValue");
}

#[tokio::test]
async fn test_get_book_by_title() {
    let library = TestLibrary::seeded();
    let app = app(library.state());

    let (status, body) = get_json(&app, "/api/v1/books/by-title/Test%20Book%202").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["author"], "Author 2");
}

#[tokio::test]
async fn test_update_book() {
    let library = TestLibrary::seeded();
    let app = app(library.state());

    let (status, body) = send_json(
        &app,
        Method::PUT,
        "/api/v1/books/by-title/Test%20Book%201",
        json!({"title": "Updated Book 1", "author": "Updated Author 1"}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Book updated successfully!");
    let data = library.data();
    assert_eq!(data.books[0].title, "Updated Book 1");
    assert_eq!(data.books[0].author, "Updated Author 1");
}

#[tokio::test]
async fn test_update_book_requires_both_fields() {
    let library = TestLibrary::seeded();
    let app = app(library.state());

    let (status, body) = send_json(
        &app,
        Method::PUT,
        "/api/v1/books/by-title/Test%20Book%201",
        json!({"title": ""}),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "BadValue");
    assert_eq!(body["message"], "Title and author are required!");
    let data = library.data();
    assert_eq!(data.books[0].title, "Test Book 1");
    assert_eq!(data.books[0].author, "Author 1");
}

#[tokio::test]
async fn test_update_unknown_book() {
    let library = TestLibrary::seeded();
    let app = app(library.state());

    let (status, body) = send_json(
        &app,
        Method::PUT,
        "/api/v1/books/by-title/Nope",
        json!({"title": "A", "author": "B"}),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Book not found");
}

#[tokio::test]
async fn test_remove_book() {
    let library = TestLibrary::seeded();
    let app = app(library.state());

    let request = Request::builder()
        .method(Method::DELETE)
        .uri("/api/v1/books/by-title/Test%20Book%201")
        .body(Body::empty())
        .unwrap();
    let (status, bytes) = send(&app, request).await;
    let body: Value = serde_json::from_slice(&bytes).unwrap();

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Book removed successfully!");
    assert_eq!(library.data().books.len(), 1);
}

#[tokio::test]
async fn test_remove_book_from_form() {
    let library = TestLibrary::seeded();
    let app = app(library.state());

    let (status, _) = send_form(&app, "/api/v1/books/remove", "title=Test+Book+2").await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send_form(&app, "/api/v1/books/remove", "title=Test+Book+2").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Book not found");

    assert_eq!(library.data().books.len(), 1);
}

#[tokio::test]
async fn test_titles_matching_static_segments_are_reachable() {
    let library = TestLibrary::with_books(&[("search", "Author S"), ("remove", "Author R")]);
    let app = app(library.state());

    let (status, body) = get_json(&app, "/api/v1/books/by-title/search").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["author"], "Author S");

    let (status, body) = send_json(
        &app,
        Method::PUT,
        "/api/v1/books/by-title/search",
        json!({"title": "search", "author": "New Author"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["book"]["author"], "New Author");

    let request = Request::builder()
        .method(Method::DELETE)
        .uri("/api/v1/books/by-title/remove")
        .body(Body::empty())
        .unwrap();
    let (status, _) = send(&app, request).await;
    assert_eq!(status, StatusCode::OK);

    let data = library.data();
    assert_eq!(data.books.len(), 1);
    assert_eq!(data.books[0].title, "search");
    assert_eq!(data.books[0].author, "New Author");
}

#[tokio::test]
async fn test_search_book() {
    let library = TestLibrary::seeded();
    let app = app(library.state());

    let (status, body) = get_json(&app, "/api/v1/books/search?title=test%20book%201").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 1);
    assert_eq!(body["books"][0]["title"], "Test Book 1");
    assert!(body["message"].is_null());
}

#[tokio::test]
async fn test_search_without_matches() {
    let library = TestLibrary::seeded();
    let app = app(library.state());

    let (status, body) = get_json(&app, "/api/v1/books/search?title=Dune").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["books"], json!([]));
    assert_eq!(body["message"], "No books found!");
}

#[tokio::test]
async fn test_search_requires_title() {
    let library = TestLibrary::seeded();
    let app = app(library.state());

    let (status, body) = get_json(&app, "/api/v1/books/search").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Search title is required!");
}

#[tokio::test]
async fn test_borrow_book() {
    let library = TestLibrary::seeded();
    let app = app(library.state());

    let (status, body) = send_json(
        &app,
        Method::POST,
        "/api/v1/loans",
        json!({"title": "Test Book 1", "borrower": "John Doe"}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Book borrowed successfully!");
    assert_eq!(body["loan"]["author"], "Author 1");
    let data = library.data();
    assert_eq!(data.books.len(), 1);
    assert_eq!(data.borrowed_books.len(), 1);
    assert_eq!(data.borrowed_books[0].borrower, "John Doe");
}

#[tokio::test]
async fn test_borrow_requires_borrower() {
    let library = TestLibrary::seeded();
    let app = app(library.state());

    let (status, body) = send_form(&app, "/api/v1/loans", "title=Test+Book+1&borrower=").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Title and borrower are required!");
    assert!(library.data().borrowed_books.is_empty());
}

#[tokio::test]
async fn test_borrow_unknown_book() {
    let library = TestLibrary::seeded();
    let app = app(library.state());

    let (status, body) = send_json(
        &app,
        Method::POST,
        "/api/v1/loans",
        json!({"title": "Missing", "borrower": "John Doe"}),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Book not found");
}

#[tokio::test]
async fn test_return_book() {
    let library = TestLibrary::seeded();
    let app = app(library.state());

    send_form(&app, "/api/v1/loans", "title=Test+Book+1&borrower=John+Doe").await;
    let (status, body) = send_form(&app, "/api/v1/loans/return", "title=Test+Book+1").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Book returned successfully!");
    let data = library.data();
    assert_eq!(data.books.len(), 2);
    assert!(data.borrowed_books.is_empty());

    let (_, loans) = get_json(&app, "/api/v1/loans").await;
    assert_eq!(loans, json!([]));
}

#[tokio::test]
async fn test_return_without_loan() {
    let library = TestLibrary::seeded();
    let app = app(library.state());

    let (status, body) =
        send_json(&app, Method::POST, "/api/v1/loans/return", json!({"title": "Test Book 1"}))
            .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Borrowed book not found");
    assert_eq!(body["error"], "NoSuchLoan");
}

#[tokio::test]
async fn test_return_requires_title() {
    let library = TestLibrary::seeded();
    let app = app(library.state());

    let (status, body) = send_json(&app, Method::POST, "/api/v1/loans/return", json!({})).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Title is required!");
}

#[tokio::test]
async fn test_unknown_page_is_404() {
    let library = TestLibrary::seeded();
    let app = app(library.state());

    let (status, body) = get_json(&app, "/nonexistent_page").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "NoSuchPage");
    assert_eq!(body["message"], "Page not found");
}

#[tokio::test]
async fn test_wrong_method_is_json_405() {
    let library = TestLibrary::seeded();
    let app = app(library.state());

    let request = Request::builder()
        .method(Method::PATCH)
        .uri("/api/v1/books")
        .body(Body::empty())
        .unwrap();
    let (status, bytes) = send(&app, request).await;
    let body: Value = serde_json::from_slice(&bytes).unwrap();

    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(body["error"], "NoSuchMethod");
    assert_eq!(body["message"], "Method not allowed");

    let (status, body) = get_json(&app, "/api/v1/loans/return").await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(body["error"], "NoSuchMethod");
}

#[tokio::test]
async fn test_undecodable_title_is_json_400() {
    let library = TestLibrary::seeded();
    let app = app(library.state());

    let (status, body) = get_json(&app, "/api/v1/books/by-title/%FF").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "BadValue");
}

#[tokio::test]
async fn test_health_and_ready() {
    let library = TestLibrary::seeded();
    let app = app(library.state());

    let (status, body) = get_json(&app, "/api/v1/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");

    let (status, body) = get_json(&app, "/api/v1/ready").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ready");
}

#[tokio::test]
async fn test_ready_fails_on_corrupt_file() {
    let library = TestLibrary::seeded();
    std::fs::write(&library.data_file, "not json").unwrap();
    let app = app(library.state());

    let (status, body) = get_json(&app, "/api/v1/ready").await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["status"], "unavailable");

    let (status, body) = get_json(&app, "/api/v1/books").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["message"], "Storage error");
}

#[tokio::test]
async fn test_metrics_count_requests_per_route() {
    let library = TestLibrary::seeded();
    let app = app(library.state());

    get(&app, "/api/v1/books").await;
    get(&app, "/api/v1/books").await;
    get(&app, "/api/v1/books/by-title/Test%20Book%201").await;
    get(&app, "/nonexistent_page").await;

    let (status, bytes) = get(&app, "/metrics").await;
    let text = String::from_utf8(bytes).unwrap();

    assert_eq!(status, StatusCode::OK);
    assert!(text.contains(
        "libris_http_requests_total{method=\"GET\",route=\"/api/v1/books\",status=\"200\"} 2"
    ));
    assert!(text.contains(
        "libris_http_requests_total{method=\"GET\",route=\"/api/v1/books/by-title/:title\",status=\"200\"} 1"
    ));
    assert!(text.contains(
        "libris_http_requests_total{method=\"GET\",route=\"unmatched\",status=\"404\"} 1"
    ));
    assert!(text.contains("# TYPE libris_http_request_duration_seconds histogram"));
}

#[tokio::test]
async fn test_metrics_can_be_disabled() {
    let library = TestLibrary::seeded();
    let mut config = library.config();
    config.metrics.enabled = false;
    let app = app(AppState::new(config));

    let (status, _) = get(&app, "/metrics").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}
