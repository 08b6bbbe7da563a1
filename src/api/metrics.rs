//! Prometheus exposition endpoint

use axum::{extract::State, http::header, response::IntoResponse};

use crate::metrics::Metrics;

pub async fn prometheus(State(metrics): State<Metrics>) -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        metrics.render_prometheus(),
    )
}
