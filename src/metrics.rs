//! HTTP request metrics: request counts and latency histograms

use std::fmt::Write as _;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use axum::{
    extract::{MatchedPath, Request, State},
    middleware::Next,
    response::Response,
};
use chrono::{DateTime, Utc};
use indexmap::IndexMap;

/// Upper bounds (seconds) of the latency histogram buckets
pub const LATENCY_BUCKETS: [f64; 11] = [
    0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
];

/// Route label used for requests that matched no route
pub const UNMATCHED_ROUTE: &str = "unmatched";

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct RequestKey {
    method: String,
    route: String,
    status: u16,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct RouteKey {
    method: String,
    route: String,
}

#[derive(Debug, Clone, Default)]
struct Histogram {
    /// Non-cumulative count per bucket; the last slot is +Inf
    buckets: [u64; LATENCY_BUCKETS.len() + 1],
    sum: f64,
    count: u64,
}

impl Histogram {
    fn observe(&mut self, seconds: f64) {
        let idx = LATENCY_BUCKETS
            .iter()
            .position(|bound| seconds <= *bound)
            .unwrap_or(LATENCY_BUCKETS.len());
        self.buckets[idx] += 1;
        self.sum += seconds;
        self.count += 1;
    }
}

#[derive(Default)]
struct Registry {
    requests: IndexMap<RequestKey, u64>,
    latencies: IndexMap<RouteKey, Histogram>,
}

/// Shared metrics registry
#[derive(Clone)]
pub struct Metrics {
    registry: Arc<Mutex<Registry>>,
    pub start_time: Instant,
    pub started_at: DateTime<Utc>,
}

impl Metrics {
    pub fn new() -> Self {
        Self {
            registry: Arc::new(Mutex::new(Registry::default())),
            start_time: Instant::now(),
            started_at: Utc::now(),
        }
    }

    /// Record one finished request
    pub fn record(&self, method: &str, route: &str, status: u16, elapsed: Duration) {
        let Ok(mut registry) = self.registry.lock() else {
            tracing::warn!("Metrics registry poisoned, dropping sample");
            return;
        };

        let key = RequestKey {
            method: method.to_string(),
            route: route.to_string(),
            status,
        };
        *registry.requests.entry(key).or_insert(0) += 1;

        let key = RouteKey {
            method: method.to_string(),
            route: route.to_string(),
        };
        registry
            .latencies
            .entry(key)
            .or_default()
            .observe(elapsed.as_secs_f64());
    }

    /// Number of requests recorded for a route, all methods and statuses
    #[cfg(test)]
    fn requests_for(&self, route: &str) -> u64 {
        self.registry
            .lock()
            .map(|registry| {
                registry
                    .requests
                    .iter()
                    .filter(|(key, _)| key.route == route)
                    .map(|(_, count)| *count)
                    .sum()
            })
            .unwrap_or(0)
    }

    /// Prometheus text exposition format (0.0.4)
    pub fn render_prometheus(&self) -> String {
        let mut out = String::new();

        let _ = writeln!(out, "# HELP libris_build_info Build information");
        let _ = writeln!(out, "# TYPE libris_build_info gauge");
        let _ = writeln!(
            out,
            "libris_build_info{{version=\"{}\"}} 1",
            env!("CARGO_PKG_VERSION")
        );

        let _ = writeln!(out, "# HELP libris_start_time_seconds Start time since unix epoch");
        let _ = writeln!(out, "# TYPE libris_start_time_seconds gauge");
        let _ = writeln!(out, "libris_start_time_seconds {}", self.started_at.timestamp());

        let _ = writeln!(out, "# HELP libris_uptime_seconds Uptime seconds");
        let _ = writeln!(out, "# TYPE libris_uptime_seconds gauge");
        let _ = writeln!(out, "libris_uptime_seconds {}", self.start_time.elapsed().as_secs());

        let Ok(registry) = self.registry.lock() else {
            return out;
        };

        let _ = writeln!(out, "# HELP libris_http_requests_total Total HTTP requests");
        let _ = writeln!(out, "# TYPE libris_http_requests_total counter");
        for (key, count) in &registry.requests {
            let _ = writeln!(
                out,
                "libris_http_requests_total{{method=\"{}\",route=\"{}\",status=\"{}\"}} {}",
                escape_label(&key.method),
                escape_label(&key.route),
                key.status,
                count
            );
        }

        let _ = writeln!(
            out,
            "# HELP libris_http_request_duration_seconds HTTP request latency"
        );
        let _ = writeln!(out, "# TYPE libris_http_request_duration_seconds histogram");
        for (key, histogram) in &registry.latencies {
            let labels = format!(
                "method=\"{}\",route=\"{}\"",
                escape_label(&key.method),
                escape_label(&key.route)
            );
            let mut cumulative: u64 = 0;
            for (bound, count) in LATENCY_BUCKETS.iter().zip(histogram.buckets.iter()) {
                cumulative += *count;
                let _ = writeln!(
                    out,
                    "libris_http_request_duration_seconds_bucket{{{},le=\"{}\"}} {}",
                    labels, bound, cumulative
                );
            }
            let _ = writeln!(
                out,
                "libris_http_request_duration_seconds_bucket{{{},le=\"+Inf\"}} {}",
                labels, histogram.count
            );
            let _ = writeln!(
                out,
                "libris_http_request_duration_seconds_sum{{{}}} {}",
                labels, histogram.sum
            );
            let _ = writeln!(
                out,
                "libris_http_request_duration_seconds_count{{{}}} {}",
                labels, histogram.count
            );
        }

        out
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

fn escape_label(value: &str) -> String {
    value
        .replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
}

/// Middleware timing every routed request
pub async fn track_requests(State(metrics): State<Metrics>, req: Request, next: Next) -> Response {
    let method = req.method().to_string();
    let route = req
        .extensions()
        .get::<MatchedPath>()
        .map(|path| path.as_str().to_string())
        .unwrap_or_else(|| UNMATCHED_ROUTE.to_string());

    let start = Instant::now();
    let response = next.run(req).await;
    metrics.record(&method, &route, response.status().as_u16(), start.elapsed());

    response
}
