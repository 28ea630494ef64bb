//! Prometheus metrics for the API server.

use axum::body::Body;
use axum::http::{Request, Response};
use axum::middleware::Next;
use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::time::Instant;

/// Initialize the Prometheus metrics recorder.
/// Returns a handle that can be used to render metrics.
pub fn init_metrics() -> PrometheusHandle {
    PrometheusBuilder::new()
        .install_recorder()
        .expect("Failed to install Prometheus recorder")
}

/// Metric names as constants for consistency.
pub mod names {
    pub const HTTP_REQUESTS_TOTAL: &str = "jobgrid_http_requests_total";
    pub const HTTP_REQUEST_DURATION_SECONDS: &str = "jobgrid_http_request_duration_seconds";
    pub const HTTP_REQUESTS_IN_FLIGHT: &str = "jobgrid_http_requests_in_flight";

    pub const LOGINS_TOTAL: &str = "jobgrid_logins_total";
    pub const SIGNUPS_TOTAL: &str = "jobgrid_signups_total";
    pub const APPLICATIONS_SUBMITTED_TOTAL: &str = "jobgrid_applications_submitted_total";

    pub const RATE_LIMIT_HITS_TOTAL: &str = "jobgrid_rate_limit_hits_total";
}

/// Record an HTTP request.
pub fn record_http_request(method: &str, path: &str, status: u16, duration_secs: f64) {
    let labels = [
        ("method", method.to_string()),
        ("path", sanitize_path(path)),
        ("status", status.to_string()),
    ];

    counter!(names::HTTP_REQUESTS_TOTAL, &labels).increment(1);
    histogram!(names::HTTP_REQUEST_DURATION_SECONDS, &labels).record(duration_secs);
}

/// Record a login attempt by outcome.
pub fn record_login(outcome: &str) {
    counter!(names::LOGINS_TOTAL, "outcome" => outcome.to_string()).increment(1);
}

/// Record a signup by role.
pub fn record_signup(role: &str) {
    counter!(names::SIGNUPS_TOTAL, "role" => role.to_string()).increment(1);
}

/// Record a submitted application.
pub fn record_application_submitted(kind: &str) {
    counter!(names::APPLICATIONS_SUBMITTED_TOTAL, "kind" => kind.to_string()).increment(1);
}

/// Record rate limit hit.
pub fn record_rate_limit_hit(endpoint: &str) {
    counter!(names::RATE_LIMIT_HITS_TOTAL, "endpoint" => sanitize_path(endpoint)).increment(1);
}

/// Collapse path parameters so metrics labels stay low-cardinality.
fn sanitize_path(path: &str) -> String {
    // Static route that would otherwise look like a job id
    if path == "/jobs/user-jobs" {
        return path.to_string();
    }

    // Application ids derived from job/applicant pairs
    let path = regex_lite::Regex::new(r"/applications/[a-zA-Z0-9_.:-]+")
        .unwrap()
        .replace_all(path, "/applications/:id");
    let path = regex_lite::Regex::new(r"/jobs/[a-zA-Z0-9_.:-]+")
        .unwrap()
        .replace_all(&path, "/jobs/:job_id");
    path.to_string()
}

/// Metrics middleware for HTTP requests.
pub async fn metrics_middleware(request: Request<Body>, next: Next) -> Response<Body> {
    let method = request.method().to_string();
    let path = request.uri().path().to_string();
    let start = Instant::now();

    gauge!(names::HTTP_REQUESTS_IN_FLIGHT).increment(1.0);

    let response = next.run(request).await;

    gauge!(names::HTTP_REQUESTS_IN_FLIGHT).decrement(1.0);

    let status = response.status().as_u16();
    let duration = start.elapsed().as_secs_f64();

    record_http_request(&method, &path, status, duration);

    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_path_collapses_ids() {
        assert_eq!(
            sanitize_path("/jobs/550e8400-e29b-41d4-a716-446655440000"),
            "/jobs/:job_id"
        );
        assert_eq!(
            sanitize_path("/jobs/550e8400-e29b-41d4-a716-446655440000/applications"),
            "/jobs/:job_id/applications"
        );
        assert_eq!(
            sanitize_path("/applications/job-1__acct-1"),
            "/applications/:id"
        );
    }

    #[test]
    fn test_sanitize_path_keeps_static_routes() {
        assert_eq!(sanitize_path("/jobs"), "/jobs");
        assert_eq!(sanitize_path("/auth/login"), "/auth/login");
    }
}
