//! API routes.

use axum::middleware;
use axum::routing::{delete, get, post, put};
use axum::Router;
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::limit::RequestBodyLimitLayer;

use crate::handlers::applications::{
    apply, apply_direct, list_job_applications, list_my_applications, update_application_status,
};
use crate::handlers::auth::{login, me, signup};
use crate::handlers::health::{health, ready};
use crate::handlers::jobs::{
    create_job, delete_job, get_job, list_jobs, list_user_jobs, update_job,
};
use crate::metrics::metrics_middleware;
use crate::middleware::{
    cors_layer, rate_limit_middleware, request_id, request_logging, security_headers,
    RateLimiterCache,
};
use crate::state::AppState;

/// Create the API router.
pub fn create_router(state: AppState, metrics_handle: Option<PrometheusHandle>) -> Router {
    // Stricter limiter on credential endpoints to slow brute-force attempts
    let auth_rate_limiter =
        std::sync::Arc::new(RateLimiterCache::new(state.config.auth_rate_limit_rps));
    let rate_limiter = std::sync::Arc::new(RateLimiterCache::new(state.config.rate_limit_rps));

    let auth_routes = Router::new()
        .route("/auth/login", post(login))
        .route("/auth/signup", post(signup))
        .layer(middleware::from_fn_with_state(
            auth_rate_limiter,
            rate_limit_middleware,
        ))
        .merge(Router::new().route("/auth/me", get(me)));

    let job_routes = Router::new()
        .route("/jobs", get(list_jobs))
        .route("/jobs", post(create_job))
        // Static route; registered alongside /jobs/:job_id
        .route("/jobs/user-jobs", get(list_user_jobs))
        .route("/jobs/:job_id", get(get_job))
        .route("/jobs/:job_id", put(update_job))
        .route("/jobs/:job_id", delete(delete_job));

    let application_routes = Router::new()
        .route("/jobs/:job_id/apply", post(apply))
        .route("/jobs/:job_id/apply-direct", post(apply_direct))
        .route("/jobs/:job_id/applications", get(list_job_applications))
        .route("/applications", get(list_my_applications))
        .route("/applications/:application_id", put(update_application_status));

    let api_routes = Router::new()
        .merge(job_routes)
        .merge(application_routes)
        .layer(middleware::from_fn_with_state(
            rate_limiter,
            rate_limit_middleware,
        ));

    let health_routes = Router::new()
        .route("/health", get(health))
        .route("/healthz", get(health))
        .route("/ready", get(ready));

    // Metrics endpoint (if enabled)
    let metrics_routes = if let Some(handle) = metrics_handle {
        Router::new().route("/metrics", get(move || async move { handle.render() }))
    } else {
        Router::new()
    };

    Router::new()
        .merge(auth_routes)
        .merge(api_routes)
        .merge(health_routes)
        .merge(metrics_routes)
        .layer(RequestBodyLimitLayer::new(state.config.max_body_size))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(middleware::from_fn(security_headers))
        .layer(middleware::from_fn(request_id))
        .layer(middleware::from_fn(request_logging))
        .layer(cors_layer(&state.config.cors_origins))
        .with_state(state)
}
