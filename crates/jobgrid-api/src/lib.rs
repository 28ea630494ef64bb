//! Axum HTTP API server for the JobGrid job board.
//!
//! This crate provides:
//! - Signup/login with HS256 session tokens and a role-match policy
//! - Job posting CRUD with uniform ownership enforcement
//! - Application workflow with storage-level duplicate prevention
//! - Rate limiting, security headers, and Prometheus metrics

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod response;
pub mod routes;
pub mod security;
pub mod services;
pub mod state;

pub use auth::{AuthUser, TokenService};
pub use config::ApiConfig;
pub use error::{ApiError, ApiResult};
pub use routes::create_router;
pub use services::{ApplicationService, AuthService, JobService};
pub use state::AppState;
