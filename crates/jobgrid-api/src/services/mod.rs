//! Business logic services.

pub mod applications;
pub mod auth;
pub mod jobs;

pub use applications::ApplicationService;
pub use auth::AuthService;
pub use jobs::JobService;
