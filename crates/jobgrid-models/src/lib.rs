//! Shared data models for the JobGrid backend.
//!
//! This crate provides Serde-serializable types for:
//! - Accounts and the fixed role set
//! - Job postings
//! - Applications and their status lifecycle

pub mod account;
pub mod application;
pub mod job;
pub mod role;

// Re-export common types
pub use account::{Account, PublicAccount};
pub use application::{Application, ApplicationFields, ApplicationStatus, ApplicationWithJob};
pub use job::{JobPosting, JobPostingUpdate, OwnedJobPosting};
pub use role::Role;
