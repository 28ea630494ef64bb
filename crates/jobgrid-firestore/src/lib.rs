//! Firestore REST document store for JobGrid.
//!
//! This crate provides:
//! - Typed repositories for accounts, job postings, and applications
//! - Storage-level uniqueness constraints (unique email, one application
//!   per job/applicant pair) via create preconditions
//! - Service account authentication via gcp_auth, with an emulator-host
//!   override for tests
//! - Merge updates, structured queries, count aggregates, and retry logic

pub mod account_repo;
pub mod application_repo;
pub mod client;
pub mod error;
pub mod job_repo;
pub mod metrics;
pub mod retry;
pub mod token_cache;
pub mod types;

pub use account_repo::AccountRepository;
pub use application_repo::ApplicationRepository;
pub use client::{FirestoreClient, FirestoreConfig};
pub use error::{StoreError, StoreResult};
pub use job_repo::{JobListFilter, JobRepository, Page};
pub use types::{Document, FromStoreValue, ToStoreValue, Value};
