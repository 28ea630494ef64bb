//! Application state.

use std::sync::Arc;

use jobgrid_firestore::{
    AccountRepository, ApplicationRepository, FirestoreClient, JobRepository,
};

use crate::auth::TokenService;
use crate::config::ApiConfig;
use crate::services::{ApplicationService, AuthService, JobService};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: ApiConfig,
    pub store: FirestoreClient,
    pub tokens: Arc<TokenService>,
    pub auth_service: AuthService,
    pub job_service: JobService,
    pub application_service: ApplicationService,
}

impl AppState {
    /// Create new application state.
    pub fn new(config: ApiConfig) -> Result<Self, Box<dyn std::error::Error>> {
        config.validate()?;

        let store = FirestoreClient::from_env()?;

        let tokens = Arc::new(TokenService::new(&config.jwt_secret, config.token_ttl));

        let accounts = AccountRepository::new(store.clone());
        let jobs = JobRepository::new(store.clone());
        let applications = ApplicationRepository::new(store.clone());

        let auth_service = AuthService::new(accounts, Arc::clone(&tokens));
        let job_service = JobService::new(jobs.clone(), applications.clone());
        let application_service = ApplicationService::new(jobs, applications);

        Ok(Self {
            config,
            store,
            tokens,
            auth_service,
            job_service,
            application_service,
        })
    }
}
