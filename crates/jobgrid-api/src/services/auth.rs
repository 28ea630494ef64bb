//! Authentication flow: registration, login with role-match policy, and
//! current-account lookup.

use std::sync::Arc;

use tracing::{info, warn};

use jobgrid_firestore::{AccountRepository, StoreError};
use jobgrid_models::{Account, PublicAccount, Role};

use crate::auth::TokenService;
use crate::error::{ApiError, ApiResult};
use crate::metrics::{record_login, record_signup};
use crate::security::{hash_password, normalize_email, validate_password, verify_password};

/// Authentication service.
#[derive(Clone)]
pub struct AuthService {
    accounts: AccountRepository,
    tokens: Arc<TokenService>,
}

impl AuthService {
    pub fn new(accounts: AccountRepository, tokens: Arc<TokenService>) -> Self {
        Self { accounts, tokens }
    }

    /// Register a new account.
    ///
    /// Fails with a validation error for an unknown role or weak password,
    /// and a conflict when the email is already registered.
    pub async fn register(
        &self,
        email: &str,
        password: &str,
        role_name: &str,
    ) -> ApiResult<PublicAccount> {
        let email = normalize_email(email);
        if email.is_empty() || !email.contains('@') {
            return Err(ApiError::validation("A valid email address is required"));
        }
        validate_password(password)?;

        let role = Role::resolve(role_name).ok_or_else(|| {
            ApiError::validation(format!("Unknown role: {}", role_name))
        })?;

        let password_hash = hash_password(password)?;
        let account = Account::new(&email, &password_hash, role);

        self.accounts.create(&account).await.map_err(|e| match e {
            StoreError::AlreadyExists(_) => {
                ApiError::conflict("An account with this email already exists")
            }
            e => e.into(),
        })?;

        info!(account_id = %account.id, role = %role, "Account registered");
        record_signup(role.as_str());

        Ok(account.sanitized())
    }

    /// Authenticate and issue a session token.
    ///
    /// When `requested_role` is supplied it must match the account's
    /// registered role; a user who signed up as one role cannot log in
    /// presenting another.
    pub async fn login(
        &self,
        email: &str,
        password: &str,
        requested_role: Option<&str>,
    ) -> ApiResult<(String, PublicAccount)> {
        let email = normalize_email(email);

        let account = match self.accounts.get_by_email(&email).await? {
            Some(account) => account,
            None => {
                record_login("account_not_found");
                return Err(ApiError::unauthorized("Account not found"));
            }
        };

        if !verify_password(password, &account.password_hash)? {
            warn!(account_id = %account.id, "Login with invalid credentials");
            record_login("invalid_credentials");
            return Err(ApiError::unauthorized("Invalid email or password"));
        }

        if let Some(requested) = requested_role {
            let requested = Role::resolve(requested).ok_or_else(|| {
                ApiError::validation(format!("Unknown role: {}", requested))
            })?;

            if requested != account.role {
                record_login("role_mismatch");
                return Err(ApiError::forbidden(format!(
                    "This account is registered as {}, not {}",
                    account.role.display_name(),
                    requested.display_name()
                )));
            }
        }

        let token = self.tokens.issue(&account)?;

        info!(account_id = %account.id, "Login succeeded");
        record_login("success");

        Ok((token, account.sanitized()))
    }

    /// Load the account behind a verified token.
    pub async fn current_account(&self, account_id: &str) -> ApiResult<PublicAccount> {
        let account = self
            .accounts
            .get(account_id)
            .await?
            .ok_or_else(|| ApiError::unauthorized("Account no longer exists"))?;

        Ok(account.sanitized())
    }
}
