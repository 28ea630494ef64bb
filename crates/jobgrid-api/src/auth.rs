//! Session token issuance and verification.
//!
//! Tokens are stateless HS256 JWTs carrying the account id, email, and
//! role. Verification checks signature and expiry only; there is no
//! server-side revocation, so logout is client-side token discard.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use jobgrid_models::{Account, Role};

use crate::error::ApiError;
use crate::state::AppState;

/// Claims embedded in a session token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Account id
    pub sub: String,
    /// Account email
    pub email: String,
    /// Account role id
    pub role: String,
    /// Issued at (unix seconds)
    pub iat: i64,
    /// Expiration (unix seconds)
    pub exp: i64,
}

/// Issues and verifies session tokens.
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl_secs: i64,
}

impl TokenService {
    pub fn new(secret: &str, ttl: std::time::Duration) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;

        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            ttl_secs: ttl.as_secs() as i64,
        }
    }

    /// Issue a token for an account.
    pub fn issue(&self, account: &Account) -> Result<String, ApiError> {
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: account.id.clone(),
            email: account.email.clone(),
            role: account.role.id().to_string(),
            iat: now,
            exp: now + self.ttl_secs,
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| ApiError::internal(format!("Failed to sign token: {}", e)))
    }

    /// Verify a token's signature and expiry.
    pub fn verify(&self, token: &str) -> Result<Claims, ApiError> {
        decode::<Claims>(token, &self.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(|_| ApiError::unauthorized("Invalid or expired token"))
    }
}

/// Authenticated user extracted from the bearer token.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub account_id: String,
    pub email: String,
    pub role: Role,
}

#[axum::async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get("Authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| ApiError::unauthorized("Missing Authorization header"))?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or_else(|| ApiError::unauthorized("Invalid Authorization header format"))?;

        let claims = state.tokens.verify(token)?;

        let role = Role::resolve(&claims.role)
            .ok_or_else(|| ApiError::unauthorized("Token carries an unknown role"))?;

        Ok(AuthUser {
            account_id: claims.sub,
            email: claims.email,
            role,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn service() -> TokenService {
        TokenService::new("test-secret-at-least-16b", Duration::from_secs(3600))
    }

    #[test]
    fn test_issue_and_verify_round_trip() {
        let service = service();
        let account = Account::new("e@x.com", "$argon2id$hash", Role::Employer);

        let token = service.issue(&account).unwrap();
        let claims = service.verify(&token).unwrap();

        assert_eq!(claims.sub, account.id);
        assert_eq!(claims.email, "e@x.com");
        assert_eq!(claims.role, Role::Employer.id());
        assert_eq!(claims.exp - claims.iat, 3600);
    }

    #[test]
    fn test_verify_rejects_wrong_secret() {
        let account = Account::new("e@x.com", "hash", Role::Jobseeker);
        let token = service().issue(&account).unwrap();

        let other = TokenService::new("another-secret-16-bytes", Duration::from_secs(3600));
        assert!(other.verify(&token).is_err());
    }

    #[test]
    fn test_verify_rejects_expired() {
        // Sign claims that expired an hour ago, well past the default leeway
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: "acct-1".to_string(),
            email: "e@x.com".to_string(),
            role: Role::Jobseeker.id().to_string(),
            iat: now - 7200,
            exp: now - 3600,
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret("test-secret-at-least-16b".as_bytes()),
        )
        .unwrap();

        assert!(service().verify(&token).is_err());
    }

    #[test]
    fn test_verify_rejects_garbage() {
        assert!(service().verify("not.a.token").is_err());
    }
}
