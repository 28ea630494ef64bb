//! Account records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::role::Role;

/// A registered account as persisted in the document store.
///
/// The password hash never leaves the backend; responses use
/// [`PublicAccount`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    /// Unique account identifier (UUID v4).
    pub id: String,
    /// Unique email address.
    pub email: String,
    /// Argon2id password hash in PHC string format.
    pub password_hash: String,
    /// The role chosen at registration. Immutable afterwards.
    pub role: Role,
    /// Registration timestamp, set server-side.
    pub created_at: DateTime<Utc>,
}

impl Account {
    /// Create a new account with a fresh id and registration timestamp.
    pub fn new(email: impl Into<String>, password_hash: impl Into<String>, role: Role) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            email: email.into(),
            password_hash: password_hash.into(),
            role,
            created_at: Utc::now(),
        }
    }

    /// Sanitized view with the password hash stripped.
    pub fn sanitized(&self) -> PublicAccount {
        PublicAccount {
            id: self.id.clone(),
            email: self.email.clone(),
            role: self.role,
            role_display_name: self.role.display_name().to_string(),
            created_at: self.created_at,
        }
    }
}

/// Account view safe to return to clients.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublicAccount {
    pub id: String,
    pub email: String,
    pub role: Role,
    pub role_display_name: String,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitized_strips_hash() {
        let account = Account::new("a@example.com", "$argon2id$...", Role::Employer);
        let public = account.sanitized();

        assert_eq!(public.id, account.id);
        assert_eq!(public.email, "a@example.com");
        assert_eq!(public.role, Role::Employer);

        let json = serde_json::to_string(&public).unwrap();
        assert!(!json.contains("argon2"));
        assert!(!json.contains("password"));
    }

    #[test]
    fn test_new_assigns_unique_ids() {
        let a = Account::new("a@example.com", "h", Role::Jobseeker);
        let b = Account::new("b@example.com", "h", Role::Jobseeker);
        assert_ne!(a.id, b.id);
    }
}
