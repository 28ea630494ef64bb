//! Account repository.
//!
//! Uses a dual-document pattern for email uniqueness:
//! - Account doc at `accounts/{id}`
//! - Email index at `account_emails/{email}` pointing back at the account
//!
//! Both documents are created in one atomic batch write with exists=false
//! preconditions, so a concurrent registration with the same email fails
//! at the storage layer instead of racing a pre-check.

use std::collections::HashMap;

use tracing::info;

use jobgrid_models::{Account, Role};

use crate::client::FirestoreClient;
use crate::error::{StoreError, StoreResult};
use crate::types::{Document, FromStoreValue, ToStoreValue, Value, Write};

const ACCOUNTS: &str = "accounts";
const EMAIL_INDEX: &str = "account_emails";

/// Repository for account documents.
#[derive(Clone)]
pub struct AccountRepository {
    client: FirestoreClient,
}

impl AccountRepository {
    pub fn new(client: FirestoreClient) -> Self {
        Self { client }
    }

    /// Canonical email form used for the uniqueness index.
    fn index_key(email: &str) -> String {
        email.trim().to_lowercase()
    }

    /// Persist a new account atomically with its email index entry.
    ///
    /// Fails with [`StoreError::AlreadyExists`] when the email (or,
    /// pathologically, the id) is already taken.
    pub async fn create(&self, account: &Account) -> StoreResult<()> {
        let account_doc = self.client.full_document_name(ACCOUNTS, &account.id);
        let index_doc = self
            .client
            .full_document_name(EMAIL_INDEX, &Self::index_key(&account.email));

        let mut index_fields = HashMap::new();
        index_fields.insert("account_id".to_string(), account.id.to_store_value());
        index_fields.insert(
            "created_at".to_string(),
            account.created_at.to_store_value(),
        );

        let writes = vec![
            Write::create(account_doc, account_to_fields(account)),
            Write::create(index_doc, index_fields),
        ];

        self.client.batch_write(writes).await?;

        info!(account_id = %account.id, role = %account.role, "Created account");
        Ok(())
    }

    /// Load an account by id.
    pub async fn get(&self, account_id: &str) -> StoreResult<Option<Account>> {
        let doc = self
            .client
            .with_retry("accounts.get", || {
                self.client.get_document(ACCOUNTS, account_id)
            })
            .await?;

        doc.as_ref().map(document_to_account).transpose()
    }

    /// Load an account by email via the index document.
    pub async fn get_by_email(&self, email: &str) -> StoreResult<Option<Account>> {
        let key = Self::index_key(email);
        let index = self
            .client
            .with_retry("accounts.get_by_email", || {
                self.client.get_document(EMAIL_INDEX, &key)
            })
            .await?;

        let Some(index) = index else {
            return Ok(None);
        };

        let account_id = index
            .fields
            .as_ref()
            .and_then(|f| f.get("account_id"))
            .and_then(String::from_store_value)
            .ok_or_else(|| {
                StoreError::invalid_response(format!("Email index {} missing account_id", key))
            })?;

        self.get(&account_id).await
    }
}

// ============================================================================
// Field Conversion Helpers
// ============================================================================

fn account_to_fields(account: &Account) -> HashMap<String, Value> {
    let mut fields = HashMap::new();
    fields.insert("id".to_string(), account.id.to_store_value());
    fields.insert("email".to_string(), account.email.to_store_value());
    fields.insert(
        "password_hash".to_string(),
        account.password_hash.to_store_value(),
    );
    fields.insert("role".to_string(), account.role.as_str().to_store_value());
    fields.insert(
        "created_at".to_string(),
        account.created_at.to_store_value(),
    );
    fields
}

fn document_to_account(doc: &Document) -> StoreResult<Account> {
    let fields = doc
        .fields
        .as_ref()
        .ok_or_else(|| StoreError::invalid_response("Account document has no fields"))?;

    let get_string = |key: &str| -> StoreResult<String> {
        fields
            .get(key)
            .and_then(|v| String::from_store_value(v))
            .ok_or_else(|| StoreError::invalid_response(format!("Account missing field {}", key)))
    };

    let role_name = get_string("role")?;
    let role = Role::resolve(&role_name).ok_or_else(|| {
        StoreError::invalid_response(format!("Account has unknown role {}", role_name))
    })?;

    Ok(Account {
        id: get_string("id")?,
        email: get_string("email")?,
        password_hash: get_string("password_hash")?,
        role,
        created_at: fields
            .get("created_at")
            .and_then(|v| chrono::DateTime::from_store_value(v))
            .unwrap_or_else(chrono::Utc::now),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_key_normalizes() {
        assert_eq!(AccountRepository::index_key(" E@X.Com "), "e@x.com");
    }

    #[test]
    fn test_account_field_round_trip() {
        let account = Account::new("a@example.com", "$argon2id$hash", Role::Jobseeker);
        let doc = Document::new(account_to_fields(&account));
        let back = document_to_account(&doc).unwrap();

        assert_eq!(back.id, account.id);
        assert_eq!(back.email, account.email);
        assert_eq!(back.password_hash, account.password_hash);
        assert_eq!(back.role, Role::Jobseeker);
    }

    #[test]
    fn test_document_without_fields_rejected() {
        let doc = Document {
            name: None,
            fields: None,
            create_time: None,
            update_time: None,
        };
        assert!(matches!(
            document_to_account(&doc),
            Err(StoreError::InvalidResponse(_))
        ));
    }
}
