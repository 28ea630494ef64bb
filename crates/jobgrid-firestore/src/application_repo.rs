//! Job application repository.
//!
//! Authenticated applications use a deterministic document id derived from
//! the job and applicant ids, so a duplicate application fails the create
//! precondition at the storage layer instead of racing a pre-check.

use std::collections::HashMap;

use tracing::info;

use jobgrid_models::{Application, ApplicationStatus};

use crate::client::FirestoreClient;
use crate::error::{StoreError, StoreResult};
use crate::job_repo::Page;
use crate::types::{
    CollectionSelector, Document, FieldReference, Filter, FromStoreValue, Order, StructuredQuery,
    ToStoreValue, Value,
};

const APPLICATIONS: &str = "applications";

/// Repository for application documents.
#[derive(Clone)]
pub struct ApplicationRepository {
    client: FirestoreClient,
}

impl ApplicationRepository {
    pub fn new(client: FirestoreClient) -> Self {
        Self { client }
    }

    /// Persist a new application.
    ///
    /// Fails with [`StoreError::AlreadyExists`] when a document with the
    /// same id exists, which for authenticated applications means the
    /// applicant already applied to this job.
    pub async fn create(&self, application: &Application) -> StoreResult<()> {
        self.client
            .create_document(APPLICATIONS, &application.id, application_to_fields(application))
            .await?;
        info!(
            application_id = %application.id,
            job_id = %application.job_id,
            "Created application"
        );
        Ok(())
    }

    /// Load an application by id.
    pub async fn get(&self, application_id: &str) -> StoreResult<Option<Application>> {
        let doc = self
            .client
            .with_retry("applications.get", || {
                self.client.get_document(APPLICATIONS, application_id)
            })
            .await?;

        doc.as_ref().map(document_to_application).transpose()
    }

    /// Applications for one job, newest first, with total count.
    pub async fn list_for_job(
        &self,
        job_id: &str,
        page: Page,
    ) -> StoreResult<(Vec<Application>, u64)> {
        self.list_filtered("job_id", job_id, page).await
    }

    /// Applications submitted by one account, newest first, with total count.
    pub async fn list_for_applicant(
        &self,
        applicant_account_id: &str,
        page: Page,
    ) -> StoreResult<(Vec<Application>, u64)> {
        self.list_filtered("applicant_account_id", applicant_account_id, page)
            .await
    }

    /// Count of applications on one job.
    pub async fn count_for_job(&self, job_id: &str) -> StoreResult<u64> {
        let query = Self::ordered_query(
            Some(Filter::eq("job_id", job_id.to_store_value())),
            None,
            None,
        );
        self.client
            .with_retry("applications.count", || {
                self.client.run_count(query.clone())
            })
            .await
    }

    /// Update the status field of an application.
    /// Fails with [`StoreError::NotFound`] when the application is absent.
    pub async fn set_status(
        &self,
        application_id: &str,
        status: ApplicationStatus,
    ) -> StoreResult<Application> {
        let mut fields = HashMap::new();
        fields.insert("status".to_string(), status.as_str().to_store_value());

        let doc = self
            .client
            .patch_document(
                APPLICATIONS,
                application_id,
                fields,
                Some(vec!["status".to_string()]),
                true,
            )
            .await?;

        info!(application_id = %application_id, status = %status, "Updated application status");
        document_to_application(&doc)
    }

    async fn list_filtered(
        &self,
        field: &str,
        value: &str,
        page: Page,
    ) -> StoreResult<(Vec<Application>, u64)> {
        let filter = Some(Filter::eq(field, value.to_store_value()));

        let query = Self::ordered_query(filter.clone(), Some(page.offset()), Some(page.limit as i32));
        let docs = self
            .client
            .with_retry("applications.list", || self.client.run_query(query.clone()))
            .await?;
        let applications = docs
            .iter()
            .map(document_to_application)
            .collect::<StoreResult<Vec<_>>>()?;

        let count_query = Self::ordered_query(filter, None, None);
        let total = self
            .client
            .with_retry("applications.list_count", || {
                self.client.run_count(count_query.clone())
            })
            .await?;

        Ok((applications, total))
    }

    fn ordered_query(
        filter: Option<Filter>,
        offset: Option<i32>,
        limit: Option<i32>,
    ) -> StructuredQuery {
        StructuredQuery {
            select: None,
            from: vec![CollectionSelector {
                collection_id: APPLICATIONS.to_string(),
                all_descendants: None,
            }],
            filter,
            order_by: Some(vec![
                Order {
                    field: FieldReference {
                        field_path: "applied_at".to_string(),
                    },
                    direction: "DESCENDING".to_string(),
                },
                Order {
                    field: FieldReference {
                        field_path: "__name__".to_string(),
                    },
                    direction: "DESCENDING".to_string(),
                },
            ]),
            offset,
            limit,
        }
    }
}

// ============================================================================
// Field Conversion Helpers
// ============================================================================

fn application_to_fields(application: &Application) -> HashMap<String, Value> {
    let mut fields = HashMap::new();
    fields.insert("id".to_string(), application.id.to_store_value());
    fields.insert("job_id".to_string(), application.job_id.to_store_value());
    fields.insert(
        "applicant_account_id".to_string(),
        application.applicant_account_id.to_store_value(),
    );
    fields.insert("name".to_string(), application.name.to_store_value());
    fields.insert("email".to_string(), application.email.to_store_value());
    fields.insert("phone".to_string(), application.phone.to_store_value());
    fields.insert(
        "cover_letter".to_string(),
        application.cover_letter.to_store_value(),
    );
    fields.insert(
        "resume_url".to_string(),
        application.resume_url.to_store_value(),
    );
    fields.insert(
        "status".to_string(),
        application.status.as_str().to_store_value(),
    );
    fields.insert(
        "applied_at".to_string(),
        application.applied_at.to_store_value(),
    );
    fields
}

fn document_to_application(doc: &Document) -> StoreResult<Application> {
    let fields = doc
        .fields
        .as_ref()
        .ok_or_else(|| StoreError::invalid_response("Application document has no fields"))?;

    let get_string = |key: &str| -> String {
        fields
            .get(key)
            .and_then(|v| String::from_store_value(v))
            .unwrap_or_default()
    };

    let get_opt = |key: &str| -> Option<String> {
        fields.get(key).and_then(|v| String::from_store_value(v))
    };

    let id = fields
        .get("id")
        .and_then(|v| String::from_store_value(v))
        .or_else(|| doc.doc_id().map(|s| s.to_string()))
        .ok_or_else(|| StoreError::invalid_response("Application document missing id"))?;

    let status_name = get_string("status");
    let status = ApplicationStatus::parse(&status_name).ok_or_else(|| {
        StoreError::invalid_response(format!("Application has unknown status {}", status_name))
    })?;

    Ok(Application {
        id,
        job_id: get_string("job_id"),
        applicant_account_id: get_opt("applicant_account_id"),
        name: get_string("name"),
        email: get_string("email"),
        phone: get_opt("phone"),
        cover_letter: get_opt("cover_letter"),
        resume_url: get_opt("resume_url"),
        status,
        applied_at: fields
            .get("applied_at")
            .and_then(|v| chrono::DateTime::from_store_value(v))
            .unwrap_or_else(chrono::Utc::now),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use jobgrid_models::ApplicationFields;

    fn sample_fields() -> ApplicationFields {
        ApplicationFields {
            name: "Jordan Doe".to_string(),
            email: "jordan@example.com".to_string(),
            phone: Some("+4915112345678".to_string()),
            cover_letter: Some("I build backends.".to_string()),
            resume_url: Some("https://example.com/cv.pdf".to_string()),
        }
    }

    #[test]
    fn test_application_field_round_trip() {
        let application = Application::new("job-1", "acct-1", sample_fields());
        let doc = Document::new(application_to_fields(&application));
        let back = document_to_application(&doc).unwrap();

        assert_eq!(back.id, "job-1__acct-1");
        assert_eq!(back.job_id, "job-1");
        assert_eq!(back.applicant_account_id.as_deref(), Some("acct-1"));
        assert_eq!(back.status, ApplicationStatus::Pending);
        assert_eq!(back.phone.as_deref(), Some("+4915112345678"));
    }

    #[test]
    fn test_anonymous_application_round_trip() {
        let application = Application::new_anonymous("job-1", sample_fields());
        let doc = Document::new(application_to_fields(&application));
        let back = document_to_application(&doc).unwrap();

        assert!(back.applicant_account_id.is_none());
        assert_ne!(back.id, "job-1__");
    }

    #[test]
    fn test_unknown_status_rejected() {
        let application = Application::new("job-1", "acct-1", sample_fields());
        let mut fields = application_to_fields(&application);
        fields.insert("status".to_string(), "archived".to_store_value());

        let doc = Document::new(fields);
        assert!(matches!(
            document_to_application(&doc),
            Err(StoreError::InvalidResponse(_))
        ));
    }
}
