//! Job posting repository.

use std::collections::HashMap;

use tracing::info;

use jobgrid_models::{JobPosting, JobPostingUpdate};

use crate::client::FirestoreClient;
use crate::error::{StoreError, StoreResult};
use crate::types::{
    CollectionSelector, Document, FieldReference, Filter, FromStoreValue, Order, StructuredQuery,
    ToStoreValue, Value,
};

const JOBS: &str = "jobs";

/// Substring search cannot be pushed down to Firestore, so searched
/// listings scan a bounded window of recent postings and filter in memory.
const SEARCH_SCAN_LIMIT: i32 = 500;

/// Page request with normalized bounds.
#[derive(Debug, Clone, Copy)]
pub struct Page {
    pub page: u32,
    pub limit: u32,
}

impl Page {
    pub const DEFAULT_LIMIT: u32 = 10;
    pub const MAX_LIMIT: u32 = 100;

    /// Normalize raw query parameters: page is 1-based, limit is clamped.
    pub fn new(page: Option<u32>, limit: Option<u32>) -> Self {
        Self {
            page: page.unwrap_or(1).max(1),
            limit: limit.unwrap_or(Self::DEFAULT_LIMIT).clamp(1, Self::MAX_LIMIT),
        }
    }

    /// Offset for the store query. Saturates at `i32::MAX` so absurd page
    /// numbers from the query string cannot overflow.
    pub fn offset(&self) -> i32 {
        let offset = (self.page as u64)
            .saturating_sub(1)
            .saturating_mul(self.limit as u64);
        offset.min(i32::MAX as u64) as i32
    }
}

impl Default for Page {
    fn default() -> Self {
        Self::new(None, None)
    }
}

/// Public listing filter.
#[derive(Debug, Clone, Default)]
pub struct JobListFilter {
    /// Case-insensitive substring match on title and description.
    pub search: Option<String>,
    /// Exact location match.
    pub location: Option<String>,
    /// Restrict to active postings (the public listing always sets this).
    pub active_only: bool,
}

/// Repository for job posting documents.
#[derive(Clone)]
pub struct JobRepository {
    client: FirestoreClient,
}

impl JobRepository {
    pub fn new(client: FirestoreClient) -> Self {
        Self { client }
    }

    /// Persist a new posting.
    pub async fn create(&self, job: &JobPosting) -> StoreResult<()> {
        self.client
            .create_document(JOBS, &job.id, job_to_fields(job))
            .await?;
        info!(job_id = %job.id, owner = %job.owner_account_id, "Created job posting");
        Ok(())
    }

    /// Load a posting by id.
    pub async fn get(&self, job_id: &str) -> StoreResult<Option<JobPosting>> {
        let doc = self
            .client
            .with_retry("jobs.get", || self.client.get_document(JOBS, job_id))
            .await?;

        doc.as_ref().map(document_to_job).transpose()
    }

    /// Merge-update the schema fields present on `update`.
    /// Fails with [`StoreError::NotFound`] when the posting is absent.
    pub async fn update(&self, job_id: &str, update: &JobPostingUpdate) -> StoreResult<JobPosting> {
        let doc = self
            .client
            .patch_document(
                JOBS,
                job_id,
                update_to_fields(update),
                Some(update.field_paths()),
                true,
            )
            .await?;

        document_to_job(&doc)
    }

    /// Delete a posting. Idempotent at the store layer; existence checks
    /// belong to the caller's policy.
    pub async fn delete(&self, job_id: &str) -> StoreResult<()> {
        self.client.delete_document(JOBS, job_id).await?;
        info!(job_id = %job_id, "Deleted job posting");
        Ok(())
    }

    /// Public listing: filtered, ordered by created_at descending, paginated
    /// with total count.
    pub async fn list(
        &self,
        filter: &JobListFilter,
        page: Page,
    ) -> StoreResult<(Vec<JobPosting>, u64)> {
        let store_filter = Self::store_filter(filter);

        if let Some(search) = filter.search.as_deref().filter(|s| !s.trim().is_empty()) {
            // Scan a bounded window and paginate the in-memory matches so
            // totals stay consistent with the returned page.
            let query = Self::ordered_query(store_filter, None, Some(SEARCH_SCAN_LIMIT));
            let docs = self
                .client
                .with_retry("jobs.search", || self.client.run_query(query.clone()))
                .await?;

            let needle = search.trim().to_lowercase();
            let matches: Vec<JobPosting> = docs
                .iter()
                .map(document_to_job)
                .collect::<StoreResult<Vec<_>>>()?
                .into_iter()
                .filter(|job| {
                    job.title.to_lowercase().contains(&needle)
                        || job.description.to_lowercase().contains(&needle)
                })
                .collect();

            let total = matches.len() as u64;
            let start = (page.offset() as usize).min(matches.len());
            let end = (start + page.limit as usize).min(matches.len());
            return Ok((matches[start..end].to_vec(), total));
        }

        let query = Self::ordered_query(
            store_filter.clone(),
            Some(page.offset()),
            Some(page.limit as i32),
        );
        let docs = self
            .client
            .with_retry("jobs.list", || self.client.run_query(query.clone()))
            .await?;
        let jobs = docs
            .iter()
            .map(document_to_job)
            .collect::<StoreResult<Vec<_>>>()?;

        let count_query = Self::ordered_query(store_filter, None, None);
        let total = self
            .client
            .with_retry("jobs.count", || self.client.run_count(count_query.clone()))
            .await?;

        Ok((jobs, total))
    }

    /// Owner-scoped listing, newest first, with total count.
    pub async fn list_by_owner(
        &self,
        owner_account_id: &str,
        page: Page,
    ) -> StoreResult<(Vec<JobPosting>, u64)> {
        let filter = Some(Filter::eq(
            "owner_account_id",
            owner_account_id.to_store_value(),
        ));

        let query = Self::ordered_query(filter.clone(), Some(page.offset()), Some(page.limit as i32));
        let docs = self
            .client
            .with_retry("jobs.list_by_owner", || self.client.run_query(query.clone()))
            .await?;
        let jobs = docs
            .iter()
            .map(document_to_job)
            .collect::<StoreResult<Vec<_>>>()?;

        let count_query = Self::ordered_query(filter, None, None);
        let total = self
            .client
            .with_retry("jobs.count_by_owner", || {
                self.client.run_count(count_query.clone())
            })
            .await?;

        Ok((jobs, total))
    }

    fn store_filter(filter: &JobListFilter) -> Option<Filter> {
        let mut filters = Vec::new();
        if filter.active_only {
            filters.push(Filter::eq("is_active", true.to_store_value()));
        }
        if let Some(location) = filter.location.as_deref().filter(|l| !l.trim().is_empty()) {
            filters.push(Filter::eq("location", location.trim().to_store_value()));
        }
        Filter::and(filters)
    }

    fn ordered_query(
        filter: Option<Filter>,
        offset: Option<i32>,
        limit: Option<i32>,
    ) -> StructuredQuery {
        StructuredQuery {
            select: None,
            from: vec![CollectionSelector {
                collection_id: JOBS.to_string(),
                all_descendants: None,
            }],
            filter,
            order_by: Some(vec![
                Order {
                    field: FieldReference {
                        field_path: "created_at".to_string(),
                    },
                    direction: "DESCENDING".to_string(),
                },
                // Secondary order on document name for a stable sort
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

fn job_to_fields(job: &JobPosting) -> HashMap<String, Value> {
    let mut fields = HashMap::new();
    fields.insert("id".to_string(), job.id.to_store_value());
    fields.insert(
        "owner_account_id".to_string(),
        job.owner_account_id.to_store_value(),
    );
    fields.insert("title".to_string(), job.title.to_store_value());
    fields.insert(
        "company_name".to_string(),
        job.company_name.to_store_value(),
    );
    fields.insert("location".to_string(), job.location.to_store_value());
    fields.insert("description".to_string(), job.description.to_store_value());
    fields.insert(
        "salary_range".to_string(),
        job.salary_range.to_store_value(),
    );
    fields.insert(
        "required_skills".to_string(),
        job.required_skills.to_store_value(),
    );
    fields.insert("is_active".to_string(), job.is_active.to_store_value());
    fields.insert("created_at".to_string(), job.created_at.to_store_value());
    fields
}

fn update_to_fields(update: &JobPostingUpdate) -> HashMap<String, Value> {
    let mut fields = HashMap::new();
    if let Some(title) = &update.title {
        fields.insert("title".to_string(), title.to_store_value());
    }
    if let Some(company) = &update.company_name {
        fields.insert("company_name".to_string(), company.to_store_value());
    }
    if let Some(location) = &update.location {
        fields.insert("location".to_string(), location.to_store_value());
    }
    if let Some(description) = &update.description {
        fields.insert("description".to_string(), description.to_store_value());
    }
    if let Some(salary) = &update.salary_range {
        fields.insert("salary_range".to_string(), salary.to_store_value());
    }
    if let Some(skills) = &update.required_skills {
        fields.insert("required_skills".to_string(), skills.to_store_value());
    }
    if let Some(active) = update.is_active {
        fields.insert("is_active".to_string(), active.to_store_value());
    }
    fields
}

fn document_to_job(doc: &Document) -> StoreResult<JobPosting> {
    let fields = doc
        .fields
        .as_ref()
        .ok_or_else(|| StoreError::invalid_response("Job document has no fields"))?;

    let get_string = |key: &str| -> String {
        fields
            .get(key)
            .and_then(|v| String::from_store_value(v))
            .unwrap_or_default()
    };

    let id = fields
        .get("id")
        .and_then(|v| String::from_store_value(v))
        .or_else(|| doc.doc_id().map(|s| s.to_string()))
        .ok_or_else(|| StoreError::invalid_response("Job document missing id"))?;

    Ok(JobPosting {
        id,
        owner_account_id: get_string("owner_account_id"),
        title: get_string("title"),
        company_name: get_string("company_name"),
        location: get_string("location"),
        description: get_string("description"),
        salary_range: fields
            .get("salary_range")
            .and_then(|v| String::from_store_value(v)),
        required_skills: fields
            .get("required_skills")
            .and_then(|v| Vec::<String>::from_store_value(v))
            .unwrap_or_default(),
        is_active: fields
            .get("is_active")
            .and_then(|v| bool::from_store_value(v))
            .unwrap_or(true),
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
    fn test_page_normalization() {
        let page = Page::new(None, None);
        assert_eq!(page.page, 1);
        assert_eq!(page.limit, Page::DEFAULT_LIMIT);
        assert_eq!(page.offset(), 0);

        let page = Page::new(Some(0), Some(1000));
        assert_eq!(page.page, 1);
        assert_eq!(page.limit, Page::MAX_LIMIT);

        let page = Page::new(Some(3), Some(20));
        assert_eq!(page.offset(), 40);
    }

    #[test]
    fn test_offset_saturates_on_huge_page_numbers() {
        let page = Page::new(Some(u32::MAX), Some(100));
        assert_eq!(page.offset(), i32::MAX);

        // A literal zero page must not underflow either
        let page = Page { page: 0, limit: 10 };
        assert_eq!(page.offset(), 0);
    }

    #[test]
    fn test_store_filter_combines_clauses() {
        let filter = JobRepository::store_filter(&JobListFilter {
            search: None,
            location: Some("Berlin".to_string()),
            active_only: true,
        })
        .unwrap();
        assert!(filter.composite_filter.is_some());

        let filter = JobRepository::store_filter(&JobListFilter {
            active_only: true,
            ..Default::default()
        })
        .unwrap();
        assert!(filter.field_filter.is_some());

        assert!(JobRepository::store_filter(&JobListFilter::default()).is_none());
    }

    #[test]
    fn test_job_field_round_trip() {
        let job = JobPosting::new(
            "owner-1",
            jobgrid_models::JobPostingUpdate {
                title: Some("Backend Engineer".to_string()),
                company_name: Some("Acme".to_string()),
                location: Some("Berlin".to_string()),
                description: Some("Build APIs".to_string()),
                salary_range: Some("60k-80k".to_string()),
                required_skills: Some(vec!["rust".to_string(), "gcp".to_string()]),
                is_active: Some(true),
            },
        );

        let doc = Document::new(job_to_fields(&job));
        let back = document_to_job(&doc).unwrap();

        assert_eq!(back.id, job.id);
        assert_eq!(back.owner_account_id, "owner-1");
        assert_eq!(back.title, "Backend Engineer");
        assert_eq!(back.required_skills, vec!["rust", "gcp"]);
        assert_eq!(back.salary_range.as_deref(), Some("60k-80k"));
        assert!(back.is_active);
    }

    #[test]
    fn test_update_fields_match_mask() {
        let update = JobPostingUpdate {
            title: Some("New title".to_string()),
            is_active: Some(false),
            ..Default::default()
        };
        let fields = update_to_fields(&update);
        let mask = update.field_paths();

        assert_eq!(fields.len(), mask.len());
        for path in mask {
            assert!(fields.contains_key(&path));
        }
    }
}
