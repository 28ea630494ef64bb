//! Job posting operations with uniform ownership enforcement.

use tracing::info;

use jobgrid_firestore::{ApplicationRepository, JobListFilter, JobRepository, Page, StoreError};
use jobgrid_models::{JobPosting, JobPostingUpdate, OwnedJobPosting, Role};

use crate::auth::AuthUser;
use crate::error::{ApiError, ApiResult};
use crate::response::Pagination;

/// Job posting service.
#[derive(Clone)]
pub struct JobService {
    jobs: JobRepository,
    applications: ApplicationRepository,
}

impl JobService {
    pub fn new(jobs: JobRepository, applications: ApplicationRepository) -> Self {
        Self { jobs, applications }
    }

    /// Public listing of active postings.
    pub async fn list(
        &self,
        search: Option<String>,
        location: Option<String>,
        page: Page,
    ) -> ApiResult<(Vec<JobPosting>, Pagination)> {
        let filter = JobListFilter {
            search,
            location,
            active_only: true,
        };

        let (jobs, total) = self.jobs.list(&filter, page).await?;
        Ok((jobs, Pagination::new(page.page, page.limit, total)))
    }

    /// Create a posting owned by the caller. Employer-only.
    pub async fn create(&self, user: &AuthUser, fields: JobPostingUpdate) -> ApiResult<JobPosting> {
        require_employer(user)?;

        let job = JobPosting::new(&user.account_id, fields);
        self.jobs.create(&job).await?;

        Ok(job)
    }

    /// Fetch a posting by id.
    pub async fn get(&self, job_id: &str) -> ApiResult<JobPosting> {
        self.jobs
            .get(job_id)
            .await?
            .ok_or_else(|| ApiError::not_found("Job posting not found"))
    }

    /// Update a posting. Only the owner may update it.
    pub async fn update(
        &self,
        user: &AuthUser,
        job_id: &str,
        update: JobPostingUpdate,
    ) -> ApiResult<JobPosting> {
        if update.is_empty() {
            return Err(ApiError::validation("No updatable fields provided"));
        }

        let existing = self.get(job_id).await?;
        require_owner(user, &existing)?;

        let updated = self.jobs.update(job_id, &update).await.map_err(|e| match e {
            StoreError::NotFound(_) => ApiError::not_found("Job posting not found"),
            e => e.into(),
        })?;

        info!(job_id = %job_id, owner = %user.account_id, "Job posting updated");
        Ok(updated)
    }

    /// Delete a posting. Only the owner may delete it.
    pub async fn delete(&self, user: &AuthUser, job_id: &str) -> ApiResult<()> {
        let existing = self.get(job_id).await?;
        require_owner(user, &existing)?;

        self.jobs.delete(job_id).await?;

        info!(job_id = %job_id, owner = %user.account_id, "Job posting deleted");
        Ok(())
    }

    /// Owner-scoped listing including per-posting application counts.
    pub async fn list_by_owner(
        &self,
        user: &AuthUser,
        page: Page,
    ) -> ApiResult<(Vec<OwnedJobPosting>, Pagination)> {
        let (jobs, total) = self.jobs.list_by_owner(&user.account_id, page).await?;

        let mut owned = Vec::with_capacity(jobs.len());
        for job in jobs {
            let applications_count = self.applications.count_for_job(&job.id).await? as u32;
            owned.push(OwnedJobPosting {
                posting: job,
                applications_count,
            });
        }

        Ok((owned, Pagination::new(page.page, page.limit, total)))
    }
}

fn require_employer(user: &AuthUser) -> ApiResult<()> {
    if user.role != Role::Employer {
        return Err(ApiError::forbidden(
            "Only employer accounts can manage job postings",
        ));
    }
    Ok(())
}

fn require_owner(user: &AuthUser, job: &JobPosting) -> ApiResult<()> {
    require_employer(user)?;
    if job.owner_account_id != user.account_id {
        return Err(ApiError::forbidden(
            "Only the posting owner can modify this job",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(role: Role, id: &str) -> AuthUser {
        AuthUser {
            account_id: id.to_string(),
            email: format!("{}@example.com", id),
            role,
        }
    }

    fn job(owner: &str) -> JobPosting {
        JobPosting::new(
            owner,
            JobPostingUpdate {
                title: Some("Engineer".to_string()),
                ..Default::default()
            },
        )
    }

    #[test]
    fn test_jobseeker_cannot_manage_postings() {
        let user = user(Role::Jobseeker, "acct-1");
        assert!(matches!(
            require_employer(&user),
            Err(ApiError::Forbidden(_))
        ));
    }

    #[test]
    fn test_non_owner_employer_rejected() {
        let owner_job = job("acct-owner");
        let other = user(Role::Employer, "acct-other");
        assert!(matches!(
            require_owner(&other, &owner_job),
            Err(ApiError::Forbidden(_))
        ));
    }

    #[test]
    fn test_owner_accepted() {
        let owner_job = job("acct-owner");
        let owner = user(Role::Employer, "acct-owner");
        assert!(require_owner(&owner, &owner_job).is_ok());
    }
}
