//! Application workflow: submission, listing, and status transitions.
//!
//! Duplicate prevention relies on the storage layer. Authenticated
//! applications use an id derived from the job and applicant, so a second
//! submission fails the create precondition even under concurrent requests.

use tracing::info;

use jobgrid_firestore::{ApplicationRepository, JobRepository, Page, StoreError};
use jobgrid_models::{
    Application, ApplicationFields, ApplicationStatus, ApplicationWithJob, Role,
};

use crate::auth::AuthUser;
use crate::error::{ApiError, ApiResult};
use crate::metrics::record_application_submitted;
use crate::response::Pagination;

/// Application workflow service.
#[derive(Clone)]
pub struct ApplicationService {
    jobs: JobRepository,
    applications: ApplicationRepository,
}

impl ApplicationService {
    pub fn new(jobs: JobRepository, applications: ApplicationRepository) -> Self {
        Self { jobs, applications }
    }

    /// Submit an application as an authenticated jobseeker.
    pub async fn apply(
        &self,
        user: &AuthUser,
        job_id: &str,
        fields: ApplicationFields,
    ) -> ApiResult<Application> {
        if user.role != Role::Jobseeker {
            return Err(ApiError::forbidden(
                "Only jobseeker accounts can apply to jobs",
            ));
        }

        self.require_job(job_id).await?;

        let application = Application::new(job_id, &user.account_id, fields);
        self.applications
            .create(&application)
            .await
            .map_err(|e| match e {
                StoreError::AlreadyExists(_) => {
                    ApiError::conflict("You have already applied to this job")
                }
                e => e.into(),
            })?;

        info!(
            application_id = %application.id,
            job_id = %job_id,
            applicant = %user.account_id,
            "Application submitted"
        );
        record_application_submitted("authenticated");

        Ok(application)
    }

    /// Anonymous submission without identity binding or duplicate
    /// prevention. A weaker public entry point, kept deliberately.
    pub async fn apply_direct(
        &self,
        job_id: &str,
        fields: ApplicationFields,
    ) -> ApiResult<Application> {
        self.require_job(job_id).await?;

        let application = Application::new_anonymous(job_id, fields);
        self.applications.create(&application).await?;

        info!(
            application_id = %application.id,
            job_id = %job_id,
            "Anonymous application submitted"
        );
        record_application_submitted("anonymous");

        Ok(application)
    }

    /// Applications for a posting, visible only to the employer who owns it.
    pub async fn list_for_job(
        &self,
        user: &AuthUser,
        job_id: &str,
        page: Page,
    ) -> ApiResult<(Vec<Application>, Pagination)> {
        if user.role != Role::Employer {
            return Err(ApiError::forbidden(
                "Only employer accounts can review applications",
            ));
        }

        let job = self.require_job(job_id).await?;
        if job.owner_account_id != user.account_id {
            return Err(ApiError::forbidden(
                "Only the posting owner can review its applications",
            ));
        }

        let (applications, total) = self.applications.list_for_job(job_id, page).await?;
        Ok((applications, Pagination::new(page.page, page.limit, total)))
    }

    /// The caller's own applications, each joined with its posting.
    pub async fn list_for_applicant(
        &self,
        user: &AuthUser,
        page: Page,
    ) -> ApiResult<(Vec<ApplicationWithJob>, Pagination)> {
        let (applications, total) = self
            .applications
            .list_for_applicant(&user.account_id, page)
            .await?;

        let mut joined = Vec::with_capacity(applications.len());
        for application in applications {
            // The posting may have been deleted since the application
            let job = self.jobs.get(&application.job_id).await?;
            joined.push(ApplicationWithJob { application, job });
        }

        Ok((joined, Pagination::new(page.page, page.limit, total)))
    }

    /// Transition an application's status. Restricted to the employer who
    /// owns the parent posting; any transition among the five states is
    /// permitted.
    pub async fn update_status(
        &self,
        user: &AuthUser,
        application_id: &str,
        new_status: &str,
    ) -> ApiResult<Application> {
        if user.role != Role::Employer {
            return Err(ApiError::forbidden(
                "Only employer accounts can update application status",
            ));
        }

        let status = ApplicationStatus::parse(new_status)
            .ok_or_else(|| ApiError::validation(format!("Invalid status: {}", new_status)))?;

        let application = self
            .applications
            .get(application_id)
            .await?
            .ok_or_else(|| ApiError::not_found("Application not found"))?;

        let job = self.require_job(&application.job_id).await?;
        if job.owner_account_id != user.account_id {
            return Err(ApiError::forbidden(
                "Only the posting owner can update this application",
            ));
        }

        let updated = self
            .applications
            .set_status(application_id, status)
            .await
            .map_err(|e| match e {
                StoreError::NotFound(_) => ApiError::not_found("Application not found"),
                e => e.into(),
            })?;

        Ok(updated)
    }

    async fn require_job(&self, job_id: &str) -> ApiResult<jobgrid_models::JobPosting> {
        self.jobs
            .get(job_id)
            .await?
            .ok_or_else(|| ApiError::not_found("Job posting not found"))
    }
}
