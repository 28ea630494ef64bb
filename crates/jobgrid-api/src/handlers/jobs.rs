//! Job posting handlers.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use validator::Validate;

use jobgrid_firestore::Page;
use jobgrid_models::{JobPosting, JobPostingUpdate, OwnedJobPosting};

use crate::auth::AuthUser;
use crate::error::{ApiError, ApiResult};
use crate::response::ApiResponse;
use crate::security::{MAX_FIELD_LENGTH, MAX_TEXT_LENGTH};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct JobListQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub search: Option<String>,
    pub location: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PageQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateJobRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[validate(length(min = 1, max = 200))]
    pub company_name: String,
    #[validate(length(min = 1, max = 200))]
    pub location: String,
    #[validate(length(min = 1, max = 5000))]
    pub description: String,
    pub salary_range: Option<String>,
    #[serde(default)]
    pub required_skills: Vec<String>,
    pub is_active: Option<bool>,
}

impl CreateJobRequest {
    fn into_fields(self) -> JobPostingUpdate {
        JobPostingUpdate {
            title: Some(self.title),
            company_name: Some(self.company_name),
            location: Some(self.location),
            description: Some(self.description),
            salary_range: self.salary_range,
            required_skills: Some(self.required_skills),
            is_active: self.is_active,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdateJobRequest {
    pub title: Option<String>,
    pub company_name: Option<String>,
    pub location: Option<String>,
    pub description: Option<String>,
    pub salary_range: Option<String>,
    pub required_skills: Option<Vec<String>>,
    pub is_active: Option<bool>,
}

impl UpdateJobRequest {
    fn validate_bounds(&self) -> ApiResult<()> {
        let short_fields = [
            ("title", &self.title),
            ("company_name", &self.company_name),
            ("location", &self.location),
            ("salary_range", &self.salary_range),
        ];
        for (name, value) in short_fields {
            if let Some(v) = value {
                if v.is_empty() || v.len() > MAX_FIELD_LENGTH {
                    return Err(ApiError::validation(format!(
                        "Field {} must be 1-{} characters",
                        name, MAX_FIELD_LENGTH
                    )));
                }
            }
        }
        if let Some(description) = &self.description {
            if description.is_empty() || description.len() > MAX_TEXT_LENGTH {
                return Err(ApiError::validation(format!(
                    "Field description must be 1-{} characters",
                    MAX_TEXT_LENGTH
                )));
            }
        }
        Ok(())
    }

    fn into_update(self) -> JobPostingUpdate {
        JobPostingUpdate {
            title: self.title,
            company_name: self.company_name,
            location: self.location,
            description: self.description,
            salary_range: self.salary_range,
            required_skills: self.required_skills,
            is_active: self.is_active,
        }
    }
}

/// GET /jobs
pub async fn list_jobs(
    State(state): State<AppState>,
    Query(query): Query<JobListQuery>,
) -> ApiResult<Json<ApiResponse<Vec<JobPosting>>>> {
    let page = Page::new(query.page, query.limit);
    let (jobs, pagination) = state
        .job_service
        .list(query.search, query.location, page)
        .await?;

    Ok(Json(ApiResponse::paginated(jobs, pagination)))
}

/// POST /jobs
pub async fn create_job(
    State(state): State<AppState>,
    user: AuthUser,
    Json(request): Json<CreateJobRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<JobPosting>>)> {
    request
        .validate()
        .map_err(|e| ApiError::validation(e.to_string()))?;

    let job = state
        .job_service
        .create(&user, request.into_fields())
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message(job, "Job posting created")),
    ))
}

/// GET /jobs/:job_id
pub async fn get_job(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> ApiResult<Json<ApiResponse<JobPosting>>> {
    let job = state.job_service.get(&job_id).await?;
    Ok(Json(ApiResponse::data(job)))
}

/// PUT /jobs/:job_id
pub async fn update_job(
    State(state): State<AppState>,
    user: AuthUser,
    Path(job_id): Path<String>,
    Json(request): Json<UpdateJobRequest>,
) -> ApiResult<Json<ApiResponse<JobPosting>>> {
    request.validate_bounds()?;

    let job = state
        .job_service
        .update(&user, &job_id, request.into_update())
        .await?;

    Ok(Json(ApiResponse::data(job)))
}

/// DELETE /jobs/:job_id
pub async fn delete_job(
    State(state): State<AppState>,
    user: AuthUser,
    Path(job_id): Path<String>,
) -> ApiResult<Json<ApiResponse<()>>> {
    state.job_service.delete(&user, &job_id).await?;
    Ok(Json(ApiResponse::with_message((), "Job posting deleted")))
}

/// GET /jobs/user-jobs
pub async fn list_user_jobs(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<PageQuery>,
) -> ApiResult<Json<ApiResponse<Vec<OwnedJobPosting>>>> {
    let page = Page::new(query.page, query.limit);
    let (jobs, pagination) = state.job_service.list_by_owner(&user, page).await?;

    Ok(Json(ApiResponse::paginated(jobs, pagination)))
}
