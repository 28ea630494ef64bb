//! Application handlers.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use validator::Validate;

use jobgrid_firestore::Page;
use jobgrid_models::{Application, ApplicationFields, ApplicationWithJob};

use crate::auth::AuthUser;
use crate::error::{ApiError, ApiResult};
use crate::handlers::jobs::PageQuery;
use crate::response::ApiResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize, Validate)]
pub struct ApplyRequest {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(max = 50))]
    pub phone: Option<String>,
    #[validate(length(max = 5000))]
    pub cover_letter: Option<String>,
    #[validate(url)]
    pub resume_url: Option<String>,
}

impl ApplyRequest {
    fn into_fields(self) -> ApplicationFields {
        ApplicationFields {
            name: self.name,
            email: self.email,
            phone: self.phone,
            cover_letter: self.cover_letter,
            resume_url: self.resume_url,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct StatusUpdateRequest {
    pub status: String,
}

/// POST /jobs/:job_id/apply
pub async fn apply(
    State(state): State<AppState>,
    user: AuthUser,
    Path(job_id): Path<String>,
    Json(request): Json<ApplyRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<Application>>)> {
    request
        .validate()
        .map_err(|e| ApiError::validation(e.to_string()))?;

    let application = state
        .application_service
        .apply(&user, &job_id, request.into_fields())
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message(application, "Application submitted")),
    ))
}

/// POST /jobs/:job_id/apply-direct
pub async fn apply_direct(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
    Json(request): Json<ApplyRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<Application>>)> {
    request
        .validate()
        .map_err(|e| ApiError::validation(e.to_string()))?;

    let application = state
        .application_service
        .apply_direct(&job_id, request.into_fields())
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message(application, "Application submitted")),
    ))
}

/// GET /jobs/:job_id/applications
pub async fn list_job_applications(
    State(state): State<AppState>,
    user: AuthUser,
    Path(job_id): Path<String>,
    Query(query): Query<PageQuery>,
) -> ApiResult<Json<ApiResponse<Vec<Application>>>> {
    let page = Page::new(query.page, query.limit);
    let (applications, pagination) = state
        .application_service
        .list_for_job(&user, &job_id, page)
        .await?;

    Ok(Json(ApiResponse::paginated(applications, pagination)))
}

/// GET /applications
pub async fn list_my_applications(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<PageQuery>,
) -> ApiResult<Json<ApiResponse<Vec<ApplicationWithJob>>>> {
    let page = Page::new(query.page, query.limit);
    let (applications, pagination) = state
        .application_service
        .list_for_applicant(&user, page)
        .await?;

    Ok(Json(ApiResponse::paginated(applications, pagination)))
}

/// PUT /applications/:application_id
pub async fn update_application_status(
    State(state): State<AppState>,
    user: AuthUser,
    Path(application_id): Path<String>,
    Json(request): Json<StatusUpdateRequest>,
) -> ApiResult<Json<ApiResponse<Application>>> {
    let application = state
        .application_service
        .update_status(&user, &application_id, &request.status)
        .await?;

    Ok(Json(ApiResponse::with_message(
        application,
        "Application status updated",
    )))
}
