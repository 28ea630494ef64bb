//! Auth handlers.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use validator::Validate;

use jobgrid_models::PublicAccount;

use crate::auth::AuthUser;
use crate::error::{ApiError, ApiResult};
use crate::response::ApiResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
    /// Optional role assertion, by name or id.
    pub role: Option<String>,
}

#[derive(Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub account: PublicAccount,
}

/// POST /auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> ApiResult<Json<ApiResponse<LoginResponse>>> {
    request
        .validate()
        .map_err(|e| ApiError::validation(e.to_string()))?;

    let (token, account) = state
        .auth_service
        .login(&request.email, &request.password, request.role.as_deref())
        .await?;

    Ok(Json(ApiResponse::data(LoginResponse { token, account })))
}

#[derive(Debug, Deserialize, Validate)]
pub struct SignupRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 8, max = 128))]
    pub password: String,
    pub role_name: String,
}

/// POST /auth/signup
pub async fn signup(
    State(state): State<AppState>,
    Json(request): Json<SignupRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<PublicAccount>>)> {
    request
        .validate()
        .map_err(|e| ApiError::validation(e.to_string()))?;

    let account = state
        .auth_service
        .register(&request.email, &request.password, &request.role_name)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message(account, "Account created")),
    ))
}

/// GET /auth/me
pub async fn me(
    State(state): State<AppState>,
    user: AuthUser,
) -> ApiResult<Json<ApiResponse<PublicAccount>>> {
    let account = state.auth_service.current_account(&user.account_id).await?;
    Ok(Json(ApiResponse::data(account)))
}
