//! Router tests using tower's oneshot, with the store mocked via wiremock.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use serde_json::{json, Value};
use tower::ServiceExt;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use jobgrid_api::{
    create_router, ApiConfig, ApplicationService, AppState, AuthService, JobService, TokenService,
};
use jobgrid_firestore::{
    AccountRepository, ApplicationRepository, FirestoreClient, FirestoreConfig, JobRepository,
};
use jobgrid_models::{Account, Role};

const PROJECT: &str = "test-project";

fn test_state(server: &MockServer) -> AppState {
    let config = ApiConfig::default();
    let host = server.uri().trim_start_matches("http://").to_string();
    let store = FirestoreClient::new(FirestoreConfig::emulator(host, PROJECT))
        .expect("emulator client");

    let tokens = Arc::new(TokenService::new(&config.jwt_secret, config.token_ttl));

    let accounts = AccountRepository::new(store.clone());
    let jobs = JobRepository::new(store.clone());
    let applications = ApplicationRepository::new(store.clone());

    AppState {
        config,
        store,
        tokens: Arc::clone(&tokens),
        auth_service: AuthService::new(accounts, Arc::clone(&tokens)),
        job_service: JobService::new(jobs.clone(), applications.clone()),
        application_service: ApplicationService::new(jobs, applications),
    }
}

fn bearer_for(state: &AppState, role: Role) -> String {
    let account = Account::new("user@example.com", "$argon2id$hash", role);
    let token = state.tokens.issue(&account).expect("issue token");
    format!("Bearer {}", token)
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read body");
    serde_json::from_slice(&bytes).expect("body is JSON")
}

#[tokio::test]
async fn health_reports_healthy() {
    let server = MockServer::start().await;
    let app = create_router(test_state(&server), None);

    let response = app
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn missing_token_is_unauthorized_with_envelope() {
    let server = MockServer::start().await;
    let app = create_router(test_state(&server), None);

    let response = app
        .oneshot(Request::get("/auth/me").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(response).await;
    assert_eq!(body["success"], false);
    assert!(body["error"].as_str().unwrap().contains("Authorization"));
}

#[tokio::test]
async fn garbage_token_is_unauthorized() {
    let server = MockServer::start().await;
    let app = create_router(test_state(&server), None);

    let response = app
        .oneshot(
            Request::get("/auth/me")
                .header(header::AUTHORIZATION, "Bearer not.a.token")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn jobseeker_cannot_create_job() {
    let server = MockServer::start().await;
    let state = test_state(&server);
    let token = bearer_for(&state, Role::Jobseeker);
    let app = create_router(state, None);

    let request = Request::post("/jobs")
        .header(header::AUTHORIZATION, token)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(
            json!({
                "title": "Backend Engineer",
                "company_name": "Acme",
                "location": "Berlin",
                "description": "Build things"
            })
            .to_string(),
        ))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let body = body_json(response).await;
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn invalid_status_value_is_rejected_before_store_access() {
    let server = MockServer::start().await;
    let state = test_state(&server);
    let token = bearer_for(&state, Role::Employer);
    let app = create_router(state, None);

    let request = Request::put("/applications/app-1")
        .header(header::AUTHORIZATION, token)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(json!({"status": "archived"}).to_string()))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert!(body["error"].as_str().unwrap().contains("Invalid status"));
}

#[tokio::test]
async fn public_job_listing_returns_paginated_envelope() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(format!(
            "/v1/projects/{}/databases/(default)/documents:runQuery",
            PROJECT
        )))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {
                "document": {
                    "name": format!(
                        "projects/{}/databases/(default)/documents/jobs/job-1",
                        PROJECT
                    ),
                    "fields": {
                        "id": {"stringValue": "job-1"},
                        "owner_account_id": {"stringValue": "acct-1"},
                        "title": {"stringValue": "Backend Engineer"},
                        "company_name": {"stringValue": "Acme"},
                        "location": {"stringValue": "Berlin"},
                        "description": {"stringValue": "Build things"},
                        "is_active": {"booleanValue": true},
                        "created_at": {"timestampValue": "2026-08-01T12:00:00+00:00"}
                    }
                }
            }
        ])))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path(format!(
            "/v1/projects/{}/databases/(default)/documents:runAggregationQuery",
            PROJECT
        )))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"result": {"aggregateFields": {"total": {"integerValue": "1"}}}}
        ])))
        .mount(&server)
        .await;

    let app = create_router(test_state(&server), None);

    let response = app
        .oneshot(Request::get("/jobs").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["data"][0]["title"], "Backend Engineer");
    assert_eq!(body["pagination"]["total"], 1);
    assert_eq!(body["pagination"]["page"], 1);
}

#[tokio::test]
async fn login_with_mismatched_role_is_forbidden() {
    let server = MockServer::start().await;

    // Stored account registered as employer, with a real Argon2 hash
    let hash = jobgrid_api::security::hash_password("password1").expect("hash password");

    Mock::given(method("GET"))
        .and(path(format!(
            "/v1/projects/{}/databases/(default)/documents/account_emails/e@x.com",
            PROJECT
        )))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": format!(
                "projects/{}/databases/(default)/documents/account_emails/e@x.com",
                PROJECT
            ),
            "fields": {
                "account_id": {"stringValue": "acct-1"},
                "created_at": {"timestampValue": "2026-08-01T12:00:00+00:00"}
            }
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path(format!(
            "/v1/projects/{}/databases/(default)/documents/accounts/acct-1",
            PROJECT
        )))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": format!(
                "projects/{}/databases/(default)/documents/accounts/acct-1",
                PROJECT
            ),
            "fields": {
                "id": {"stringValue": "acct-1"},
                "email": {"stringValue": "e@x.com"},
                "password_hash": {"stringValue": hash},
                "role": {"stringValue": "employer"},
                "created_at": {"timestampValue": "2026-08-01T12:00:00+00:00"}
            }
        })))
        .mount(&server)
        .await;

    let app = create_router(test_state(&server), None);

    let request = Request::post("/auth/login")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(
            json!({
                "email": "e@x.com",
                "password": "password1",
                "role": "jobseeker"
            })
            .to_string(),
        ))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let body = body_json(response).await;
    assert_eq!(body["success"], false);
    let error = body["error"].as_str().unwrap();
    assert!(error.contains("Employer"));
    assert!(error.contains("Job Seeker"));
    assert!(body.get("token").is_none());
    assert!(body.get("data").is_none());
}

#[tokio::test]
async fn signup_with_unknown_role_is_validation_error() {
    let server = MockServer::start().await;
    let app = create_router(test_state(&server), None);

    let request = Request::post("/auth/signup")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(
            json!({
                "email": "new@example.com",
                "password": "password1",
                "role_name": "wizard"
            })
            .to_string(),
        ))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert!(body["error"].as_str().unwrap().contains("Unknown role"));
}

#[tokio::test]
async fn rate_limited_request_gets_envelope_and_retry_after() {
    let server = MockServer::start().await;
    let mut state = test_state(&server);
    state.config.rate_limit_rps = 1;
    let app = create_router(state, None);

    let request = || {
        Request::get("/applications")
            .header("X-Forwarded-For", "198.51.100.7")
            .body(Body::empty())
            .unwrap()
    };

    // First request passes the limiter (and fails auth, which is fine here)
    let first = app.clone().oneshot(request()).await.unwrap();
    assert_eq!(first.status(), StatusCode::UNAUTHORIZED);

    let second = app.oneshot(request()).await.unwrap();
    assert_eq!(second.status(), StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(second.headers().get("Retry-After").unwrap(), "1");
    let body = body_json(second).await;
    assert_eq!(body["success"], false);
    assert!(body["error"].as_str().unwrap().contains("Rate limit"));
}

#[tokio::test]
async fn security_headers_present() {
    let server = MockServer::start().await;
    let app = create_router(test_state(&server), None);

    let response = app
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(
        response.headers().get("X-Content-Type-Options").unwrap(),
        "nosniff"
    );
    assert!(response.headers().get("X-Request-ID").is_some());
}
