//! Repository tests against a mocked Firestore REST endpoint.
//!
//! The client's emulator-host override points at a wiremock server, so
//! these tests exercise the real request/response handling without
//! credentials.

use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use jobgrid_firestore::{
    AccountRepository, FirestoreClient, FirestoreConfig, JobListFilter, JobRepository, Page,
    StoreError,
};
use jobgrid_models::{Account, Role};

const PROJECT: &str = "test-project";

fn client_for(server: &MockServer) -> FirestoreClient {
    let host = server.uri().trim_start_matches("http://").to_string();
    FirestoreClient::new(FirestoreConfig::emulator(host, PROJECT))
        .expect("emulator client")
}

fn documents_path(suffix: &str) -> String {
    format!(
        "/v1/projects/{}/databases/(default)/documents{}",
        PROJECT, suffix
    )
}

#[tokio::test]
async fn missing_account_reads_as_none() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(documents_path("/accounts/ghost")))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let repo = AccountRepository::new(client_for(&server));
    let account = repo.get("ghost").await.expect("get should succeed");
    assert!(account.is_none());
}

#[tokio::test]
async fn duplicate_email_rejected_by_batch_precondition() {
    let server = MockServer::start().await;

    // Second write (the email index) fails its exists=false precondition
    Mock::given(method("POST"))
        .and(path(format!(
            "/v1/projects/{}/databases/(default):batchWrite",
            PROJECT
        )))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "writeResults": [{}, {}],
            "status": [
                {"code": 0},
                {"code": 6, "message": "Document already exists"}
            ]
        })))
        .mount(&server)
        .await;

    let repo = AccountRepository::new(client_for(&server));
    let account = Account::new("taken@example.com", "$argon2id$hash", Role::Employer);

    let result = repo.create(&account).await;
    assert!(matches!(result, Err(StoreError::AlreadyExists(_))));
}

#[tokio::test]
async fn account_create_succeeds_when_batch_accepts() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(format!(
            "/v1/projects/{}/databases/(default):batchWrite",
            PROJECT
        )))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "writeResults": [{}, {}],
            "status": [{"code": 0}, {"code": 0}]
        })))
        .mount(&server)
        .await;

    let repo = AccountRepository::new(client_for(&server));
    let account = Account::new("new@example.com", "$argon2id$hash", Role::Jobseeker);

    repo.create(&account).await.expect("create should succeed");
}

#[tokio::test]
async fn job_listing_decodes_query_and_count() {
    let server = MockServer::start().await;

    let job_doc = |id: &str, title: &str| {
        json!({
            "document": {
                "name": format!(
                    "projects/{}/databases/(default)/documents/jobs/{}",
                    PROJECT, id
                ),
                "fields": {
                    "id": {"stringValue": id},
                    "owner_account_id": {"stringValue": "acct-1"},
                    "title": {"stringValue": title},
                    "company_name": {"stringValue": "Acme"},
                    "location": {"stringValue": "Berlin"},
                    "description": {"stringValue": "Build things"},
                    "salary_range": {"nullValue": null},
                    "required_skills": {"arrayValue": {"values": [{"stringValue": "rust"}]}},
                    "is_active": {"booleanValue": true},
                    "created_at": {"timestampValue": "2026-08-01T12:00:00+00:00"}
                }
            }
        })
    };

    Mock::given(method("POST"))
        .and(path(documents_path(":runQuery")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            job_doc("job-1", "Backend Engineer"),
            job_doc("job-2", "Platform Engineer"),
        ])))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path(documents_path(":runAggregationQuery")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"result": {"aggregateFields": {"total": {"integerValue": "2"}}}}
        ])))
        .mount(&server)
        .await;

    let repo = JobRepository::new(client_for(&server));
    let filter = JobListFilter {
        active_only: true,
        ..Default::default()
    };

    let (jobs, total) = repo
        .list(&filter, Page::default())
        .await
        .expect("list should succeed");

    assert_eq!(total, 2);
    assert_eq!(jobs.len(), 2);
    assert_eq!(jobs[0].title, "Backend Engineer");
    assert_eq!(jobs[1].required_skills, vec!["rust"]);
    assert!(jobs[0].salary_range.is_none());
}

#[tokio::test]
async fn search_filters_in_memory() {
    let server = MockServer::start().await;

    let job_doc = |id: &str, title: &str| {
        json!({
            "document": {
                "name": format!(
                    "projects/{}/databases/(default)/documents/jobs/{}",
                    PROJECT, id
                ),
                "fields": {
                    "id": {"stringValue": id},
                    "owner_account_id": {"stringValue": "acct-1"},
                    "title": {"stringValue": title},
                    "company_name": {"stringValue": "Acme"},
                    "location": {"stringValue": "Berlin"},
                    "description": {"stringValue": "Build things"},
                    "is_active": {"booleanValue": true},
                    "created_at": {"timestampValue": "2026-08-01T12:00:00+00:00"}
                }
            }
        })
    };

    Mock::given(method("POST"))
        .and(path(documents_path(":runQuery")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            job_doc("job-1", "Backend Engineer"),
            job_doc("job-2", "Product Designer"),
        ])))
        .mount(&server)
        .await;

    let repo = JobRepository::new(client_for(&server));
    let filter = JobListFilter {
        search: Some("engineer".to_string()),
        active_only: true,
        ..Default::default()
    };

    let (jobs, total) = repo
        .list(&filter, Page::default())
        .await
        .expect("search should succeed");

    assert_eq!(total, 1);
    assert_eq!(jobs[0].title, "Backend Engineer");
}
