//! Applications and their status lifecycle.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::job::JobPosting;

/// Application review status.
///
/// Transitions are terminal-flat: the owning employer may move an
/// application between any of the five states, there is no forward-only
/// chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationStatus {
    #[default]
    Pending,
    Reviewed,
    Interviewed,
    Accepted,
    Rejected,
}

impl ApplicationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApplicationStatus::Pending => "pending",
            ApplicationStatus::Reviewed => "reviewed",
            ApplicationStatus::Interviewed => "interviewed",
            ApplicationStatus::Accepted => "accepted",
            ApplicationStatus::Rejected => "rejected",
        }
    }

    /// Parse a status from its wire name.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Some(ApplicationStatus::Pending),
            "reviewed" => Some(ApplicationStatus::Reviewed),
            "interviewed" => Some(ApplicationStatus::Interviewed),
            "accepted" => Some(ApplicationStatus::Accepted),
            "rejected" => Some(ApplicationStatus::Rejected),
            _ => None,
        }
    }
}

impl std::fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A jobseeker's submission against a job posting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Application {
    /// Document identifier. Authenticated applications use the
    /// deterministic id from [`Application::unique_id`]; anonymous direct
    /// submissions get a random UUID.
    pub id: String,
    pub job_id: String,
    /// Absent for anonymous direct submissions.
    #[serde(default)]
    pub applicant_account_id: Option<String>,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub cover_letter: Option<String>,
    #[serde(default)]
    pub resume_url: Option<String>,
    pub status: ApplicationStatus,
    pub applied_at: DateTime<Utc>,
}

/// Contact and content fields supplied by the applicant.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApplicationFields {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub cover_letter: Option<String>,
    #[serde(default)]
    pub resume_url: Option<String>,
}

impl Application {
    /// Deterministic document id for an authenticated application.
    ///
    /// Encoding the (job, applicant) pair into the id turns the
    /// one-application-per-user-per-job invariant into a storage-level
    /// create constraint instead of a racy check-then-insert.
    pub fn unique_id(job_id: &str, applicant_account_id: &str) -> String {
        format!("{}__{}", job_id, applicant_account_id)
    }

    /// New authenticated application in the initial `pending` state.
    pub fn new(
        job_id: impl Into<String>,
        applicant_account_id: impl Into<String>,
        fields: ApplicationFields,
    ) -> Self {
        let job_id = job_id.into();
        let applicant = applicant_account_id.into();
        Self {
            id: Self::unique_id(&job_id, &applicant),
            job_id,
            applicant_account_id: Some(applicant),
            name: fields.name,
            email: fields.email,
            phone: fields.phone,
            cover_letter: fields.cover_letter,
            resume_url: fields.resume_url,
            status: ApplicationStatus::Pending,
            applied_at: Utc::now(),
        }
    }

    /// New anonymous application. No identity binding, no duplicate
    /// prevention; callers choosing this entry point accept both.
    pub fn new_anonymous(job_id: impl Into<String>, fields: ApplicationFields) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            job_id: job_id.into(),
            applicant_account_id: None,
            name: fields.name,
            email: fields.email,
            phone: fields.phone,
            cover_letter: fields.cover_letter,
            resume_url: fields.resume_url,
            status: ApplicationStatus::Pending,
            applied_at: Utc::now(),
        }
    }
}

/// An application joined with the posting it targets, for the
/// applicant-facing listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationWithJob {
    #[serde(flatten)]
    pub application: Application,
    #[serde(default)]
    pub job: Option<JobPosting>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_parse() {
        assert_eq!(
            ApplicationStatus::parse("accepted"),
            Some(ApplicationStatus::Accepted)
        );
        assert_eq!(
            ApplicationStatus::parse(" Pending "),
            Some(ApplicationStatus::Pending)
        );
        assert_eq!(ApplicationStatus::parse("archived"), None);
        assert_eq!(ApplicationStatus::parse(""), None);
    }

    #[test]
    fn test_status_serde_wire_format() {
        let json = serde_json::to_string(&ApplicationStatus::Interviewed).unwrap();
        assert_eq!(json, "\"interviewed\"");
    }

    #[test]
    fn test_unique_id_is_deterministic() {
        let a = Application::unique_id("job-1", "acct-1");
        let b = Application::unique_id("job-1", "acct-1");
        assert_eq!(a, b);
        assert_ne!(a, Application::unique_id("job-1", "acct-2"));
        assert_ne!(a, Application::unique_id("job-2", "acct-1"));
    }

    #[test]
    fn test_new_starts_pending() {
        let app = Application::new(
            "job-1",
            "acct-1",
            ApplicationFields {
                name: "Jane".to_string(),
                email: "j@x.com".to_string(),
                ..Default::default()
            },
        );
        assert_eq!(app.status, ApplicationStatus::Pending);
        assert_eq!(app.id, "job-1__acct-1");
        assert_eq!(app.applicant_account_id.as_deref(), Some("acct-1"));
    }

    #[test]
    fn test_anonymous_has_random_id() {
        let fields = ApplicationFields {
            name: "Jane".to_string(),
            email: "j@x.com".to_string(),
            ..Default::default()
        };
        let a = Application::new_anonymous("job-1", fields.clone());
        let b = Application::new_anonymous("job-1", fields);
        assert_ne!(a.id, b.id);
        assert!(a.applicant_account_id.is_none());
    }
}
