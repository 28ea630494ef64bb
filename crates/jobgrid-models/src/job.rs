//! Job posting records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An employer-owned job posting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobPosting {
    /// Unique posting identifier (UUID v4).
    pub id: String,
    /// Account that created the posting. Only this account may edit,
    /// delete, or review applications for it.
    pub owner_account_id: String,
    pub title: String,
    pub company_name: String,
    pub location: String,
    pub description: String,
    #[serde(default)]
    pub salary_range: Option<String>,
    #[serde(default)]
    pub required_skills: Vec<String>,
    /// Inactive postings are hidden from the public listing but remain
    /// visible to their owner.
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl JobPosting {
    /// Create a new posting owned by `owner_account_id`.
    pub fn new(owner_account_id: impl Into<String>, fields: JobPostingUpdate) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            owner_account_id: owner_account_id.into(),
            title: fields.title.unwrap_or_default(),
            company_name: fields.company_name.unwrap_or_default(),
            location: fields.location.unwrap_or_default(),
            description: fields.description.unwrap_or_default(),
            salary_range: fields.salary_range,
            required_skills: fields.required_skills.unwrap_or_default(),
            is_active: fields.is_active.unwrap_or(true),
            created_at: Utc::now(),
        }
    }

}

/// Partial job posting fields for create and update requests.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JobPostingUpdate {
    pub title: Option<String>,
    pub company_name: Option<String>,
    pub location: Option<String>,
    pub description: Option<String>,
    pub salary_range: Option<String>,
    pub required_skills: Option<Vec<String>>,
    pub is_active: Option<bool>,
}

impl JobPostingUpdate {
    /// Field paths set on this update, used for merge writes so untouched
    /// fields are left intact in the store.
    pub fn field_paths(&self) -> Vec<String> {
        let mut paths = Vec::new();
        if self.title.is_some() {
            paths.push("title".to_string());
        }
        if self.company_name.is_some() {
            paths.push("company_name".to_string());
        }
        if self.location.is_some() {
            paths.push("location".to_string());
        }
        if self.description.is_some() {
            paths.push("description".to_string());
        }
        if self.salary_range.is_some() {
            paths.push("salary_range".to_string());
        }
        if self.required_skills.is_some() {
            paths.push("required_skills".to_string());
        }
        if self.is_active.is_some() {
            paths.push("is_active".to_string());
        }
        paths
    }

    pub fn is_empty(&self) -> bool {
        self.field_paths().is_empty()
    }
}

/// Owner-scoped posting view with its application count.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OwnedJobPosting {
    #[serde(flatten)]
    pub posting: JobPosting,
    pub applications_count: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields() -> JobPostingUpdate {
        JobPostingUpdate {
            title: Some("Backend Engineer".to_string()),
            company_name: Some("Acme".to_string()),
            location: Some("Berlin".to_string()),
            description: Some("Build APIs".to_string()),
            salary_range: Some("60k-80k".to_string()),
            required_skills: Some(vec!["rust".to_string()]),
            is_active: None,
        }
    }

    #[test]
    fn test_new_defaults_active() {
        let job = JobPosting::new("owner-1", fields());
        assert!(job.is_active);
        assert_eq!(job.owner_account_id, "owner-1");
        assert_eq!(job.title, "Backend Engineer");
    }

    #[test]
    fn test_field_paths_tracks_present_fields() {
        let update = JobPostingUpdate {
            title: Some("x".to_string()),
            is_active: Some(true),
            ..Default::default()
        };
        let paths = update.field_paths();
        assert_eq!(paths, vec!["title".to_string(), "is_active".to_string()]);
        assert!(JobPostingUpdate::default().is_empty());
    }
}
