//! Account roles.
//!
//! The role set is closed: accounts are either employers (post jobs, review
//! applications) or jobseekers (browse and apply). Roles are resolved once at
//! the authentication boundary and carried through request context as this
//! enum, never as loose strings.

use serde::{Deserialize, Serialize};

/// A registered account's role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Employer,
    Jobseeker,
}

impl Role {
    /// All roles, in seed order.
    pub const ALL: [Role; 2] = [Role::Employer, Role::Jobseeker];

    /// Canonical role name (wire format).
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Employer => "employer",
            Role::Jobseeker => "jobseeker",
        }
    }

    /// Stable role identifier, kept distinct from the name so stored
    /// references survive a display rename.
    pub fn id(&self) -> &'static str {
        match self {
            Role::Employer => "role_employer",
            Role::Jobseeker => "role_jobseeker",
        }
    }

    /// Human-readable name for UI and error messages.
    pub fn display_name(&self) -> &'static str {
        match self {
            Role::Employer => "Employer",
            Role::Jobseeker => "Job Seeker",
        }
    }

    /// Resolve a role from its name or id, case-insensitively.
    ///
    /// Accepts both forms because clients may send either the canonical name
    /// ("employer") or the stored reference ("role_employer").
    pub fn resolve(s: &str) -> Option<Role> {
        let s = s.trim().to_lowercase();
        Role::ALL
            .into_iter()
            .find(|r| r.as_str() == s || r.id() == s)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
