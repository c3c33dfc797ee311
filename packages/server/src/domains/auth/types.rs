//! Auth domain data types
//!
//! Serializable types shared between actions and the HTTP surface.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Role of an authenticable principal. Fixed at creation; re-requesting an
/// OTP never changes an existing identity's role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, Default)]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    Candidate,
    Employer,
    Admin,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Candidate => "candidate",
            Role::Employer => "employer",
            Role::Admin => "admin",
        }
    }
}

/// Identity fields exposed to clients after authentication.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub id: Uuid,
    pub mobile: String,
    pub role: Role,
    pub is_verified: bool,
}

/// Client navigation hint derived from role and profile completion.
///
/// UX only - never an authorization decision. Admins skip profile setup
/// entirely.
pub fn redirect_hint(role: Role, profile_completed: bool) -> &'static str {
    match (role, profile_completed) {
        (Role::Admin, _) => "/admin/dashboard",
        (Role::Candidate, false) => "/candidate/profile-setup",
        (Role::Candidate, true) => "/candidate/dashboard",
        (Role::Employer, false) => "/employer/profile-setup",
        (Role::Employer, true) => "/employer/dashboard",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redirect_hint_table() {
        assert_eq!(
            redirect_hint(Role::Candidate, false),
            "/candidate/profile-setup"
        );
        assert_eq!(redirect_hint(Role::Candidate, true), "/candidate/dashboard");
        assert_eq!(
            redirect_hint(Role::Employer, false),
            "/employer/profile-setup"
        );
        assert_eq!(redirect_hint(Role::Employer, true), "/employer/dashboard");
        // Admin ignores profile completion
        assert_eq!(redirect_hint(Role::Admin, false), "/admin/dashboard");
        assert_eq!(redirect_hint(Role::Admin, true), "/admin/dashboard");
    }

    #[test]
    fn test_role_serde_lowercase() {
        assert_eq!(serde_json::to_string(&Role::Employer).unwrap(), "\"employer\"");
        let role: Role = serde_json::from_str("\"candidate\"").unwrap();
        assert_eq!(role, Role::Candidate);
    }

    #[test]
    fn test_role_defaults_to_candidate() {
        assert_eq!(Role::default(), Role::Candidate);
    }

    #[test]
    fn test_user_summary_camel_case() {
        let summary = UserSummary {
            id: Uuid::new_v4(),
            mobile: "9999999999".to_string(),
            role: Role::Candidate,
            is_verified: true,
        };
        let json = serde_json::to_value(&summary).unwrap();
        assert!(json.get("isVerified").is_some());
        assert!(json.get("is_verified").is_none());
    }
}
