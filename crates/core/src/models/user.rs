//! User accounts.

use core::fmt;

use serde::{Deserialize, Serialize};

use crate::types::{UserId, UserRole};

/// A storefront account.
///
/// Passwords are stored and compared in plaintext. This is a placeholder
/// for a demo system and must not be used with real credentials.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Unique user ID.
    pub id: UserId,
    /// Display name.
    pub name: String,
    /// Login identifier. Intended to be unique, but not enforced atomically.
    pub email: String,
    pub role: UserRole,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    /// Avatar image URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

impl User {
    /// Exact, case-sensitive comparison against the stored password.
    ///
    /// Accounts without a password never match.
    #[must_use]
    pub fn password_matches(&self, candidate: &str) -> bool {
        self.password.as_deref() == Some(candidate)
    }

    /// Whether this user has the given role.
    #[must_use]
    pub fn has_role(&self, role: UserRole) -> bool {
        self.role == role
    }
}

impl fmt::Debug for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("email", &self.email)
            .field("role", &self.role)
            .field("password", &self.password.as_ref().map(|_| "[REDACTED]"))
            .field("avatar", &self.avatar)
            .finish()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn user(password: Option<&str>) -> User {
        User {
            id: UserId::new("user1"),
            name: "Sample User".to_string(),
            email: "user1".to_string(),
            role: UserRole::Student,
            password: password.map(String::from),
            avatar: None,
        }
    }

    #[test]
    fn test_password_matches_exactly() {
        let u = user(Some("321321"));
        assert!(u.password_matches("321321"));
        assert!(!u.password_matches("321321 "));
        assert!(!user(None).password_matches(""));
    }

    #[test]
    fn test_debug_redacts_password() {
        let debug = format!("{:?}", user(Some("Admin@9235")));
        assert!(!debug.contains("Admin@9235"));
        assert!(debug.contains("[REDACTED]"));
    }

    #[test]
    fn test_json_omits_missing_optionals() {
        let json = serde_json::to_string(&user(None)).unwrap();
        assert!(!json.contains("password"));
        assert!(json.contains("\"role\":\"student\""));
    }
}
