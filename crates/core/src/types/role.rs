//! Account roles and product kinds.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

/// Error returned when parsing a [`UserRole`] from an unknown string.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown role '{0}' (expected guest, student, admin, tutor, or partner)")]
pub struct RoleParseError(pub String);

/// Account role. Determines which views and actions a user may reach.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    /// Not signed in, or an account with browse-only access.
    Guest,
    /// Regular customer. New signups get this role.
    #[default]
    Student,
    /// Full access to the admin console.
    Admin,
    /// Answers chat messages from the tutor console.
    Tutor,
    /// Affiliate partner with access to the partner console.
    Partner,
}

impl UserRole {
    /// All roles, in display order.
    pub const ALL: [Self; 5] = [
        Self::Guest,
        Self::Student,
        Self::Admin,
        Self::Tutor,
        Self::Partner,
    ];

    /// The persisted string form of this role.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Guest => "guest",
            Self::Student => "student",
            Self::Admin => "admin",
            Self::Tutor => "tutor",
            Self::Partner => "partner",
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserRole {
    type Err = RoleParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|role| role.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| RoleParseError(s.to_owned()))
    }
}

/// Kind of product sold in the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProductType {
    /// A video course with an optional syllabus.
    #[serde(rename = "Course")]
    Course,
    /// A downloadable workbook, e-book, or similar file.
    #[serde(rename = "Digital Product")]
    Digital,
}

impl fmt::Display for ProductType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Course => f.write_str("Course"),
            Self::Digital => f.write_str("Digital Product"),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_role_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&UserRole::Admin).unwrap(), "\"admin\"");
        let role: UserRole = serde_json::from_str("\"partner\"").unwrap();
        assert_eq!(role, UserRole::Partner);
    }

    #[test]
    fn test_role_from_str() {
        assert_eq!("Tutor".parse::<UserRole>().unwrap(), UserRole::Tutor);
        assert!(matches!(
            "superuser".parse::<UserRole>(),
            Err(RoleParseError(_))
        ));
    }

    #[test]
    fn test_product_type_serde() {
        assert_eq!(
            serde_json::to_string(&ProductType::Digital).unwrap(),
            "\"Digital Product\""
        );
        let kind: ProductType = serde_json::from_str("\"Course\"").unwrap();
        assert_eq!(kind, ProductType::Course);
    }
}
