//! Top-level views and who may open them.

use core::fmt;

use kiddiebox_core::{User, UserRole};

/// A top-level screen of the storefront.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum View {
    /// Catalog landing page.
    #[default]
    Home,
    /// The signed-in user's purchases.
    Dashboard,
    /// Catalog, user, and settings management.
    AdminConsole,
    /// Chat inbox for tutors.
    TutorConsole,
    /// Affiliate partner console.
    PartnerConsole,
}

/// Who may open a view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// Anyone, signed in or not.
    Anyone,
    /// Any signed-in user.
    SignedIn,
    /// Only users with this role.
    Role(UserRole),
}

impl View {
    /// The view a user lands on after signing in.
    #[must_use]
    pub const fn landing_for(role: UserRole) -> Self {
        match role {
            UserRole::Admin => Self::AdminConsole,
            UserRole::Tutor => Self::TutorConsole,
            UserRole::Partner => Self::PartnerConsole,
            UserRole::Student | UserRole::Guest => Self::Home,
        }
    }

    /// Access rule for this view.
    #[must_use]
    pub const fn access(self) -> Access {
        match self {
            Self::Home => Access::Anyone,
            Self::Dashboard => Access::SignedIn,
            Self::AdminConsole => Access::Role(UserRole::Admin),
            Self::TutorConsole => Access::Role(UserRole::Tutor),
            Self::PartnerConsole => Access::Role(UserRole::Partner),
        }
    }

    /// Whether `user` (or an anonymous visitor) may open this view.
    #[must_use]
    pub fn is_accessible_by(self, user: Option<&User>) -> bool {
        match (self.access(), user) {
            (Access::Anyone, _) => true,
            (Access::SignedIn, user) => user.is_some(),
            (Access::Role(role), Some(user)) => user.has_role(role),
            (Access::Role(_), None) => false,
        }
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Home => "home",
            Self::Dashboard => "dashboard",
            Self::AdminConsole => "admin",
            Self::TutorConsole => "tutor",
            Self::PartnerConsole => "partner",
        })
    }
}
