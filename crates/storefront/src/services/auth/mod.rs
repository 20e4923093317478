//! Authentication service.
//!
//! Email and password login against the users collection, signup, and the
//! session snapshot that remembers who is signed in.

mod error;

pub use error::AuthError;

use tracing::{info, instrument, warn};

use kiddiebox_core::User;

use crate::db::{KeyValueStore, SessionRepository, UserRepository};

/// Authentication service.
pub struct AuthService<'a, S: ?Sized> {
    users: UserRepository<'a, S>,
    session: SessionRepository<'a, S>,
}

impl<'a, S: KeyValueStore + ?Sized> AuthService<'a, S> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(store: &'a S) -> Self {
        Self {
            users: UserRepository::new(store),
            session: SessionRepository::new(store),
        }
    }

    /// Login with email and password.
    ///
    /// Both must match a stored account exactly (case-sensitive). On success
    /// the user becomes the current session. On failure the existing session
    /// is left untouched.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` if no account matches.
    #[instrument(skip(self, password))]
    pub fn login(&self, email: &str, password: &str) -> Result<User, AuthError> {
        let Some(user) = self
            .users
            .list()?
            .into_iter()
            .find(|u| u.email == email && u.password_matches(password))
        else {
            warn!("Login failed");
            return Err(AuthError::InvalidCredentials);
        };

        self.session.set(&user)?;
        info!(user_id = %user.id, role = %user.role, "User logged in");
        Ok(user)
    }

    /// Register a student account and sign it in.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::UserAlreadyExists` if the email is already
    /// registered.
    #[instrument(skip(self, password))]
    pub fn signup(
        &self,
        name: &str,
        email: &str,
        password: Option<&str>,
    ) -> Result<User, AuthError> {
        if self.users.find_by_email(email)?.is_some() {
            warn!("Signup rejected: email already registered");
            return Err(AuthError::UserAlreadyExists);
        }

        let user = self.users.register(name, email, password)?;
        self.session.set(&user)?;
        Ok(user)
    }

    /// The user restored from the session snapshot, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot cannot be read.
    pub fn current_user(&self) -> Result<Option<User>, AuthError> {
        Ok(self.session.get()?)
    }

    /// Clear the session.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be written.
    pub fn logout(&self) -> Result<(), AuthError> {
        self.session.clear()?;
        info!("User logged out");
        Ok(())
    }
}
