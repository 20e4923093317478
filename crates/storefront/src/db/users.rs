//! User account repository.

use tracing::instrument;

use kiddiebox_core::{User, UserId, UserRole};

use super::{Collection, KeyValueStore, StorageError, keys};

/// Password assigned at signup when none is supplied.
pub const DEFAULT_PASSWORD: &str = "123456";

/// Repository for user accounts.
pub struct UserRepository<'a, S: ?Sized> {
    users: Collection<'a, S, User>,
}

impl<'a, S: KeyValueStore + ?Sized> UserRepository<'a, S> {
    /// Create a new user repository.
    #[must_use]
    pub const fn new(store: &'a S) -> Self {
        Self {
            users: Collection::new(store, keys::USERS),
        }
    }

    /// List all users.
    ///
    /// # Errors
    ///
    /// Returns an error if the collection cannot be read.
    pub fn list(&self) -> Result<Vec<User>, StorageError> {
        self.users.read()
    }

    /// Get a user by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the collection cannot be read.
    pub fn get(&self, id: &UserId) -> Result<Option<User>, StorageError> {
        self.users.find(id)
    }

    /// Find the first user with exactly this email (case-sensitive).
    ///
    /// # Errors
    ///
    /// Returns an error if the collection cannot be read.
    pub fn find_by_email(&self, email: &str) -> Result<Option<User>, StorageError> {
        Ok(self.list()?.into_iter().find(|u| u.email == email))
    }

    /// Insert a new user or replace the one with the same ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the collection cannot be read or written.
    #[instrument(skip(self, user), fields(user_id = %user.id))]
    pub fn save(&self, user: User) -> Result<(), StorageError> {
        self.users.upsert(user).map(drop)
    }

    /// Create a student account and append it to the collection.
    ///
    /// Does not check for an existing email; callers decide whether a
    /// duplicate is acceptable. An empty or missing password falls back to
    /// [`DEFAULT_PASSWORD`].
    ///
    /// # Errors
    ///
    /// Returns an error if the collection cannot be read or written.
    #[instrument(skip(self, password))]
    pub fn register(
        &self,
        name: &str,
        email: &str,
        password: Option<&str>,
    ) -> Result<User, StorageError> {
        let password = password
            .filter(|p| !p.is_empty())
            .unwrap_or(DEFAULT_PASSWORD);

        let user = User {
            id: UserId::generate(),
            name: name.to_string(),
            email: email.to_string(),
            role: UserRole::Student,
            password: Some(password.to_string()),
            avatar: Some(avatar_url(name)),
        };

        self.users.append(user.clone())?;
        tracing::info!(user_id = %user.id, "Registered user");
        Ok(user)
    }

    /// Delete a user. Their enrollments and chat messages are left as-is.
    ///
    /// Returns `true` if the user existed.
    ///
    /// # Errors
    ///
    /// Returns an error if the collection cannot be read or written.
    #[instrument(skip(self), fields(user_id = %id))]
    pub fn delete(&self, id: &UserId) -> Result<bool, StorageError> {
        self.users.delete_by_id(id)
    }
}

/// Characters URI components keep unescaped besides `A-Z a-z 0-9 - _ . ~`.
const URI_COMPONENT_MARKS: [(&str, &str); 5] =
    [("%21", "!"), ("%27", "'"), ("%28", "("), ("%29", ")"), ("%2A", "*")];

/// Generated initials avatar for a display name.
fn avatar_url(name: &str) -> String {
    format!(
        "https://ui-avatars.com/api/?name={}&background=random",
        encode_uri_component(name)
    )
}

/// Percent-encode `value` as a URI component: like `urlencoding::encode`,
/// but leaving `! ' ( ) *` as-is.
fn encode_uri_component(value: &str) -> String {
    URI_COMPONENT_MARKS
        .iter()
        .fold(urlencoding::encode(value).into_owned(), |encoded, (escaped, mark)| {
            encoded.replace(escaped, mark)
        })
}
