//! Current-session snapshot.
//!
//! The session is a copy of the signed-in user taken at login. It is not
//! linked to the users collection, so later edits to the account do not
//! show up here until the next login.

use kiddiebox_core::User;

use super::{KeyValueStore, StorageError, keys, read_json, write_json};

/// Repository for the session snapshot.
pub struct SessionRepository<'a, S: ?Sized> {
    store: &'a S,
}

impl<'a, S: KeyValueStore + ?Sized> SessionRepository<'a, S> {
    /// Create a new session repository.
    #[must_use]
    pub const fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// The stored session user, if any.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Deserialization` if the snapshot is malformed.
    pub fn get(&self) -> Result<Option<User>, StorageError> {
        read_json(self.store, keys::CURRENT_USER)
    }

    /// Store `user` as the current session.
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot cannot be written.
    pub fn set(&self, user: &User) -> Result<(), StorageError> {
        write_json(self.store, keys::CURRENT_USER, user)
    }

    /// Remove the session.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be written.
    pub fn clear(&self) -> Result<(), StorageError> {
        self.store.remove(keys::CURRENT_USER)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use kiddiebox_core::{UserId, UserRole};

    use super::*;
    use crate::db::{MemoryStore, UserRepository};

    #[test]
    fn test_session_lifecycle() {
        let store = MemoryStore::new();
        let session = SessionRepository::new(&store);
        assert!(session.get().unwrap().is_none());

        let user = User {
            id: UserId::new("tutor1"),
            name: "Pro Tutor".to_string(),
            email: "tutor@login".to_string(),
            role: UserRole::Tutor,
            password: None,
            avatar: None,
        };
        session.set(&user).unwrap();
        assert_eq!(session.get().unwrap(), Some(user));

        session.clear().unwrap();
        assert!(session.get().unwrap().is_none());
    }

    #[test]
    fn test_session_drifts_from_user_record() {
        let store = MemoryStore::new();
        let users = UserRepository::new(&store);
        let session = SessionRepository::new(&store);

        let mut user = users.register("Eve", "eve@example.com", None).unwrap();
        session.set(&user).unwrap();

        user.name = "Eve Renamed".to_string();
        users.save(user).unwrap();

        assert_eq!(session.get().unwrap().unwrap().name, "Eve");
    }
}
