//! Local persistence for the storefront.
//!
//! # Storage: key-value collections
//!
//! Every collection is a single JSON document stored under a fixed key:
//!
//! - `kb_users` - Accounts (seeded with one user per staff role plus a student)
//! - `kb_products` - Catalog (seeded with six starter products)
//! - `kb_enrollments` - Purchases (seeded empty)
//! - `kb_current_user` - Session snapshot of the signed-in user
//! - `kb_app_config` - Payment and shipping settings (seeded with defaults)
//! - `kb_categories` - Category names (seeded with defaults)
//! - `kb_chat_messages` - Chat log (never seeded, read as empty)
//!
//! Every mutation rewrites the whole collection. There are no transactions
//! and no locking across writers: the store assumes a single actor.

pub mod categories;
pub mod chat;
pub mod collection;
pub mod enrollments;
pub mod products;
pub mod seed;
pub mod session;
pub mod settings;
pub mod store;
pub mod users;

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

pub use categories::CategoryRepository;
pub use chat::ChatRepository;
pub use collection::{Collection, Record};
pub use enrollments::EnrollmentRepository;
pub use products::ProductRepository;
pub use seed::{SeedReport, init_db};
pub use session::SessionRepository;
pub use settings::SettingsRepository;
pub use store::{FileStore, MemoryStore};
pub use users::UserRepository;

/// Fixed storage keys, one per collection.
pub mod keys {
    pub const USERS: &str = "kb_users";
    pub const PRODUCTS: &str = "kb_products";
    pub const ENROLLMENTS: &str = "kb_enrollments";
    pub const CURRENT_USER: &str = "kb_current_user";
    pub const CONFIG: &str = "kb_app_config";
    pub const CATEGORIES: &str = "kb_categories";
    pub const CHAT: &str = "kb_chat_messages";

    /// All keys, in seeding order.
    pub const ALL: [&str; 7] = [
        PRODUCTS,
        USERS,
        ENROLLMENTS,
        CATEGORIES,
        CONFIG,
        CHAT,
        CURRENT_USER,
    ];
}

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Reading or writing the backing medium failed.
    #[error("I/O error for '{key}': {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },

    /// A record could not be encoded as JSON.
    #[error("failed to serialize '{key}': {source}")]
    Serialization {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    /// The stored JSON does not match the expected record shape.
    #[error("stored value for '{key}' has an unexpected shape: {source}")]
    Deserialization {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    /// A lock guarding an in-memory store was poisoned by a panicking writer.
    #[error("storage lock poisoned")]
    Poisoned,
}

/// A synchronous string key-value store.
///
/// Values are opaque strings; the typed layers above encode them as JSON.
pub trait KeyValueStore: Send + Sync {
    /// Get the value stored under `key`, or `None` if the key is absent.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Io` if the backing medium cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Io` if the backing medium cannot be written.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove `key`. Removing an absent key is not an error.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Io` if the backing medium cannot be written.
    fn remove(&self, key: &str) -> Result<(), StorageError>;

    /// Whether a value is stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Io` if the backing medium cannot be read.
    fn contains(&self, key: &str) -> Result<bool, StorageError> {
        Ok(self.get(key)?.is_some())
    }
}

/// Read and decode the JSON document stored under `key`.
///
/// # Errors
///
/// Returns `StorageError::Deserialization` if the stored value does not
/// decode as `T`.
pub fn read_json<S, T>(store: &S, key: &str) -> Result<Option<T>, StorageError>
where
    S: KeyValueStore + ?Sized,
    T: DeserializeOwned,
{
    store
        .get(key)?
        .map(|raw| {
            serde_json::from_str(&raw).map_err(|source| StorageError::Deserialization {
                key: key.to_string(),
                source,
            })
        })
        .transpose()
}

/// Encode `value` as JSON and store it under `key`.
///
/// # Errors
///
/// Returns `StorageError::Serialization` if encoding fails, or the store's
/// write error.
pub fn write_json<S, T>(store: &S, key: &str, value: &T) -> Result<(), StorageError>
where
    S: KeyValueStore + ?Sized,
    T: Serialize + ?Sized,
{
    let raw = serde_json::to_string(value).map_err(|source| StorageError::Serialization {
        key: key.to_string(),
        source,
    })?;
    store.set(key, &raw)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_read_json_absent_key() {
        let store = MemoryStore::new();
        let value: Option<Vec<String>> = read_json(&store, keys::CATEGORIES).unwrap();
        assert!(value.is_none());
    }

    #[test]
    fn test_read_json_malformed_value() {
        let store = MemoryStore::new();
        store.set(keys::CATEGORIES, "{not json").unwrap();

        let result: Result<Option<Vec<String>>, _> = read_json(&store, keys::CATEGORIES);
        assert!(matches!(
            result,
            Err(StorageError::Deserialization { ref key, .. }) if key == keys::CATEGORIES
        ));
    }

    #[test]
    fn test_write_then_read_json() {
        let store = MemoryStore::new();
        write_json(&store, keys::CATEGORIES, &["Languages"]).unwrap();

        let value: Option<Vec<String>> = read_json(&store, keys::CATEGORIES).unwrap();
        assert_eq!(value, Some(vec!["Languages".to_string()]));
    }
}
