//! Application settings repository.

use tracing::instrument;

use kiddiebox_core::AppConfig;

use super::{KeyValueStore, StorageError, keys, read_json, write_json};

/// Repository for the payment and shipping settings.
pub struct SettingsRepository<'a, S: ?Sized> {
    store: &'a S,
}

impl<'a, S: KeyValueStore + ?Sized> SettingsRepository<'a, S> {
    /// Create a new settings repository.
    #[must_use]
    pub const fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Get the settings, or the defaults if none are stored.
    ///
    /// # Errors
    ///
    /// Returns an error if the stored settings cannot be read or decoded.
    pub fn get(&self) -> Result<AppConfig, StorageError> {
        Ok(read_json(self.store, keys::CONFIG)?.unwrap_or_default())
    }

    /// Replace the settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the settings cannot be written.
    #[instrument(skip_all, fields(payment = config.payment.enabled, shipping = config.shipping.enabled))]
    pub fn save(&self, config: &AppConfig) -> Result<(), StorageError> {
        write_json(self.store, keys::CONFIG, config)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::db::MemoryStore;

    #[test]
    fn test_defaults_when_absent() {
        let store = MemoryStore::new();
        let repo = SettingsRepository::new(&store);
        assert_eq!(repo.get().unwrap(), AppConfig::default());
    }

    #[test]
    fn test_save_replaces_whole_record() {
        let store = MemoryStore::new();
        let repo = SettingsRepository::new(&store);

        let mut config = AppConfig::default();
        config.payment.enabled = true;
        config.payment.provider = "Razorpay".to_string();
        repo.save(&config).unwrap();

        assert_eq!(repo.get().unwrap(), config);
    }
}
