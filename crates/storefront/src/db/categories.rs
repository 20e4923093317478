//! Category list repository.

use tracing::instrument;

use kiddiebox_core::Category;

use super::seed::default_categories;
use super::{KeyValueStore, StorageError, keys, read_json, write_json};

/// Repository for the category list.
pub struct CategoryRepository<'a, S: ?Sized> {
    store: &'a S,
}

impl<'a, S: KeyValueStore + ?Sized> CategoryRepository<'a, S> {
    /// Create a new category repository.
    #[must_use]
    pub const fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// List categories, falling back to the defaults if none are stored.
    ///
    /// # Errors
    ///
    /// Returns an error if the stored list cannot be read or decoded.
    pub fn list(&self) -> Result<Vec<Category>, StorageError> {
        Ok(read_json(self.store, keys::CATEGORIES)?.unwrap_or_else(default_categories))
    }

    /// Append a category unless it is already present.
    ///
    /// Returns `true` if the category was added. Categories are never
    /// removed or checked against products.
    ///
    /// # Errors
    ///
    /// Returns an error if the list cannot be read or written.
    #[instrument(skip(self), fields(category = %category))]
    pub fn add(&self, category: Category) -> Result<bool, StorageError> {
        let mut categories = self.list()?;
        if categories.contains(&category) {
            return Ok(false);
        }
        categories.push(category);
        write_json(self.store, keys::CATEGORIES, &categories)?;
        Ok(true)
    }
}
