//! Product catalog repository.

use tracing::instrument;

use kiddiebox_core::{Product, ProductId};

use super::{Collection, KeyValueStore, StorageError, keys};

/// Repository for catalog products.
pub struct ProductRepository<'a, S: ?Sized> {
    products: Collection<'a, S, Product>,
}

impl<'a, S: KeyValueStore + ?Sized> ProductRepository<'a, S> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(store: &'a S) -> Self {
        Self {
            products: Collection::new(store, keys::PRODUCTS),
        }
    }

    /// List all products in stored order.
    ///
    /// # Errors
    ///
    /// Returns an error if the collection cannot be read.
    pub fn list(&self) -> Result<Vec<Product>, StorageError> {
        self.products.read()
    }

    /// Get a product by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the collection cannot be read.
    pub fn get(&self, id: &ProductId) -> Result<Option<Product>, StorageError> {
        self.products.find(id)
    }

    /// Insert a new product or replace the one with the same ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the collection cannot be read or written.
    #[instrument(skip(self, product), fields(product_id = %product.id))]
    pub fn save(&self, product: Product) -> Result<(), StorageError> {
        let replaced = self.products.upsert(product)?;
        tracing::debug!(replaced, "Saved product");
        Ok(())
    }

    /// Delete a product. Enrollments and cart lines referencing it are left as-is.
    ///
    /// Returns `true` if the product existed.
    ///
    /// # Errors
    ///
    /// Returns an error if the collection cannot be read or written.
    #[instrument(skip(self), fields(product_id = %id))]
    pub fn delete(&self, id: &ProductId) -> Result<bool, StorageError> {
        self.products.delete_by_id(id)
    }
}
