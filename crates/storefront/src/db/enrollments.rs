//! Enrollment (purchase) repository.

use chrono::Utc;
use tracing::instrument;

use kiddiebox_core::{Enrollment, EnrollmentId, Price, ProductId, UserId};

use super::{Collection, KeyValueStore, StorageError, keys};

/// Repository for enrollments.
pub struct EnrollmentRepository<'a, S: ?Sized> {
    enrollments: Collection<'a, S, Enrollment>,
}

impl<'a, S: KeyValueStore + ?Sized> EnrollmentRepository<'a, S> {
    /// Create a new enrollment repository.
    #[must_use]
    pub const fn new(store: &'a S) -> Self {
        Self {
            enrollments: Collection::new(store, keys::ENROLLMENTS),
        }
    }

    /// Record one purchase transaction.
    ///
    /// Creates one enrollment per product ID, all sharing one timestamp and
    /// each priced at `total / product_ids.len()`. The even split ignores
    /// per-item prices. An empty product list records nothing.
    ///
    /// The returned records are the ones read back from storage.
    ///
    /// # Errors
    ///
    /// Returns an error if the collection cannot be read or written.
    #[instrument(skip(self, product_ids), fields(user_id = %user_id, items = product_ids.len(), total = %total))]
    pub fn enroll(
        &self,
        user_id: &UserId,
        product_ids: &[ProductId],
        total: Price,
    ) -> Result<Vec<Enrollment>, StorageError> {
        let Some(share) = total.split_evenly(product_ids.len()) else {
            return Ok(Vec::new());
        };
        let purchase_date = Utc::now();

        let created: Vec<Enrollment> = product_ids
            .iter()
            .map(|product_id| Enrollment {
                id: EnrollmentId::generate(),
                user_id: user_id.clone(),
                product_id: product_id.clone(),
                purchase_date,
                price_paid: share,
            })
            .collect();

        let count = created.len();
        self.enrollments.extend(created)?;
        tracing::info!(count, "Recorded enrollments");

        // Return the stored form: prices are persisted as JSON numbers, so an
        // uneven split reads back at that precision.
        let mut stored = self.list()?;
        Ok(stored.split_off(stored.len().saturating_sub(count)))
    }

    /// List every enrollment.
    ///
    /// # Errors
    ///
    /// Returns an error if the collection cannot be read.
    pub fn list(&self) -> Result<Vec<Enrollment>, StorageError> {
        self.enrollments.read()
    }

    /// List a user's enrollments in purchase order.
    ///
    /// # Errors
    ///
    /// Returns an error if the collection cannot be read.
    pub fn for_user(&self, user_id: &UserId) -> Result<Vec<Enrollment>, StorageError> {
        Ok(self
            .list()?
            .into_iter()
            .filter(|e| &e.user_id == user_id)
            .collect())
    }
}
