//! Admin console operations.
//!
//! Every operation requires the Admin role, writes through the
//! repositories, and refreshes the affected mirror.

use tracing::info;

use kiddiebox_core::{AppConfig, Category, Enrollment, Product, ProductId, User, UserId, UserRole};

use super::Storefront;
use crate::db::{
    CategoryRepository, EnrollmentRepository, KeyValueStore, ProductRepository,
    SettingsRepository, UserRepository,
};
use crate::error::{AppError, Result};
use crate::recommend::GenerativeModel;

impl<S, M> Storefront<S, M>
where
    S: KeyValueStore + ?Sized,
    M: GenerativeModel,
{
    /// Create or replace a product.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Forbidden` for non-admins and
    /// `AppError::BadRequest` if the title is blank.
    pub fn save_product(&mut self, product: Product) -> Result<()> {
        self.require_role(UserRole::Admin)?;
        if product.title.trim().is_empty() {
            return Err(AppError::BadRequest("Product title is required.".to_string()));
        }

        let repo = ProductRepository::new(self.store.as_ref());
        repo.save(product)?;
        self.products = repo.list()?;
        Ok(())
    }

    /// Delete a product. Enrollments referencing it are kept.
    ///
    /// Returns `true` if the product existed.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Forbidden` for non-admins.
    pub fn delete_product(&mut self, id: &ProductId) -> Result<bool> {
        self.require_role(UserRole::Admin)?;

        let repo = ProductRepository::new(self.store.as_ref());
        let deleted = repo.delete(id)?;
        self.products = repo.list()?;
        Ok(deleted)
    }

    /// Create or replace a user account.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Forbidden` for non-admins.
    pub fn save_user(&mut self, user: User) -> Result<()> {
        self.require_role(UserRole::Admin)?;

        let repo = UserRepository::new(self.store.as_ref());
        repo.save(user)?;
        self.users = repo.list()?;
        Ok(())
    }

    /// Delete a user account. Their enrollments and messages are kept.
    ///
    /// Returns `true` if the user existed.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Forbidden` for non-admins.
    pub fn delete_user(&mut self, id: &UserId) -> Result<bool> {
        self.require_role(UserRole::Admin)?;

        let repo = UserRepository::new(self.store.as_ref());
        let deleted = repo.delete(id)?;
        self.users = repo.list()?;
        Ok(deleted)
    }

    /// Add a category unless it already exists.
    ///
    /// Returns `true` if the category was added.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Forbidden` for non-admins and
    /// `AppError::BadRequest` if the name is blank.
    pub fn add_category(&mut self, name: &str) -> Result<bool> {
        self.require_role(UserRole::Admin)?;
        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::BadRequest("Category name is required.".to_string()));
        }

        let repo = CategoryRepository::new(self.store.as_ref());
        let added = repo.add(Category::new(name))?;
        self.categories = repo.list()?;
        Ok(added)
    }

    /// Replace the payment and shipping settings.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Forbidden` for non-admins.
    pub fn save_app_config(&mut self, config: AppConfig) -> Result<()> {
        self.require_role(UserRole::Admin)?;

        SettingsRepository::new(self.store.as_ref()).save(&config)?;
        info!(
            payment_enabled = config.payment.enabled,
            shipping_enabled = config.shipping.enabled,
            "Settings updated"
        );
        self.app_config = config;
        Ok(())
    }

    /// Every user account.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Forbidden` for non-admins.
    pub fn all_users(&self) -> Result<&[User]> {
        self.require_role(UserRole::Admin)?;
        Ok(&self.users)
    }

    /// Every enrollment in the store.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Forbidden` for non-admins.
    pub fn all_enrollments(&self) -> Result<Vec<Enrollment>> {
        self.require_role(UserRole::Admin)?;
        Ok(EnrollmentRepository::new(self.store.as_ref()).list()?)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use kiddiebox_core::Price;

    use super::*;
    use crate::app::tests::storefront;

    #[test]
    fn test_admin_actions_forbidden_for_students() {
        let mut app = storefront();
        app.login("user1", "321321").unwrap();

        assert!(matches!(
            app.delete_product(&ProductId::new("c1")),
            Err(AppError::Forbidden(_))
        ));
        assert!(matches!(app.add_category("Music"), Err(AppError::Forbidden(_))));
        assert!(matches!(app.all_enrollments(), Err(AppError::Forbidden(_))));
        assert!(matches!(app.all_users(), Err(AppError::Forbidden(_))));
        assert_eq!(app.products().len(), 6);
    }

    #[test]
    fn test_admin_actions_need_login() {
        let mut app = storefront();
        assert!(matches!(
            app.save_app_config(AppConfig::default()),
            Err(AppError::Unauthorized(_))
        ));
    }

    #[test]
    fn test_save_and_delete_product() {
        let mut app = storefront();
        app.login("admin@login", "Admin@9235").unwrap();

        let mut product = app.product(&ProductId::new("c2")).unwrap().clone();
        product.discount_price = Some(Price::from_cents(4999));
        app.save_product(product).unwrap();
        assert_eq!(
            app.product(&ProductId::new("c2")).unwrap().effective_price(),
            Price::from_cents(4999)
        );
        assert_eq!(app.products().len(), 6);

        assert!(app.delete_product(&ProductId::new("c2")).unwrap());
        assert!(app.product(&ProductId::new("c2")).is_none());
        assert!(!app.delete_product(&ProductId::new("c2")).unwrap());
    }

    #[test]
    fn test_save_product_requires_title() {
        let mut app = storefront();
        app.login("admin@login", "Admin@9235").unwrap();

        let mut product = app.products()[0].clone();
        product.title = "  ".to_string();
        assert!(matches!(app.save_product(product), Err(AppError::BadRequest(_))));
    }

    #[test]
    fn test_add_category_once() {
        let mut app = storefront();
        app.login("admin@login", "Admin@9235").unwrap();

        assert!(app.add_category(" Music ").unwrap());
        assert!(!app.add_category("Music").unwrap());
        assert_eq!(
            app.categories().iter().filter(|c| c.as_str() == "Music").count(),
            1
        );
    }

    #[test]
    fn test_manage_users() {
        let mut app = storefront();
        app.login("admin@login", "Admin@9235").unwrap();

        let mut partner = app
            .users()
            .iter()
            .find(|u| u.role == UserRole::Partner)
            .unwrap()
            .clone();
        partner.role = UserRole::Tutor;
        app.save_user(partner.clone()).unwrap();
        assert_eq!(
            app.users().iter().filter(|u| u.role == UserRole::Tutor).count(),
            2
        );

        assert!(app.delete_user(&partner.id).unwrap());
        assert_eq!(app.users().len(), 3);
    }

    #[test]
    fn test_save_app_config() {
        let mut app = storefront();
        app.login("admin@login", "Admin@9235").unwrap();

        let mut config = app.app_config().clone();
        config.payment.enabled = true;
        config.payment.provider = "Stripe".to_string();
        app.save_app_config(config).unwrap();
        app.reload().unwrap();

        assert!(app.app_config().payment.enabled);
        assert_eq!(app.app_config().payment.provider, "Stripe");
    }
}
