//! Application controller.
//!
//! [`Storefront`] owns the in-memory mirrors of the persisted collections,
//! the session, the cart, and the active view. Every mutation goes through
//! the repositories first and then refreshes the affected mirror.

mod admin;
mod cart;
mod catalog;
mod chat;
mod view;

use std::sync::Arc;
use std::time::Duration;

use tracing::{info, instrument, warn};

use kiddiebox_core::{
    AppConfig, CartItem, CartLineId, Category, ChatMessage, Enrollment, Price, Product, ProductId,
    User, UserRole,
};

use crate::db::{
    CategoryRepository, EnrollmentRepository, KeyValueStore, ProductRepository,
    SettingsRepository, UserRepository, init_db,
};
use crate::error::{AppError, Result, add_breadcrumb, clear_sentry_user, set_sentry_user};
use crate::recommend::{GeminiClient, GenerativeModel, RecommendationClient};
use crate::services::auth::AuthService;
use crate::services::chat::DEFAULT_POLL_INTERVAL;

pub use cart::Cart;
pub use catalog::filter_products;
pub use view::{Access, View};

/// A recommendation resolved against the catalog.
#[derive(Debug, Clone, PartialEq)]
pub struct Recommended {
    /// Message for the parent.
    pub message: String,
    /// Recommended products that exist in the catalog, in the model's order.
    pub products: Vec<Product>,
}

/// The storefront application state.
pub struct Storefront<S: ?Sized, M = GeminiClient> {
    store: Arc<S>,
    recommender: RecommendationClient<M>,
    chat_poll_interval: Duration,

    products: Vec<Product>,
    categories: Vec<Category>,
    users: Vec<User>,
    app_config: AppConfig,
    chat_messages: Vec<ChatMessage>,

    current_user: Option<User>,
    cart: Cart,
    view: View,
    chat_open: bool,
}

impl<S, M> Storefront<S, M>
where
    S: KeyValueStore + ?Sized,
    M: GenerativeModel,
{
    /// Open the storefront on `store`.
    ///
    /// Seeds missing collections, loads the mirrors, and restores the
    /// session: a signed-in user lands on their role's view.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Storage` if seeding or loading fails.
    #[instrument(skip_all)]
    pub fn new(store: Arc<S>, recommender: RecommendationClient<M>) -> Result<Self> {
        init_db(store.as_ref())?;

        let current_user = AuthService::new(store.as_ref()).current_user()?;
        let view = current_user
            .as_ref()
            .map_or(View::Home, |user| View::landing_for(user.role));
        if let Some(user) = &current_user {
            set_sentry_user(&user.id, Some(&user.email));
        }

        let mut storefront = Self {
            store,
            recommender,
            chat_poll_interval: DEFAULT_POLL_INTERVAL,
            products: Vec::new(),
            categories: Vec::new(),
            users: Vec::new(),
            app_config: AppConfig::default(),
            chat_messages: Vec::new(),
            current_user,
            cart: Cart::new(),
            view,
            chat_open: false,
        };
        storefront.reload()?;
        Ok(storefront)
    }

    /// Set the refresh interval used by [`Storefront::watch_chat`].
    #[must_use]
    pub fn with_chat_poll_interval(mut self, interval: Duration) -> Self {
        self.chat_poll_interval = interval;
        self
    }

    /// Re-read products, categories, users, and settings from storage.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Storage` if a collection cannot be read.
    pub fn reload(&mut self) -> Result<()> {
        let store = self.store.as_ref();
        self.products = ProductRepository::new(store).list()?;
        self.categories = CategoryRepository::new(store).list()?;
        self.users = UserRepository::new(store).list()?;
        self.app_config = SettingsRepository::new(store).get()?;
        Ok(())
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// The backing store.
    #[must_use]
    pub const fn store(&self) -> &Arc<S> {
        &self.store
    }

    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    #[must_use]
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    #[must_use]
    pub fn users(&self) -> &[User] {
        &self.users
    }

    #[must_use]
    pub const fn app_config(&self) -> &AppConfig {
        &self.app_config
    }

    /// Chat messages as of the last refresh.
    #[must_use]
    pub fn chat_messages(&self) -> &[ChatMessage] {
        &self.chat_messages
    }

    #[must_use]
    pub const fn current_user(&self) -> Option<&User> {
        self.current_user.as_ref()
    }

    #[must_use]
    pub const fn cart(&self) -> &Cart {
        &self.cart
    }

    /// The active view.
    #[must_use]
    pub const fn view(&self) -> View {
        self.view
    }

    // =========================================================================
    // Authentication
    // =========================================================================

    /// Sign in and route to the user's landing view.
    ///
    /// On failure the current session and view are unchanged.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Auth(AuthError::InvalidCredentials)` if no account
    /// matches.
    pub fn login(&mut self, email: &str, password: &str) -> Result<&User> {
        let user = AuthService::new(self.store.as_ref()).login(email, password)?;
        Ok(self.enter_session(user))
    }

    /// Register a student account, sign it in, and route to Home.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Auth(AuthError::UserAlreadyExists)` if the email
    /// is taken, or `AppError::BadRequest` if name or email is blank.
    pub fn signup(&mut self, name: &str, email: &str, password: Option<&str>) -> Result<&User> {
        if name.trim().is_empty() || email.trim().is_empty() {
            return Err(AppError::BadRequest(
                "Name and email are required.".to_string(),
            ));
        }

        let user = AuthService::new(self.store.as_ref()).signup(name, email, password)?;
        self.users = UserRepository::new(self.store.as_ref()).list()?;
        Ok(self.enter_session(user))
    }

    /// Sign out: clears the session, the current user, and the cart, and
    /// returns to Home.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Storage` if the session cannot be cleared.
    pub fn logout(&mut self) -> Result<()> {
        AuthService::new(self.store.as_ref()).logout()?;
        self.current_user = None;
        self.cart.clear();
        self.view = View::Home;
        clear_sentry_user();
        add_breadcrumb("auth", "Logged out", None);
        Ok(())
    }

    fn enter_session(&mut self, user: User) -> &User {
        set_sentry_user(&user.id, Some(&user.email));
        add_breadcrumb("auth", "Logged in", Some(&[("role", user.role.as_str())]));
        self.view = View::landing_for(user.role);
        self.current_user.insert(user)
    }

    // =========================================================================
    // Navigation
    // =========================================================================

    /// Switch to `view` if the current user may open it.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Unauthorized` if the view needs a signed-in user
    /// and nobody is signed in, or `AppError::Forbidden` if the user lacks
    /// the required role.
    pub fn navigate(&mut self, view: View) -> Result<()> {
        if !view.is_accessible_by(self.current_user.as_ref()) {
            return Err(match (view.access(), &self.current_user) {
                (Access::Role(role), Some(_)) => {
                    AppError::Forbidden(format!("The {view} view requires the {role} role."))
                }
                _ => AppError::Unauthorized("Please log in first.".to_string()),
            });
        }
        self.view = view;
        Ok(())
    }

    // =========================================================================
    // Catalog
    // =========================================================================

    /// Products in `category` matching `query` (title or description).
    #[must_use]
    pub fn browse(&self, category: &Category, query: &str) -> Vec<&Product> {
        filter_products(&self.products, category, query)
    }

    /// Look up a product by ID.
    #[must_use]
    pub fn product(&self, id: &ProductId) -> Option<&Product> {
        self.products.iter().find(|p| &p.id == id)
    }

    // =========================================================================
    // Cart & Checkout
    // =========================================================================

    /// Add a new cart line for a catalog product.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` if the product is not in the catalog.
    pub fn add_to_cart(&mut self, id: &ProductId) -> Result<CartItem> {
        let product = self
            .product(id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("Product {id} not found.")))?;
        Ok(self.cart.add(product))
    }

    /// Remove a cart line. Returns `true` if the line existed.
    pub fn remove_from_cart(&mut self, cart_id: &CartLineId) -> bool {
        self.cart.remove(cart_id)
    }

    /// Sum of effective prices in the cart.
    #[must_use]
    pub fn cart_total(&self) -> Price {
        self.cart.total()
    }

    /// Turn the cart into enrollments for the signed-in user.
    ///
    /// The cart is cleared only if the enrollments were recorded.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Unauthorized` if nobody is signed in,
    /// `AppError::BadRequest` if the cart is empty, or `AppError::Storage`
    /// if the enrollments cannot be written.
    #[instrument(skip(self), fields(items = self.cart.len()))]
    pub fn checkout(&mut self) -> Result<Vec<Enrollment>> {
        let user = self.require_user("Please log in to checkout.")?;
        if self.cart.is_empty() {
            return Err(AppError::BadRequest("Your cart is empty.".to_string()));
        }

        let total = self.cart.total();
        let enrollments = EnrollmentRepository::new(self.store.as_ref()).enroll(
            &user.id,
            &self.cart.product_ids(),
            total,
        )?;

        info!(user_id = %user.id, total = %total, "Checkout complete");
        let total_text = total.to_string();
        add_breadcrumb("checkout", "Purchased cart", Some(&[("total", total_text.as_str())]));
        self.cart.clear();
        Ok(enrollments)
    }

    /// The signed-in user's enrollments in purchase order.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Unauthorized` if nobody is signed in.
    pub fn my_enrollments(&self) -> Result<Vec<Enrollment>> {
        let user = self.require_user("Please log in to see your purchases.")?;
        Ok(EnrollmentRepository::new(self.store.as_ref()).for_user(&user.id)?)
    }

    /// Products the signed-in user has purchased.
    ///
    /// Enrollments whose product no longer exists are skipped.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Unauthorized` if nobody is signed in.
    pub fn my_products(&self) -> Result<Vec<Product>> {
        Ok(self
            .my_enrollments()?
            .iter()
            .filter_map(|enrollment| {
                let product = self.product(&enrollment.product_id).cloned();
                if product.is_none() {
                    warn!(product_id = %enrollment.product_id, "Enrollment references a missing product");
                }
                product
            })
            .collect())
    }

    // =========================================================================
    // Recommendations
    // =========================================================================

    /// Ask the recommendation client about `query` and resolve the answer
    /// against the catalog. Unknown product IDs are dropped.
    ///
    /// # Errors
    ///
    /// Returns `AppError::BadRequest` if the query is blank. Model failures
    /// never surface here.
    pub async fn recommend(&self, query: &str) -> Result<Recommended> {
        if query.trim().is_empty() {
            return Err(AppError::BadRequest(
                "Tell us what you are looking for.".to_string(),
            ));
        }

        let answer = self.recommender.recommend(query, &self.products).await;
        let products = answer
            .recommended_ids
            .iter()
            .filter_map(|id| {
                let product = self.product(id).cloned();
                if product.is_none() {
                    warn!(product_id = %id, "Recommendation names an unknown product");
                }
                product
            })
            .collect();

        Ok(Recommended {
            message: answer.message,
            products,
        })
    }

    // =========================================================================
    // Guards
    // =========================================================================

    fn require_user(&self, message: &str) -> Result<&User> {
        self.current_user
            .as_ref()
            .ok_or_else(|| AppError::Unauthorized(message.to_string()))
    }

    fn require_role(&self, role: UserRole) -> Result<&User> {
        let user = self.require_user("Please log in first.")?;
        if user.has_role(role) {
            Ok(user)
        } else {
            Err(AppError::Forbidden(format!("This action requires the {role} role.")))
        }
    }
}
