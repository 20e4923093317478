//! Account, checkout, and purchase commands.

use tracing::info;

use kiddiebox_core::{ProductId, UserId};
use kiddiebox_storefront::AppError;

use super::App;

/// Sign in.
///
/// # Errors
///
/// Returns `AppError::Auth` if the credentials do not match.
pub fn login(app: &mut App, email: &str, password: &str) -> Result<(), AppError> {
    let user = app.login(email, password)?;
    info!("Welcome back, {}!", user.name);
    info!("Landing view: {}", app.view());
    Ok(())
}

/// Create a student account and sign in.
///
/// # Errors
///
/// Returns `AppError::Auth` if the email is already registered.
pub fn signup(
    app: &mut App,
    name: &str,
    email: &str,
    password: Option<&str>,
) -> Result<(), AppError> {
    let user = app.signup(name, email, password)?;
    info!(user_id = %user.id, "Welcome to KiddieBox, {}!", user.name);
    Ok(())
}

/// Sign out.
///
/// # Errors
///
/// Returns `AppError::Storage` if the session cannot be cleared.
pub fn logout(app: &mut App) -> Result<(), AppError> {
    app.logout()?;
    info!("Signed out");
    Ok(())
}

/// Show the signed-in user.
pub fn whoami(app: &App) {
    match app.current_user() {
        Some(user) => info!("{} <{}> ({}), id {}", user.name, user.email, user.role, user.id),
        None => info!("Not signed in"),
    }
}

/// List every user.
///
/// # Errors
///
/// Returns `AppError::Forbidden` unless signed in as an admin.
pub fn list_users(app: &App) -> Result<(), AppError> {
    for user in app.all_users()? {
        info!(
            "{:<36} {:<20} {:<24} {}",
            user.id.as_str(),
            user.name,
            user.email,
            user.role
        );
    }
    Ok(())
}

/// Delete a user.
///
/// # Errors
///
/// Returns `AppError::Forbidden` unless signed in as an admin.
pub fn delete_user(app: &mut App, id: &str) -> Result<(), AppError> {
    if app.delete_user(&UserId::new(id))? {
        info!("Deleted user {id}");
    } else {
        info!("No user {id}, nothing deleted");
    }
    Ok(())
}

/// Put the products in the cart and check out.
///
/// # Errors
///
/// Returns `AppError::NotFound` for an unknown product and
/// `AppError::Unauthorized` if nobody is signed in.
pub fn checkout(app: &mut App, product_ids: &[String]) -> Result<(), AppError> {
    for id in product_ids {
        let line = app.add_to_cart(&ProductId::new(id.as_str()))?;
        info!("Added {} ({})", line.product.title, line.product.effective_price());
    }
    info!("Total: {}", app.cart_total());

    let enrollments = app.checkout()?;
    info!("Purchase complete: {} enrollment(s) recorded", enrollments.len());
    Ok(())
}

/// List purchases of the signed-in user, or of everyone with `all`.
///
/// # Errors
///
/// Returns `AppError::Unauthorized` if nobody is signed in, or
/// `AppError::Forbidden` for `all` without the admin role.
pub fn enrollments(app: &App, all: bool) -> Result<(), AppError> {
    let enrollments = if all {
        app.all_enrollments()?
    } else {
        app.my_enrollments()?
    };

    if enrollments.is_empty() {
        info!("No purchases yet");
    }
    for enrollment in enrollments {
        let title = app
            .product(&enrollment.product_id)
            .map_or("(removed product)", |p| p.title.as_str());
        info!(
            "{}  {:<8} {:<38} {}  user {}",
            enrollment.purchase_date.format("%Y-%m-%d %H:%M"),
            enrollment.product_id.as_str(),
            title,
            enrollment.price_paid,
            enrollment.user_id
        );
    }
    Ok(())
}
