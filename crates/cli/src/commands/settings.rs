//! Payment and shipping settings commands.

use tracing::info;

use kiddiebox_storefront::AppError;

use super::App;

/// Requested payment changes. `None` keeps the current value.
#[derive(Default)]
pub struct PaymentUpdate {
    pub enabled: Option<bool>,
    pub provider: Option<String>,
    pub api_key: Option<String>,
    pub secret_key: Option<String>,
}

/// Requested shipping changes. `None` keeps the current value.
#[derive(Default)]
pub struct ShippingUpdate {
    pub enabled: Option<bool>,
    pub provider: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

const fn set_or_not(value: &str) -> &'static str {
    if value.is_empty() { "not set" } else { "set" }
}

/// Show the current settings. Credentials are never printed.
pub fn show(app: &App) {
    let config = app.app_config();
    info!(
        "Payment:  {} via {} (API key {}, secret key {})",
        if config.payment.enabled { "enabled" } else { "disabled" },
        config.payment.provider,
        set_or_not(&config.payment.api_key),
        set_or_not(&config.payment.secret_key)
    );
    info!(
        "Shipping: {} via {} (account {}, password {})",
        if config.shipping.enabled { "enabled" } else { "disabled" },
        config.shipping.provider,
        if config.shipping.email.is_empty() { "not set" } else { config.shipping.email.as_str() },
        set_or_not(&config.shipping.password)
    );
}

/// Apply payment changes.
///
/// # Errors
///
/// Returns `AppError::Forbidden` unless signed in as an admin.
pub fn update_payment(app: &mut App, update: PaymentUpdate) -> Result<(), AppError> {
    let mut config = app.app_config().clone();
    let payment = &mut config.payment;
    if let Some(enabled) = update.enabled {
        payment.enabled = enabled;
    }
    if let Some(provider) = update.provider {
        payment.provider = provider;
    }
    if let Some(api_key) = update.api_key {
        payment.api_key = api_key;
    }
    if let Some(secret_key) = update.secret_key {
        payment.secret_key = secret_key;
    }

    app.save_app_config(config)?;
    show(app);
    Ok(())
}

/// Apply shipping changes.
///
/// # Errors
///
/// Returns `AppError::Forbidden` unless signed in as an admin.
pub fn update_shipping(app: &mut App, update: ShippingUpdate) -> Result<(), AppError> {
    let mut config = app.app_config().clone();
    let shipping = &mut config.shipping;
    if let Some(enabled) = update.enabled {
        shipping.enabled = enabled;
    }
    if let Some(provider) = update.provider {
        shipping.provider = provider;
    }
    if let Some(email) = update.email {
        shipping.email = email;
    }
    if let Some(password) = update.password {
        shipping.password = password;
    }

    app.save_app_config(config)?;
    show(app);
    Ok(())
}
