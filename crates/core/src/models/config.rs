//! Store-wide settings edited from the admin console.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Provider name used when no third-party integration is configured.
pub const MANUAL_PROVIDER: &str = "Manual";

/// Application settings.
///
/// Credentials are plain strings. They are redacted from `Debug` output but
/// stored unencrypted.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AppConfig {
    pub payment: PaymentSettings,
    pub shipping: ShippingSettings,
}

/// Payment gateway settings.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentSettings {
    pub enabled: bool,
    /// Free-form vendor name.
    pub provider: String,
    pub api_key: String,
    pub secret_key: String,
}

impl Default for PaymentSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            provider: MANUAL_PROVIDER.to_string(),
            api_key: String::new(),
            secret_key: String::new(),
        }
    }
}

impl fmt::Debug for PaymentSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PaymentSettings")
            .field("enabled", &self.enabled)
            .field("provider", &self.provider)
            .field("api_key", &"[REDACTED]")
            .field("secret_key", &"[REDACTED]")
            .finish()
    }
}

/// Shipping provider settings.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingSettings {
    pub enabled: bool,
    /// Free-form vendor name.
    pub provider: String,
    pub email: String,
    pub password: String,
}

impl Default for ShippingSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            provider: MANUAL_PROVIDER.to_string(),
            email: String::new(),
            password: String::new(),
        }
    }
}

impl fmt::Debug for ShippingSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ShippingSettings")
            .field("enabled", &self.enabled)
            .field("provider", &self.provider)
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}
