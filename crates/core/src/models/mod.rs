//! Persisted records.
//!
//! These are plain data with no behaviour beyond small derived helpers.
//! Field names serialize in camelCase to match the stored collections.

pub mod category;
pub mod chat;
pub mod config;
pub mod enrollment;
pub mod product;
pub mod user;

pub use category::Category;
pub use chat::ChatMessage;
pub use config::{AppConfig, PaymentSettings, ShippingSettings};
pub use enrollment::Enrollment;
pub use product::{CartItem, Product};
pub use user::User;
