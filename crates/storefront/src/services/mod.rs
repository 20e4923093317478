//! Business logic services for the storefront.
//!
//! # Services
//!
//! - `auth` - Email and password login, signup, and the session snapshot
//! - `chat` - Message composition and the interval-driven chat poller

pub mod auth;
pub mod chat;
