//! KiddieBox Core - Shared record types.
//!
//! This crate provides the data model used across all KiddieBox components:
//! - `storefront` - Persistence layer, recommendation client, and application controller
//! - `cli` - Command-line driver for seeding, browsing, and administration
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no storage access,
//! no HTTP clients. Records are plain schema with camelCase JSON field names,
//! matching the layout of the persisted collections.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, prices, and roles
//! - [`models`] - Products, users, enrollments, chat messages, and settings

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod models;
pub mod types;

pub use models::*;
pub use types::*;
