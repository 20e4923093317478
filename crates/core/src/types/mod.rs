//! Core types for KiddieBox.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod id;
pub mod price;
pub mod role;

pub use id::*;
pub use price::Price;
pub use role::{ProductType, RoleParseError, UserRole};
