//! KiddieBox storefront library.
//!
//! Local JSON collections, AI-assisted catalog recommendations, and the
//! application controller that ties them together. The `kb-cli` binary is a
//! thin shell over this crate.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod app;
pub mod config;
pub mod db;
pub mod error;
pub mod recommend;
pub mod services;

pub use app::{Recommended, Storefront, View};
pub use config::StorefrontConfig;
pub use error::AppError;
