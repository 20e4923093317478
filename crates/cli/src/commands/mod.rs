//! Command implementations.
//!
//! Output goes through `tracing` at info level, like every other message
//! the CLI prints.

pub mod account;
pub mod catalog;
pub mod chat;
pub mod seed;
pub mod settings;

use std::sync::Arc;

use kiddiebox_storefront::db::FileStore;
use kiddiebox_storefront::recommend::RecommendationClient;
use kiddiebox_storefront::{Storefront, StorefrontConfig};

/// The storefront over the on-disk data directory.
pub type App = Storefront<FileStore>;

/// Open the storefront on the configured data directory.
///
/// # Errors
///
/// Returns an error if the data directory cannot be created or read, or the
/// recommendation client cannot be configured.
pub fn open(config: &StorefrontConfig) -> Result<App, Box<dyn std::error::Error>> {
    let store = FileStore::open(&config.data_dir)?;
    let recommender = RecommendationClient::from_config(config.gemini())?;
    let app = Storefront::new(Arc::new(store), recommender)?
        .with_chat_poll_interval(config.chat_poll_interval);
    Ok(app)
}
