//! Seed the data directory with the default collections.

use tracing::info;

use kiddiebox_storefront::StorefrontConfig;
use kiddiebox_storefront::db::{FileStore, init_db};

/// Write every default collection that does not exist yet.
///
/// Existing collections are left untouched, even if they are empty. The
/// seeded keys are logged by `init_db`.
///
/// # Errors
///
/// Returns an error if the data directory cannot be created or written.
pub fn run(config: &StorefrontConfig) -> Result<(), Box<dyn std::error::Error>> {
    let store = FileStore::open(&config.data_dir)?;
    let report = init_db(&store)?;

    info!(
        path = %store.root().display(),
        newly_seeded = report.seeded.len(),
        "Data directory ready"
    );
    Ok(())
}
