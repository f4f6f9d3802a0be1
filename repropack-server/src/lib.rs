//! ReproPack: bundle a project's dependencies, environment variables, setup
//! scripts and dataset links into a downloadable zip archive, served over HTTP.

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod packaging;
pub mod store;

use api::handlers::AppState;
use config::Config;
use store::FsPackageStore;

/// Build the HTTP router for a filesystem-backed store at `config.packages_dir`.
///
/// The packages directory is created if it does not exist.
pub fn app(config: &Config) -> Result<axum::Router, error::StoreError> {
    let store = FsPackageStore::new(&config.packages_dir);
    store.ensure_dir()?;
    Ok(api::routes::create_router(AppState::new(store)))
}
