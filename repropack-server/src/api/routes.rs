use axum::{routing::{get, post}, Router};

use super::handlers::*;

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root_handler))
        .route("/health", get(health_check))
        .route("/create-package", post(create_package_handler))
        .route("/download-package/:package_id", get(download_package_handler))
        .route("/list-packages", get(list_packages_handler))
        .with_state(state)
}
