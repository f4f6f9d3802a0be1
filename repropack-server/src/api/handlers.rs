use std::collections::BTreeMap;
use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::header,
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ServiceError;
use crate::models::*;
use crate::packaging::validate_request;
use crate::store::PackageStore;

/// Response envelope used for error bodies
#[derive(Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn error(error: String) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error),
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn PackageStore>,
}

impl AppState {
    pub fn new(store: impl PackageStore + 'static) -> Self {
        Self {
            store: Arc::new(store),
        }
    }
}

pub async fn root_handler() -> Json<ServiceInfo> {
    let endpoints = BTreeMap::from([
        ("create_package".to_string(), "POST /create-package".to_string()),
        (
            "download_package".to_string(),
            "GET /download-package/{package_id}".to_string(),
        ),
        ("list_packages".to_string(), "GET /list-packages".to_string()),
        ("health".to_string(), "GET /health".to_string()),
    ]);

    Json(ServiceInfo {
        message: "Welcome to ReproPack API".to_string(),
        description: "Package software development environments for reproducible setups".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        endpoints,
    })
}

pub async fn health_check(State(state): State<AppState>) -> Json<HealthStatus> {
    let store = state.store.clone();
    let packages_count = match tokio::task::spawn_blocking(move || store.count()).await {
        Ok(Ok(n)) => n,
        Ok(Err(e)) => {
            tracing::warn!("Health check could not scan packages: {}", e);
            0
        }
        Err(e) => {
            tracing::warn!("Health check task failed: {}", e);
            0
        }
    };

    Json(HealthStatus {
        status: "healthy".to_string(),
        timestamp: Utc::now(),
        packages_directory: state.store.location(),
        packages_count,
    })
}

pub async fn create_package_handler(
    State(state): State<AppState>,
    Json(request): Json<PackageRequest>,
) -> Result<Json<PackageRecord>, ServiceError> {
    let errors = validate_request(&request);
    if !errors.is_empty() {
        tracing::warn!(
            "Rejected package '{}': {} validation errors",
            request.project_name,
            errors.len()
        );
        return Err(ServiceError::Validation(errors));
    }

    let package_id = Uuid::new_v4().to_string();
    let created_at = Utc::now();
    let project_name = request.project_name.clone();

    let store = state.store.clone();
    let id = package_id.clone();
    let stored = tokio::task::spawn_blocking(move || store.create(&request, &id, created_at))
        .await?
        .map_err(ServiceError::Build)?;

    tracing::info!(
        "Created package {} for '{}' ({} bytes)",
        package_id,
        project_name,
        stored.file_size
    );

    Ok(Json(PackageRecord {
        package_id,
        project_name,
        created_at,
        file_path: stored.location,
        file_size: stored.file_size,
    }))
}

pub async fn download_package_handler(
    State(state): State<AppState>,
    Path(package_id): Path<String>,
) -> Result<impl IntoResponse, ServiceError> {
    let store = state.store.clone();
    let id = package_id.clone();
    let file = tokio::task::spawn_blocking(move || store.fetch(&id))
        .await?
        .map_err(|source| ServiceError::Storage {
            action: "download package",
            source,
        })?
        .ok_or_else(|| ServiceError::NotFound("Package not found".to_string()))?;

    tracing::info!("Serving package {} as {}", package_id, file.file_name);

    let disposition = format!("attachment; filename=\"{}\"", file.file_name);
    Ok((
        [
            (header::CONTENT_TYPE, "application/zip".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        file.bytes,
    ))
}

pub async fn list_packages_handler(
    State(state): State<AppState>,
) -> Result<Json<PackageListResponse>, ServiceError> {
    let store = state.store.clone();
    let packages = tokio::task::spawn_blocking(move || store.list())
        .await?
        .map_err(|source| ServiceError::Storage {
            action: "list packages",
            source,
        })?;

    Ok(Json(PackageListResponse {
        total_count: packages.len(),
        packages,
    }))
}
