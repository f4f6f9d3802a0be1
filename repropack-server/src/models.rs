use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single project dependency in pip freeze style
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencySpec {
    pub name: String,
    /// Either a bare version (`1.0.0`) or one carrying its own operator (`>=1.0.0`)
    pub version: String,
}

impl DependencySpec {
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
        }
    }
}

/// Inbound description of a package to build
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackageRequest {
    pub project_name: String,
    pub author: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub dependencies: Vec<DependencySpec>,
    #[serde(default)]
    pub environment_variables: BTreeMap<String, String>,
    #[serde(default)]
    pub setup_scripts: Vec<String>,
    #[serde(default)]
    pub dataset_links: Vec<String>,
    #[serde(default)]
    pub instructions: Option<String>,
}

/// Result of a successful create
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackageRecord {
    pub package_id: String,
    pub project_name: String,
    pub created_at: DateTime<Utc>,
    pub file_path: String,
    pub file_size: u64,
}

/// Listing view of a stored package
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackageMetadata {
    pub package_id: String,
    pub project_name: String,
    pub author: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub dependencies_count: usize,
    pub file_size: u64,
    pub file_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackageListResponse {
    pub packages: Vec<PackageMetadata>,
    pub total_count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub packages_directory: String,
    pub packages_count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceInfo {
    pub message: String,
    pub description: String,
    pub version: String,
    pub endpoints: BTreeMap<String, String>,
}

/// The `metadata.json` document embedded in every archive.
///
/// `created_at` is kept as a string so that listing can tolerate archives
/// written by other tools with slightly different timestamp formats.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetadataDocument {
    pub package_id: String,
    pub project_name: String,
    pub author: String,
    #[serde(default)]
    pub description: Option<String>,
    pub created_at: String,
    #[serde(default)]
    pub dependencies: Vec<DependencySpec>,
    #[serde(default)]
    pub environment_variables: BTreeMap<String, String>,
    #[serde(default)]
    pub setup_scripts: Vec<String>,
    #[serde(default)]
    pub dataset_links: Vec<String>,
    #[serde(default)]
    pub instructions: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generator: Option<String>,
}

impl MetadataDocument {
    pub fn from_request(request: &PackageRequest, package_id: &str, created_at: DateTime<Utc>) -> Self {
        Self {
            package_id: package_id.to_string(),
            project_name: request.project_name.clone(),
            author: request.author.clone(),
            description: request.description.clone(),
            created_at: created_at.to_rfc3339(),
            dependencies: request.dependencies.clone(),
            environment_variables: request.environment_variables.clone(),
            setup_scripts: request.setup_scripts.clone(),
            dataset_links: request.dataset_links.clone(),
            instructions: request.instructions.clone(),
            generator: Some(format!("repropack/{}", env!("CARGO_PKG_VERSION"))),
        }
    }

    /// Parse `created_at`, accepting RFC 3339 as well as naive ISO-8601
    /// timestamps (assumed UTC).
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        if let Ok(ts) = DateTime::parse_from_rfc3339(&self.created_at) {
            return Some(ts.with_timezone(&Utc));
        }
        chrono::NaiveDateTime::parse_from_str(&self.created_at, "%Y-%m-%dT%H:%M:%S%.f")
            .ok()
            .map(|naive| naive.and_utc())
    }
}
