pub mod fs;

use chrono::{DateTime, Utc};

use crate::error::StoreError;
use crate::models::{PackageMetadata, PackageRequest};

pub use fs::FsPackageStore;

/// A freshly stored package archive
#[derive(Debug, Clone)]
pub struct StoredPackage {
    pub location: String,
    pub file_name: String,
    pub file_size: u64,
}

/// Archive bytes resolved for download
#[derive(Debug, Clone)]
pub struct PackageFile {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// Durable storage for package archives.
///
/// Implementations are blocking; async callers should go through
/// `tokio::task::spawn_blocking`.
pub trait PackageStore: Send + Sync {
    /// Human-readable location of the store (directory path, bucket URL, ...)
    fn location(&self) -> String;

    /// Build and persist the archive for `request`
    fn create(
        &self,
        request: &PackageRequest,
        package_id: &str,
        created_at: DateTime<Utc>,
    ) -> Result<StoredPackage, StoreError>;

    /// All stored packages, newest first
    fn list(&self) -> Result<Vec<PackageMetadata>, StoreError>;

    /// Archive for `package_id`, if one exists
    fn fetch(&self, package_id: &str) -> Result<Option<PackageFile>, StoreError>;

    /// Number of stored archives
    fn count(&self) -> Result<usize, StoreError>;
}
