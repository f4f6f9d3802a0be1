use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};

use crate::error::StoreError;
use crate::models::{MetadataDocument, PackageMetadata, PackageRequest};
use crate::packaging::archive::{build_archive, METADATA_FILE};

use super::{PackageFile, PackageStore, StoredPackage};

const ARCHIVE_EXTENSION: &str = ".zip";

/// Package store backed by a flat directory of `.zip` files
#[derive(Debug, Clone)]
pub struct FsPackageStore {
    root: PathBuf,
}

impl FsPackageStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Create the packages directory if it does not exist yet
    pub fn ensure_dir(&self) -> Result<(), StoreError> {
        std::fs::create_dir_all(&self.root)?;
        Ok(())
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// File names of every archive in the directory, sorted
    fn archive_names(&self) -> Result<Vec<String>, StoreError> {
        let entries = std::fs::read_dir(&self.root).map_err(|source| StoreError::Scan {
            path: self.root.display().to_string(),
            source,
        })?;

        let mut names = Vec::new();
        for entry in entries {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::warn!("Skipping unreadable entry in {}: {}", self.root.display(), e);
                    continue;
                }
            };
            let name = entry.file_name().to_string_lossy().into_owned();
            if !name.ends_with(ARCHIVE_EXTENSION) {
                continue;
            }
            if entry.file_type().map(|t| t.is_file()).unwrap_or(false) {
                names.push(name);
            }
        }
        names.sort();
        Ok(names)
    }

    fn describe(&self, file_name: &str) -> Result<PackageMetadata, StoreError> {
        let path = self.root.join(file_name);
        let stat = std::fs::metadata(&path)?;
        let file_size = stat.len();
        let file_time = stat
            .created()
            .or_else(|_| stat.modified())
            .map(DateTime::<Utc>::from)
            .unwrap_or_else(|_| Utc::now());

        match read_metadata_document(&path) {
            Some(doc) => {
                let created_at = doc.created_at().unwrap_or_else(|| {
                    tracing::debug!("Unparseable created_at in {}, using file time", file_name);
                    file_time
                });
                Ok(PackageMetadata {
                    package_id: doc.package_id,
                    project_name: doc.project_name,
                    author: doc.author,
                    description: doc.description,
                    created_at,
                    dependencies_count: doc.dependencies.len(),
                    file_size,
                    file_name: file_name.to_string(),
                })
            }
            None => {
                tracing::debug!("No usable metadata in {}, deriving from file name", file_name);
                let (project_name, package_id) = split_archive_name(file_name);
                Ok(PackageMetadata {
                    package_id,
                    project_name,
                    author: "Unknown".to_string(),
                    description: Some("No metadata available".to_string()),
                    created_at: file_time,
                    dependencies_count: 0,
                    file_size,
                    file_name: file_name.to_string(),
                })
            }
        }
    }
}

impl PackageStore for FsPackageStore {
    fn location(&self) -> String {
        self.root.display().to_string()
    }

    fn create(
        &self,
        request: &PackageRequest,
        package_id: &str,
        created_at: DateTime<Utc>,
    ) -> Result<StoredPackage, StoreError> {
        let built = build_archive(request, package_id, created_at, &self.root)?;
        Ok(StoredPackage {
            location: built.path.display().to_string(),
            file_name: built.file_name,
            file_size: built.file_size,
        })
    }

    fn list(&self) -> Result<Vec<PackageMetadata>, StoreError> {
        let mut packages = Vec::new();
        for name in self.archive_names()? {
            match self.describe(&name) {
                Ok(meta) => packages.push(meta),
                // Removed between scan and stat
                Err(StoreError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => continue,
                Err(e) => return Err(e),
            }
        }

        packages.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| a.file_name.cmp(&b.file_name))
        });
        Ok(packages)
    }

    fn fetch(&self, package_id: &str) -> Result<Option<PackageFile>, StoreError> {
        if !is_plain_identifier(package_id) {
            return Ok(None);
        }

        // `{project}_{id}.zip`, or `{id}.zip` for archives the listing
        // fallback reports under their whole stem
        let exact = format!("{}{}", package_id, ARCHIVE_EXTENSION);
        let suffix = format!("_{}", exact);
        let Some(file_name) = self
            .archive_names()?
            .into_iter()
            .find(|name| name.ends_with(&suffix) || *name == exact)
        else {
            return Ok(None);
        };

        match std::fs::read(self.root.join(&file_name)) {
            Ok(bytes) => Ok(Some(PackageFile { file_name, bytes })),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn count(&self) -> Result<usize, StoreError> {
        Ok(self.archive_names()?.len())
    }
}

/// Read `metadata.json` out of an archive; `None` if missing or corrupt
pub fn read_metadata_document(path: &Path) -> Option<MetadataDocument> {
    let file = File::open(path).ok()?;
    let mut archive = zip::ZipArchive::new(file).ok()?;
    let mut entry = archive.by_name(METADATA_FILE).ok()?;
    let mut raw = String::new();
    entry.read_to_string(&mut raw).ok()?;
    serde_json::from_str(&raw).ok()
}

/// Split `{project_name}_{package_id}.zip` on its last underscore
pub fn split_archive_name(file_name: &str) -> (String, String) {
    let stem = file_name.strip_suffix(ARCHIVE_EXTENSION).unwrap_or(file_name);
    match stem.rsplit_once('_') {
        Some((project, id)) => (project.to_string(), id.to_string()),
        None => (stem.to_string(), stem.to_string()),
    }
}

fn is_plain_identifier(package_id: &str) -> bool {
    !package_id.is_empty()
        && !package_id.contains("..")
        && !package_id
            .chars()
            .any(|c| c == '/' || c == '\\' || c.is_control())
}
