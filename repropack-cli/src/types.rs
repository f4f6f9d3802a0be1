use repropack_server::models::PackageRequest;
use std::path::{Path, PathBuf};

/// Default manifest file name
pub const MANIFEST_FILE: &str = "repropack.toml";

/// Result type for error handling
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;

/// Resolve a manifest path: a directory means `<dir>/repropack.toml`
pub fn manifest_path(path: &Path) -> PathBuf {
    if path.is_dir() {
        path.join(MANIFEST_FILE)
    } else {
        path.to_path_buf()
    }
}

/// Load a package manifest (a `PackageRequest` in TOML form)
pub fn load_manifest(path: &Path) -> Result<PackageRequest> {
    let manifest_path = manifest_path(path);
    if !manifest_path.exists() {
        return Err(format!(
            "No {} found at {}. Run 'repropack init' first.",
            MANIFEST_FILE,
            manifest_path.display()
        )
        .into());
    }

    let content = std::fs::read_to_string(&manifest_path)?;
    let request: PackageRequest = toml::from_str(&content)
        .map_err(|e| format!("Invalid manifest {}: {}", manifest_path.display(), e))?;

    if request.project_name.trim().is_empty() {
        return Err("Manifest project_name cannot be empty".into());
    }
    if request.author.trim().is_empty() {
        return Err("Manifest author cannot be empty".into());
    }

    Ok(request)
}
