use crate::types::{load_manifest, Result};
use crate::utils::*;
use chrono::Utc;
use colored::*;
use repropack_server::packaging::{build_archive, validate_request};
use std::path::PathBuf;

/// Build a package archive locally, without a server
pub async fn handle_build(path: PathBuf, output: PathBuf) -> Result<()> {
    let request = load_manifest(&path)?;

    let errors = validate_request(&request);
    if !errors.is_empty() {
        for error in &errors {
            print_error(error);
        }
        return Err(format!("{} validation errors in manifest", errors.len()).into());
    }

    print_info(&format!("Building {}", request.project_name.cyan()));
    let spinner = create_spinner("Rendering and compressing package...");

    let package_id = uuid::Uuid::new_v4().to_string();
    let built = tokio::task::spawn_blocking(move || {
        build_archive(&request, &package_id, Utc::now(), &output).map(|b| (package_id, b))
    })
    .await?;
    spinner.finish_and_clear();
    let (package_id, built) = built?;

    print_success("Package built");
    println!("\n{}", "📦 Package Details".cyan().bold());
    println!("  Package ID: {}", package_id.green());
    println!("  File: {}", built.path.display().to_string().yellow());
    println!("  Size: {}", format_size(built.file_size));

    Ok(())
}
