use crate::client::ApiClient;
use crate::config::Config;
use crate::types::{load_manifest, Result};
use crate::utils::*;
use colored::*;
use repropack_server::packaging::validate_request;
use std::path::PathBuf;

/// Send a manifest to the server and create a package there
pub async fn handle_create(path: PathBuf, server: Option<String>) -> Result<()> {
    let request = load_manifest(&path)?;

    let errors = validate_request(&request);
    if !errors.is_empty() {
        for error in &errors {
            print_error(error);
        }
        return Err(format!("{} validation errors in manifest", errors.len()).into());
    }

    let client = ApiClient::new(Config::resolve_server(server)?);
    print_info(&format!(
        "Creating {} on {}",
        request.project_name.cyan(),
        client.base_url().cyan()
    ));

    let spinner = create_spinner("Uploading package description...");
    let record = client.create_package(&request).await;
    spinner.finish_and_clear();
    let record = record?;

    print_success(&format!("Created {}", record.project_name.green().bold()));
    println!("\n{}", "📦 Package Details".cyan().bold());
    println!("  Package ID: {}", record.package_id.green());
    println!("  Created: {}", record.created_at.format("%Y-%m-%d %H:%M:%S UTC"));
    println!("  Server path: {}", record.file_path);
    println!("  Size: {}", format_size(record.file_size));

    println!("\n{}", "💡 To download:".yellow());
    println!("  {}", format!("repropack download {}", record.package_id).cyan());

    Ok(())
}
