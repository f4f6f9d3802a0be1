use crate::client::ApiClient;
use crate::config::Config;
use crate::types::Result;
use crate::utils::*;
use colored::*;
use std::path::PathBuf;

/// Download a package archive into `output`
pub async fn handle_download(package_id: String, output: PathBuf, server: Option<String>) -> Result<()> {
    let client = ApiClient::new(Config::resolve_server(server)?);

    let spinner = create_spinner(&format!("Downloading {}...", package_id));
    let result = client.download_package(&package_id).await;
    spinner.finish_and_clear();
    let (file_name, bytes) = result?;

    std::fs::create_dir_all(&output)?;
    let target = output.join(&file_name);
    if target.exists() {
        return Err(format!("{} already exists", target.display()).into());
    }
    std::fs::write(&target, &bytes)?;

    print_success(&format!("Saved {}", file_name.green().bold()));
    println!("  Location: {}", target.display().to_string().yellow());
    println!("  Size: {}", format_size(bytes.len() as u64));
    Ok(())
}
