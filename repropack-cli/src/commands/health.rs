use crate::client::ApiClient;
use crate::config::Config;
use crate::types::Result;
use colored::*;

pub async fn handle_health(server: Option<String>) -> Result<()> {
    let client = ApiClient::new(Config::resolve_server(server)?);
    let health = client.health().await?;

    println!("\n{} {}", "🩺 Server".cyan().bold(), client.base_url());
    println!("  Status: {}", health.status.green().bold());
    println!("  Packages: {}", health.packages_count.to_string().cyan());
    println!("  Directory: {}", health.packages_directory);
    println!("  Checked at: {}", health.timestamp.format("%Y-%m-%d %H:%M:%S UTC"));
    Ok(())
}
