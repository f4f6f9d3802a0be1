use crate::client::ApiClient;
use crate::config::Config;
use crate::types::Result;
use crate::utils::*;
use colored::*;

/// List packages stored on the server, newest first
pub async fn handle_list(server: Option<String>) -> Result<()> {
    let client = ApiClient::new(Config::resolve_server(server)?);

    let spinner = create_spinner("Fetching packages...");
    let listing = client.list_packages().await;
    spinner.finish_and_clear();
    let listing = listing?;

    if listing.packages.is_empty() {
        print_warning("No packages on this server yet");
        println!("\n{}", "💡 Create one with:".yellow());
        println!("  {}", "repropack create".cyan());
        return Ok(());
    }

    println!(
        "\n{} {}",
        "📦 Found".cyan().bold(),
        format!("{} packages", listing.total_count).green()
    );
    println!("{}", "─".repeat(80));

    for package in &listing.packages {
        println!("\n{} {}", "📦".cyan(), package.project_name.green().bold());
        println!("  ID: {}", package.package_id.cyan());
        println!("  Author: {}", package.author);
        if let Some(description) = &package.description {
            println!("  Description: {}", description);
        }
        println!("  Created: {}", package.created_at.format("%Y-%m-%d %H:%M:%S UTC"));
        println!(
            "  Dependencies: {}  Size: {}",
            package.dependencies_count.to_string().yellow(),
            format_size(package.file_size)
        );
    }

    println!("\n{}", "─".repeat(80));
    Ok(())
}
