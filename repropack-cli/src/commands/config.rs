use crate::config::Config;
use crate::types::Result;
use crate::utils::*;
use colored::*;

pub async fn handle_show() -> Result<()> {
    let config = Config::load()?;

    println!("\n{}", "⚙️  ReproPack Configuration".cyan().bold());
    println!("  Server URL: {}", config.server_url.yellow());
    println!("  Config file: {}", Config::config_file()?.display());
    Ok(())
}

pub async fn handle_set_server(url: String) -> Result<()> {
    if !(url.starts_with("http://") || url.starts_with("https://")) {
        return Err("Server URL must start with http:// or https://".into());
    }

    let mut config = Config::load()?;
    config.server_url = url.trim_end_matches('/').to_string();
    config.save()?;

    print_success(&format!("Server set to {}", config.server_url.cyan()));
    Ok(())
}
