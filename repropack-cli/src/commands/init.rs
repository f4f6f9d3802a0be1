use crate::types::{Result, MANIFEST_FILE};
use crate::utils::*;
use colored::*;
use std::io::Write;
use std::path::Path;

fn prompt(label: &str) -> Result<String> {
    print!("{}", label);
    std::io::stdout().flush()?;
    let mut value = String::new();
    std::io::stdin().read_line(&mut value)?;
    Ok(value.trim().to_string())
}

/// Render a starter manifest. Values are written as TOML basic strings.
pub fn render_manifest(project_name: &str, author: &str, description: &str) -> String {
    let quote = |s: &str| toml::Value::String(s.to_string()).to_string();
    let mut manifest = format!(
        "project_name = {}\nauthor = {}\n",
        quote(project_name),
        quote(author)
    );
    if !description.is_empty() {
        manifest.push_str(&format!("description = {}\n", quote(description)));
    }
    manifest.push_str(
        r#"# instructions = "Anything users should know after setup"

setup_scripts = [
    # "mkdir -p data models",
]

dataset_links = [
    # "https://example.org/dataset.csv",
]

[environment_variables]
# DATA_PATH = "/data"

# [[dependencies]]
# name = "numpy"
# version = "1.24.0"     # pinned as numpy==1.24.0
#
# [[dependencies]]
# name = "pandas"
# version = ">=2.0.0"    # kept as pandas>=2.0.0
"#,
    );
    manifest
}

/// Interactively create a repropack.toml in the current directory
pub async fn handle_init() -> Result<()> {
    print_info("Initializing a ReproPack manifest...");

    if Path::new(MANIFEST_FILE).exists() {
        return Err(format!("{} already exists!", MANIFEST_FILE).into());
    }

    let project_name = prompt("\n📦 Project name: ")?;
    if project_name.is_empty() {
        return Err("Project name cannot be empty".into());
    }

    let author = prompt("👤 Author: ")?;
    if author.is_empty() {
        return Err("Author cannot be empty".into());
    }

    let description = prompt("📝 Description (optional): ")?;

    std::fs::write(MANIFEST_FILE, render_manifest(&project_name, &author, &description))?;
    print_success(&format!("Created {}", MANIFEST_FILE));

    println!("\n{}", "🚀 Next Steps:".cyan().bold());
    println!("  1. Add dependencies, environment variables and setup steps to {}", MANIFEST_FILE);
    println!("  2. Build locally: {}", "repropack build".cyan());
    println!("  3. Or publish to a server: {}", "repropack create".cyan());

    Ok(())
}
