use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod client;
mod commands;
mod config;
mod types;
mod utils;

use commands::*;

#[derive(Parser)]
#[command(name = "repropack")]
#[command(about = "ReproPack - Package development environments for reproducible setups", long_about = "
Bundle a project's dependencies, environment variables, setup scripts and
dataset links into a single downloadable archive.
• Build archives locally from a repropack.toml manifest
• Publish them to a ReproPack server
• List and download packages others have created
")]
#[command(version)]
struct Cli {
    /// Server URL (overrides ~/.repropack/config.toml)
    #[arg(long, global = true)]
    server: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a repropack.toml manifest in the current directory
    Init,

    /// Build a package archive locally, without a server
    Build {
        /// Manifest file or directory containing repropack.toml
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Directory to write the archive to
        #[arg(short, long, default_value = "packages")]
        output: PathBuf,
    },

    /// Create a package on the server from a manifest
    Create {
        /// Manifest file or directory containing repropack.toml
        #[arg(default_value = ".")]
        path: PathBuf,
    },

    /// List packages on the server
    List,

    /// Download a package archive by id
    Download {
        /// Package id returned by `create`
        package_id: String,

        /// Directory to save the archive in
        #[arg(short, long, default_value = ".")]
        output: PathBuf,
    },

    /// Check that the server is up
    Health,

    /// Show or change CLI configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the current configuration
    Show,

    /// Set the default server URL
    SetServer {
        /// e.g. http://localhost:8000
        url: String,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let server = cli.server;

    let result = match cli.command {
        Commands::Init => init::handle_init().await,
        Commands::Build { path, output } => build::handle_build(path, output).await,
        Commands::Create { path } => create::handle_create(path, server).await,
        Commands::List => list::handle_list(server).await,
        Commands::Download { package_id, output } => {
            download::handle_download(package_id, output, server).await
        }
        Commands::Health => health::handle_health(server).await,
        Commands::Config { action } => match action {
            ConfigAction::Show => commands::config::handle_show().await,
            ConfigAction::SetServer { url } => commands::config::handle_set_server(url).await,
        },
    };

    match result {
        Ok(_) => std::process::exit(0),
        Err(e) => {
            utils::print_error(&e.to_string());
            std::process::exit(1);
        }
    }
}
