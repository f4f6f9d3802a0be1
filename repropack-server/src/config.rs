use std::env;
use std::path::PathBuf;

pub const DEFAULT_PACKAGES_DIR: &str = "packages";

#[derive(Clone, Debug)]
pub struct Config {
    pub packages_dir: PathBuf,
    pub host: String,
    pub port: u16,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        dotenv::dotenv().ok();

        let port = match env::var("PORT") {
            Ok(p) => p
                .parse()
                .map_err(|_| format!("PORT must be a valid port number, got '{}'", p))?,
            Err(_) => 8000,
        };

        Ok(Config {
            packages_dir: env::var("REPROPACK_PACKAGES_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_PACKAGES_DIR)),
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port,
        })
    }

    pub fn with_packages_dir(packages_dir: impl Into<PathBuf>) -> Self {
        Config {
            packages_dir: packages_dir.into(),
            ..Config::default()
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            packages_dir: PathBuf::from(DEFAULT_PACKAGES_DIR),
            host: "0.0.0.0".to_string(),
            port: 8000,
        }
    }
}
