//! Application configuration.
//!
//! Server flags come from the command line (or their env equivalents);
//! the database location follows the usual priority chain:
//! config.toml > .env / environment > default.

use clap::Parser;
use serde::Deserialize;
use std::path::PathBuf;

// ==================== Command Line ====================

/// Command line flags for the backend server.
#[derive(Debug, Clone, Parser)]
#[command(name = "yodahunters")]
#[command(about = "Runs the yodahunters backend web server")]
#[command(version)]
pub struct Cli {
    /// The address for the server to listen on
    #[arg(long, env = "YODAHUNTERS_ADDR", default_value = DEFAULT_ADDR)]
    pub addr: String,

    /// Enable devmode (static assets are served with caching disabled)
    #[arg(long, env = "YODAHUNTERS_DEVMODE")]
    pub devmode: bool,
}

/// Resolved server configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Address to serve HTTP requests from
    pub address: String,
    /// Path of the SQLite database file
    pub database_path: PathBuf,
    /// Directory holding static assets
    pub static_dir: PathBuf,
    pub devmode: bool,
}

impl Config {
    /// Combine command line flags with the file/env database settings.
    pub fn from_cli(cli: Cli) -> Self {
        Self {
            address: cli.addr,
            database_path: load_database_path(),
            static_dir: PathBuf::from(STATIC_DIR),
            devmode: cli.devmode,
        }
    }
}

// ==================== Database Configuration ====================

/// Configuration file structure for config.toml
#[derive(Debug, Deserialize)]
struct FileConfig {
    database: Option<DatabaseConfig>,
}

#[derive(Debug, Deserialize)]
struct DatabaseConfig {
    path: Option<String>,
}

/// Env var overriding the database location
pub const DATABASE_PATH_ENV: &str = "YODAHUNTERS_DATABASE_PATH";

/// Default database location
pub const DEFAULT_DATABASE_PATH: &str = "data/yodahunters.db";

/// Load database path with priority: config.toml > .env > default
pub fn load_database_path() -> PathBuf {
    let _ = dotenvy::dotenv();

    if let Ok(contents) = std::fs::read_to_string("config.toml") {
        if let Some(path) = database_path_from_toml(&contents) {
            tracing::info!("Using database from config.toml: {}", path.display());
            return path;
        }
    }

    if let Ok(path) = std::env::var(DATABASE_PATH_ENV) {
        tracing::info!("Using database from {} env: {}", DATABASE_PATH_ENV, path);
        return PathBuf::from(path);
    }

    let default = PathBuf::from(DEFAULT_DATABASE_PATH);
    tracing::info!("Using default database path: {}", default.display());
    default
}

fn database_path_from_toml(contents: &str) -> Option<PathBuf> {
    let config = toml::from_str::<FileConfig>(contents).ok()?;
    config.database?.path.map(PathBuf::from)
}

// ==================== Server Configuration ====================

/// Default listen address
pub const DEFAULT_ADDR: &str = "localhost:8080";

/// Static asset directory, served under /static
pub const STATIC_DIR: &str = "static";

// ==================== Auth Configuration ====================

/// Lifetime of an access token (and its cookie) in hours
pub const TOKEN_LIFETIME_HOURS: i64 = 12;

/// Length in bytes of the token signing secret
pub const SECRET_LEN: usize = 32;

/// Name of the cookie carrying the access token
pub const ACCESS_TOKEN_COOKIE: &str = "access_token";

/// Where unauthenticated requests are sent
pub const LOGIN_PATH: &str = "/login";

/// Token lifetime in seconds
pub fn token_lifetime_secs() -> i64 {
    TOKEN_LIFETIME_HOURS * 60 * 60
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_lifetime_is_twelve_hours() {
        assert_eq!(token_lifetime_secs(), 43_200);
    }

    #[test]
    fn test_database_path_from_toml() {
        let contents = r#"
            [database]
            path = "/var/lib/yodahunters/forum.db"
        "#;
        assert_eq!(
            database_path_from_toml(contents),
            Some(PathBuf::from("/var/lib/yodahunters/forum.db"))
        );
    }

    #[test]
    fn test_database_path_from_toml_missing_section() {
        assert_eq!(database_path_from_toml("[server]\nport = 1"), None);
        assert_eq!(database_path_from_toml("[database]"), None);
        assert_eq!(database_path_from_toml("not toml at all ="), None);
    }

    #[test]
    fn test_cli_rejects_unknown_flag() {
        assert!(Cli::try_parse_from(["yodahunters", "--port", "80"]).is_err());
    }

    #[test]
    fn test_cli_flags() {
        let cli =
            Cli::try_parse_from(["yodahunters", "--addr", "0.0.0.0:9000", "--devmode"]).unwrap();
        assert_eq!(cli.addr, "0.0.0.0:9000");
        assert!(cli.devmode);
    }
}
