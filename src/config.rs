//! Server configuration from command-line flags, falling back to environment variables.

use clap::Parser;
use std::path::PathBuf;

#[derive(Clone, Debug, Parser)]
#[command(name = "web", about = "Tournament fixtures, results and archives over HTTP")]
pub struct Config {
    /// Address to bind. 0.0.0.0 keeps the app reachable via DNS on a VPS.
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: String,

    #[arg(long, env = "PORT", default_value_t = 8080)]
    pub port: u16,

    /// SQLite database file; created with its schema if missing.
    #[arg(long = "database", env = "DATABASE_PATH", default_value = "tournament.db")]
    pub database_path: PathBuf,
}
