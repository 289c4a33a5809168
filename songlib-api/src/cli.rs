//! Command-line arguments for songlib-api
//!
//! Each flag can also be set through its `SONGLIB_*` environment variable.

use clap::Parser;
use songlib_common::config::ConfigOverrides;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "songlib-api")]
#[command(about = "Song library REST service")]
#[command(version)]
pub struct Args {
    /// TOML configuration file
    #[arg(short, long, env = "SONGLIB_CONFIG")]
    pub config: Option<PathBuf>,

    /// Port to listen on
    #[arg(short, long, env = "SONGLIB_PORT")]
    pub port: Option<u16>,

    /// Address to bind
    #[arg(long, env = "SONGLIB_HOST")]
    pub host: Option<String>,

    /// SQLite database file
    #[arg(short, long, env = "SONGLIB_DATABASE")]
    pub database: Option<PathBuf>,

    /// Song-info endpoint queried when a song is added
    #[arg(long, env = "SONGLIB_EXTERNAL_API_URL")]
    pub external_api_url: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "SONGLIB_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Log format (text or json)
    #[arg(long, env = "SONGLIB_LOG_FORMAT")]
    pub log_format: Option<String>,
}

impl Args {
    /// Values that take priority over the TOML file
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            port: self.port,
            host: self.host.clone(),
            database_path: self.database.clone(),
            external_api_url: self.external_api_url.clone(),
            log_level: self.log_level.clone(),
            log_format: self.log_format.clone(),
        }
    }
}
