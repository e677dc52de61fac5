//! Handles settings for the application.
//!
//! Values are layered, later sources winning: built-in defaults, the TOML
//! file (`config/splitit.toml` unless `--config` says otherwise),
//! `SPLITIT_*` environment variables (`__` separates nesting, e.g.
//! `SPLITIT_SERVER__PORT`), then command line flags.
use clap::Parser;
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

const DEFAULT_CONFIG_PATH: &str = "config/splitit";

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Database {
    Memory,
    Sqlite(String),
}

#[derive(Debug, Deserialize)]
pub struct App {
    pub level: String,
}

#[derive(Debug, Deserialize)]
pub struct Server {
    pub bind: Option<String>,
    pub port: u16,
    pub database: Database,
}

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub app: App,
    pub server: Server,
}

#[derive(Debug, Default, Parser)]
#[command(name = "splitit", version, about = "Expense splitting service")]
pub struct Args {
    /// Optional config file path (TOML, extension optional).
    #[arg(long)]
    pub config: Option<String>,
    /// Override the listen address.
    #[arg(long)]
    pub bind: Option<String>,
    /// Override the listen port.
    #[arg(long)]
    pub port: Option<u16>,
    /// Override the log level (e.g. `debug`).
    #[arg(long)]
    pub level: Option<String>,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        Self::from_args(Args::parse())
    }

    pub fn from_args(args: Args) -> Result<Self, ConfigError> {
        let config_path = args.config.as_deref().unwrap_or(DEFAULT_CONFIG_PATH);

        Config::builder()
            .set_default("app.level", "info")?
            .set_default("server.bind", "127.0.0.1")?
            .set_default("server.port", 3000)?
            .set_default("server.database", "memory")?
            .add_source(File::with_name(config_path).required(args.config.is_some()))
            .add_source(Environment::with_prefix("SPLITIT").separator("__"))
            .set_override_option("server.bind", args.bind)?
            .set_override_option("server.port", args.port.map(i64::from))?
            .set_override_option("app.level", args.level)?
            .build()?
            .try_deserialize()
    }
}
