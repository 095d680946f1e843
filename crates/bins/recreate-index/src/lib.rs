/// This module contains the definition for recreate-index configuration and command line arguments.
use std::env;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use snafu::{ResultExt, Snafu};

use elastic_client::settings::ElasticsearchStorageConfig;
use index_config::{config_dir, LayeredConfig};

pub mod console;
pub mod populate;

const VERSION: &str = env!("CARGO_PKG_VERSION");
const AUTHORS: &str = env!("CARGO_PKG_AUTHORS");

#[derive(Debug, Snafu)]
pub enum ConfigError {
    #[snafu(display("Config Compilation Error: {}", source))]
    ConfigCompilation { source: index_config::ConfigError },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub elasticsearch: ElasticsearchStorageConfig,
    /// Logical name recreated when none is given on the command line.
    pub index: String,
    pub populate: PopulateSettings,
    /// Directory of the `<logical>.json` index definitions, `indexes` under
    /// the config directory by default.
    pub indexes_dir: Option<PathBuf>,
}

/// External command filling the new index.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PopulateSettings {
    pub program: String,
    #[serde(default)]
    pub args: Vec<String>,
}

impl LayeredConfig<'_> for Settings {
    const ENV_PREFIX: &'static str = "RECREATE";

    fn file_sources() -> Vec<&'static str> {
        vec!["elasticsearch.toml", "recreate.toml"]
    }
}

#[derive(Debug, clap::Parser)]
#[command(
name = "recreate-index",
about = "Recreate an Elasticsearch index and swap its alias without downtime",
version = VERSION,
author = AUTHORS
)]
pub struct Opts {
    /// Defines the config directory
    ///
    /// This directory must contain 'elasticsearch.toml' and 'recreate.toml'.
    /// Defaults to /etc/recreate-index/ when it exists.
    #[arg(short = 'c', long = "config-dir")]
    pub config_dir: Option<PathBuf>,

    /// Override settings values using key=value
    #[arg(short = 's', long = "setting")]
    pub settings: Vec<String>,

    /// Logical name of the index to recreate
    #[arg(short = 'i', long = "index")]
    pub index: Option<String>,

    /// Database connection handed over to the populate command
    #[arg(short = 'd', long = "database")]
    pub database: Option<String>,

    #[command(subcommand)]
    pub cmd: Command,
}

#[derive(Debug, clap::Subcommand)]
pub enum Command {
    /// Recreate the index with the given configuration
    Run,
    /// Prints recreate-index's configuration
    Config,
}

impl Settings {
    // Read the configuration from <config-dir>/elasticsearch.toml and <config-dir>/recreate.toml
    pub fn new(opts: &Opts) -> Result<Self, ConfigError> {
        let dir = opts.config_dir.clone().unwrap_or_else(config_dir);

        let mut settings =
            Settings::get_from(&dir, &opts.settings).context(ConfigCompilationSnafu)?;
        if settings.indexes_dir.is_none() {
            settings.indexes_dir = Some(dir.join("indexes"));
        }
        Ok(settings)
    }

    /// Logical name to recreate, the command line taking precedence.
    pub fn logical_name(&self, opts: &Opts) -> String {
        opts.index.clone().unwrap_or_else(|| self.index.clone())
    }
}
