use std::io;
use std::path::{Path, PathBuf};

use config::{Config, Environment, File, FileFormat};
use serde::Deserialize;
use thiserror::Error;

mod duration;
mod indexes;

pub use duration::{deserialize_duration, serialize_duration};
pub use indexes::load_index_definitions;

const DEV_CONFIG_PATH: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/../../../config");

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config error: {0}")]
    ConfigCompilation(#[from] config::ConfigError),

    #[error("IO error: {0}")]
    IOError(#[from] io::Error),

    #[error("Invalid index definition '{path}': {source}")]
    InvalidIndexDefinition {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Index definition file name is not valid UTF-8: {0}")]
    InvalidIndexName(PathBuf),
}

/// Directory holding the default configuration files.
///
/// The system wide `/etc/recreate-index/` takes precedence over the
/// repository's `config` directory.
pub fn config_dir() -> PathBuf {
    let config_dir = PathBuf::from("/etc/recreate-index/");
    if config_dir.exists() {
        config_dir
    } else {
        PathBuf::from(DEV_CONFIG_PATH)
    }
}

/// Settings built by merging, in that order, the files listed by
/// `file_sources`, the environment variables prefixed with `ENV_PREFIX`
/// (`PREFIX__SECTION__KEY`), and `key=value` overrides.
pub trait LayeredConfig<'a>: Deserialize<'a> {
    const ENV_PREFIX: &'static str;

    fn file_sources() -> Vec<&'static str> {
        vec![]
    }
    fn root_key() -> Option<&'static str> {
        None
    }

    fn get(overrides: &[String]) -> Result<Self, ConfigError>
    where
        Self: Sized,
    {
        Self::get_from(&config_dir(), overrides)
    }

    fn get_from(dir: &Path, overrides: &[String]) -> Result<Self, ConfigError>
    where
        Self: Sized,
    {
        let mut override_env = vec![];
        for value in overrides {
            // Example: "url=http://localhost:9200" -> "elasticsearch.url=http://localhost:9200"
            let value = match Self::root_key() {
                None => value.clone(),
                Some(key) => format!("{key}.{value}"),
            };

            override_env.push(File::from_str(&value, FileFormat::Toml));
        }

        let config_sources: Vec<File<_, _>> = Self::file_sources()
            .iter()
            .map(|path| dir.join(path))
            .map(File::from)
            .collect();

        let config = Config::builder()
            .add_source(config_sources)
            .add_source(
                Environment::with_prefix(Self::ENV_PREFIX)
                    .separator("__")
                    .prefix_separator("__"),
            )
            .add_source(override_env)
            .build()?;

        match Self::root_key() {
            None => Ok(config.try_deserialize()?),
            Some(key) => Ok(config.get::<Self>(key)?),
        }
    }
}
