use crate::store::{DEFAULT_TASK_FILE, IdStrategy, StoreOptions};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_NAME: &str = "task-cli";
pub const ENV_PREFIX: &str = "TASK_CLI";

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub file: PathBuf,
    pub id_strategy: IdStrategy,
    pub pretty: bool,
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            file: PathBuf::from(DEFAULT_TASK_FILE),
            id_strategy: IdStrategy::default(),
            pretty: true,
            log_level: "warn".to_string(),
        }
    }
}

impl Config {
    /// Loads configuration from a config file and `TASK_CLI_*` environment
    /// variables, the latter taking precedence.
    ///
    /// Without an explicit `path`, `task-cli.{toml,yaml,json}` in the
    /// working directory is read if present.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let file = match path {
            Some(path) => config::File::from(path).required(true),
            None => config::File::with_name(DEFAULT_CONFIG_NAME).required(false),
        };
        let s = config::Config::builder()
            .add_source(file)
            .add_source(config::Environment::with_prefix(ENV_PREFIX))
            .build()?;

        Ok(s.try_deserialize()?)
    }

    pub fn store_options(&self) -> StoreOptions {
        StoreOptions {
            id_strategy: self.id_strategy,
            pretty: self.pretty,
        }
    }
}
