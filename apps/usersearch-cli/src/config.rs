//! Layered application configuration.
//!
//! Precedence, lowest first: built-in defaults, the YAML file given with
//! `--config`, `APP__*` environment variables (`__` separates nesting levels,
//! e.g. `APP__DIRECTORY__TOKEN`), then command-line overrides.

use anyhow::{Context, Result, bail};
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Yaml};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use user_directory::GithubDirectoryConfig;
use user_search::SearchConfig;

pub const ENV_PREFIX: &str = "APP__";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub logging: LoggingConfig,
    pub directory: GithubDirectoryConfig,
    pub search: SearchConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    /// `EnvFilter` directive for stderr output.
    #[serde(default = "default_console_level")]
    pub console_level: String,

    /// Optional log file; disabled when unset.
    pub file: Option<PathBuf>,

    #[serde(default = "default_file_level")]
    pub file_level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            console_level: default_console_level(),
            file: None,
            file_level: default_file_level(),
        }
    }
}

fn default_console_level() -> String {
    "warn".to_owned()
}

fn default_file_level() -> String {
    "info".to_owned()
}

impl AppConfig {
    /// Load defaults, then `path` if given, then the environment.
    ///
    /// # Errors
    /// Fails when `path` does not exist or any layer does not parse into
    /// the expected shape.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut figment = Figment::new().merge(Serialized::defaults(Self::default()));
        if let Some(path) = path {
            if !path.is_file() {
                bail!("config file does not exist: {}", path.display());
            }
            figment = figment.merge(Yaml::file(path));
        }
        figment
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .context("failed to load configuration")
    }

    /// Effective configuration as YAML. The API token is never included.
    ///
    /// # Errors
    /// Fails if serialization fails.
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).context("failed to serialize configuration to YAML")
    }
}
