//! Configuration loading using Figment
//!
//! Sources, later overriding earlier:
//! 1. Built-in defaults
//! 2. `tasklane.toml` in the working directory (optional)
//! 3. `TASKLANE_*` environment variables, e.g. `TASKLANE_PORT=8080`

use crate::error::Result;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

/// Default config file name, looked up in the working directory
pub const CONFIG_FILE: &str = "tasklane.toml";

/// Prefix for environment overrides
pub const ENV_PREFIX: &str = "TASKLANE_";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Board collection URL of the REST service
    pub api_url: String,
    /// Where the server keeps board documents
    pub data_dir: PathBuf,
    pub host: String,
    pub port: u16,
    /// How long the "saved" indicator stays up, in milliseconds
    pub saved_linger_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: "http://localhost:5000/api/boards".to_string(),
            data_dir: PathBuf::from(".tasklane"),
            host: "127.0.0.1".to_string(),
            port: 5000,
            saved_linger_ms: 3000,
        }
    }
}

impl Config {
    /// Load from the default file in the working directory plus environment
    pub fn load() -> Result<Self> {
        Self::load_from(CONFIG_FILE)
    }

    /// Load using `path` as the config file. A missing file is not an error.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!(file = %path.display(), "loading configuration");
        let config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(path))
            .merge(Env::prefixed(ENV_PREFIX))
            .extract::<Config>()?;
        Ok(config)
    }

    pub fn saved_linger(&self) -> Duration {
        Duration::from_millis(self.saved_linger_ms)
    }

    /// `host:port` for the server to bind
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
