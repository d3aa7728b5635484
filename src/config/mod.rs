mod types;

pub use types::*;

use crate::{Error, Result};
use std::env;
use std::path::Path;
use tracing::debug;

const DEFAULT_CONFIG_PATH: &str = "config.yaml";

/// Loads the configuration from `$CONFIG_PATH` (or `config.yaml`), then
/// applies environment overrides.
///
/// A missing `config.yaml` falls back to built-in defaults. A missing file
/// named explicitly through `CONFIG_PATH` is an error.
pub async fn load() -> Result<Config> {
    let explicit_path = env::var("CONFIG_PATH").ok();
    let mut config = match explicit_path {
        Some(path) => load_from_path(&path).await?,
        None if Path::new(DEFAULT_CONFIG_PATH).exists() => {
            load_from_path(DEFAULT_CONFIG_PATH).await?
        }
        None => {
            debug!("No {} found, using default configuration", DEFAULT_CONFIG_PATH);
            Config::default()
        }
    };

    if let Ok(host) = env::var("OLLAMA_HOST") {
        config.ollama.base_url = host;
    }

    Ok(config)
}

pub async fn load_from_path(path: &str) -> Result<Config> {
    debug!("Loading configuration from: {}", path);

    let config_str = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| Error::config(format!("Failed to read {}: {}", path, e)))?;
    let config: Config = serde_yaml::from_str(&config_str)?;

    Ok(config)
}
