//! TOML configuration helpers.
//!
//! Every Lumen config struct is a plain serde type with `#[serde(default)]`.
//! These helpers give them a shared load/save path: strict loading that
//! reports errors, and lenient loading that falls back to defaults.

use crate::error::{ConfigError, ConfigResult};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::path::Path;
use tracing::{info, warn};

/// Load a config value from a TOML file.
pub fn load_toml<T: DeserializeOwned, P: AsRef<Path>>(path: P) -> ConfigResult<T> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&contents).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Load a config value from a TOML file.
/// Returns the default value if the file doesn't exist or is invalid.
pub fn load_toml_or_default<T, P>(path: P) -> T
where
    T: DeserializeOwned + Default,
    P: AsRef<Path>,
{
    let path = path.as_ref();

    if !path.exists() {
        info!("Config file {} not found, using defaults", path.display());
        return T::default();
    }

    match load_toml(path) {
        Ok(config) => {
            info!("Loaded config from {}", path.display());
            config
        },
        Err(e) => {
            warn!("{e}; using defaults");
            T::default()
        },
    }
}

/// Save a config value to a TOML file, creating parent directories.
pub fn save_toml<T: Serialize, P: AsRef<Path>>(value: &T, path: P) -> ConfigResult<()> {
    let path = path.as_ref();

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|source| ConfigError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    let contents = toml::to_string_pretty(value)?;
    fs::write(path, contents).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    info!("Saved config to {}", path.display());
    Ok(())
}
