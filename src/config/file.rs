//! Configuration file loading.

use crate::config::{Config, validate_config};
use crate::error::{Error, Result};
use crate::fusion::ColorSpeciesMapping;
use std::path::Path;

/// Load configuration from a TOML file.
///
/// Returns default config if the file does not exist.
pub fn load_config_file(path: &Path) -> Result<Config> {
    if !path.exists() {
        return Ok(Config::default());
    }

    let contents = std::fs::read_to_string(path).map_err(|e| Error::ConfigRead {
        path: path.to_path_buf(),
        source: e,
    })?;

    let config: Config = toml::from_str(&contents).map_err(|e| Error::ConfigParse {
        path: path.to_path_buf(),
        source: e,
    })?;

    validate_config(&config)?;
    Ok(config)
}

/// Save configuration to a TOML file.
pub fn save_config(config: &Config, path: &Path) -> Result<()> {
    // Create parent directories if they don't exist
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| Error::ConfigWrite {
            path: path.to_path_buf(),
            source: e,
        })?;
    }

    let contents =
        toml::to_string_pretty(config).map_err(|e| Error::ConfigSerialize { source: e })?;

    std::fs::write(path, contents).map_err(|e| Error::ConfigWrite {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Load only the color mapping from a config file.
///
/// A missing file or a file without `[colors]` is
/// [`Error::MissingConfiguration`].
pub fn load_color_mapping(path: &Path) -> Result<ColorSpeciesMapping> {
    if !path.exists() {
        return Err(Error::MissingConfiguration {
            reason: format!("config file '{}' does not exist", path.display()),
        });
    }
    load_config_file(path)?.color_mapping()
}

/// Replace the color mapping in a config file, keeping other settings.
pub fn save_color_mapping(mapping: &ColorSpeciesMapping, path: &Path) -> Result<()> {
    mapping.validate()?;
    let mut config = load_config_file(path)?;
    config.colors = Some(mapping.clone());
    save_config(&config, path)
}
