//! Configuration file loading for the CLI
//!
//! This module handles finding and loading TOML configuration files
//! from various locations (explicit path, local directory, system directory)
//! and applying command-line overrides on top.

use std::{
    fs,
    path::{Path, PathBuf},
};

use directories::ProjectDirs;
use log::{debug, info};
use thiserror::Error;

use dbmagic::{DbMagicError, config::AppConfig};

use crate::Args;

/// Configuration-related errors for CLI
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to parse TOML configuration {path}: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("Missing configuration file: {0}")]
    MissingFile(PathBuf),
}

impl From<ConfigError> for DbMagicError {
    fn from(err: ConfigError) -> Self {
        DbMagicError::Config(err.to_string())
    }
}

/// Find and load configuration from various locations
///
/// Search order:
/// 1. Explicit path if provided
/// 2. Local project directory (dbmagic/config.toml)
/// 3. Platform-specific config directory
/// 4. Default config if none found
///
/// # Errors
///
/// Returns error if:
/// - Explicit path is provided but file doesn't exist
/// - Config file exists but cannot be parsed
pub fn load_config(explicit_path: Option<impl AsRef<Path>>) -> Result<AppConfig, DbMagicError> {
    if let Some(path) = explicit_path {
        let path = path.as_ref();
        info!(path = path.display().to_string(); "Loading configuration from explicit path");
        return load_config_file(path);
    }

    let local_config = Path::new("dbmagic/config.toml");
    if local_config.exists() {
        info!(path = local_config.display().to_string(); "Loading configuration from local path");
        return load_config_file(local_config);
    }

    if let Some(proj_dirs) = ProjectDirs::from("com", "dbmagic", "dbmagic") {
        let system_config = proj_dirs.config_dir().join("config.toml");

        if system_config.exists() {
            info!(path = system_config.display().to_string(); "Loading configuration from system path");
            return load_config_file(system_config);
        }

        debug!(path = system_config.display().to_string(); "System configuration file not found");
    } else {
        debug!("Could not determine platform-specific config directory");
    }

    debug!("No configuration file found, using default configuration");
    Ok(AppConfig::default())
}

/// Applies the view flags given on the command line.
pub fn apply_overrides(config: AppConfig, args: &Args) -> AppConfig {
    let mut view = *config.view();
    if let Some(width) = args.width {
        view = view.with_width(width);
    }
    if let Some(height) = args.height {
        view = view.with_height(height);
    }
    if let Some(zoom) = args.zoom {
        view = view.with_zoom(zoom);
    }
    if let Some(device_pixel_ratio) = args.device_pixel_ratio {
        view = view.with_device_pixel_ratio(device_pixel_ratio);
    }
    config.with_view(view)
}

fn load_config_file(path: impl AsRef<Path>) -> Result<AppConfig, DbMagicError> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(ConfigError::MissingFile(path.to_path_buf()).into());
    }

    let content = fs::read_to_string(path)?;

    let config: AppConfig = toml::from_str(&content).map_err(|err| ConfigError::Parse {
        path: path.to_path_buf(),
        message: err.message().to_string(),
    })?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;

    #[test]
    fn test_explicit_config_is_loaded() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[view]\nzoom = 1.5\n").unwrap();

        let config = load_config(Some(&path)).unwrap();
        assert_eq!(config.view().zoom(), 1.5);
    }

    #[test]
    fn test_missing_explicit_config_is_an_error() {
        let dir = tempdir().unwrap();
        let err = load_config(Some(dir.path().join("absent.toml"))).unwrap_err();
        assert!(matches!(err, DbMagicError::Config(msg) if msg.starts_with("Missing configuration file")));
    }

    #[test]
    fn test_malformed_config_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[view\nzoom = 1.5\n").unwrap();

        let err = load_config(Some(&path)).unwrap_err();
        assert!(matches!(err, DbMagicError::Config(_)));
    }

    #[test]
    fn test_flags_override_config() {
        let config: AppConfig = toml::from_str("[view]\nzoom = 3\nwidth = 500\n").unwrap();
        let args = Args {
            zoom: Some(2.0),
            height: Some(400.0),
            ..Args::default()
        };

        let config = apply_overrides(config, &args);
        assert_eq!(config.view().zoom(), 2.0);
        assert_eq!(config.view().width(), Some(500.0));
        assert_eq!(config.view().height(), Some(400.0));
        assert_eq!(config.view().device_pixel_ratio(), 1.0);
    }
}
