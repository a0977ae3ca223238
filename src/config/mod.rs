//! Configuration module for Torrentio-RS
//!
//! Handles loading settings from YAML files and environment variables.
//! Nothing here logs, so settings can be read before the subscriber exists.

mod settings;

pub use settings::*;

use anyhow::Result;
use std::path::{Path, PathBuf};

/// Load settings from `path`, or use defaults when there is none.
///
/// Environment overrides are applied in every case.
pub fn load_from(path: Option<&Path>) -> Result<Settings> {
    let mut settings = match path {
        Some(path) => Settings::from_file(path)?,
        None => Settings::default(),
    };

    settings.merge_env();
    Ok(settings)
}

/// Locate the settings file.
///
/// `TORRENTIO_SETTINGS_PATH` takes precedence over the default locations.
pub fn find_settings_file() -> Option<PathBuf> {
    if let Ok(path) = std::env::var("TORRENTIO_SETTINGS_PATH") {
        let path = PathBuf::from(path);
        if path.exists() {
            return Some(path);
        }
    }

    let mut paths = vec![
        PathBuf::from("settings.yml"),
        PathBuf::from("config/settings.yml"),
        PathBuf::from("/etc/torrentio/settings.yml"),
    ];
    if let Some(dir) = dirs::config_dir() {
        paths.push(dir.join("torrentio-rs/settings.yml"));
    }

    paths.into_iter().find(|p| p.exists())
}
