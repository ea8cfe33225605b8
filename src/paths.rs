//! Platform-specific path resolution for settings

use std::path::PathBuf;

/// Application directory name below the platform config root
pub const APP_DIR: &str = "projgen";

/// Default settings file name
pub const CONFIG_FILE_NAME: &str = "config.json";

#[derive(Debug)]
/// Utility for resolving settings paths
pub struct PathResolver;

impl PathResolver {
    /// Get user config directory
    pub fn user_config_dir() -> PathBuf {
        dirs::config_dir()
            .or_else(|| dirs::home_dir().map(|h| h.join(".config")))
            .map(|d| d.join(APP_DIR))
            .unwrap_or_else(|| PathBuf::from(".").join(APP_DIR))
    }

    /// Get the default settings file
    pub fn config_file() -> PathBuf {
        Self::user_config_dir().join(CONFIG_FILE_NAME)
    }
}
