//! Configuration management for PROJGEN

use crate::error::{Error, Result};
use crate::paths::PathResolver;
use crate::placeholder::VariableResolver;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Allowed characters of a user placeholder key
pub const KEY_PATTERN: &str = r"^[A-Za-z0-9_]+$";

/// Persisted settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    /// Template root directory; may contain preset tokens
    #[serde(default)]
    pub template_path: String,
    /// Base directory for new projects; may contain any tokens
    #[serde(default)]
    pub target_base_path: String,
    /// Rewrite README.md content
    #[serde(default = "default_true")]
    pub replace_readme_content: bool,
    /// User-defined placeholders in substitution order
    #[serde(default)]
    pub user_placeholders: Vec<CustomPlaceholder>,
}

/// A user-configurable placeholder
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomPlaceholder {
    /// Key without delimiters, e.g. `project_name`
    pub key: String,
    /// Label shown when asking for a value
    pub label: String,
}

impl CustomPlaceholder {
    /// Create a placeholder
    pub fn new<K: Into<String>, L: Into<String>>(key: K, label: L) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
        }
    }

    /// Key in `%key%` form
    pub fn token(&self) -> String {
        format!("%{}%", self.key)
    }
}

/// Helper function for serde default = true
fn default_true() -> bool {
    true
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            template_path: "templates/[%project_name%]".to_string(),
            target_base_path: "projects/%year%/%month%".to_string(),
            replace_readme_content: true,
            user_placeholders: vec![
                CustomPlaceholder::new("project_name", "Project name"),
                CustomPlaceholder::new("order_no", "Order number"),
            ],
        }
    }
}

impl Settings {
    /// Load settings from file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::config(format!("Failed to read config file: {}", e)))?;

        match path.extension().and_then(|s| s.to_str()) {
            Some("yaml") | Some("yml") => serde_yaml::from_str(&content)
                .map_err(|e| Error::config(format!("Invalid YAML config: {}", e))),
            Some("toml") => toml::from_str(&content)
                .map_err(|e| Error::config(format!("Invalid TOML config: {}", e))),
            Some("json") | None => serde_json::from_str(&content)
                .map_err(|e| Error::config(format!("Invalid JSON config: {}", e))),
            _ => Err(Error::config("Unsupported config file format")),
        }
    }

    /// Save settings to file, creating parent directories
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let content = match path.extension().and_then(|s| s.to_str()) {
            Some("yaml") | Some("yml") => serde_yaml::to_string(self)
                .map_err(|e| Error::config(format!("Failed to serialize to YAML: {}", e)))?,
            Some("toml") => toml::to_string_pretty(self)
                .map_err(|e| Error::config(format!("Failed to serialize to TOML: {}", e)))?,
            Some("json") | None => serde_json::to_string_pretty(self)
                .map_err(|e| Error::config(format!("Failed to serialize to JSON: {}", e)))?,
            _ => return Err(Error::config("Unsupported config file format")),
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .map_err(|e| Error::config(format!("Failed to create config directory: {}", e)))?;
        }
        std::fs::write(path, content)
            .map_err(|e| Error::config(format!("Failed to write config file: {}", e)))?;

        Ok(())
    }

    /// Load settings, writing the defaults on first use
    pub fn load_or_init<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            return Self::from_file(path);
        }

        let settings = Self::default();
        settings.save(path)?;
        tracing::info!("Created default settings at {}", path.display());
        Ok(settings)
    }

    /// Default settings file location
    pub fn default_path() -> PathBuf {
        PathResolver::config_file()
    }

    /// Validate the user placeholder list
    pub fn validate(&self) -> Result<()> {
        let key_re = Regex::new(KEY_PATTERN)
            .map_err(|e| Error::config(format!("Invalid key pattern: {}", e)))?;
        let presets = VariableResolver::new();
        let mut used = HashSet::new();

        for ph in &self.user_placeholders {
            if ph.key.trim().is_empty() {
                return Err(Error::invalid_input("placeholder key must not be empty"));
            }
            if !key_re.is_match(&ph.key) {
                return Err(Error::invalid_input(format!(
                    "key '{}' contains invalid characters; use letters, digits and underscores",
                    ph.key
                )));
            }
            if ph.label.trim().is_empty() {
                return Err(Error::invalid_input(format!(
                    "key '{}' must have a label",
                    ph.key
                )));
            }
            if presets.is_preset(&ph.token()) {
                return Err(Error::invalid_input(format!(
                    "key '{}' collides with a preset placeholder",
                    ph.key
                )));
            }
            if !used.insert(ph.key.to_lowercase()) {
                return Err(Error::invalid_input(format!(
                    "key '{}' is defined more than once",
                    ph.key
                )));
            }
        }

        Ok(())
    }

    /// Append a placeholder, validating the resulting list
    pub fn add_placeholder(&mut self, placeholder: CustomPlaceholder) -> Result<()> {
        self.user_placeholders.push(placeholder);
        if let Err(e) = self.validate() {
            self.user_placeholders.pop();
            return Err(e);
        }
        Ok(())
    }

    /// Remove a placeholder by key, ignoring case. Returns whether one was removed.
    pub fn remove_placeholder(&mut self, key: &str) -> bool {
        let before = self.user_placeholders.len();
        self.user_placeholders
            .retain(|ph| !ph.key.eq_ignore_ascii_case(key));
        self.user_placeholders.len() != before
    }
}
