//! Core engine for PROJGEN
//!
//! Turns persisted settings plus per-run values into one resolved mapping and
//! hands it to the instantiator.

use crate::config::Settings;
use crate::error::{Error, Result};
use crate::placeholder::{Substitutor, VariableMapping, VariableResolver};
use crate::template::{InstantiationReport, TemplateInstantiator};
use std::collections::HashMap;
use std::path::PathBuf;

/// Values supplied for user-defined placeholders on one run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuntimeValues {
    values: HashMap<String, String>,
}

impl RuntimeValues {
    /// Create an empty set of values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the value for a bare key, ignoring case
    pub fn set<K: AsRef<str>, V: Into<String>>(&mut self, key: K, value: V) {
        self.values
            .insert(bare_key(key.as_ref()).to_lowercase(), value.into());
    }

    /// Value for a bare key, ignoring case
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values
            .get(&bare_key(key).to_lowercase())
            .map(String::as_str)
    }

    /// Parse a `KEY=VALUE` assignment
    pub fn parse_assignment(assignment: &str) -> Result<(String, String)> {
        let (key, value) = assignment.split_once('=').ok_or_else(|| {
            Error::invalid_input(format!("expected KEY=VALUE, got '{}'", assignment))
        })?;
        let key = bare_key(key.trim());
        if key.is_empty() {
            return Err(Error::invalid_input(format!(
                "missing key in '{}'",
                assignment
            )));
        }
        Ok((key.to_string(), value.to_string()))
    }

    /// Build values from `KEY=VALUE` assignments
    pub fn from_assignments<I, S>(assignments: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut values = Self::new();
        for assignment in assignments {
            let (key, value) = Self::parse_assignment(assignment.as_ref())?;
            values.set(key, value);
        }
        Ok(values)
    }

    /// Number of values
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True when no values are set
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

fn bare_key(key: &str) -> &str {
    key.strip_prefix('%')
        .and_then(|k| k.strip_suffix('%'))
        .unwrap_or(key)
}

/// Drives project creation from settings
#[derive(Debug, Default, Clone, Copy)]
pub struct ProjectCreator {
    resolver: VariableResolver,
}

impl ProjectCreator {
    /// Create a project creator over the built-in presets
    pub fn new() -> Self {
        Self {
            resolver: VariableResolver::new(),
        }
    }

    /// Create a project creator over a custom resolver
    pub fn with_resolver(resolver: VariableResolver) -> Self {
        Self { resolver }
    }

    /// Resolver in use
    pub fn resolver(&self) -> &VariableResolver {
        &self.resolver
    }

    /// Mapping of configured placeholders to their trimmed runtime values.
    ///
    /// Every configured placeholder needs a non-blank value.
    pub fn user_mapping(
        &self,
        settings: &Settings,
        values: &RuntimeValues,
    ) -> Result<VariableMapping> {
        let mut mapping = VariableMapping::new();
        for ph in &settings.user_placeholders {
            let value = values.get(&ph.key).map(str::trim).unwrap_or_default();
            if value.is_empty() {
                return Err(Error::invalid_input(format!(
                    "a value for '{}' is required",
                    ph.label
                )));
            }
            mapping.insert(ph.token(), value)?;
        }
        Ok(mapping)
    }

    /// Resolve the template root using preset tokens only.
    ///
    /// Falls back to the path exactly as configured when the resolved one
    /// does not exist.
    pub fn resolve_template_path(
        &self,
        settings: &Settings,
        presets: &VariableMapping,
    ) -> Result<PathBuf> {
        if settings.template_path.trim().is_empty() {
            return Err(Error::invalid_input("template path is not configured"));
        }

        let resolved = PathBuf::from(Substitutor::new(presets)?.apply(&settings.template_path));
        if resolved.is_dir() {
            return Ok(resolved);
        }

        let raw = PathBuf::from(&settings.template_path);
        if raw.is_dir() {
            tracing::debug!(
                "Using unresolved template path {} ({} does not exist)",
                raw.display(),
                resolved.display()
            );
            return Ok(raw);
        }

        Err(Error::NotFound(resolved)
            .context(format!("template path invalid (or {})", settings.template_path)))
    }

    /// Everything needed to run: template path and instantiator
    pub fn prepare(
        &self,
        settings: &Settings,
        values: &RuntimeValues,
    ) -> Result<(PathBuf, TemplateInstantiator)> {
        settings.validate()?;
        let user = self.user_mapping(settings, values)?;

        let presets = self.resolver.preset_mapping();
        let template = self.resolve_template_path(settings, &presets)?;

        if settings.target_base_path.trim().is_empty() {
            return Err(Error::invalid_input("target base path is not configured"));
        }

        let mapping = self.resolver.merged_mapping(&presets, &user);
        let instantiator = TemplateInstantiator::new(mapping, settings.replace_readme_content)?;
        Ok((template, instantiator))
    }

    /// Destination a run would create, without touching the filesystem
    pub fn preview(&self, settings: &Settings, values: &RuntimeValues) -> Result<PathBuf> {
        let (template, instantiator) = self.prepare(settings, values)?;
        instantiator.destination_for(&template, &settings.target_base_path)
    }

    /// Create a project
    pub fn create(
        &self,
        settings: &Settings,
        values: &RuntimeValues,
    ) -> Result<InstantiationReport> {
        let (template, instantiator) = self.prepare(settings, values)?;
        instantiator.create_project(&template, &settings.target_base_path)
    }
}
