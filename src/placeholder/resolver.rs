//! Builds the variable mapping for one operation

use crate::placeholder::mapping::VariableMapping;
use crate::placeholder::preset::{PresetVariable, PRESETS};
use chrono::{DateTime, Local};
use std::collections::HashSet;

/// Supplies preset variables and merges them with user-defined ones
#[derive(Debug, Clone, Copy)]
pub struct VariableResolver {
    catalog: &'static [PresetVariable],
}

impl Default for VariableResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl VariableResolver {
    /// Resolver over the built-in catalog
    pub fn new() -> Self {
        Self { catalog: PRESETS }
    }

    /// Resolver over a custom catalog
    pub fn with_catalog(catalog: &'static [PresetVariable]) -> Self {
        Self { catalog }
    }

    /// Every built-in token, lower-cased
    pub fn preset_keys(&self) -> HashSet<String> {
        self.catalog.iter().map(|p| p.token.to_lowercase()).collect()
    }

    /// Check a token against the catalog, ignoring case
    pub fn is_preset(&self, token: &str) -> bool {
        self.catalog
            .iter()
            .any(|p| p.token.eq_ignore_ascii_case(token))
    }

    /// Evaluate every preset against the current instant
    pub fn preset_mapping(&self) -> VariableMapping {
        self.preset_mapping_at(&Local::now())
    }

    /// Evaluate every preset against `now`
    pub fn preset_mapping_at(&self, now: &DateTime<Local>) -> VariableMapping {
        let mut mapping = VariableMapping::new();
        for preset in self.catalog {
            // catalog tokens are always well-formed
            if let Err(e) = mapping.insert(preset.token, preset.evaluate(now)) {
                tracing::warn!("Skipping malformed preset {}: {}", preset.token, e);
            }
        }
        mapping
    }

    /// Overlay user entries onto preset entries, user entries winning.
    ///
    /// Preset tokens keep catalog order and come first; new user tokens are
    /// appended in their own order.
    pub fn merged_mapping(
        &self,
        preset: &VariableMapping,
        user_defined: &VariableMapping,
    ) -> VariableMapping {
        let mut merged = preset.clone();
        merged.extend_from(user_defined);
        tracing::debug!(
            "Merged {} preset and {} user variables",
            preset.len(),
            user_defined.len()
        );
        merged
    }
}
